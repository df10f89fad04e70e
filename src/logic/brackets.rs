//! Single- and double-elimination generation: emit every bracket node whose two
//! competitors are known, and the bracket-reset rematch when it is owed.

use crate::logic::cache::match_tree;
use crate::logic::generator::MatchGenerator;
use crate::models::{
    EngineError, Generation, GenerationState, MatchTree, NewMatch, NodeId, OriginSlot,
    Participant, PlayedMatch, Selector, TreeKind,
};
use std::collections::HashMap;

/// Persisted matches mapped onto the nodes of a tree.
pub(crate) struct BracketProgress<'a> {
    tree: &'a MatchTree,
    state: &'a GenerationState,
    by_node: HashMap<NodeId, &'a PlayedMatch>,
    reset: Option<&'a PlayedMatch>,
}

impl<'a> BracketProgress<'a> {
    /// Index `state.matches` by node. Fails on any match the tree cannot account for.
    pub(crate) fn index(
        tree: &'a MatchTree,
        state: &'a GenerationState,
    ) -> Result<Self, EngineError> {
        let reset_index = tree.reset_index();
        let mut by_node = HashMap::new();
        let mut reset = None;
        for m in &state.matches {
            let error = if m.index >= tree.len() && Some(m.index) != reset_index {
                Some(EngineError::UnknownBracketNode {
                    index: m.index,
                    nodes: tree.len(),
                })
            } else if m.slots.len() != 2 {
                Some(EngineError::MalformedBracketMatch {
                    index: m.index,
                    slots: m.slots.len(),
                })
            } else if Some(m.index) == reset_index {
                reset.replace(m).map(|_| EngineError::DuplicateBracketNode(m.index))
            } else {
                by_node
                    .insert(m.index, m)
                    .map(|_| EngineError::DuplicateBracketNode(m.index))
            };
            if let Some(error) = error {
                log::warn!("Inconsistent bracket state: {}", error);
                return Err(error);
            }
        }
        Ok(Self {
            tree,
            state,
            by_node,
            reset,
        })
    }

    pub(crate) fn tree(&self) -> &MatchTree {
        self.tree
    }

    pub(crate) fn played(&self, node: NodeId) -> Option<&'a PlayedMatch> {
        self.by_node.get(&node).copied()
    }

    pub(crate) fn reset_match(&self) -> Option<&'a PlayedMatch> {
        self.reset
    }

    /// `(winner, loser)` of the bracket-reset rematch once it has a result.
    pub(crate) fn reset_outcome(&self) -> Option<(Participant, Participant)> {
        self.reset?.advancing(self.state.ranking())
    }

    /// `(winner, loser)` of a node once it has a result.
    pub(crate) fn outcome(&self, node: NodeId) -> Option<(Participant, Participant)> {
        self.played(node)?.advancing(self.state.ranking())
    }

    /// Competitor of a slot, if already known. Advancing participants play with their
    /// current submission.
    fn resolve(&self, slot: OriginSlot) -> Option<Participant> {
        match slot {
            OriginSlot::Seed(seed) => self.state.participants.get(seed).copied(),
            OriginSlot::Match { node, selector } => {
                let (winner, loser) = self.outcome(node)?;
                let advancing = match selector {
                    Selector::Winner => winner,
                    Selector::Loser => loser,
                };
                Some(self.state.current(advancing))
            }
        }
    }

    /// True when the losers-bracket finalist won the first grand final.
    pub(crate) fn reset_required(&self) -> bool {
        if self.tree.kind != TreeKind::DoubleElimination {
            return false;
        }
        let Some(grand_final) = self.tree.final_match.and_then(|n| self.played(n)) else {
            return false;
        };
        match grand_final.advancing(self.state.ranking()) {
            Some((winner, _)) => winner.id == grand_final.slots[1].id,
            None => false,
        }
    }

    /// Rematch between the grand finalists, if owed and not yet generated.
    fn pending_reset(&self) -> Option<NewMatch> {
        if self.reset.is_some() || !self.reset_required() {
            return None;
        }
        let index = self.tree.reset_index()?;
        let grand_final = self.played(self.tree.final_match?)?;
        let slots = grand_final
            .slots
            .iter()
            .map(|p| self.state.current(*p))
            .collect();
        Some(NewMatch::new(index, slots))
    }

    /// Every node generated and executed, and no rematch outstanding.
    pub(crate) fn is_complete(&self) -> bool {
        if self.tree.is_empty() {
            return false;
        }
        let all_played = self
            .tree
            .nodes
            .iter()
            .all(|node| self.played(node.id).is_some_and(PlayedMatch::is_executed));
        let reset_settled =
            !self.reset_required() || self.reset.is_some_and(PlayedMatch::is_executed);
        all_played && reset_settled
    }

    /// Nodes whose competitors are both known but which were never generated.
    fn ready(&self) -> Vec<NewMatch> {
        self.tree
            .nodes
            .iter()
            .filter(|node| !self.by_node.contains_key(&node.id))
            .filter_map(|node| {
                let a = self.resolve(node.slots[0])?;
                let b = self.resolve(node.slots[1])?;
                Some(NewMatch::new(node.id, vec![a, b]))
            })
            .collect()
    }
}

/// Incremental generator for elimination formats.
#[derive(Clone, Copy, Debug, Default)]
pub struct BracketsGenerator;

impl MatchGenerator for BracketsGenerator {
    fn generate(&self, state: &GenerationState) -> Result<Generation, EngineError> {
        let Some(kind) = TreeKind::for_format(state.format, state.settings) else {
            return Ok(Generation::pending());
        };
        if state.is_degenerate() {
            log::debug!(
                "Skipping bracket generation: {} active participant(s)",
                state.participants.len()
            );
            return Ok(Generation::pending());
        }

        let tree = match_tree(kind, state.participants.len());
        let progress = BracketProgress::index(&tree, state)?;

        let mut matches = progress.ready();
        matches.extend(progress.pending_reset());
        let done = matches.is_empty() && progress.is_complete();
        log::debug!(
            "{:?}: {} new match(es), {} of {} generated, done={}",
            kind,
            matches.len(),
            state.matches.len(),
            tree.len(),
            done
        );
        Ok(Generation::new(matches, done))
    }
}
