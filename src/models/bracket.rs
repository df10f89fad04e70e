//! Abstract bracket skeleton: match nodes stored in an arena and addressed by id.

use crate::models::tournament::{TournamentFormat, TournamentSettings};
use serde::{Deserialize, Serialize};

/// Index of a node in its tree's arena. Doubles as the bracket index of the match.
pub type NodeId = usize;

/// Which competitor of a finished match moves into a slot.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selector {
    Winner,
    Loser,
}

/// Where the competitor of one slot comes from.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OriginSlot {
    /// Starting leaf bound to a seed. A seed that had a bye shows up here in a later round.
    Seed(usize),
    /// Result of another node.
    Match { node: NodeId, selector: Selector },
}

/// Part of the bracket a node belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketSide {
    Winners,
    Losers,
    GrandFinal,
    ThirdPlace,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchNode {
    pub id: NodeId,
    pub side: BracketSide,
    /// Round within its side, 0-based.
    pub level: usize,
    /// Position within the level, counting byes.
    pub position: usize,
    pub slots: [OriginSlot; 2],
}

/// Shape of an elimination bracket. Together with the participant count it fully
/// determines a tree.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeKind {
    SingleElimination { third_place: bool },
    DoubleElimination,
}

impl TreeKind {
    /// Tree shape for an elimination format, `None` for every other format.
    pub fn for_format(format: TournamentFormat, settings: TournamentSettings) -> Option<Self> {
        match format {
            TournamentFormat::SingleElimination => Some(TreeKind::SingleElimination {
                third_place: settings.third_place_match,
            }),
            TournamentFormat::DoubleElimination => Some(TreeKind::DoubleElimination),
            _ => None,
        }
    }

    /// Parse the short names used in service routes.
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "single_elimination" => Some(TreeKind::SingleElimination { third_place: false }),
            "single_elimination_third_place" => {
                Some(TreeKind::SingleElimination { third_place: true })
            }
            "double_elimination" => Some(TreeKind::DoubleElimination),
            _ => None,
        }
    }
}

/// Complete, immutable bracket for one `(kind, participants)` pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchTree {
    pub kind: TreeKind,
    pub participants: usize,
    pub nodes: Vec<MatchNode>,
    /// Winners bracket (the whole bracket for single elimination), one entry per
    /// virtual match; `None` where a bye absorbed the match.
    pub winners_levels: Vec<Vec<Option<NodeId>>>,
    /// Losers bracket levels, same gap convention. Empty for single elimination.
    pub losers_levels: Vec<Vec<Option<NodeId>>>,
    /// Final (single elimination) or grand final (double elimination).
    pub final_match: Option<NodeId>,
    pub third_place: Option<NodeId>,
    pub winners_final: Option<NodeId>,
    pub losers_final: Option<NodeId>,
    /// Winners level at which each seed plays its first real match.
    pub entry_levels: Vec<usize>,
}

impl MatchTree {
    /// Tree with no matches (fewer than two participants).
    pub fn empty(kind: TreeKind, participants: usize) -> Self {
        Self {
            kind,
            participants,
            nodes: Vec::new(),
            winners_levels: Vec::new(),
            losers_levels: Vec::new(),
            final_match: None,
            third_place: None,
            winners_final: None,
            losers_final: None,
            entry_levels: vec![0; participants],
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&MatchNode> {
        self.nodes.get(id)
    }

    /// Index given to the bracket-reset rematch, which lives outside the arena.
    pub fn reset_index(&self) -> Option<usize> {
        match self.kind {
            TreeKind::DoubleElimination if !self.is_empty() => Some(self.nodes.len()),
            _ => None,
        }
    }

    /// Real nodes per level of one side's levels.
    pub fn level_sizes(levels: &[Vec<Option<NodeId>>]) -> Vec<usize> {
        levels
            .iter()
            .map(|level| level.iter().filter(|n| n.is_some()).count())
            .collect()
    }
}
