//! Bracket construction: seeding, byes, winners/losers brackets.
//!
//! Brackets are laid out over a virtual bracket of `next_power_of_two(n)` slots. Seeds
//! that do not exist leave an empty slot; a virtual match against an empty slot is a bye
//! and creates no node, its real competitor simply moves on as the same origin slot.

use crate::models::{BracketSide, MatchNode, MatchTree, NodeId, OriginSlot, Selector, TreeKind};

/// Competitor source while building: either a real origin slot or nobody.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Source {
    Empty,
    Slot(OriginSlot),
}

#[derive(Default)]
struct TreeBuilder {
    nodes: Vec<MatchNode>,
}

impl TreeBuilder {
    /// Play a virtual match. Returns `(winner, loser, node)`; no node is created when
    /// either side is empty.
    fn pair(
        &mut self,
        side: BracketSide,
        level: usize,
        position: usize,
        a: Source,
        b: Source,
    ) -> (Source, Source, Option<NodeId>) {
        match (a, b) {
            (Source::Empty, other) | (other, Source::Empty) => (other, Source::Empty, None),
            (Source::Slot(a), Source::Slot(b)) => {
                let id = self.nodes.len();
                self.nodes.push(MatchNode {
                    id,
                    side,
                    level,
                    position,
                    slots: [a, b],
                });
                (
                    Source::Slot(OriginSlot::Match {
                        node: id,
                        selector: Selector::Winner,
                    }),
                    Source::Slot(OriginSlot::Match {
                        node: id,
                        selector: Selector::Loser,
                    }),
                    Some(id),
                )
            }
        }
    }
}

struct WinnersBracket {
    levels: Vec<Vec<Option<NodeId>>>,
    /// Loser source of every virtual match, per level.
    losers: Vec<Vec<Source>>,
}

/// 0-based seed order of a balanced bracket: `[0, 3, 1, 2]` for 4 slots. Adjacent
/// entries meet in the first round; seeds 0 and 1 can only meet in the final.
pub(crate) fn seed_positions(size: usize) -> Vec<usize> {
    let mut seeds = vec![0usize];
    while seeds.len() < size {
        let mirror = seeds.len() * 2 - 1;
        seeds = seeds.iter().flat_map(|&s| [s, mirror - s]).collect();
    }
    seeds
}

fn winners_bracket(builder: &mut TreeBuilder, participants: usize) -> WinnersBracket {
    let size = participants.next_power_of_two();
    let mut current: Vec<Source> = seed_positions(size)
        .into_iter()
        .map(|s| {
            if s < participants {
                Source::Slot(OriginSlot::Seed(s))
            } else {
                Source::Empty
            }
        })
        .collect();

    let mut levels = Vec::new();
    let mut losers = Vec::new();
    while current.len() > 1 {
        let level = levels.len();
        let mut next = Vec::with_capacity(current.len() / 2);
        let mut ids = Vec::with_capacity(current.len() / 2);
        let mut lost = Vec::with_capacity(current.len() / 2);
        for (position, pair) in current.chunks_exact(2).enumerate() {
            let (winner, loser, id) =
                builder.pair(BracketSide::Winners, level, position, pair[0], pair[1]);
            next.push(winner);
            lost.push(loser);
            ids.push(id);
        }
        levels.push(ids);
        losers.push(lost);
        current = next;
    }
    WinnersBracket { levels, losers }
}

fn finish(
    kind: TreeKind,
    participants: usize,
    builder: TreeBuilder,
    winners_levels: Vec<Vec<Option<NodeId>>>,
) -> MatchTree {
    let mut entry_levels = vec![0; participants];
    let mut seen = vec![false; participants];
    for node in builder.nodes.iter().filter(|n| n.side == BracketSide::Winners) {
        for slot in node.slots {
            if let OriginSlot::Seed(seed) = slot {
                if !seen[seed] {
                    seen[seed] = true;
                    entry_levels[seed] = node.level;
                }
            }
        }
    }
    let winners_final = winners_levels.last().and_then(|level| level[0]);
    MatchTree {
        kind,
        participants,
        nodes: builder.nodes,
        winners_levels,
        losers_levels: Vec::new(),
        final_match: winners_final,
        third_place: None,
        winners_final,
        losers_final: None,
        entry_levels,
    }
}

/// Single-elimination bracket: `n - 1` matches, plus a third-place match when requested
/// and semifinals exist (`n > 3`).
pub fn single_elimination(participants: usize, include_third_place: bool) -> MatchTree {
    let kind = TreeKind::SingleElimination {
        third_place: include_third_place,
    };
    if participants <= 1 {
        return MatchTree::empty(kind, participants);
    }

    let mut builder = TreeBuilder::default();
    let winners = winners_bracket(&mut builder, participants);

    let mut third_place = None;
    if include_third_place && participants > 3 {
        let final_level = winners.levels.len() - 1;
        let semis = &winners.losers[final_level - 1];
        let (_, _, id) = builder.pair(BracketSide::ThirdPlace, final_level, 0, semis[0], semis[1]);
        third_place = id;
    }

    let mut tree = finish(kind, participants, builder, winners.levels);
    tree.third_place = third_place;
    tree
}

/// Double-elimination bracket: winners bracket (`n - 1`), losers bracket (`n - 2`) and
/// one grand final. The bracket-reset rematch is not part of the tree.
///
/// Losers bracket rounds alternate: odd rounds pair the surviving losers among
/// themselves, even rounds drop the losers of the next winners round in, in reverse
/// order so that two competitors who just met are kept apart.
pub fn double_elimination(participants: usize) -> MatchTree {
    let kind = TreeKind::DoubleElimination;
    if participants <= 1 {
        return MatchTree::empty(kind, participants);
    }

    let mut builder = TreeBuilder::default();
    let winners = winners_bracket(&mut builder, participants);
    let rounds = winners.levels.len();

    let mut losers_levels = Vec::new();
    let mut survivors: Vec<Source> = winners.losers[0].clone();
    for round in 1..rounds {
        let level = losers_levels.len();
        let mut paired = Vec::with_capacity(survivors.len() / 2);
        let mut ids = Vec::with_capacity(survivors.len() / 2);
        for (position, pair) in survivors.chunks_exact(2).enumerate() {
            let (winner, _, id) =
                builder.pair(BracketSide::Losers, level, position, pair[0], pair[1]);
            paired.push(winner);
            ids.push(id);
        }
        losers_levels.push(ids);

        let level = losers_levels.len();
        let mut dropped = Vec::with_capacity(paired.len());
        let mut ids = Vec::with_capacity(paired.len());
        let incoming = winners.losers[round].iter().rev();
        for (position, (survivor, loser)) in paired.iter().zip(incoming).enumerate() {
            let (winner, _, id) =
                builder.pair(BracketSide::Losers, level, position, *survivor, *loser);
            dropped.push(winner);
            ids.push(id);
        }
        losers_levels.push(ids);
        survivors = dropped;
    }

    let losers_final = losers_levels.last().and_then(|level| level[0]);
    let winners_final = winners.levels.last().and_then(|level| level[0]);
    let grand_final = match winners_final {
        Some(node) => {
            let champion = Source::Slot(OriginSlot::Match {
                node,
                selector: Selector::Winner,
            });
            let (_, _, id) =
                builder.pair(BracketSide::GrandFinal, 0, 0, champion, survivors[0]);
            id
        }
        None => None,
    };

    let mut tree = finish(kind, participants, builder, winners.levels);
    tree.losers_levels = losers_levels;
    tree.losers_final = losers_final;
    tree.final_match = grand_final;
    tree
}

/// Build the tree for any elimination kind.
pub fn build(kind: TreeKind, participants: usize) -> MatchTree {
    match kind {
        TreeKind::SingleElimination { third_place } => {
            single_elimination(participants, third_place)
        }
        TreeKind::DoubleElimination => double_elimination(participants),
    }
}
