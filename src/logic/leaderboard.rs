//! Standings per format, derived from the accumulated matches of a snapshot.

use crate::logic::brackets::BracketProgress;
use crate::logic::cache::match_tree;
use crate::logic::elo::DEFAULT_RATING;
use crate::logic::round_robin::missing_pairs;
use crate::models::{
    BracketSide, BracketView, EngineError, GenerationState, Leaderboard, LeaderboardEntry,
    MatchTree, NodeId, Participant, ParticipantId, RankingStrategy, TournamentFormat, TreeKind,
};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Build the leaderboard for a snapshot.
///
/// Table, ongoing and single-player standings are a strict order by score, ties broken by
/// participant id. Table points and ratings already reflect who won each match, so they
/// always rank highest first; raw single-player scores rank in the tournament's direction.
/// Elimination standings place everyone by how deep they got; participants still in
/// contention share place 1.
pub fn build_leaderboard(state: &GenerationState) -> Result<Leaderboard, EngineError> {
    match state.format {
        TournamentFormat::SinglePlayer => Ok(single_player(state)),
        TournamentFormat::Table => Ok(table(state)),
        TournamentFormat::Ongoing => Ok(ongoing(state)),
        TournamentFormat::SingleElimination | TournamentFormat::DoubleElimination => {
            elimination(state)
        }
    }
}

fn entry(p: &Participant, score: f64, place: u32, seed: usize) -> LeaderboardEntry {
    LeaderboardEntry {
        participant: p.id,
        submission: p.submission,
        score,
        place,
        seed: Some(seed),
    }
}

/// Strict ranking of the active participants; unscored participants go last.
fn ranked(
    state: &GenerationState,
    scores: Vec<Option<f64>>,
    ranking: RankingStrategy,
) -> Vec<LeaderboardEntry> {
    let mut rows: Vec<(usize, &Participant, Option<f64>)> = state
        .participants
        .iter()
        .zip(scores)
        .enumerate()
        .map(|(seed, (p, score))| (seed, p, score))
        .collect();
    rows.sort_by(|a, b| {
        let by_score = match (a.2, b.2) {
            (Some(x), Some(y)) => ranking.compare(x, y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_score.then_with(|| a.1.id.cmp(&b.1.id))
    });
    rows.into_iter()
        .enumerate()
        .map(|(i, (seed, p, score))| entry(p, score.unwrap_or(0.0), i as u32 + 1, seed))
        .collect()
}

/// Win points; the ranking strategy only decides each match's winner.
fn table(state: &GenerationState) -> Leaderboard {
    let ranking = state.ranking();
    let scores: Vec<Option<f64>> = state
        .participants
        .iter()
        .map(|p| {
            let points: f64 = state
                .matches
                .iter()
                .filter(|m| m.slots.len() == 2)
                .filter_map(|m| Some(m.result.as_ref()?.points(m.slot_of(p.id)?, ranking)))
                .sum();
            Some(points)
        })
        .collect();
    let finished = !state.is_degenerate()
        && missing_pairs(state).is_empty()
        && state.matches.iter().all(|m| m.is_executed());
    Leaderboard {
        entries: ranked(state, scores, RankingStrategy::Maximum),
        finished,
        bracket: None,
    }
}

fn ongoing(state: &GenerationState) -> Leaderboard {
    let scores: Vec<Option<f64>> = state
        .participants
        .iter()
        .map(|p| Some(state.rating(p.id, DEFAULT_RATING)))
        .collect();
    Leaderboard {
        entries: ranked(state, scores, RankingStrategy::Maximum),
        finished: state.evaluation_closed,
        bracket: None,
    }
}

fn single_player(state: &GenerationState) -> Leaderboard {
    let mut evaluated = 0;
    let scores: Vec<Option<f64>> = state
        .participants
        .iter()
        .map(|p| {
            let latest = state
                .matches
                .iter()
                .filter(|m| m.is_executed())
                .filter_map(|m| m.slot_of(p.id).map(|slot| (m, slot)))
                .max_by_key(|(m, _)| m.index);
            if latest.is_some() {
                evaluated += 1;
            }
            latest.and_then(|(m, slot)| m.result.as_ref()?.score(slot))
        })
        .collect();
    Leaderboard {
        entries: ranked(state, scores, state.ranking()),
        finished: !state.is_degenerate() && evaluated == state.participants.len(),
        bracket: None,
    }
}

/// Place shared by everyone knocked out at `level` of a side: one more than the number
/// of participants left once every match up to that level has been played.
fn knockout_place(participants: usize, levels: &[Vec<Option<NodeId>>], level: usize) -> u32 {
    let knocked_out: usize = MatchTree::level_sizes(levels).iter().take(level + 1).sum();
    (participants - knocked_out + 1) as u32
}

/// Per-seed progress through a bracket.
struct Standings {
    seeds: HashMap<ParticipantId, usize>,
    place: Vec<u32>,
    wins: Vec<usize>,
    deepest_win: Vec<Option<usize>>,
}

impl Standings {
    fn new(state: &GenerationState) -> Self {
        let n = state.participants.len();
        Self {
            seeds: state
                .participants
                .iter()
                .enumerate()
                .map(|(seed, p)| (p.id, seed))
                .collect(),
            place: vec![1; n],
            wins: vec![0; n],
            deepest_win: vec![None; n],
        }
    }

    fn won(&mut self, p: &Participant, level: usize) {
        if let Some(&seed) = self.seeds.get(&p.id) {
            self.wins[seed] += 1;
            self.deepest_win[seed] = self.deepest_win[seed].max(Some(level));
        }
    }

    fn set_place(&mut self, p: &Participant, place: u32) {
        if let Some(&seed) = self.seeds.get(&p.id) {
            self.place[seed] = place;
        }
    }
}

fn single_elimination_standings(progress: &BracketProgress, standings: &mut Standings) {
    let tree = progress.tree();
    for node in tree.nodes.iter().filter(|n| n.side == BracketSide::Winners) {
        if let Some((winner, loser)) = progress.outcome(node.id) {
            standings.won(&winner, node.level);
            let place = knockout_place(tree.participants, &tree.winners_levels, node.level);
            standings.set_place(&loser, place);
        }
    }
    if let Some((winner, loser)) = tree.third_place.and_then(|n| progress.outcome(n)) {
        standings.set_place(&winner, 3);
        standings.set_place(&loser, 4);
    }
}

fn double_elimination_standings(progress: &BracketProgress, standings: &mut Standings) {
    let tree = progress.tree();
    for node in &tree.nodes {
        let Some((winner, loser)) = progress.outcome(node.id) else {
            continue;
        };
        standings.won(&winner, node.level);
        if node.side == BracketSide::Losers {
            let place = knockout_place(tree.participants, &tree.losers_levels, node.level);
            standings.set_place(&loser, place);
        }
    }

    let reset = progress.reset_outcome();
    if let Some((winner, _)) = reset {
        standings.won(&winner, 0);
    }
    let decisive = match reset {
        Some(outcome) => Some(outcome),
        None if progress.reset_required() => None,
        None => tree.final_match.and_then(|n| progress.outcome(n)),
    };
    if let Some((_, runner_up)) = decisive {
        standings.set_place(&runner_up, 2);
    }
}

fn elimination(state: &GenerationState) -> Result<Leaderboard, EngineError> {
    let Some(kind) = TreeKind::for_format(state.format, state.settings) else {
        return Ok(Leaderboard::default());
    };
    if state.is_degenerate() {
        let entries = state
            .participants
            .iter()
            .enumerate()
            .map(|(seed, p)| entry(p, 0.0, 1, seed))
            .collect();
        return Ok(Leaderboard {
            entries,
            finished: false,
            bracket: None,
        });
    }

    let tree = match_tree(kind, state.participants.len());
    let progress = BracketProgress::index(&tree, state)?;
    let mut standings = Standings::new(state);
    let scores: Vec<f64> = match kind {
        TreeKind::SingleElimination { .. } => {
            single_elimination_standings(&progress, &mut standings);
            // Rounds cleared; a bye clears a round too.
            (0..state.participants.len())
                .map(|seed| match standings.deepest_win[seed] {
                    Some(level) => (level + 1) as f64,
                    None => tree.entry_levels[seed] as f64,
                })
                .collect()
        }
        TreeKind::DoubleElimination => {
            double_elimination_standings(&progress, &mut standings);
            standings.wins.iter().map(|&w| w as f64).collect()
        }
    };

    let mut entries: Vec<LeaderboardEntry> = state
        .participants
        .iter()
        .enumerate()
        .map(|(seed, p)| entry(p, scores[seed], standings.place[seed], seed))
        .collect();
    entries.sort_by(|a, b| {
        a.place
            .cmp(&b.place)
            .then_with(|| b.score.total_cmp(&a.score))
            .then_with(|| a.seed.cmp(&b.seed))
    });

    let reset_match = progress.reset_match().map(|m| m.index);
    Ok(Leaderboard {
        entries,
        finished: progress.is_complete(),
        bracket: Some(BracketView::from_tree(&tree, reset_match)),
    })
}
