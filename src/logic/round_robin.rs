//! One-shot formats: single-player evaluation runs and the round-robin table.
//!
//! Both emit everything they can in one batch and report `done` immediately. Work that
//! already exists in the snapshot is skipped, so calling again is a no-op and a
//! participant who joins late receives exactly the matches they are missing.

use crate::logic::generator::MatchGenerator;
use crate::models::{
    EngineError, Generation, GenerationState, NewMatch, Participant, ParticipantId,
};
use std::collections::HashSet;

/// Unordered pair key.
fn pair_key(a: ParticipantId, b: ParticipantId) -> (ParticipantId, ParticipantId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Round-robin pairs among the active participants that were never generated, in seed order.
pub(crate) fn missing_pairs(state: &GenerationState) -> Vec<(Participant, Participant)> {
    let generated: HashSet<_> = state
        .matches
        .iter()
        .filter(|m| m.slots.len() == 2)
        .map(|m| pair_key(m.slots[0].id, m.slots[1].id))
        .collect();

    let players = &state.participants;
    let mut pairs = Vec::new();
    for (i, a) in players.iter().enumerate() {
        for b in &players[i + 1..] {
            if !generated.contains(&pair_key(a.id, b.id)) {
                pairs.push((*a, *b));
            }
        }
    }
    pairs
}

/// Active participants without any single-player run yet.
pub(crate) fn unevaluated(state: &GenerationState) -> Vec<Participant> {
    let evaluated: HashSet<ParticipantId> = state
        .matches
        .iter()
        .flat_map(|m| m.slots.iter().map(|p| p.id))
        .collect();
    state
        .participants
        .iter()
        .filter(|p| !evaluated.contains(&p.id))
        .copied()
        .collect()
}

/// One singleton match per active participant.
#[derive(Clone, Copy, Debug, Default)]
pub struct SinglePlayerGenerator;

impl MatchGenerator for SinglePlayerGenerator {
    fn generate(&self, state: &GenerationState) -> Result<Generation, EngineError> {
        if state.is_degenerate() {
            return Ok(Generation::pending());
        }
        let first = state.next_index();
        let matches: Vec<NewMatch> = unevaluated(state)
            .into_iter()
            .enumerate()
            .map(|(i, p)| NewMatch::new(first + i, vec![p]))
            .collect();
        log::debug!("Single player: {} new evaluation run(s)", matches.len());
        Ok(Generation::new(matches, true))
    }
}

/// Every unordered pair of active participants, once.
#[derive(Clone, Copy, Debug, Default)]
pub struct TableGenerator;

impl MatchGenerator for TableGenerator {
    fn generate(&self, state: &GenerationState) -> Result<Generation, EngineError> {
        if state.is_degenerate() {
            return Ok(Generation::pending());
        }
        let first = state.next_index();
        let matches: Vec<NewMatch> = missing_pairs(state)
            .into_iter()
            .enumerate()
            .map(|(i, (a, b))| NewMatch::new(first + i, vec![a, b]))
            .collect();
        log::debug!("Table: {} new pairing(s)", matches.len());
        Ok(Generation::new(matches, true))
    }
}
