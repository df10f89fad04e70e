//! Fixtures shared by the integration tests.
#![allow(dead_code)]

use bot_tournament_engine::{
    generate, GenerationState, MatchResult, NewMatch, Participant, TournamentFormat,
    TournamentSettings,
};
use uuid::Uuid;

/// Participant `seed` gets participant id `seed + 1` and submission id `1000 + seed`.
pub fn player(seed: usize) -> Participant {
    Participant::new(
        Uuid::from_u128(seed as u128 + 1),
        Uuid::from_u128(1000 + seed as u128),
    )
}

pub fn players(n: usize) -> Vec<Participant> {
    (0..n).map(player).collect()
}

/// Seed of a participant created by [`player`].
pub fn seed_of(p: &Participant) -> usize {
    (p.id.as_u128() - 1) as usize
}

pub fn seeds(m: &NewMatch) -> Vec<usize> {
    m.slots.iter().map(seed_of).collect()
}

pub fn state(format: TournamentFormat, n: usize) -> GenerationState {
    GenerationState::new(format, players(n))
}

pub fn with_third_place(state: GenerationState) -> GenerationState {
    state.with_settings(TournamentSettings {
        third_place_match: true,
        ..Default::default()
    })
}

/// Slot of the better (lower) seed.
pub fn favourite(m: &NewMatch) -> usize {
    if seed_of(&m.slots[0]) < seed_of(&m.slots[1]) {
        0
    } else {
        1
    }
}

/// Run generation to completion, executing every batch right away with `pick` choosing
/// the winning slot. Returns the final state and the sizes of the batches.
pub fn simulate(
    mut state: GenerationState,
    pick: impl Fn(&NewMatch) -> usize,
) -> (GenerationState, Vec<usize>) {
    let mut batches = Vec::new();
    for _ in 0..1000 {
        let generation = generate(&state).expect("consistent state");
        if generation.done {
            assert!(generation.matches.is_empty(), "done with matches left");
            return (state, batches);
        }
        assert!(!generation.matches.is_empty(), "generation stalled");
        batches.push(generation.matches.len());
        for m in generation.matches {
            let winner = pick(&m);
            state
                .matches
                .push(m.into_played().with_result(MatchResult::won_by(winner)));
        }
    }
    panic!("tournament did not finish");
}
