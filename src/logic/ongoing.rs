//! Open-ended Elo ladder: draw the requested number of pairings, preferring opponents
//! of similar strength. Never reports `done`; the caller decides when evaluation stops.

use crate::logic::elo::{expected_score, DEFAULT_RATING};
use crate::logic::generator::MatchGenerator;
use crate::models::{
    EngineError, Generation, GenerationState, NewMatch, Participant, ParticipantId,
};
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Matchmaking knobs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OngoingConfig {
    /// How many of the closest-rated opponents a candidate is drawn from.
    #[serde(default = "default_candidate_window")]
    pub candidate_window: usize,
    /// Rating assumed for participants the caller supplied none for.
    #[serde(default = "default_rating")]
    pub default_rating: f64,
}

fn default_candidate_window() -> usize {
    3
}

fn default_rating() -> f64 {
    DEFAULT_RATING
}

impl Default for OngoingConfig {
    fn default() -> Self {
        Self {
            candidate_window: default_candidate_window(),
            default_rating: default_rating(),
        }
    }
}

/// Matches the caller may request now under a per-day quota: the full quota of every
/// started day since `evaluation_start`, minus what was already generated.
pub fn requested_match_count(
    quota_per_day: u32,
    evaluation_start: DateTime<Utc>,
    now: DateTime<Utc>,
    already_generated: usize,
) -> usize {
    if now < evaluation_start {
        return 0;
    }
    let days_started = (now - evaluation_start).num_days() as usize + 1;
    (quota_per_day as usize * days_started).saturating_sub(already_generated)
}

#[derive(Clone, Debug, Default)]
pub struct OngoingGenerator {
    config: OngoingConfig,
}

/// Per-call bookkeeping: games played and most recent opponent of each participant.
struct Ladder {
    played: HashMap<ParticipantId, usize>,
    last_opponent: HashMap<ParticipantId, ParticipantId>,
}

impl Ladder {
    fn from_state(state: &GenerationState) -> Self {
        let mut ladder = Self {
            played: HashMap::new(),
            last_opponent: HashMap::new(),
        };
        let mut history: Vec<_> = state
            .matches
            .iter()
            .filter(|m| m.slots.len() == 2)
            .collect();
        history.sort_by_key(|m| m.index);
        for m in history {
            ladder.record(m.slots[0].id, m.slots[1].id);
        }
        ladder
    }

    fn record(&mut self, a: ParticipantId, b: ParticipantId) {
        *self.played.entry(a).or_insert(0) += 1;
        *self.played.entry(b).or_insert(0) += 1;
        self.last_opponent.insert(a, b);
        self.last_opponent.insert(b, a);
    }

    fn played(&self, id: ParticipantId) -> usize {
        self.played.get(&id).copied().unwrap_or(0)
    }
}

impl OngoingGenerator {
    pub fn new(config: OngoingConfig) -> Self {
        Self { config }
    }

    /// Same as [`MatchGenerator::generate`] with a caller-provided random source.
    pub fn generate_with_rng<R: Rng>(
        &self,
        state: &GenerationState,
        rng: &mut R,
    ) -> Generation {
        if state.is_degenerate() || state.requested_matches == 0 {
            return Generation::pending();
        }

        let mut ladder = Ladder::from_state(state);
        let first = state.next_index();
        let mut matches = Vec::with_capacity(state.requested_matches);
        for i in 0..state.requested_matches {
            let candidate = self.pick_candidate(state, &ladder, rng);
            let opponent = self.pick_opponent(state, &ladder, candidate, rng);
            ladder.record(candidate.id, opponent.id);
            let slots = if rng.gen_bool(0.5) {
                vec![candidate, opponent]
            } else {
                vec![opponent, candidate]
            };
            matches.push(NewMatch::new(first + i, slots));
        }
        log::debug!(
            "Ongoing: drew {} pairing(s) from {} participants",
            matches.len(),
            state.participants.len()
        );
        Generation::new(matches, false)
    }

    /// Least-played participant, ties broken at random.
    fn pick_candidate<R: Rng>(
        &self,
        state: &GenerationState,
        ladder: &Ladder,
        rng: &mut R,
    ) -> Participant {
        let fewest = state
            .participants
            .iter()
            .map(|p| ladder.played(p.id))
            .min()
            .unwrap_or(0);
        let tied: Vec<Participant> = state
            .participants
            .iter()
            .filter(|p| ladder.played(p.id) == fewest)
            .copied()
            .collect();
        tied.choose(rng).copied().unwrap_or(state.participants[0])
    }

    /// Random pick among the opponents whose expected score against the candidate is
    /// closest to even. The previous opponent is skipped while others are available.
    fn pick_opponent<R: Rng>(
        &self,
        state: &GenerationState,
        ladder: &Ladder,
        candidate: Participant,
        rng: &mut R,
    ) -> Participant {
        let default = self.config.default_rating;
        let rating = state.rating(candidate.id, default);
        let previous = ladder.last_opponent.get(&candidate.id).copied();

        let mut pool: Vec<Participant> = state
            .participants
            .iter()
            .filter(|p| p.id != candidate.id)
            .copied()
            .collect();
        if pool.len() > 1 {
            pool.retain(|p| Some(p.id) != previous);
        }
        pool.sort_by(|a, b| {
            let gap_a = (expected_score(rating, state.rating(a.id, default)) - 0.5).abs();
            let gap_b = (expected_score(rating, state.rating(b.id, default)) - 0.5).abs();
            gap_a.total_cmp(&gap_b).then_with(|| a.id.cmp(&b.id))
        });
        pool.truncate(self.config.candidate_window.max(1));
        pool.choose(rng).copied().unwrap_or(candidate)
    }
}

impl MatchGenerator for OngoingGenerator {
    fn generate(&self, state: &GenerationState) -> Result<Generation, EngineError> {
        Ok(self.generate_with_rng(state, &mut rand::thread_rng()))
    }
}
