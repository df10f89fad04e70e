//! Matches as the engine sees them: already generated (with optional result) and newly emitted.

use crate::models::participant::{Participant, ParticipantId};
use crate::models::tournament::RankingStrategy;
use serde::{Deserialize, Serialize};

/// Terminal result of an executed match.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Score reported for each slot, in slot order. May be empty when only a winner is known.
    #[serde(default)]
    pub scores: Vec<f64>,
    /// Winning slot, if the execution declared one. `None` lets the scores decide.
    #[serde(default)]
    pub winner: Option<usize>,
}

impl MatchResult {
    pub fn won_by(slot: usize) -> Self {
        Self {
            scores: Vec::new(),
            winner: Some(slot),
        }
    }

    pub fn draw() -> Self {
        Self::default()
    }

    pub fn scored(scores: Vec<f64>) -> Self {
        Self {
            scores,
            winner: None,
        }
    }

    pub fn score(&self, slot: usize) -> Option<f64> {
        self.scores.get(slot).copied()
    }

    /// Winning slot of a two-slot match: the declared winner, else the better score.
    /// `None` means a draw (equal or missing scores).
    pub fn decided_winner(&self, ranking: RankingStrategy) -> Option<usize> {
        if self.winner.is_some() {
            return self.winner;
        }
        match (self.score(0), self.score(1)) {
            (Some(a), Some(b)) if ranking.is_better(a, b) => Some(0),
            (Some(a), Some(b)) if ranking.is_better(b, a) => Some(1),
            _ => None,
        }
    }

    /// Table points earned by `slot`: 1 for a win, 0.5 for a draw, 0 for a loss.
    pub fn points(&self, slot: usize, ranking: RankingStrategy) -> f64 {
        match self.decided_winner(ranking) {
            Some(w) if w == slot => 1.0,
            Some(_) => 0.0,
            None => 0.5,
        }
    }
}

/// A match that was generated earlier and persisted by the caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayedMatch {
    /// Bracket node id for elimination formats, running ordinal otherwise.
    pub index: usize,
    /// Participants per slot, in the order the match was emitted.
    pub slots: Vec<Participant>,
    /// None if not yet executed.
    #[serde(default)]
    pub result: Option<MatchResult>,
}

impl PlayedMatch {
    pub fn new(index: usize, slots: Vec<Participant>) -> Self {
        Self {
            index,
            slots,
            result: None,
        }
    }

    pub fn with_result(mut self, result: MatchResult) -> Self {
        self.result = Some(result);
        self
    }

    pub fn is_executed(&self) -> bool {
        self.result.is_some()
    }

    /// Slot occupied by the given participant, if any.
    pub fn slot_of(&self, participant: ParticipantId) -> Option<usize> {
        self.slots.iter().position(|p| p.id == participant)
    }

    /// Elimination outcome: `(winner, loser)` once executed. Draws advance slot 0.
    pub fn advancing(&self, ranking: RankingStrategy) -> Option<(Participant, Participant)> {
        let result = self.result.as_ref()?;
        if self.slots.len() != 2 {
            return None;
        }
        let w = result.decided_winner(ranking).filter(|&w| w < 2).unwrap_or(0);
        Some((self.slots[w], self.slots[1 - w]))
    }
}

/// A match the engine asks the caller to schedule.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct NewMatch {
    /// Bracket node id (elimination) or next free ordinal (other formats).
    pub index: usize,
    pub slots: Vec<Participant>,
}

impl NewMatch {
    pub fn new(index: usize, slots: Vec<Participant>) -> Self {
        Self { index, slots }
    }

    /// The persisted form of this match, before execution.
    pub fn into_played(self) -> PlayedMatch {
        PlayedMatch::new(self.index, self.slots)
    }
}

/// Output of one generator call.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Generation {
    pub matches: Vec<NewMatch>,
    /// True once the format needs no further matches.
    pub done: bool,
}

impl Generation {
    /// Nothing to schedule yet, not finished.
    pub fn pending() -> Self {
        Self::default()
    }

    pub fn new(matches: Vec<NewMatch>, done: bool) -> Self {
        Self { matches, done }
    }
}
