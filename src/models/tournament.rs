//! Tournament format, settings, the per-call generation snapshot and engine errors.

use crate::models::game::PlayedMatch;
use crate::models::participant::{Participant, ParticipantId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// Errors the engine raises instead of guessing. All of them mean the caller's snapshot
/// disagrees with the bracket the engine recomputed and cannot be repaired here.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EngineError {
    /// A persisted match points at a bracket node that does not exist for this participant count.
    UnknownBracketNode { index: usize, nodes: usize },
    /// Two persisted matches claim the same bracket node.
    DuplicateBracketNode(usize),
    /// A bracket match does not have exactly two slots.
    MalformedBracketMatch { index: usize, slots: usize },
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::UnknownBracketNode { index, nodes } => write!(
                f,
                "Match {} does not belong to a bracket of {} nodes",
                index, nodes
            ),
            EngineError::DuplicateBracketNode(index) => {
                write!(f, "Bracket node {} was generated more than once", index)
            }
            EngineError::MalformedBracketMatch { index, slots } => write!(
                f,
                "Bracket match {} has {} slots, expected 2",
                index, slots
            ),
        }
    }
}

impl std::error::Error for EngineError {}

/// How a tournament is played.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentFormat {
    /// Each submission is evaluated alone.
    SinglePlayer,
    /// Round robin: everyone plays everyone once.
    Table,
    SingleElimination,
    DoubleElimination,
    /// Open-ended Elo ladder.
    Ongoing,
}

/// Whether a higher or a lower score is better.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingStrategy {
    #[default]
    Maximum,
    Minimum,
}

impl RankingStrategy {
    /// Strictly better, never true for equal scores.
    pub fn is_better(self, a: f64, b: f64) -> bool {
        self.compare(a, b) == Ordering::Less
    }

    /// Ordering that sorts the best score first.
    pub fn compare(self, a: f64, b: f64) -> Ordering {
        match self {
            RankingStrategy::Maximum => b.total_cmp(&a),
            RankingStrategy::Minimum => a.total_cmp(&b),
        }
    }
}

/// Per-tournament knobs the caller stores alongside the format.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentSettings {
    #[serde(default)]
    pub ranking: RankingStrategy,
    /// Single elimination only: play a match for third place.
    #[serde(default)]
    pub third_place_match: bool,
}

/// Immutable snapshot the caller rebuilds from persisted data before every engine call.
///
/// Every match returned by an earlier `generate` call must be present in `matches`,
/// executed or not; the engine never re-derives matches it already issued.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationState {
    pub format: TournamentFormat,
    #[serde(default)]
    pub settings: TournamentSettings,
    /// Active participants; the position is the seed.
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub matches: Vec<PlayedMatch>,
    /// Current Elo ratings (ongoing tournaments).
    #[serde(default)]
    pub ratings: HashMap<ParticipantId, f64>,
    /// How many matches the ongoing generator should draw on this call.
    #[serde(default)]
    pub requested_matches: usize,
    /// Ongoing tournaments: set by the caller once the evaluation cutoff has passed.
    #[serde(default)]
    pub evaluation_closed: bool,
}

impl GenerationState {
    pub fn new(format: TournamentFormat, participants: Vec<Participant>) -> Self {
        Self {
            format,
            settings: TournamentSettings::default(),
            participants,
            matches: Vec::new(),
            ratings: HashMap::new(),
            requested_matches: 0,
            evaluation_closed: false,
        }
    }

    pub fn with_settings(mut self, settings: TournamentSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_matches(mut self, matches: Vec<PlayedMatch>) -> Self {
        self.matches = matches;
        self
    }

    pub fn ranking(&self) -> RankingStrategy {
        self.settings.ranking
    }

    /// False if a participant or a submission appears twice in the active list.
    pub fn has_unique_participants(&self) -> bool {
        let mut ids = HashSet::new();
        let mut submissions = HashSet::new();
        self.participants
            .iter()
            .all(|p| ids.insert(p.id) && submissions.insert(p.submission))
    }

    /// True when there is nothing meaningful to generate: fewer than two participants
    /// where an opponent is required, or duplicates in the active list.
    pub fn is_degenerate(&self) -> bool {
        let required = match self.format {
            TournamentFormat::SinglePlayer => 1,
            _ => 2,
        };
        self.participants.len() < required || !self.has_unique_participants()
    }

    /// Current rating of a participant, or `default` when the caller supplied none.
    pub fn rating(&self, participant: ParticipantId, default: f64) -> f64 {
        self.ratings.get(&participant).copied().unwrap_or(default)
    }

    /// The active form of a participant (their current submission), falling back to the
    /// historical value when they are no longer active.
    pub fn current(&self, participant: Participant) -> Participant {
        self.participants
            .iter()
            .find(|p| p.id == participant.id)
            .copied()
            .unwrap_or(participant)
    }

    /// First index not used by any persisted match.
    pub fn next_index(&self) -> usize {
        self.matches
            .iter()
            .map(|m| m.index + 1)
            .max()
            .unwrap_or(0)
    }
}
