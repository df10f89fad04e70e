//! Standings returned to the caller.

use crate::models::bracket::{MatchTree, NodeId};
use crate::models::participant::{ParticipantId, SubmissionId};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub participant: ParticipantId,
    pub submission: SubmissionId,
    /// Elo rating, table points, single-player score or bracket progress, depending on format.
    pub score: f64,
    /// 1-based. Shared only by participants knocked out at the same bracket depth.
    pub place: u32,
    /// Starting slot (seed) in the active list.
    pub seed: Option<usize>,
}

/// Bracket data a client needs to draw an elimination tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BracketView {
    pub winners_levels: Vec<Vec<Option<NodeId>>>,
    pub losers_levels: Vec<Vec<Option<NodeId>>>,
    pub final_match: Option<NodeId>,
    pub third_place: Option<NodeId>,
    pub winners_final: Option<NodeId>,
    pub losers_final: Option<NodeId>,
    /// Index of the bracket-reset rematch, present only once it was generated.
    pub reset_match: Option<usize>,
}

impl BracketView {
    pub fn from_tree(tree: &MatchTree, reset_match: Option<usize>) -> Self {
        Self {
            winners_levels: tree.winners_levels.clone(),
            losers_levels: tree.losers_levels.clone(),
            final_match: tree.final_match,
            third_place: tree.third_place,
            winners_final: tree.winners_final,
            losers_final: tree.losers_final,
            reset_match,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    /// Ordered best first.
    pub entries: Vec<LeaderboardEntry>,
    pub finished: bool,
    /// Elimination formats only.
    pub bracket: Option<BracketView>,
}

impl Leaderboard {
    pub fn entry(&self, participant: ParticipantId) -> Option<&LeaderboardEntry> {
        self.entries.iter().find(|e| e.participant == participant)
    }

    pub fn places(&self) -> Vec<u32> {
        self.entries.iter().map(|e| e.place).collect()
    }
}
