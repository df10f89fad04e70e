//! Data structures for the engine: participants, matches, brackets, snapshots and standings.

mod bracket;
mod game;
mod leaderboard;
mod participant;
mod tournament;

pub use bracket::{BracketSide, MatchNode, MatchTree, NodeId, OriginSlot, Selector, TreeKind};
pub use game::{Generation, MatchResult, NewMatch, PlayedMatch};
pub use leaderboard::{BracketView, Leaderboard, LeaderboardEntry};
pub use participant::{Participant, ParticipantId, SubmissionId};
pub use tournament::{
    EngineError, GenerationState, RankingStrategy, TournamentFormat, TournamentSettings,
};
