//! Bot tournament engine: decides which matches to play next for a tournament snapshot
//! and derives standings from the results.

pub mod logic;
pub mod models;

pub use logic::{
    build_leaderboard, double_elimination, elo, generate, match_tree, requested_match_count,
    single_elimination, BracketsGenerator, FormatGenerator, MatchGenerator, MatchTreeCache,
    OngoingConfig, OngoingGenerator, SinglePlayerGenerator, TableGenerator,
};
pub use models::{
    BracketSide, BracketView, EngineError, Generation, GenerationState, Leaderboard,
    LeaderboardEntry, MatchNode, MatchResult, MatchTree, NewMatch, NodeId, OriginSlot,
    Participant, ParticipantId, PlayedMatch, RankingStrategy, Selector, SubmissionId,
    TournamentFormat, TournamentSettings, TreeKind,
};
