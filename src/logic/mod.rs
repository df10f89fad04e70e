//! Engine logic: bracket trees, per-format generators and leaderboards.

mod brackets;
mod cache;
pub mod elo;
mod generator;
mod leaderboard;
mod ongoing;
mod round_robin;
mod tree;

pub use brackets::BracketsGenerator;
pub use cache::{match_tree, MatchTreeCache};
pub use generator::{generate, FormatGenerator, MatchGenerator};
pub use leaderboard::build_leaderboard;
pub use ongoing::{requested_match_count, OngoingConfig, OngoingGenerator};
pub use round_robin::{SinglePlayerGenerator, TableGenerator};
pub use tree::{double_elimination, single_elimination};
