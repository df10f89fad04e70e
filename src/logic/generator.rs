//! One generator per tournament format behind a single `generate` capability.

use crate::logic::brackets::BracketsGenerator;
use crate::logic::ongoing::{OngoingConfig, OngoingGenerator};
use crate::logic::round_robin::{SinglePlayerGenerator, TableGenerator};
use crate::models::{EngineError, Generation, GenerationState, TournamentFormat};

/// Decide which matches must be played next for a snapshot.
pub trait MatchGenerator {
    fn generate(&self, state: &GenerationState) -> Result<Generation, EngineError>;
}

#[derive(Clone, Debug)]
pub enum FormatGenerator {
    SinglePlayer(SinglePlayerGenerator),
    Table(TableGenerator),
    Brackets(BracketsGenerator),
    Ongoing(OngoingGenerator),
}

impl FormatGenerator {
    pub fn for_format(format: TournamentFormat) -> Self {
        Self::with_ongoing_config(format, OngoingConfig::default())
    }

    /// Like `for_format`, with custom matchmaking for ongoing tournaments.
    pub fn with_ongoing_config(format: TournamentFormat, config: OngoingConfig) -> Self {
        match format {
            TournamentFormat::SinglePlayer => FormatGenerator::SinglePlayer(SinglePlayerGenerator),
            TournamentFormat::Table => FormatGenerator::Table(TableGenerator),
            TournamentFormat::SingleElimination | TournamentFormat::DoubleElimination => {
                FormatGenerator::Brackets(BracketsGenerator)
            }
            TournamentFormat::Ongoing => FormatGenerator::Ongoing(OngoingGenerator::new(config)),
        }
    }
}

impl MatchGenerator for FormatGenerator {
    fn generate(&self, state: &GenerationState) -> Result<Generation, EngineError> {
        match self {
            FormatGenerator::SinglePlayer(g) => g.generate(state),
            FormatGenerator::Table(g) => g.generate(state),
            FormatGenerator::Brackets(g) => g.generate(state),
            FormatGenerator::Ongoing(g) => g.generate(state),
        }
    }
}

/// Generate the next batch for `state` with the generator of its format.
pub fn generate(state: &GenerationState) -> Result<Generation, EngineError> {
    FormatGenerator::for_format(state.format).generate(state)
}
