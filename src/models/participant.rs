//! Participant identity: a stable entrant plus the submission currently playing for it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a participant (stable across submission swaps).
pub type ParticipantId = Uuid;

/// Unique identifier for a submitted bot.
pub type SubmissionId = Uuid;

/// One entrant as seen by the engine.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    /// Submission representing the participant in the slot this value sits in.
    pub submission: SubmissionId,
}

impl Participant {
    pub fn new(id: ParticipantId, submission: SubmissionId) -> Self {
        Self { id, submission }
    }
}
