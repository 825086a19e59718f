//! Error types for seqsync

use thiserror::Error;

use crate::{InvariantViolation, Phase, RecordId};

/// Core seqsync errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeqError {
    // Reconciliation errors
    #[error("Stale value {value} could not be located for removal")]
    StaleUnresolvable { value: RecordId },

    #[error("No progress during {phase}: {detail}")]
    NoProgress { phase: Phase, detail: String },

    #[error(transparent)]
    InvariantViolation(#[from] InvariantViolation),

    // Mutator errors
    #[error("Edit position {position} out of bounds for sequence of length {len}")]
    EditOutOfBounds { position: usize, len: usize },

    // Input errors
    #[error("Invalid specification at position {position}: {value} is zero or not ascending")]
    InvalidSpecification { position: usize, value: RecordId },

    #[error("Cannot parse {token:?}: {reason}")]
    Parse { token: String, reason: String },
}

impl SeqError {
    pub fn no_progress(phase: Phase, detail: impl Into<String>) -> Self {
        SeqError::NoProgress {
            phase,
            detail: detail.into(),
        }
    }
}

/// Result type for seqsync operations
pub type SeqResult<T> = Result<T, SeqError>;
