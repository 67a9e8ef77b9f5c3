//! Extraction error types.

use thiserror::Error;

pub type ExtractResult<T> = Result<T, ExtractError>;

/// Failures of one extraction attempt over a single raw response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("No bracket-delimited candidate found in response")]
    NoCandidateFound,

    #[error("Candidate span of {length} bytes could not be repaired")]
    SpanUnrepairable { length: usize },

    #[error("None of {candidates} candidate spans could be parsed")]
    NoUsableCandidate { candidates: usize },

    #[error("Every record was dropped during validation ({dropped} dropped)")]
    BatchEmptyAfterValidation { dropped: usize },
}

impl ExtractError {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractError::NoCandidateFound => "no_candidate",
            ExtractError::SpanUnrepairable { .. } => "span_unrepairable",
            ExtractError::NoUsableCandidate { .. } => "no_usable_candidate",
            ExtractError::BatchEmptyAfterValidation { .. } => "batch_empty",
        }
    }
}

/// Reason a single record was excluded from an otherwise usable batch.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordDrop {
    #[error("Missing {0} time")]
    MissingTime(&'static str),

    #[error("Invalid {field} time {value:?}: {reason}")]
    InvalidTime {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Title is empty")]
    EmptyTitle,

    #[error("End ({end}s) is not after start ({start}s)")]
    NonPositiveInterval { start: u32, end: u32 },

    #[error("Duration {duration}s outside {min}..={max}s")]
    DurationOutOfBounds { duration: u32, min: u32, max: u32 },

    #[error("End ({end}s) exceeds media duration ({media:.1}s)")]
    EndBeyondMedia { end: u32, media: f64 },
}
