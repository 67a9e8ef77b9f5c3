//! Worker error types.

use clipmine_extract::ExtractError;
use clipmine_models::PolicyError;
use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Generation backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Transcript fetch failed: {0}")]
    TranscriptFailed(String),

    #[error("No captions available: {0}")]
    NoCaptions(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error("Clip generation failed after {attempts} attempts: {last_reason}")]
    ExhaustedRetries { attempts: u32, last_reason: String },

    #[error("Clip generation cancelled after {attempts} attempts")]
    Cancelled { attempts: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkerError {
    pub fn backend_unavailable(msg: impl Into<String>) -> Self {
        Self::BackendUnavailable(msg.into())
    }

    pub fn transcript_failed(msg: impl Into<String>) -> Self {
        Self::TranscriptFailed(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Check if a fresh generation attempt could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            WorkerError::BackendUnavailable(_) | WorkerError::Extraction(_)
        )
    }

    /// Attempts made before a terminal error, when known.
    pub fn attempts(&self) -> Option<u32> {
        match self {
            WorkerError::ExhaustedRetries { attempts, .. } | WorkerError::Cancelled { attempts } => {
                Some(*attempts)
            }
            _ => None,
        }
    }

    /// Message safe to show to end users. Internal diagnostics stay in
    /// the `Display` output and logs.
    pub fn user_message(&self) -> &'static str {
        match self {
            WorkerError::NoCaptions(_) => {
                "This video has no captions available, so clips can't be generated."
            }
            WorkerError::Cancelled { .. } => "Clip generation was cancelled.",
            WorkerError::Policy(_) | WorkerError::ConfigError(_) => {
                "Clip generation is misconfigured. Please contact support."
            }
            _ => "We couldn't generate clips for this video. Please try again.",
        }
    }
}
