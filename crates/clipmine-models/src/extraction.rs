//! Extraction identifiers and caller-facing outcomes.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clip::ClipRecord;

/// Unique identifier for one orchestrated extraction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ExtractionId(pub String);

impl ExtractionId {
    /// Generate a new random extraction ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ExtractionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExtractionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Final result of an extraction invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExtractionOutcome {
    /// Non-empty, validated and transcript-aligned clips
    Success { clips: Vec<ClipRecord> },
    /// Retries exhausted; `reason` is safe to show to end users
    Failure { reason: String, attempts: u32 },
    /// The caller cancelled or timed out the invocation
    Cancelled { attempts: u32 },
}

impl ExtractionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ExtractionOutcome::Success { .. })
    }

    /// Clips on success, empty otherwise.
    pub fn clips(&self) -> &[ClipRecord] {
        match self {
            ExtractionOutcome::Success { clips } => clips,
            _ => &[],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionOutcome::Success { .. } => "success",
            ExtractionOutcome::Failure { .. } => "failure",
            ExtractionOutcome::Cancelled { .. } => "cancelled",
        }
    }
}
