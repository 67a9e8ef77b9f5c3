//! Shared data models for ClipMine.
//!
//! This crate provides Serde-serializable types for:
//! - Validated clip records and trim requests
//! - Transcript segments supplied by caption sources
//! - Generation policies derived from plan tiers
//! - Extraction outcomes returned to callers
//! - Timestamp parsing and formatting

pub mod clip;
pub mod extraction;
pub mod policy;
pub mod timestamp;
pub mod transcript;

// Re-export common types
pub use clip::{ClipRecord, TrimRequest, MAX_TITLE_CHARS, TRANSCRIPT_NOT_FOUND};
pub use extraction::{ExtractionId, ExtractionOutcome};
pub use policy::{GenerationPolicy, PlanTier, PolicyError};
pub use timestamp::{format_hms, seconds_to_time, time_to_seconds, TimestampError};
pub use transcript::{Transcript, TranscriptSegment};
