//! Clip extraction pipeline.
//!
//! Turns one raw model response into validated, transcript-aligned clips:
//! - Candidate array location (longest first)
//! - Ordered structural repair ladder
//! - Field alias normalization
//! - Policy validation
//! - Transcript alignment
//!
//! Everything here is synchronous and free of shared state.

pub mod align;
pub mod error;
pub mod locator;
pub mod normalize;
pub mod pipeline;
pub mod repair;
pub mod validate;

pub use align::{align_clips, transcript_for_interval};
pub use error::{ExtractError, ExtractResult, RecordDrop};
pub use locator::{locate_candidates, CandidateSpan};
pub use normalize::{normalize_drafts, NormalizedClip};
pub use pipeline::{extract_clips, Extraction};
pub use repair::{repair_span, ClipDraft, RepairStep, RepairedSpan, StepOutcome};
pub use validate::{enforce_policy, PolicyReport};
