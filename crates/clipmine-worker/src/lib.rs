//! Clip generation worker.
//!
//! This crate provides:
//! - Retry/backoff orchestration around the extraction pipeline
//! - Gemini generation backend
//! - yt-dlp caption transcript source
//! - Prompt construction
//! - Structured logging and metrics

pub mod backend;
pub mod config;
pub mod error;
pub mod gemini;
pub mod logging;
pub mod metrics;
pub mod orchestrator;
pub mod prompt;
pub mod retry;
pub mod transcript;

pub use backend::{GenerationBackend, GenerationRequest};
pub use config::WorkerConfig;
pub use error::{WorkerError, WorkerResult};
pub use gemini::{GeminiClient, GeminiConfig};
pub use logging::ExtractionLogger;
pub use orchestrator::ClipOrchestrator;
pub use retry::RetryConfig;
pub use transcript::{TranscriptSource, YtDlpTranscriptSource};
