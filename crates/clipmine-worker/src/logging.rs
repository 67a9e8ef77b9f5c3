//! Structured extraction logging.
//!
//! Provides consistent, structured logging for clip extraction with
//! tracing spans and contextual information.

use clipmine_models::ExtractionId;
use tracing::{error, info, warn, Span};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Extraction logger for structured logging with consistent formatting.
///
/// Every line carries the extraction ID and operation so retries of one
/// invocation can be grouped in log search.
#[derive(Debug, Clone)]
pub struct ExtractionLogger {
    extraction_id: String,
    operation: String,
}

impl ExtractionLogger {
    /// Create a new logger for a specific extraction and operation.
    pub fn new(extraction_id: &ExtractionId, operation: &str) -> Self {
        Self {
            extraction_id: extraction_id.to_string(),
            operation: operation.to_string(),
        }
    }

    pub fn log_start(&self, message: &str) {
        info!(
            extraction_id = %self.extraction_id,
            operation = %self.operation,
            "Extraction started: {}", message
        );
    }

    /// Log a progress update during an extraction.
    pub fn log_progress(&self, message: &str) {
        info!(
            extraction_id = %self.extraction_id,
            operation = %self.operation,
            "Extraction progress: {}", message
        );
    }

    /// Log one generation attempt.
    pub fn log_attempt(&self, attempt: u32, max_attempts: u32) {
        info!(
            extraction_id = %self.extraction_id,
            operation = %self.operation,
            attempt,
            max_attempts,
            "Generation attempt {}/{}", attempt, max_attempts
        );
    }

    pub fn log_warning(&self, message: &str) {
        warn!(
            extraction_id = %self.extraction_id,
            operation = %self.operation,
            "Extraction warning: {}", message
        );
    }

    pub fn log_error(&self, message: &str) {
        error!(
            extraction_id = %self.extraction_id,
            operation = %self.operation,
            "Extraction error: {}", message
        );
    }

    pub fn log_completion(&self, message: &str) {
        info!(
            extraction_id = %self.extraction_id,
            operation = %self.operation,
            "Extraction completed: {}", message
        );
    }

    pub fn extraction_id(&self) -> &str {
        &self.extraction_id
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Create a tracing span for this extraction.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "extraction",
            extraction_id = %self.extraction_id,
            operation = %self.operation
        )
    }
}

/// Install the global subscriber: JSON when `LOG_FORMAT=json`, colored
/// text otherwise. `RUST_LOG` overrides the default `clipmine=info`.
pub fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("clipmine=info"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_logger_creation() {
        let id = ExtractionId::new();
        let logger = ExtractionLogger::new(&id, "clip_generation");

        assert_eq!(logger.extraction_id(), id.to_string());
        assert_eq!(logger.operation(), "clip_generation");

        // Logging without an installed subscriber is a no-op.
        logger.log_progress("retrying");
        let _span = logger.create_span().entered();
    }
}
