//! Generation backend abstraction.

use async_trait::async_trait;

use crate::error::WorkerResult;

/// MIME type requested from backends that support structured output.
pub const JSON_MIME_TYPE: &str = "application/json";

/// One prompt sent to a generation backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub response_mime_type: String,
}

impl GenerationRequest {
    pub fn json(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            response_mime_type: JSON_MIME_TYPE.to_string(),
        }
    }
}

/// A text generation service.
///
/// Implementations return the raw response text and must not retry
/// internally; retry policy belongs to the orchestrator. Failures should
/// surface as `WorkerError::BackendUnavailable`.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Backend name for logs.
    fn name(&self) -> &str;

    async fn generate(&self, request: &GenerationRequest) -> WorkerResult<String>;
}
