//! Retry/backoff orchestration of clip generation.
//!
//! One invocation walks `Invoking → Extracting → Succeeded`, or goes
//! through `RetryPending` back to `Invoking` until the attempt bound is
//! hit (`ExhaustedFailed`). Backend calls and backoff waits both race the
//! caller's cancellation token.

use std::sync::Arc;
use std::time::Duration;

use clipmine_extract::extract_clips;
use clipmine_models::{ClipRecord, ExtractionId, ExtractionOutcome, GenerationPolicy, Transcript};
use tokio_util::sync::CancellationToken;
use tracing::{debug, Instrument};

use crate::backend::{GenerationBackend, GenerationRequest};
use crate::config::WorkerConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::logging::ExtractionLogger;
use crate::metrics;
use crate::prompt::{build_request, DEFAULT_INSTRUCTIONS};
use crate::retry::{sleep_or_cancel, RetryConfig};

enum State {
    Invoking,
    Extracting(String),
    RetryPending(String),
    Succeeded(Vec<ClipRecord>),
    ExhaustedFailed(String),
}

/// Drives a generation backend through the extraction pipeline.
///
/// Holds no per-invocation state, so one orchestrator can serve
/// concurrent invocations.
pub struct ClipOrchestrator {
    backend: Arc<dyn GenerationBackend>,
    retry: RetryConfig,
    backend_timeout: Duration,
    invocation_timeout: Duration,
    instructions: String,
}

impl ClipOrchestrator {
    pub fn new(backend: Arc<dyn GenerationBackend>, config: &WorkerConfig) -> Self {
        Self {
            backend,
            retry: config.retry_config(),
            backend_timeout: config.backend_timeout,
            invocation_timeout: config.invocation_timeout,
            instructions: DEFAULT_INSTRUCTIONS.to_string(),
        }
    }

    /// Replace the instruction text at the top of the prompt.
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    /// Generate clips, retrying until success, exhaustion or cancellation.
    pub async fn run(
        &self,
        policy: &GenerationPolicy,
        transcript: &Transcript,
        cancel: &CancellationToken,
    ) -> WorkerResult<Vec<ClipRecord>> {
        let policy = policy.checked()?;
        let request = build_request(&self.instructions, &policy, transcript);
        let logger = ExtractionLogger::new(&ExtractionId::new(), &self.retry.operation_name);

        let span = logger.create_span();
        self.run_attempts(&request, &policy, transcript, cancel, &logger)
            .instrument(span)
            .await
    }

    async fn run_attempts(
        &self,
        request: &GenerationRequest,
        policy: &GenerationPolicy,
        transcript: &Transcript,
        cancel: &CancellationToken,
        logger: &ExtractionLogger,
    ) -> WorkerResult<Vec<ClipRecord>> {
        logger.log_start(&format!(
            "backend={}, segments={}, max_attempts={}",
            self.backend.name(),
            transcript.segments.len(),
            self.retry.max_attempts
        ));

        let mut attempt = 0u32;
        let mut state = State::Invoking;

        loop {
            state = match state {
                State::Invoking => {
                    if cancel.is_cancelled() {
                        return Err(WorkerError::Cancelled { attempts: attempt });
                    }
                    attempt += 1;
                    logger.log_attempt(attempt, self.retry.max_attempts);

                    match self.invoke(request, cancel).await {
                        Ok(raw) => State::Extracting(raw),
                        Err(WorkerError::Cancelled { .. }) => {
                            return Err(WorkerError::Cancelled { attempts: attempt });
                        }
                        Err(e) if e.is_retryable() => {
                            metrics::record_attempt("backend_error");
                            State::RetryPending(e.to_string())
                        }
                        Err(e) => {
                            metrics::record_attempt("backend_fatal");
                            logger.log_error(&format!("Attempt {} failed terminally: {}", attempt, e));
                            return Err(e);
                        }
                    }
                }
                State::Extracting(raw) => match extract_clips(&raw, policy, transcript) {
                    Ok(extraction) => {
                        metrics::record_attempt("success");
                        metrics::record_repair_step(extraction.step.as_str());
                        metrics::record_dropped(extraction.dropped.len());
                        debug!(
                            step = %extraction.step,
                            candidates_tried = extraction.candidates_tried,
                            truncated_span = extraction.truncated_span,
                            dropped = extraction.dropped.len(),
                            "Extraction succeeded"
                        );
                        State::Succeeded(extraction.clips)
                    }
                    Err(e) => {
                        metrics::record_attempt(e.kind());
                        State::RetryPending(WorkerError::from(e).to_string())
                    }
                },
                State::RetryPending(reason) => {
                    logger.log_warning(&format!("Attempt {} failed: {}", attempt, reason));

                    if !self.retry.allows_retry(attempt) {
                        State::ExhaustedFailed(reason)
                    } else {
                        let delay = self.retry.delay_after_attempt(attempt);
                        logger.log_progress(&format!(
                            "Retrying in {:?} ({}/{} attempts used)",
                            delay, attempt, self.retry.max_attempts
                        ));
                        if !sleep_or_cancel(delay, cancel).await {
                            return Err(WorkerError::Cancelled { attempts: attempt });
                        }
                        State::Invoking
                    }
                }
                State::Succeeded(clips) => {
                    logger.log_completion(&format!(
                        "{} clips after {} attempts",
                        clips.len(),
                        attempt
                    ));
                    return Ok(clips);
                }
                State::ExhaustedFailed(last_reason) => {
                    logger.log_error(&format!(
                        "Giving up after {} attempts: {}",
                        attempt, last_reason
                    ));
                    return Err(WorkerError::ExhaustedRetries {
                        attempts: attempt,
                        last_reason,
                    });
                }
            };
        }
    }

    /// One backend call bounded by the backend timeout.
    ///
    /// Blank payloads count as backend failures.
    async fn invoke(
        &self,
        request: &GenerationRequest,
        cancel: &CancellationToken,
    ) -> WorkerResult<String> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(WorkerError::Cancelled { attempts: 0 }),
            result = tokio::time::timeout(self.backend_timeout, self.backend.generate(request)) => {
                match result {
                    Ok(Ok(raw)) if raw.trim().is_empty() => {
                        Err(WorkerError::backend_unavailable("Backend returned an empty payload"))
                    }
                    Ok(result) => result,
                    Err(_) => Err(WorkerError::backend_unavailable(format!(
                        "Backend call timed out after {:?}",
                        self.backend_timeout
                    ))),
                }
            }
        }
    }

    /// [`run`](Self::run) bounded by the invocation timeout.
    ///
    /// Expiry cancels the invocation, which reports `Cancelled`.
    pub async fn run_with_timeout(
        &self,
        policy: &GenerationPolicy,
        transcript: &Transcript,
        cancel: &CancellationToken,
    ) -> WorkerResult<Vec<ClipRecord>> {
        let invocation = cancel.child_token();
        let _stop_timer = invocation.clone().drop_guard();

        let timer = invocation.clone();
        let timeout = self.invocation_timeout;
        tokio::spawn(async move {
            tokio::select! {
                _ = timer.cancelled() => {}
                _ = tokio::time::sleep(timeout) => {
                    debug!(?timeout, "Invocation timed out");
                    timer.cancel();
                }
            }
        });

        self.run(policy, transcript, &invocation).await
    }

    /// Run with the invocation timeout and fold the result into an
    /// [`ExtractionOutcome`] for the caller.
    pub async fn execute(
        &self,
        policy: &GenerationPolicy,
        transcript: &Transcript,
        cancel: &CancellationToken,
    ) -> ExtractionOutcome {
        let outcome = match self.run_with_timeout(policy, transcript, cancel).await {
            Ok(clips) => ExtractionOutcome::Success { clips },
            Err(WorkerError::Cancelled { attempts }) => ExtractionOutcome::Cancelled { attempts },
            Err(e) => ExtractionOutcome::Failure {
                reason: e.user_message().to_string(),
                attempts: e.attempts().unwrap_or(0),
            },
        };
        metrics::record_invocation(outcome.as_str());
        outcome
    }
}
