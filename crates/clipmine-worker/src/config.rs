//! Worker configuration.

use std::path::PathBuf;
use std::time::Duration;

use crate::retry::RetryConfig;

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Total generation attempts per invocation (including the first)
    pub max_attempts: u32,
    /// Backoff after the first failed attempt; doubles each attempt
    pub retry_base_delay: Duration,
    /// Upper bound on a single backoff delay
    pub retry_max_delay: Duration,
    /// Timeout for one backend call
    pub backend_timeout: Duration,
    /// Timeout for a whole invocation, retries included
    pub invocation_timeout: Duration,
    /// Work directory for caption downloads
    pub work_dir: PathBuf,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_base_delay: Duration::from_millis(1000),
            retry_max_delay: Duration::from_secs(30),
            backend_timeout: Duration::from_secs(120),
            invocation_timeout: Duration::from_secs(600), // 10 minutes
            work_dir: PathBuf::from("/tmp/clipmine"),
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            max_attempts: std::env::var("CLIPMINE_MAX_ATTEMPTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|&n: &u32| n > 0)
                .unwrap_or(3),
            retry_base_delay: Duration::from_millis(
                std::env::var("CLIPMINE_RETRY_BASE_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(1000),
            ),
            retry_max_delay: Duration::from_millis(
                std::env::var("CLIPMINE_RETRY_MAX_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30_000),
            ),
            backend_timeout: Duration::from_secs(
                std::env::var("CLIPMINE_BACKEND_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(120),
            ),
            invocation_timeout: Duration::from_secs(
                std::env::var("CLIPMINE_INVOCATION_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(600),
            ),
            work_dir: std::env::var("CLIPMINE_WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/tmp/clipmine")),
        }
    }

    /// Backoff settings for the orchestrator.
    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::new("clip_generation")
            .with_max_attempts(self.max_attempts)
            .with_base_delay(self.retry_base_delay)
            .with_max_delay(self.retry_max_delay)
    }
}
