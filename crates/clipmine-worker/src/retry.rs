//! Backoff scheduling for generation attempts.
//!
//! Delays double from a fixed base and are capped; waits are raced
//! against a cancellation token so a cancelled invocation never sleeps
//! out its backoff.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the initial one.
    pub max_attempts: u32,
    /// Delay after the first failed attempt (doubles each attempt).
    pub base_delay: Duration,
    /// Maximum delay between attempts.
    pub max_delay: Duration,
    /// Operation name for logging.
    pub operation_name: String,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_secs(30),
            operation_name: "operation".to_string(),
        }
    }
}

impl RetryConfig {
    /// Create a new retry config with the given operation name.
    pub fn new(operation_name: impl Into<String>) -> Self {
        Self {
            operation_name: operation_name.into(),
            ..Default::default()
        }
    }

    /// Set the maximum number of attempts. Zero is raised to one.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Set the base delay for exponential backoff.
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Set the delay cap.
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Whether another attempt is allowed after `attempt` (1-based) failed.
    pub fn allows_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Delay to wait after failed attempt number `attempt` (1-based).
    pub fn delay_after_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u32
            .checked_pow(attempt.saturating_sub(1))
            .unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Sleep for `delay` unless `cancel` fires first.
///
/// Returns `true` when the full delay elapsed.
pub async fn sleep_or_cancel(delay: Duration, cancel: &CancellationToken) -> bool {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            debug!("Backoff interrupted by cancellation");
            false
        }
        _ = tokio::time::sleep(delay) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_delay_doubles_from_base() {
        let config = RetryConfig::new("test").with_base_delay(Duration::from_millis(100));

        assert_eq!(config.delay_after_attempt(1), Duration::from_millis(100));
        assert_eq!(config.delay_after_attempt(2), Duration::from_millis(200));
        assert_eq!(config.delay_after_attempt(3), Duration::from_millis(400));
    }

    #[test]
    fn test_delay_is_capped() {
        let config = RetryConfig::new("test")
            .with_base_delay(Duration::from_secs(1))
            .with_max_delay(Duration::from_secs(5));

        assert_eq!(config.delay_after_attempt(4), Duration::from_secs(5));
        assert_eq!(config.delay_after_attempt(64), Duration::from_secs(5));
    }

    #[test]
    fn test_allows_retry_until_bound() {
        let config = RetryConfig::new("test").with_max_attempts(3);
        assert!(config.allows_retry(1));
        assert!(config.allows_retry(2));
        assert!(!config.allows_retry(3));

        let single = RetryConfig::new("test").with_max_attempts(0);
        assert_eq!(single.max_attempts, 1);
        assert!(!single.allows_retry(1));
    }

    #[tokio::test]
    async fn test_sleep_completes_without_cancel() {
        let token = CancellationToken::new();
        assert!(sleep_or_cancel(Duration::from_millis(5), &token).await);
    }

    #[tokio::test]
    async fn test_sleep_interrupted_by_cancel() {
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            canceller.cancel();
        });

        let started = Instant::now();
        assert!(!sleep_or_cancel(Duration::from_secs(30), &token).await);
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
