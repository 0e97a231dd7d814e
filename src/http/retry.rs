//! Retry policy for remote calls that are safe to reissue.
//!
//! Queries and cancellations run through [`with_backoff`]; order placement
//! never does, since a blind resend can open a duplicate position.

use std::future::Future;
use std::time::Duration;

use crate::error::ExecutionError;

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (not counting the initial call).
    /// `None` retries until the call succeeds.
    pub max_retries: Option<u32>,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Multiplier applied to the delay after each retry.
    pub backoff_factor: f64,
    /// Whether to add ±25% jitter to the delay.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: None,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(1024),
            backoff_factor: 2.0,
            jitter: false,
        }
    }
}

impl RetryConfig {
    /// A bounded policy for callers that cannot wait out a long outage.
    pub fn bounded(max_retries: u32) -> Self {
        Self {
            max_retries: Some(max_retries),
            ..Self::default()
        }
    }

    /// Calculate delay for a given attempt (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base = self.initial_delay.as_millis() as f64
            * self.backoff_factor.powi(attempt.min(i32::MAX as u32) as i32);
        let capped = base.min(self.max_delay.as_millis() as f64);

        let final_ms = if self.jitter {
            let jitter_range = capped * 0.25;
            let jitter = (rand::random::<f64>() - 0.5) * 2.0 * jitter_range;
            (capped + jitter).clamp(0.0, self.max_delay.as_millis() as f64)
        } else {
            capped
        };

        Duration::from_millis(final_ms as u64)
    }

    fn exhausted(&self, retries_done: u32) -> bool {
        self.max_retries.is_some_and(|max| retries_done >= max)
    }
}

/// Invoke `call` until it succeeds, sleeping with exponential backoff between
/// attempts that fail with a retryable error.
///
/// Non-retryable errors are returned immediately. When a bounded budget is
/// spent, the last error is returned unchanged.
pub async fn with_backoff<T, F, Fut>(
    config: &RetryConfig,
    operation: &str,
    mut call: F,
) -> Result<T, ExecutionError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ExecutionError>>,
{
    let mut attempt: u32 = 0;
    loop {
        match call().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && !config.exhausted(attempt) => {
                let delay = config.delay_for_attempt(attempt);
                tracing::warn!(
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    "{} failed: {}, retrying",
                    operation,
                    e
                );
                futures_timer::Delay::new(delay).await;
                attempt = attempt.saturating_add(1);
            }
            Err(e) => return Err(e),
        }
    }
}
