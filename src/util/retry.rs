//! Retrying model calls.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::{Result, TaskmateError};

/// How many times a model call is attempted before the turn fails.
///
/// A single attempt unless configured otherwise. Only retryable errors are
/// tried again. When the service names a wait, that wait is used as-is;
/// otherwise the delay doubles from `base_delay` up to `max_delay`.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Default delays with the given attempt budget, at least one.
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Self::default()
        }
    }

    /// Delay before the next attempt after `failures` consecutive failures.
    pub fn delay_after(&self, failures: u32, error: &TaskmateError) -> Duration {
        if let Some(wait) = error.retry_after() {
            return wait;
        }
        let factor = 2u32.saturating_pow(failures.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Call `attempt` until it succeeds, fails for good, or the budget runs out.
    pub async fn run<F, Fut, T>(&self, mut attempt: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut failures = 0;
        loop {
            let err = match attempt().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };
            failures += 1;
            if !err.is_retryable() || failures >= self.max_attempts.max(1) {
                return Err(err);
            }

            let delay = self.delay_after(failures, &err);
            warn!(
                failures,
                max_attempts = self.max_attempts,
                ?delay,
                error = %err,
                "model call failed, retrying"
            );
            tokio::time::sleep(delay).await;
        }
    }
}
