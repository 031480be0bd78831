// In crates/api-client/src/retry.rs

use crate::{Error, Result};
use app_config::types::MarketSettings;
use std::future::Future;
use std::time::Duration;

/// The outcome of a single attempt.
#[derive(Debug)]
pub enum Attempt<T> {
    Success(T),
    /// Worth retrying after a backoff.
    Retryable(Error),
    /// Propagated immediately.
    Fatal(Error),
}

impl<T> From<Result<T>> for Attempt<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(value) => Attempt::Success(value),
            Err(e) if e.is_rate_limited() => Attempt::Retryable(e),
            Err(e) => Attempt::Fatal(e),
        }
    }
}

/// Bounded retry for rate-limited calls with a linearly growing backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    pub backoff_step: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_step: Duration::from_millis(1500),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff_step: Duration) -> Self {
        Self { max_attempts: max_attempts.max(1), backoff_step }
    }

    pub fn from_settings(settings: &MarketSettings) -> Self {
        Self::new(settings.max_attempts, Duration::from_millis(settings.backoff_step_ms))
    }

    /// The sleep before retry number `retry` (1-based).
    pub fn backoff(&self, retry: u32) -> Duration {
        self.backoff_step * retry
    }

    /// Runs `op` until it succeeds, fails fatally, or the attempts run out.
    /// When they run out, the last rate-limit error is returned.
    pub async fn run<T, F, Fut>(&self, endpoint: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 1;
        loop {
            match Attempt::from(op().await) {
                Attempt::Success(value) => return Ok(value),
                Attempt::Fatal(e) => return Err(e),
                Attempt::Retryable(e) if attempt >= self.max_attempts => {
                    tracing::error!(endpoint, attempts = attempt, "Rate limit retries exhausted.");
                    return Err(e);
                }
                Attempt::Retryable(_) => {
                    let delay = self.backoff(attempt);
                    tracing::warn!(
                        endpoint,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "Rate limited. Backing off before retrying."
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
