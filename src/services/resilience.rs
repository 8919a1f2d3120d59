//! Retry-with-backoff and timeout primitives.
//!
//! `retry_with_backoff` only retries operations that return `Err`. Provider
//! adapters report upstream failures as `Ok` error envelopes, so those are
//! never retried here; only transport failures are.

use std::{fmt::Display, future::Future, time::Duration};

use crate::errors::{AppError, AppResult};

const PRIMARY_MAX_ATTEMPTS: u32 = 3;
const PRIMARY_TIMEOUT_MS: u64 = 60_000;
const FALLBACK_MAX_ATTEMPTS: u32 = 2;
const FALLBACK_TIMEOUT_MS: u64 = 45_000;
const BASE_DELAY_MS: u64 = 1_000;

/// Retry and timeout budget for one provider call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub timeout: Duration,
}

impl CallPolicy {
    pub fn primary() -> Self {
        Self {
            max_attempts: PRIMARY_MAX_ATTEMPTS,
            base_delay: Duration::from_millis(BASE_DELAY_MS),
            timeout: Duration::from_millis(PRIMARY_TIMEOUT_MS),
        }
    }

    pub fn fallback() -> Self {
        Self {
            max_attempts: FALLBACK_MAX_ATTEMPTS,
            base_delay: Duration::from_millis(BASE_DELAY_MS),
            timeout: Duration::from_millis(FALLBACK_TIMEOUT_MS),
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Runs `operation` with retries nested inside the overall timeout.
    pub async fn run<T, F, Fut>(&self, operation: F, timeout_message: &str) -> AppResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        with_timeout(
            retry_with_backoff(operation, self.max_attempts, self.base_delay),
            self.timeout,
            timeout_message,
        )
        .await
    }
}

/// Delay before retry number `attempt + 1`: `base * 2^(attempt - 1)`.
pub fn backoff_delay(base_delay: Duration, attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1).min(16);
    base_delay.saturating_mul(1u32 << exponent)
}

pub async fn retry_with_backoff<T, E, F, Fut>(
    mut operation: F,
    max_attempts: u32,
    base_delay: Duration,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt >= max_attempts => {
                log::warn!("Giving up after {} attempt(s): {}", attempt, err);
                return Err(err);
            }
            Err(err) => {
                let delay = backoff_delay(base_delay, attempt);
                log::warn!(
                    "Attempt {}/{} failed: {}. Retrying in {}ms",
                    attempt,
                    max_attempts,
                    err,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

/// Races `operation` against a timer. A late completion is dropped.
pub async fn with_timeout<T, Fut>(operation: Fut, timeout: Duration, message: &str) -> AppResult<T>
where
    Fut: Future<Output = AppResult<T>>,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(outcome) => outcome,
        Err(_) => Err(AppError::TimeoutError(format!(
            "{} (exceeded {}ms)",
            message,
            timeout.as_millis()
        ))),
    }
}
