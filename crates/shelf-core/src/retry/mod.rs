//! Bounded retry with a fixed delay between attempts.
//!
//! One attempt is in flight at a time. The delay is constant (no exponential
//! growth, no jitter) and a running loop cannot be cancelled; it ends on the
//! first success or once the attempt budget is spent.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_RETRIES: u32 = 10;
pub const DEFAULT_WAIT_MS: u64 = 20;

#[derive(Debug, Error)]
pub enum RetryError<E> {
    #[error("operation failed after {attempts} attempt(s): {last_error}")]
    Exhausted { attempts: u32, last_error: E },
}

impl<E> RetryError<E> {
    pub const fn attempts(&self) -> u32 {
        match self {
            Self::Exhausted { attempts, .. } => *attempts,
        }
    }

    pub fn into_last_error(self) -> E {
        match self {
            Self::Exhausted { last_error, .. } => last_error,
        }
    }
}

/// How many times to attempt an operation and how long to pause between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub retries: u32,
    #[serde(with = "wait_millis")]
    pub wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_millis(DEFAULT_RETRIES, DEFAULT_WAIT_MS)
    }
}

impl RetryPolicy {
    pub const fn new(retries: u32, wait: Duration) -> Self {
        Self { retries, wait }
    }

    pub const fn from_millis(retries: u32, wait_ms: u64) -> Self {
        Self::new(retries, Duration::from_millis(wait_ms))
    }

    /// Run `operation` until it succeeds or the attempts run out.
    ///
    /// Returns the first successful value, or the last failure wrapped in
    /// [`RetryError::Exhausted`]. A policy with `retries == 0` still makes a
    /// single attempt so there is always an outcome to report.
    pub async fn run<T, E, F, Fut>(&self, mut operation: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        let max_attempts = self.retries.max(1);
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            match operation().await {
                Ok(value) => {
                    tracing::debug!(attempt, "Operation succeeded");
                    return Ok(value);
                }
                Err(error) => {
                    if attempt >= max_attempts {
                        tracing::warn!(attempts = attempt, "Giving up after retries: {}", error);
                        return Err(RetryError::Exhausted {
                            attempts: attempt,
                            last_error: error,
                        });
                    }

                    tracing::warn!(
                        attempt,
                        "Operation failed, retrying in {}ms: {}",
                        self.wait.as_millis(),
                        error
                    );
                    tokio::time::sleep(self.wait).await;
                }
            }
        }
    }

    /// Fire-and-forget variant of [`run`](Self::run).
    ///
    /// Attempts the operation up to `retries` times (zero means no attempt at
    /// all) and discards the outcome. Exhaustion is only visible in the logs.
    pub async fn run_silently<T, E, F, Fut>(&self, operation: F)
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        if self.retries == 0 {
            return;
        }
        if let Err(error) = self.run(operation).await {
            tracing::warn!("Fire-and-forget operation dropped: {}", error);
        }
    }
}

mod wait_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(wait: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(wait.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
