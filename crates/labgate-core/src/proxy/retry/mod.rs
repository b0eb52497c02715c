//! Bounded retry with exponential backoff and full jitter.
//!
//! Wraps a single upstream HTTP call: only 429, 5xx and network errors are
//! retried; success and genuine client errors pass straight back to the
//! caller. Attempts within one invocation are strictly sequential, and
//! each invocation is independent — no state is shared between calls.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Default attempt budget per upstream call.
pub const DEFAULT_MAX_RETRIES: usize = 3;

/// Base backoff unit; the wait after attempt `i` is `2^i * base + jitter`.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);

/// Upper bound (exclusive) of the random jitter added to each wait.
pub const DEFAULT_JITTER: Duration = Duration::from_millis(1000);

/// Terminal failure of a retry loop.
#[derive(Debug, Error)]
pub enum RetryError {
    /// Every allowed attempt ended in a retryable status (429/5xx).
    #[error("max retries exceeded{}", last_status.map(|s| format!(" (last status {s})")).unwrap_or_default())]
    Exhausted { last_status: Option<u16> },

    /// Network-level failure on the final attempt, returned unchanged.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Classification of one attempt's outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptClass {
    /// Hand the response back to the caller as-is (success or genuine 4xx).
    Terminal,
    /// 429 or 5xx: eligible for another attempt.
    Retryable,
}

/// Classifies an HTTP status code.
///
/// Client errors other than 429 are terminal so a malformed request is
/// never re-sent.
pub fn classify_status(status: u16) -> AttemptClass {
    match status {
        429 => AttemptClass::Retryable,
        500..=599 => AttemptClass::Retryable,
        _ => AttemptClass::Terminal,
    }
}

/// Bounded-attempt executor for upstream calls.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_retries: usize,
    base_delay: Duration,
    jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
            jitter: DEFAULT_JITTER,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: usize) -> Self {
        Self { max_retries, ..Self::default() }
    }

    /// Overrides the backoff delays. Tests shrink them to keep waits
    /// negligible; the backoff shape is unchanged.
    pub fn with_delays(mut self, base_delay: Duration, jitter: Duration) -> Self {
        self.base_delay = base_delay;
        self.jitter = jitter;
        self
    }

    pub fn max_retries(&self) -> usize {
        self.max_retries
    }

    /// Wait applied after attempt `attempt`: `2^attempt * base + random(0, jitter)`.
    pub fn backoff_delay(&self, attempt: usize) -> Duration {
        let base_ms = self.base_delay.as_millis() as u64;
        let exp_ms = base_ms.saturating_mul(2_u64.saturating_pow(attempt as u32));
        let jitter_ms = self.jitter.as_millis() as u64;
        let jitter = if jitter_ms == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..jitter_ms)
        };
        Duration::from_millis(exp_ms.saturating_add(jitter))
    }

    /// Runs `op` up to `max_retries` times, sleeping between attempts.
    ///
    /// Returns the first terminal response unchanged — interpreting its
    /// status is the caller's job. A network error is retried unless it
    /// happens on the final attempt, in which case the original error is
    /// surfaced.
    pub async fn execute<F, Fut>(&self, op: F) -> Result<reqwest::Response, RetryError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<reqwest::Response, reqwest::Error>>,
    {
        let mut last_status = None;

        for attempt in 0..self.max_retries {
            debug!("upstream attempt {}/{}", attempt + 1, self.max_retries);

            match op().await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    match classify_status(status) {
                        AttemptClass::Terminal => return Ok(response),
                        AttemptClass::Retryable => {
                            last_status = Some(status);
                            let wait = self.backoff_delay(attempt);
                            warn!(
                                "retryable status {} on attempt {}/{}, backing off {}ms",
                                status,
                                attempt + 1,
                                self.max_retries,
                                wait.as_millis()
                            );
                            sleep(wait).await;
                        },
                    }
                },
                Err(err) => {
                    if attempt + 1 == self.max_retries {
                        return Err(RetryError::Network(err));
                    }
                    let wait = self.backoff_delay(attempt);
                    warn!(
                        "network error on attempt {}/{}: {}, backing off {}ms",
                        attempt + 1,
                        self.max_retries,
                        err,
                        wait.as_millis()
                    );
                    sleep(wait).await;
                },
            }
        }

        Err(RetryError::Exhausted { last_status })
    }
}
