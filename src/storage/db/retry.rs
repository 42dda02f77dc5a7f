//! Connect retry with exponential backoff.
//!
//! Only the networked backend retries; SQLite opens a local file and fails
//! fast. The wait follows every failed attempt, including the last one.

use std::future::Future;
use std::time::Duration;

use backon::{BackoffBuilder, ExponentialBuilder};

/// Default number of connect attempts.
pub const DEFAULT_CONNECT_ATTEMPTS: u32 = 3;

/// Default wait after the first failed attempt.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(5);

/// Upper bound on a single wait.
const MAX_DELAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Configuration for connect retry behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. Zero is treated as one.
    pub attempts: u32,
    /// Wait after the first failure; doubles after each subsequent one.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_CONNECT_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Create a policy with the given attempt count and base delay.
    pub fn new(attempts: u32, base_delay: Duration) -> Self {
        Self {
            attempts,
            base_delay,
        }
    }

    /// Doubling backoff without jitter, one wait per attempt.
    pub fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.base_delay)
            .with_max_delay(MAX_DELAY)
            .with_factor(2.0)
            .with_max_times(self.attempts.max(1) as usize)
    }
}

/// Run `op` until it succeeds or the policy's attempts are exhausted.
///
/// Returns the error of the final attempt.
pub async fn retry_with_backoff<T, E, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let attempts = policy.attempts.max(1);
    let mut delays = policy.backoff().build();
    let mut failures = 0;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if let Some(delay) = delays.next() {
                    tokio::time::sleep(delay).await;
                }
                failures += 1;
                if failures >= attempts {
                    return Err(err);
                }
            }
        }
    }
}
