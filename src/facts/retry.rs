//! Bounded retry with linear backoff for SonarCloud reads.

use super::FetchError;
use core::time::Duration;

const LOG_TARGET: &str = "     retry";

/// Maximum number of attempts, including the first one.
const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Delay unit multiplied by the attempt number between retries.
const DEFAULT_BACKOFF_UNIT: Duration = Duration::from_secs(1);

/// How often, and how patiently, a transiently failing read is repeated.
///
/// After the n-th failed attempt the caller sleeps for `n * backoff_unit`.
/// Only [`FetchError::ConnectionDropped`] failures are retried; any other error
/// is returned immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff_unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_BACKOFF_UNIT)
    }
}

impl RetryPolicy {
    /// Create a policy. A `max_attempts` of zero is treated as a single attempt.
    #[must_use]
    pub const fn new(max_attempts: u32, backoff_unit: Duration) -> Self {
        Self {
            max_attempts: if max_attempts == 0 { 1 } else { max_attempts },
            backoff_unit,
        }
    }

    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay to wait after the given (1-based) failed attempt.
    #[must_use]
    pub const fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_unit.saturating_mul(attempt)
    }

    /// Run `request` until it succeeds, fails permanently, or runs out of attempts.
    ///
    /// `operation` and `project` only feed the log messages.
    pub async fn run<T, F, Fut>(&self, operation: &str, project: &str, mut request: F) -> Result<T, FetchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let mut attempt = 1;
        loop {
            match request().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < self.max_attempts => {
                    let delay = self.backoff(attempt);
                    log::warn!(
                        target: LOG_TARGET,
                        "{operation} for '{project}' failed (attempt {attempt}/{}), retrying in {}ms: {e}",
                        self.max_attempts,
                        delay.as_millis(),
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) if e.is_transient() => {
                    log::warn!(
                        target: LOG_TARGET,
                        "{operation} for '{project}' still failing after {} attempts",
                        self.max_attempts,
                    );
                    return Err(e);
                }
                Err(e) => return Err(e),
            }
        }
    }
}
