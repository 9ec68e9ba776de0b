use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Returned when every attempt of a [`RetryPolicy`] failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryExhausted<E> {
    /// Attempts made (always the policy's `max_attempts`)
    pub attempts: u32,
    /// Error of the final attempt
    pub last_error: E,
}

/// Fixed-delay retry policy for connection checks
///
/// Runs an operation up to `max_attempts` times, sleeping `delay` between
/// consecutive attempts (never after the last one). There is no
/// cancellation; callers wanting to abort wrap the whole call in a timeout.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first
    max_attempts: u32,
    /// Delay between attempts
    delay: Duration,
}

impl RetryPolicy {
    /// Create a new retry policy
    ///
    /// A `max_attempts` of 0 is treated as 1; config validation rejects it
    /// before it gets here.
    ///
    /// # Example
    /// ```
    /// use docent::infrastructure::ollama::retry::RetryPolicy;
    ///
    /// let policy = RetryPolicy::new(3, 2_000);
    /// assert_eq!(policy.max_attempts(), 3);
    /// ```
    pub fn new(max_attempts: u32, delay_ms: u64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay: Duration::from_millis(delay_ms),
        }
    }

    /// Maximum number of attempts
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Execute an operation, retrying every failure until attempts run out
    ///
    /// The closure receives the 1-based attempt number.
    pub async fn execute<F, Fut, T, E>(&self, mut operation: F) -> Result<T, RetryExhausted<E>>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let mut attempt = 1;

        loop {
            match operation(attempt).await {
                Ok(result) => {
                    if attempt > 1 {
                        debug!(attempt, "operation succeeded after retries");
                    }
                    return Ok(result);
                }
                Err(err) if attempt < self.max_attempts => {
                    warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = u64::try_from(self.delay.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "attempt failed, retrying"
                    );
                    sleep(self.delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    warn!(attempts = attempt, error = %err, "all attempts failed");
                    return Err(RetryExhausted {
                        attempts: attempt,
                        last_error: err,
                    });
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    /// 3 attempts, 2 seconds apart
    fn default() -> Self {
        Self::new(3, 2_000)
    }
}
