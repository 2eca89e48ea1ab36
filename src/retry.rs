//! Bounded retry with exponential backoff and jitter.
//!
//! Used by the date driver to give a failed day a few more chances before
//! moving on to the previous day.
//!
//! # Retry Strategy
//!
//! ```text
//! delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..=max_jitter)
//! ```

use rand::{Rng, rng};
use std::error::Error;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{error, warn};

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. Never less than one.
    max_attempts: usize,
    /// Delay after the first failure; doubles with every further failure.
    base_delay: Duration,
    max_delay: Duration,
    max_jitter: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: usize, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay: Duration::from_secs(30),
            max_jitter: Duration::from_millis(250),
        }
    }

    pub fn with_jitter(mut self, max_jitter: Duration) -> Self {
        self.max_jitter = max_jitter;
        self
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Backoff before retrying after failure number `attempt` (1-based), without jitter.
    pub fn backoff(&self, attempt: usize) -> Duration {
        let shift = attempt.saturating_sub(1).min(31) as u32;
        self.base_delay
            .saturating_mul(1u32 << shift)
            .min(self.max_delay)
    }

    /// Run `op` until it succeeds or the attempts are used up.
    ///
    /// Returns the last error when every attempt failed.
    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> Result<T, Box<dyn Error>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, Box<dyn Error>>>,
    {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    attempt += 1;
                    let total_dt = total_t0.elapsed();

                    if attempt >= self.max_attempts {
                        error!(
                            label,
                            attempt,
                            max = self.max_attempts,
                            elapsed_ms_total = total_dt.as_millis() as u64,
                            error = %e,
                            "Attempts exhausted"
                        );
                        return Err(e);
                    }

                    let jitter_ms = self.max_jitter.as_millis() as u64;
                    let jitter = Duration::from_millis(rng().random_range(0..=jitter_ms));
                    let delay = self.backoff(attempt) + jitter;

                    warn!(
                        label,
                        attempt,
                        max = self.max_attempts,
                        ?delay,
                        error = %e,
                        "Attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn quick(max_attempts: usize) -> RetryPolicy {
        RetryPolicy::new(max_attempts, Duration::ZERO).with_jitter(Duration::ZERO)
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = RetryPolicy::new(5, Duration::from_secs(1));
        assert_eq!(policy.backoff(1), Duration::from_secs(1));
        assert_eq!(policy.backoff(2), Duration::from_secs(2));
        assert_eq!(policy.backoff(4), Duration::from_secs(8));
        assert_eq!(policy.backoff(6), Duration::from_secs(30));
        assert_eq!(policy.backoff(200), Duration::from_secs(30));
    }

    #[test]
    fn test_zero_attempts_means_one() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts(), 1);
    }

    #[tokio::test]
    async fn test_succeeds_after_failures() {
        let calls = Cell::new(0);
        let result = quick(3)
            .run("day", || {
                calls.set(calls.get() + 1);
                let n = calls.get();
                async move {
                    if n < 3 {
                        Err::<u32, Box<dyn Error>>("flaky".into())
                    } else {
                        Ok(n)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let calls = Cell::new(0);
        let result = quick(2)
            .run("day", || {
                calls.set(calls.get() + 1);
                async { Err::<(), Box<dyn Error>>("down".into()) }
            })
            .await;

        assert_eq!(result.unwrap_err().to_string(), "down");
        assert_eq!(calls.get(), 2);
    }
}
