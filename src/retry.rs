//! Reusable retry-with-backoff for network fetches.
//!
//! Every fetcher applies the same policy: an initial attempt plus up to
//! `max_retries` retries, with exponential backoff between attempts and
//! a little jitter to avoid hammering an upstream in lockstep.
//!
//! # Backoff Strategy
//!
//! ```text
//! delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
//! ```

use rand::{Rng, rng};
use std::error::Error;
use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{error, warn};

/// Retry policy parameterized by attempt count and base delay.
pub struct Retry {
    /// Retries after the initial attempt.
    max_retries: usize,
    /// Initial delay between attempts (doubles each time).
    base_delay: Duration,
    /// Cap on the computed delay.
    max_delay: Duration,
}

impl Retry {
    pub fn new(max_retries: usize, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            max_delay: Duration::from_secs(30),
        }
    }

    /// Run `op` until it succeeds or retries are exhausted.
    ///
    /// `what` names the operation for log context. The total number of
    /// invocations of `op` is `1 + max_retries`.
    pub async fn run<T, F, Fut>(&self, what: &str, mut op: F) -> Result<T, Box<dyn Error>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, Box<dyn Error>>>,
    {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            let attempt_t0 = Instant::now();
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    attempt += 1;
                    let attempt_dt = attempt_t0.elapsed();
                    let total_dt = total_t0.elapsed();

                    if attempt > self.max_retries {
                        error!(
                            what,
                            attempt,
                            max = self.max_retries,
                            elapsed_ms_attempt = attempt_dt.as_millis() as u128,
                            elapsed_ms_total = total_dt.as_millis() as u128,
                            error = %e,
                            "fetch exhausted retries"
                        );
                        return Err(e);
                    }

                    // backoff calc; the exponent is clamped so large
                    // attempt counts cannot overflow the shift
                    let exponent = (attempt - 1).min(31) as u32;
                    let mut delay = self.base_delay.saturating_mul(1u32 << exponent);
                    if delay > self.max_delay {
                        delay = self.max_delay;
                    }
                    let jitter_ms: u64 = rng().random_range(0..=250);
                    let delay = delay + Duration::from_millis(jitter_ms);

                    warn!(
                        what,
                        attempt,
                        max = self.max_retries,
                        elapsed_ms_attempt = attempt_dt.as_millis() as u128,
                        elapsed_ms_total = total_dt.as_millis() as u128,
                        ?delay,
                        error = %e,
                        "fetch attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

impl fmt::Debug for Retry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Retry")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_makes_one_plus_n_attempts() {
        let calls = Rc::new(Cell::new(0usize));
        let retry = Retry::new(2, Duration::from_millis(1000));

        let counter = calls.clone();
        let result = retry
            .run("failing", move || {
                let counter = counter.clone();
                async move {
                    counter.set(counter.get() + 1);
                    Err::<(), Box<dyn Error>>("boom".into())
                }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.get(), 3); // 1 initial + 2 retries
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_after_transient_failure() {
        let calls = Rc::new(Cell::new(0usize));
        let retry = Retry::new(3, Duration::from_millis(1000));

        let counter = calls.clone();
        let result = retry
            .run("flaky", move || {
                let counter = counter.clone();
                async move {
                    counter.set(counter.get() + 1);
                    if counter.get() < 3 {
                        Err::<u32, Box<dyn Error>>("transient".into())
                    } else {
                        Ok(42)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_large_retry_count_does_not_overflow_backoff() {
        let calls = Rc::new(Cell::new(0usize));
        let retry = Retry::new(40, Duration::from_millis(1));

        let counter = calls.clone();
        let result = retry
            .run("persistent", move || {
                let counter = counter.clone();
                async move {
                    counter.set(counter.get() + 1);
                    Err::<(), Box<dyn Error>>("boom".into())
                }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.get(), 41);
    }

    #[tokio::test]
    async fn test_zero_retries_fails_after_single_attempt() {
        let calls = Rc::new(Cell::new(0usize));
        let retry = Retry::new(0, Duration::from_millis(1));

        let counter = calls.clone();
        let result = retry
            .run("single", move || {
                let counter = counter.clone();
                async move {
                    counter.set(counter.get() + 1);
                    Err::<(), Box<dyn Error>>("boom".into())
                }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.get(), 1);
    }
}
