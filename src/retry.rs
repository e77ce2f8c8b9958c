//! Fixed-delay bounded retry policy.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use backoff::backoff::{Backoff, Constant};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::error::RetryError;

/// Defaults: 5 total attempts, 1s apart, give up after 30s.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
const DEFAULT_DELAY_SECS: u64 = 1;
const DEFAULT_MAX_ELAPSED_SECS: u64 = 30;
const PATIENT_MAX_ELAPSED_SECS: u64 = 180;

/// Snapshot passed to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptInfo {
    /// 1-based attempt number.
    pub attempt: u32,
    /// Time since the first attempt started.
    pub elapsed: Duration,
}

/// Diagnostics hooks around each attempt.
///
/// Observers see every attempt but cannot influence whether another one runs.
pub trait RetryObserver: Send + Sync {
    fn before_attempt(&self, _info: &AttemptInfo) {}

    fn after_attempt(&self, _info: &AttemptInfo, _succeeded: bool) {}

    /// Called once when the policy gives up, with the last error.
    fn on_exhausted(&self, _info: &AttemptInfo, _error: &dyn fmt::Display) {}
}

/// Observer that reports through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl RetryObserver for TracingObserver {
    fn before_attempt(&self, info: &AttemptInfo) {
        debug!(attempt = info.attempt, elapsed = ?info.elapsed, "Starting attempt");
    }

    fn after_attempt(&self, info: &AttemptInfo, succeeded: bool) {
        debug!(attempt = info.attempt, elapsed = ?info.elapsed, succeeded, "Attempt finished");
    }

    fn on_exhausted(&self, info: &AttemptInfo, error: &dyn fmt::Display) {
        warn!(
            "Giving up after {} attempt(s) in {:?}. Last error: {}",
            info.attempt, info.elapsed, error
        );
    }
}

/// Sequential retries with a fixed delay, bounded by attempts and elapsed time.
///
/// Whichever bound is reached first stops the loop. No jitter is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
    max_elapsed: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: Duration::from_secs(DEFAULT_DELAY_SECS),
            max_elapsed: Duration::from_secs(DEFAULT_MAX_ELAPSED_SECS),
        }
    }
}

impl RetryPolicy {
    /// A `max_attempts` of 0 is treated as 1.
    pub fn new(max_attempts: u32, delay: Duration, max_elapsed: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
            max_elapsed,
        }
    }

    /// Same attempt budget as the default, with a 180s time bound.
    pub fn patient() -> Self {
        Self {
            max_elapsed: Duration::from_secs(PATIENT_MAX_ELAPSED_SECS),
            ..Self::default()
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_max_elapsed(mut self, max_elapsed: Duration) -> Self {
        self.max_elapsed = max_elapsed;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn max_elapsed(&self) -> Duration {
        self.max_elapsed
    }

    /// Run `operation` under this policy, logging through `tracing`.
    pub async fn run<T, E, F, Fut>(&self, operation: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::error::Error + 'static,
    {
        self.run_observed(operation, &TracingObserver).await
    }

    /// Run `operation` under this policy with a custom observer.
    ///
    /// Any `Err` from the operation triggers another attempt; the last error
    /// is returned inside [`RetryError`] once a bound is hit.
    pub async fn run_observed<T, E, F, Fut, O>(
        &self,
        mut operation: F,
        observer: &O,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::error::Error + 'static,
        O: RetryObserver + ?Sized,
    {
        let mut backoff = Constant::new(self.delay);
        let start = Instant::now();
        let mut attempt = 0;

        loop {
            attempt += 1;
            observer.before_attempt(&AttemptInfo {
                attempt,
                elapsed: start.elapsed(),
            });

            let result = operation().await;

            let info = AttemptInfo {
                attempt,
                elapsed: start.elapsed(),
            };
            observer.after_attempt(&info, result.is_ok());

            let error = match result {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };

            if attempt >= self.max_attempts || info.elapsed >= self.max_elapsed {
                observer.on_exhausted(&info, &error);
                return Err(RetryError {
                    attempts: attempt,
                    elapsed: info.elapsed,
                    last_error: error,
                });
            }

            if let Some(wait) = backoff.next_backoff() {
                tokio::time::sleep(wait).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Debug, thiserror::Error)]
    #[error("transient failure #{0}")]
    struct Transient(u32);

    #[derive(Default)]
    struct CountingObserver {
        before: AtomicU32,
        after: Mutex<Vec<(u32, bool)>>,
        exhausted: Mutex<Option<String>>,
    }

    impl RetryObserver for CountingObserver {
        fn before_attempt(&self, _info: &AttemptInfo) {
            self.before.fetch_add(1, Ordering::SeqCst);
        }

        fn after_attempt(&self, info: &AttemptInfo, succeeded: bool) {
            self.after.lock().unwrap().push((info.attempt, succeeded));
        }

        fn on_exhausted(&self, _info: &AttemptInfo, error: &dyn fmt::Display) {
            *self.exhausted.lock().unwrap() = Some(error.to_string());
        }
    }

    /// Fails `failures` times, then returns the attempt number.
    fn flaky(
        count: &AtomicU32,
        failures: u32,
    ) -> impl Future<Output = Result<u32, Transient>> + '_ {
        let n = count.fetch_add(1, Ordering::SeqCst) + 1;
        async move {
            if n <= failures {
                Err(Transient(n))
            } else {
                Ok(n)
            }
        }
    }

    #[test]
    fn test_defaults() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 5);
        assert_eq!(policy.delay(), Duration::from_secs(1));
        assert_eq!(policy.max_elapsed(), Duration::from_secs(30));
        assert_eq!(RetryPolicy::patient().max_elapsed(), Duration::from_secs(180));
        assert_eq!(RetryPolicy::default().with_max_attempts(0).max_attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_on_first_attempt() {
        let count = AtomicU32::new(0);
        let result = RetryPolicy::default().run(|| flaky(&count, 0)).await;
        assert_eq!(result.unwrap(), 1);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_four_failures_then_success_within_five_attempts() {
        let count = AtomicU32::new(0);
        let observer = CountingObserver::default();

        let result = RetryPolicy::default()
            .run_observed(|| flaky(&count, 4), &observer)
            .await;

        assert_eq!(result.unwrap(), 5);
        assert_eq!(observer.before.load(Ordering::SeqCst), 5);
        let after = observer.after.lock().unwrap();
        assert_eq!(after.len(), 5);
        assert_eq!(after[4], (5, true));
        assert!(after[..4].iter().all(|(_, ok)| !ok));
        assert!(observer.exhausted.lock().unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_at_attempt_bound_before_time_bound() {
        let count = AtomicU32::new(0);
        let observer = CountingObserver::default();

        let result = RetryPolicy::default()
            .with_max_attempts(3)
            .run_observed(|| flaky(&count, 4), &observer)
            .await;

        let err = result.unwrap_err();
        assert_eq!(err.attempts, 3);
        assert!(err.elapsed < Duration::from_secs(30));
        assert_eq!(err.last_error.0, 3);
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert_eq!(observer.before.load(Ordering::SeqCst), 3);
        assert_eq!(
            observer.exhausted.lock().unwrap().as_deref(),
            Some("transient failure #3")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_at_time_bound_before_attempt_bound() {
        let count = AtomicU32::new(0);

        let result: Result<(), _> = RetryPolicy::default()
            .run(|| {
                let n = count.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    tokio::time::sleep(Duration::from_secs(20)).await;
                    Err(Transient(n))
                }
            })
            .await;

        let err = result.unwrap_err();
        assert_eq!(err.attempts, 2);
        assert!(err.elapsed >= Duration::from_secs(30));
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fixed_delay_between_attempts() {
        let count = AtomicU32::new(0);
        let start = Instant::now();

        let result = RetryPolicy::default()
            .with_delay(Duration::from_secs(2))
            .run(|| flaky(&count, 2))
            .await;

        assert_eq!(result.unwrap(), 3);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(4) && elapsed < Duration::from_secs(5));
    }
}
