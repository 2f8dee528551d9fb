use std::cmp;
use std::fmt::Debug;
use std::thread;
use std::time::{Duration, Instant};

use crate::consts::ZkError;

/// Whether an error is a connectivity failure that may heal on its own.
///
/// Only these errors are ever worth re-issuing an operation for; everything
/// else is an answer, not an outage.
pub fn is_transient(err: ZkError) -> bool {
    match err {
        ZkError::ConnectionLoss
        | ZkError::OperationTimeout
        | ZkError::SessionExpired
        | ZkError::SessionMoved => true,
        _ => false,
    }
}

/// Decides whether an operation interrupted by a transient failure should be
/// attempted again.
///
/// Implementations are consulted once per failure with the number of retries
/// performed so far and the time elapsed since the first attempt, and answer
/// with the pause to take before the next attempt, or `None` to give up.
pub trait RetryPolicy {
    fn allow_retry(&self, retry_count: u32, elapsed: Duration) -> Option<Duration>;
}

/// Retry up to `n` times with a fixed pause between attempts.
#[derive(Clone, Copy, Debug)]
pub struct RetryNTimes {
    n: u32,
    sleep_between: Duration,
}

impl RetryNTimes {
    pub fn new(n: u32, sleep_between: Duration) -> RetryNTimes {
        RetryNTimes { n, sleep_between }
    }
}

impl RetryPolicy for RetryNTimes {
    fn allow_retry(&self, retry_count: u32, _elapsed: Duration) -> Option<Duration> {
        if retry_count < self.n {
            Some(self.sleep_between)
        } else {
            None
        }
    }
}

/// Retry with a pause that doubles on every attempt, capped at `max_sleep`.
#[derive(Clone, Copy, Debug)]
pub struct ExponentialBackoff {
    base_sleep: Duration,
    max_sleep: Duration,
    max_retries: u32,
}

impl ExponentialBackoff {
    pub fn new(base_sleep: Duration, max_sleep: Duration, max_retries: u32) -> ExponentialBackoff {
        ExponentialBackoff {
            base_sleep,
            max_sleep,
            max_retries,
        }
    }
}

impl RetryPolicy for ExponentialBackoff {
    fn allow_retry(&self, retry_count: u32, _elapsed: Duration) -> Option<Duration> {
        if retry_count >= self.max_retries {
            return None;
        }
        // cap the shift so the multiplier can't overflow
        let factor = 1u32 << cmp::min(retry_count, 16);
        Some(cmp::min(self.base_sleep * factor, self.max_sleep))
    }
}

/// Retry with a fixed pause until a wall-clock budget is spent.
#[derive(Clone, Copy, Debug)]
pub struct RetryUntilElapsed {
    max_elapsed: Duration,
    sleep_between: Duration,
}

impl RetryUntilElapsed {
    pub fn new(max_elapsed: Duration, sleep_between: Duration) -> RetryUntilElapsed {
        RetryUntilElapsed {
            max_elapsed,
            sleep_between,
        }
    }
}

impl RetryPolicy for RetryUntilElapsed {
    fn allow_retry(&self, _retry_count: u32, elapsed: Duration) -> Option<Duration> {
        if elapsed < self.max_elapsed {
            Some(self.sleep_between)
        } else {
            None
        }
    }
}

/// Run `op`, re-issuing it whole whenever it fails with an error `retryable`
/// accepts and `policy` still allows another attempt.
///
/// Errors `retryable` rejects propagate immediately; once `policy` declines,
/// the last error propagates as-is. Sleeps between attempts on the calling
/// thread.
pub fn call_with_retry<T, E, F, P>(policy: &dyn RetryPolicy, retryable: P, mut op: F) -> Result<T, E>
where
    E: Debug,
    F: FnMut() -> Result<T, E>,
    P: Fn(&E) -> bool,
{
    let started = Instant::now();
    let mut retry_count = 0;
    loop {
        let err = match op() {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if !retryable(&err) {
            return Err(err);
        }
        match policy.allow_retry(retry_count, started.elapsed()) {
            Some(delay) => {
                warn!(
                    "attempt {} failed with {:?}, retrying in {:?}",
                    retry_count + 1,
                    err,
                    delay
                );
                thread::sleep(delay);
                retry_count += 1;
            }
            None => {
                debug!("giving up after {} attempt(s): {:?}", retry_count + 1, err);
                return Err(err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_set_is_connectivity_only() {
        assert!(is_transient(ZkError::ConnectionLoss));
        assert!(is_transient(ZkError::OperationTimeout));
        assert!(is_transient(ZkError::SessionExpired));
        assert!(is_transient(ZkError::SessionMoved));
        assert!(!is_transient(ZkError::BadVersion));
        assert!(!is_transient(ZkError::NoNode));
        assert!(!is_transient(ZkError::NodeExists));
    }

    #[test]
    fn exponential_backoff_doubles_and_caps() {
        let policy =
            ExponentialBackoff::new(Duration::from_millis(10), Duration::from_millis(50), 5);
        assert_eq!(
            policy.allow_retry(0, Duration::ZERO),
            Some(Duration::from_millis(10))
        );
        assert_eq!(
            policy.allow_retry(1, Duration::ZERO),
            Some(Duration::from_millis(20))
        );
        assert_eq!(
            policy.allow_retry(2, Duration::ZERO),
            Some(Duration::from_millis(40))
        );
        assert_eq!(
            policy.allow_retry(3, Duration::ZERO),
            Some(Duration::from_millis(50))
        );
        assert_eq!(policy.allow_retry(5, Duration::ZERO), None);
    }

    #[test]
    fn retry_until_elapsed_respects_budget() {
        let policy = RetryUntilElapsed::new(Duration::from_secs(1), Duration::from_millis(5));
        assert!(policy.allow_retry(99, Duration::from_millis(999)).is_some());
        assert!(policy.allow_retry(0, Duration::from_secs(1)).is_none());
    }
}
