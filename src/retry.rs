//! Bounded retry for network-dependent acquisition steps.

use std::time::Duration;

use tracing::warn;

use crate::utils::error::{Error, Result};

/// Retry policy: a fixed number of attempts with a backoff delay between them.
///
/// The delay is slept before every attempt after the first, so a policy with
/// three attempts sleeps at most twice.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one
    pub max_attempts: usize,
    /// Delay slept before each retry
    pub delay: Duration,
}

impl RetryPolicy {
    /// Fixed-delay policy
    pub fn fixed(max_attempts: usize, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Run `op` until it succeeds, the error is not retryable, or the
    /// attempts are exhausted. The last error is returned on exhaustion.
    pub fn run<T, F, P>(&self, what: &str, mut op: F, retryable: P) -> Result<T>
    where
        F: FnMut() -> Result<T>,
        P: Fn(&Error) -> bool,
    {
        let mut last_err = None;

        for attempt in 1..=self.max_attempts.max(1) {
            if attempt > 1 {
                warn!(
                    "Retry #{} of {} in {:.0} seconds",
                    attempt - 1,
                    what,
                    self.delay.as_secs_f64()
                );
                std::thread::sleep(self.delay);
            }

            match op() {
                Ok(value) => return Ok(value),
                Err(err) if retryable(&err) => {
                    warn!("{} attempt {} failed: {}", what, attempt, err);
                    last_err = Some(err);
                }
                Err(err) => return Err(err),
            }
        }

        Err(last_err
            .unwrap_or_else(|| Error::InvalidArgument(format!("{}: zero attempts", what))))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::fixed(3, Duration::from_secs(20))
    }
}
