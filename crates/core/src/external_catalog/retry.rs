//! Bounded retry and call pacing for outbound catalog requests.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

use super::transport::TransportError;

/// How many times a request is attempted and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. Never below 1.
    pub max_attempts: u32,
    /// Fixed pause between two attempts.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            backoff: Duration::from_millis(500),
        }
    }
}

/// The last error seen once a policy gave up.
#[derive(Debug)]
pub struct RetryFailure {
    pub attempts: u32,
    pub last_error: TransportError,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// Run `op` until it succeeds, fails permanently, or attempts run out.
    ///
    /// `op` receives the 1-based attempt number. Only transient transport
    /// errors are retried; the backoff is slept between attempts, never
    /// after the last one.
    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> Result<T, RetryFailure>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, TransportError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    warn!(
                        "Request error for {} (attempt {}/{}): {}",
                        label, attempt, max_attempts, e
                    );
                    if !e.is_transient() || attempt >= max_attempts {
                        return Err(RetryFailure {
                            attempts: attempt,
                            last_error: e,
                        });
                    }
                }
            }
            if !self.backoff.is_zero() {
                sleep(self.backoff).await;
            }
            attempt += 1;
        }
    }
}

/// Fixed pause observed after every outbound call to respect upstream rate
/// limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throttle {
    delay: Duration,
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(Duration::from_millis(250))
    }
}

impl Throttle {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait out the configured delay.
    pub async fn pause(&self) {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
    }
}
