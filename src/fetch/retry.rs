//! Linear-backoff retry policy for fetches

use crate::config::RetryConfig;
use std::future::Future;
use std::time::Duration;

/// Retry policy: attempt N (1-based retry count) waits `N × base_delay`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// A policy that makes a single attempt
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(config.max_retries, config.base_delay())
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Delay before the given retry (1 for the first retry)
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.base_delay * retry
    }

    /// Runs `operation` until it succeeds or the retries are exhausted
    ///
    /// Every failure is retried; the last error is returned once the policy
    /// runs out.
    pub async fn run<T, E, F, Fut>(&self, label: &str, mut operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let mut retry = 0;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if retry < self.max_retries => {
                    retry += 1;
                    let delay = self.delay_for(retry);
                    tracing::debug!(
                        operation = label,
                        retry,
                        delay_ms = delay.as_millis() as u64,
                        "Attempt failed: {}; retrying",
                        e
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    if self.max_retries > 0 {
                        tracing::warn!(
                            operation = label,
                            attempts = retry + 1,
                            "Giving up after {} attempts: {}",
                            retry + 1,
                            e
                        );
                    }
                    return Err(e);
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}
