//! Retry logic with exponential backoff for upstream calls.

use std::time::Duration;

use tracing::{debug, error, warn};

use crate::server::error::{retry::ErrorRetryStrategy, Error};

/// Executes an operation with bounded exponential backoff.
///
/// Only errors classified [`ErrorRetryStrategy::Retry`] are retried; permanent
/// failures return immediately. The backoff blocks the calling job, and there is
/// no cancellation mid-retry.
pub struct RetryContext {
    /// Max attempts before failure
    max_attempts: u32,
    /// Initial backoff between attempts
    initial_backoff_secs: u64,
}

impl RetryContext {
    const DEFAULT_MAX_ATTEMPTS: u32 = 3;
    const DEFAULT_INITIAL_BACKOFF_SECS: u64 = 1;

    pub fn new() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            initial_backoff_secs: Self::DEFAULT_INITIAL_BACKOFF_SECS,
        }
    }

    /// Execute an operation with automatic retry logic.
    ///
    /// # Arguments
    /// - `description`: Description of the operation for logging (e.g., "station lookup 60003760")
    /// - `operation`: Async function performing the upstream call
    pub async fn execute_with_retry<'a, R, F>(
        &self,
        description: &str,
        operation: F,
    ) -> Result<R, Error>
    where
        F: Fn() -> std::pin::Pin<
            Box<dyn std::future::Future<Output = Result<R, Error>> + Send + 'a>,
        >,
    {
        let mut attempt_count = 0;

        loop {
            debug!(
                "Processing {} (attempt {}/{})",
                description,
                attempt_count + 1,
                self.max_attempts
            );

            match operation().await {
                Ok(result) => {
                    debug!("Successfully processed {}", description);
                    return Ok(result);
                }
                Err(e) => match e.to_retry_strategy() {
                    ErrorRetryStrategy::Fail => {
                        error!("Permanent error for {}: {:?}", description, e);
                        return Err(e);
                    }
                    ErrorRetryStrategy::Retry => {
                        attempt_count += 1;
                        if attempt_count >= self.max_attempts {
                            error!(
                                "Max attempts ({}) exceeded for {}: {:?}",
                                self.max_attempts, description, e
                            );
                            return Err(e);
                        }

                        let backoff_secs = self.initial_backoff_secs * 2_u64.pow(attempt_count - 1);
                        let backoff = Duration::from_secs(backoff_secs);

                        warn!(
                            "Retrying {} (attempt {}/{}) after {:?}: {:?}",
                            description, attempt_count, self.max_attempts, backoff, e
                        );

                        tokio::time::sleep(backoff).await;
                    }
                },
            }
        }
    }
}

impl Default for RetryContext {
    fn default() -> Self {
        Self::new()
    }
}
