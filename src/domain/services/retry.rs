#[cfg(test)]
#[path = "retry_test.rs"]
mod tests;

use std::future::Future;
use std::time::Duration;

use crate::domain::models::ProviderError;

/// Bounded exponential backoff around calls to the model provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts allowed after the first one.
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> RetryPolicy {
        return RetryPolicy {
            max_retries: 3,
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(5000),
        };
    }
}

impl RetryPolicy {
    /// Delay before retry `retry`, counting from zero.
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 2_u32.saturating_pow(retry);
        return self.initial_delay.saturating_mul(factor).min(self.max_delay);
    }

    /// Runs `op` until it succeeds, fails with an error that is not worth
    /// retrying, or the retry budget runs out. The last error is returned in
    /// the latter two cases.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut op: F) -> Result<T, ProviderError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let mut retry = 0;
        loop {
            let err = match op().await {
                Ok(res) => return Ok(res),
                Err(err) => err,
            };

            if !err.is_retryable() {
                tracing::warn!(operation = operation, error = %err, "Provider error is not retryable");
                return Err(err);
            }

            if retry >= self.max_retries {
                tracing::error!(
                    operation = operation,
                    attempts = retry + 1,
                    error = %err,
                    "Provider retries exhausted"
                );
                return Err(err);
            }

            let delay = self.delay_for(retry);
            tracing::warn!(
                operation = operation,
                retry = retry + 1,
                max_retries = self.max_retries,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "Retrying provider call"
            );
            tokio::time::sleep(delay).await;
            retry += 1;
        }
    }
}
