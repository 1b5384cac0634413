//! Retry and timeout policy for external service calls.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};
use vsum_ai::{AiError, AiResult};

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (not including the initial attempt).
    pub max_retries: u32,
    /// Base delay for exponential backoff (doubles each attempt).
    pub base_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryConfig {
    /// Set the maximum number of retries.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the base delay for exponential backoff.
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Calculate delay for a given attempt number.
    fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay = self
            .base_delay
            .saturating_mul(2u32.saturating_pow(attempt));
        delay.min(self.max_delay)
    }
}

/// Execute an async operation, retrying failures accepted by `should_retry`.
///
/// Returns the last error once retries are exhausted.
pub async fn retry_async<F, Fut, T, E, P>(
    config: &RetryConfig,
    operation_name: &str,
    should_retry: P,
    operation: F,
) -> Result<T, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: Fn(&E) -> bool,
{
    let mut attempt = 0u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < config.max_retries && should_retry(&e) => {
                let delay = config.delay_for_attempt(attempt);
                attempt += 1;
                debug!(
                    "{} attempt {} failed, retrying in {:?}: {}",
                    operation_name, attempt, delay, e
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => {
                if attempt > 0 {
                    warn!("{} failed after {} attempts: {}", operation_name, attempt + 1, e);
                }
                return Err(e);
            }
        }
    }
}

/// Timeout and retry applied to every external service call.
#[derive(Debug, Clone)]
pub struct CallPolicy {
    /// Upper bound on one attempt
    pub timeout: Duration,
    pub retry: RetryConfig,
}

impl Default for CallPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(300),
            retry: RetryConfig::default(),
        }
    }
}

impl CallPolicy {
    pub fn new(timeout: Duration, retry: RetryConfig) -> Self {
        Self { timeout, retry }
    }

    /// Run one external call under this policy.
    ///
    /// Each attempt is bounded by `timeout`; an elapsed attempt counts as
    /// [`AiError::Timeout`] and is retryable like any transient failure.
    pub async fn call<F, Fut, T>(&self, operation_name: &str, operation: F) -> AiResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = AiResult<T>>,
    {
        let timeout = self.timeout;
        retry_async(&self.retry, operation_name, AiError::is_retryable, || {
            let attempt = operation();
            async move {
                match tokio::time::timeout(timeout, attempt).await {
                    Ok(result) => result,
                    Err(_) => Err(AiError::Timeout(timeout)),
                }
            }
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_retry_config_delay_calculation() {
        let config = RetryConfig::default().with_base_delay(Duration::from_millis(100));

        assert_eq!(config.delay_for_attempt(0), Duration::from_millis(100));
        assert_eq!(config.delay_for_attempt(1), Duration::from_millis(200));
        assert_eq!(config.delay_for_attempt(2), Duration::from_millis(400));
    }

    #[test]
    fn test_retry_config_max_delay() {
        let config = RetryConfig::default()
            .with_base_delay(Duration::from_secs(1))
            .with_max_retries(40);

        assert_eq!(config.delay_for_attempt(40), Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_retry_async_eventual_success() {
        let config = RetryConfig::default()
            .with_max_retries(3)
            .with_base_delay(Duration::from_millis(1));
        let call_count = AtomicU32::new(0);

        let result = retry_async(&config, "test", |_: &String| true, || {
            let count = call_count.fetch_add(1, Ordering::SeqCst);
            async move {
                if count < 2 {
                    Err("transient error".to_string())
                } else {
                    Ok(42)
                }
            }
        })
        .await;

        assert_eq!(result, Ok(42));
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_async_skips_non_retryable() {
        let config = RetryConfig::default()
            .with_max_retries(3)
            .with_base_delay(Duration::from_millis(1));
        let call_count = AtomicU32::new(0);

        let result: Result<u32, String> = retry_async(&config, "test", |_| false, || {
            call_count.fetch_add(1, Ordering::SeqCst);
            async { Err("permanent".to_string()) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_call_policy_times_out_slow_call() {
        let policy = CallPolicy::new(Duration::from_millis(20), RetryConfig::default());

        let result: AiResult<String> = policy
            .call("slow", || async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok("late".to_string())
            })
            .await;

        assert!(matches!(result, Err(AiError::Timeout(d)) if d == Duration::from_millis(20)));
    }

    #[tokio::test]
    async fn test_call_policy_retries_timeouts() {
        let retry = RetryConfig::default()
            .with_max_retries(2)
            .with_base_delay(Duration::from_millis(1));
        let policy = CallPolicy::new(Duration::from_millis(20), retry);
        let call_count = AtomicU32::new(0);

        let result = policy
            .call("flaky", || {
                let count = call_count.fetch_add(1, Ordering::SeqCst);
                async move {
                    if count == 0 {
                        tokio::time::sleep(Duration::from_secs(5)).await;
                    }
                    Ok::<_, AiError>("done".to_string())
                }
            })
            .await
            .unwrap();

        assert_eq!(result, "done");
        assert_eq!(call_count.load(Ordering::SeqCst), 2);
    }
}
