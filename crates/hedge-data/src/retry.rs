//! Timeout and bounded-retry wrapper for provider calls.

use hedge_core::error::ProviderError;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Retry policy applied around every network call.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub attempts: u32,
    /// Per-attempt timeout
    pub timeout: Duration,
    /// Base backoff between attempts, scaled linearly
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            timeout: Duration::from_secs(10),
            backoff: Duration::from_millis(500),
        }
    }
}

/// Run `op` under the policy. Transient failures (network, timeout) are
/// retried; `NoData` and parse failures are returned immediately since
/// retrying cannot fix them.
pub(crate) async fn with_retry<T, F, Fut>(
    name: &str,
    policy: &RetryPolicy,
    op: F,
) -> Result<T, ProviderError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    let mut last_error = String::new();

    for attempt in 1..=policy.attempts {
        match tokio::time::timeout(policy.timeout, op()).await {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(err @ (ProviderError::NoData | ProviderError::Parse(_)))) => return Err(err),
            Ok(Err(err)) => last_error = err.to_string(),
            Err(_) => {
                last_error = ProviderError::Timeout {
                    secs: policy.timeout.as_secs(),
                }
                .to_string()
            }
        }

        warn!(provider = name, attempt, error = %last_error, "provider call failed");
        if attempt < policy.attempts {
            tokio::time::sleep(policy.backoff * attempt).await;
        }
    }

    Err(ProviderError::Unavailable {
        attempts: policy.attempts,
        reason: last_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            attempts: 3,
            timeout: Duration::from_millis(100),
            backoff: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failure() {
        let calls = AtomicU32::new(0);
        let result = with_retry("test", &fast_policy(), || async {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(ProviderError::Network("connection reset".into()))
            } else {
                Ok(42)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_no_data_is_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<i32, _> = with_retry("test", &fast_policy(), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(ProviderError::NoData)
        })
        .await;

        assert!(matches!(result, Err(ProviderError::NoData)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_exhausted_attempts_unavailable() {
        let result: Result<i32, _> = with_retry("test", &fast_policy(), || async {
            Err(ProviderError::Network("down".into()))
        })
        .await;

        assert!(matches!(
            result,
            Err(ProviderError::Unavailable { attempts: 3, .. })
        ));
    }
}
