//! Transport retry policy for master-data calls.
//!
//! A [`RetryPolicy`] lives on [`crate::MasterDataConfig`] and governs how
//! the client reacts to transient transport failures (connection refused,
//! timeouts). HTTP status handling is out of scope here: a response with a
//! non-2xx status is a completed request, and the caller decides what to
//! do with it.

use std::future::Future;
use std::time::Duration;

/// Exponential-backoff policy for transient failures.
///
/// Attempt `n` (zero-based) waits `base_delay * 2^n` before the next try,
/// so the default policy sleeps 200ms, 400ms, then 800ms before giving up
/// with the last error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retry attempts after the initial request.
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each subsequent one.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(200),
        }
    }
}

impl RetryPolicy {
    /// Fail on the first error. Suited to tests and local mock backends,
    /// where a transport failure is a harness bug rather than a blip.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
        }
    }

    fn delay_before_retry(&self, retry: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(retry)
    }

    /// Run `op`, retrying per this policy until it succeeds or the retry
    /// budget is spent. The last error is returned unchanged.
    pub(crate) async fn run<T, E, F, Fut>(&self, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let mut retries_used = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if retries_used < self.max_retries => {
                    let delay = self.delay_before_retry(retries_used);
                    retries_used += 1;
                    tracing::warn!(
                        retries_used,
                        max_retries = self.max_retries,
                        "transient master-data failure, retrying in {delay:?}: {e}"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            base_delay: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn returns_last_error_once_budget_is_spent() {
        let mut calls = 0u32;
        let result: Result<(), String> = fast(2)
            .run(|| {
                calls += 1;
                let label = format!("failure #{calls}");
                async move { Err(label) }
            })
            .await;

        assert_eq!(result.unwrap_err(), "failure #3");
        assert_eq!(calls, 3, "initial attempt plus two retries");
    }

    #[tokio::test]
    async fn stops_retrying_on_first_success() {
        let mut calls = 0u32;
        let result: Result<u32, &str> = fast(5)
            .run(|| {
                calls += 1;
                let n = calls;
                async move {
                    if n < 3 {
                        Err("transient")
                    } else {
                        Ok(n)
                    }
                }
            })
            .await;

        assert_eq!(result, Ok(3));
        assert_eq!(calls, 3, "no retries after the success");
    }

    #[tokio::test]
    async fn none_policy_makes_a_single_attempt() {
        let mut calls = 0u32;
        let result: Result<(), &str> = RetryPolicy::none()
            .run(|| {
                calls += 1;
                async { Err("down") }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls, 1);
    }

    #[test]
    fn default_backoff_doubles() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_before_retry(0), Duration::from_millis(200));
        assert_eq!(policy.delay_before_retry(1), Duration::from_millis(400));
        assert_eq!(policy.delay_before_retry(2), Duration::from_millis(800));
    }
}
