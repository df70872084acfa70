mod circuit_breaker;
mod retry;

pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
pub use retry::{RetryPolicy, DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_WAIT_MILLIS};

use std::{fmt::Display, future::Future};
use tracing::warn;

#[derive(Debug)]
pub enum ResilienceError<E> {
    /// The breaker rejected the call. `last_error` is the failure of the
    /// previous attempt, if there was one.
    CircuitOpen { name: String, last_error: Option<E> },
    /// Every attempt failed, this is the error of the last one
    Failed(E),
}

/// Runs `op` until it succeeds, the `RetryPolicy` is exhausted or the
/// `CircuitBreaker` rejects an attempt. The retry wraps the breaker, so every
/// attempt is recorded by the breaker individually. `op` receives the
/// attempt number, starting at 1.
pub async fn with_retry_and_breaker<T, E, F, Fut>(
    retry: &RetryPolicy,
    breaker: &CircuitBreaker,
    mut op: F,
) -> Result<T, ResilienceError<E>>
where
    E: Display,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 1;
    let mut last_error = None;
    loop {
        if !breaker.try_acquire() {
            return Err(ResilienceError::CircuitOpen {
                name: breaker.name().to_string(),
                last_error,
            });
        }
        match op(attempt).await {
            Ok(res) => {
                breaker.on_success();
                return Ok(res);
            }
            Err(e) => {
                breaker.on_error();
                if attempt >= retry.max_attempts {
                    return Err(ResilienceError::Failed(e));
                }
                warn!(
                    "Attempt {} of {} failed: {}. Retrying in {:?}",
                    attempt, retry.max_attempts, e, retry.wait
                );
                last_error = Some(e);
                attempt += 1;
                tokio::time::sleep(retry.wait).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::ManualSys;
    use std::{sync::Arc, time::Duration};

    fn no_wait(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts, Duration::from_millis(0))
    }

    fn lenient_breaker() -> CircuitBreaker {
        CircuitBreaker::new(
            "default",
            CircuitBreakerConfig::default(),
            Arc::new(ManualSys::new(0)),
        )
    }

    #[tokio::test]
    async fn retries_until_success() {
        let breaker = lenient_breaker();
        let mut attempts = vec![];
        let res = with_retry_and_breaker(&no_wait(3), &breaker, |attempt| {
            attempts.push(attempt);
            async move {
                if attempt < 3 {
                    Err(format!("attempt {} failed", attempt))
                } else {
                    Ok(attempt)
                }
            }
        })
        .await;

        assert!(matches!(res, Ok(3)));
        assert_eq!(attempts, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn returns_last_error_when_exhausted() {
        let breaker = lenient_breaker();
        let res: Result<(), _> = with_retry_and_breaker(&no_wait(2), &breaker, |attempt| async move {
            Err(format!("attempt {} failed", attempt))
        })
        .await;

        match res {
            Err(ResilienceError::Failed(e)) => assert_eq!(e, "attempt 2 failed"),
            _ => panic!("Expected the last error"),
        }
        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    #[tokio::test]
    async fn stops_retrying_when_breaker_opens() {
        let config = CircuitBreakerConfig {
            window_size: 2,
            minimum_calls: 2,
            ..Default::default()
        };
        let breaker = CircuitBreaker::new("default", config, Arc::new(ManualSys::new(0)));
        let mut calls = 0;
        let res: Result<(), _> = with_retry_and_breaker(&no_wait(5), &breaker, |_| {
            calls += 1;
            async { Err("down") }
        })
        .await;

        match res {
            Err(ResilienceError::CircuitOpen { name, last_error }) => {
                assert_eq!(name, "default");
                assert_eq!(last_error, Some("down"));
            }
            _ => panic!("Expected the breaker to reject the third attempt"),
        }
        assert_eq!(calls, 2);
    }
}
