//! Retry policy for the embedding and generation clients
//!
//! Retries belong to these external collaborators; graph code never retries.

use crate::errors::{AppError, Result};
use backoff::{future::retry, ExponentialBackoffBuilder};
use std::future::Future;
use std::time::Duration;

/// Run `operation` with exponential backoff, at most `max_retries` extra attempts.
///
/// Non-retryable errors are returned immediately.
pub async fn with_retry<T, F, Fut>(operation_name: &str, max_retries: u32, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let policy = ExponentialBackoffBuilder::new()
        .with_initial_interval(Duration::from_millis(200))
        .with_max_interval(Duration::from_secs(5))
        .with_max_elapsed_time(Some(Duration::from_secs(60)))
        .build();

    let mut attempt = 0u32;

    retry(policy, || {
        attempt += 1;
        let current = attempt;
        let fut = operation();
        async move {
            match fut.await {
                Ok(value) => Ok(value),
                Err(e) if e.is_retryable() && current <= max_retries => {
                    tracing::warn!(
                        operation = operation_name,
                        attempt = current,
                        max_retries = max_retries,
                        error = %e,
                        "Request failed, retrying"
                    );
                    Err(backoff::Error::transient(e))
                }
                Err(e) => Err(backoff::Error::permanent(e)),
            }
        }
    })
    .await
}

/// Map a reqwest failure onto the error taxonomy
pub(crate) fn classify_http_error(err: reqwest::Error, timeout: Duration, service: Service) -> AppError {
    if err.is_timeout() {
        return match service {
            Service::Embedding => AppError::EmbeddingTimeout {
                timeout_ms: timeout.as_millis() as u64,
            },
            Service::Generation => AppError::GenerationError {
                message: format!("Request timed out after {}ms", timeout.as_millis()),
            },
        };
    }

    match service {
        Service::Embedding => AppError::EmbeddingError {
            message: format!("Request failed: {}", err),
        },
        Service::Generation => AppError::GenerationError {
            message: format!("Request failed: {}", err),
        },
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Service {
    Embedding,
    Generation,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_permanent_error_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = with_retry("test", 3, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(AppError::Validation { message: "bad".into() }) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transient_error_then_success() {
        let calls = AtomicU32::new(0);
        let result = with_retry("test", 3, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(AppError::EmbeddingError { message: "503".into() })
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = with_retry("test", 1, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(AppError::EmbeddingError { message: "503".into() }) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
