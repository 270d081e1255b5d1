//! Shared request plumbing for the HTTP dialogue providers.

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::DialogueError;

/// Ceiling for a single backoff sleep.
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Runs `attempt` until it succeeds, fails with a non-retryable error, or
/// `max_retries` retries have been spent. Backoff doubles from `base_delay`.
pub(super) async fn with_retries<T, F, Fut>(
    max_retries: u32,
    base_delay: Duration,
    mut attempt: F,
) -> Result<T, DialogueError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DialogueError>>,
{
    let mut retry_count = 0;

    loop {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(err) if !err.is_retryable() || retry_count >= max_retries => return Err(err),
            Err(err) => {
                let delay = backoff_delay(base_delay, retry_count);
                tracing::debug!(error = %err, retry = retry_count + 1, ?delay, "retrying dialogue request");
                sleep(delay).await;
                retry_count += 1;
            }
        }
    }
}

/// `base * 2^retry`, saturating at [`MAX_BACKOFF`].
fn backoff_delay(base: Duration, retry: u32) -> Duration {
    2u32.checked_pow(retry)
        .and_then(|factor| base.checked_mul(factor))
        .map_or(MAX_BACKOFF, |delay| delay.min(MAX_BACKOFF))
}

/// Maps a reqwest transport failure onto the port's error type.
pub(super) fn transport_error(err: reqwest::Error, timeout: Duration) -> DialogueError {
    if err.is_timeout() {
        DialogueError::Timeout {
            timeout_secs: timeout.as_secs() as u32,
        }
    } else if err.is_connect() {
        DialogueError::network(format!("Connection failed: {}", err))
    } else {
        DialogueError::network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn backoff_doubles_then_saturates() {
        let base = Duration::from_millis(500);
        assert_eq!(backoff_delay(base, 0), Duration::from_millis(500));
        assert_eq!(backoff_delay(base, 3), Duration::from_secs(4));
        assert_eq!(backoff_delay(base, 10), MAX_BACKOFF);
        assert_eq!(backoff_delay(base, 40), MAX_BACKOFF);
        assert_eq!(backoff_delay(base, u32::MAX), MAX_BACKOFF);
    }

    #[tokio::test]
    async fn retries_transient_errors_until_success() {
        let calls = AtomicU32::new(0);
        let result = with_retries(3, Duration::from_millis(1), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(DialogueError::unavailable("busy"))
                } else {
                    Ok("done")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn stops_on_non_retryable_error() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_retries(3, Duration::from_millis(1), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(DialogueError::AuthenticationFailed) }
        })
        .await;

        assert!(matches!(result, Err(DialogueError::AuthenticationFailed)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_retries(2, Duration::from_millis(1), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(DialogueError::network("reset")) }
        })
        .await;

        assert!(matches!(result, Err(DialogueError::Network(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
