//! Exponential backoff for transient store failures.

use std::time::Duration;

use crate::config::RetryConfig;
use crate::error::Result;

/// Run `operation`, retrying with exponential backoff while the error is
/// transient ([`crate::Error::is_retryable`]). The final error is returned
/// once attempts are exhausted or the error is terminal.
pub async fn retry_with_backoff<T, F, Fut>(config: &RetryConfig, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                if attempt >= config.max_attempts || !e.is_retryable() {
                    return Err(e);
                }
                let backoff = backoff_for(config, attempt);
                tracing::debug!(
                    attempt,
                    backoff_ms = backoff.as_millis() as u64,
                    error = %e,
                    "retrying after transient error"
                );
                tokio::time::sleep(backoff).await;
            }
        }
    }
}

/// Backoff for the given attempt: `initial * 2^(attempt-1)`, capped, plus
/// jitter up to the capped value.
fn backoff_for(config: &RetryConfig, attempt: u32) -> Duration {
    let base_ms = config.initial_backoff_ms * (1u64 << (attempt - 1).min(10));
    let capped_ms = base_ms.min(config.max_backoff_ms);
    Duration::from_millis(capped_ms + jitter(capped_ms))
}

// Pseudo-random jitter without an RNG dependency.
fn jitter(max: u64) -> u64 {
    use std::time::SystemTime;
    let nanos = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos() as u64;
    nanos % max.max(1)
}
