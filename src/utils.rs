use crate::config::RetryConfig;
use crate::error::CollaboratorError;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Get file extension from a filename or path (without the dot)
pub fn get_extension(name: &str) -> Option<String> {
    std::path::Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|s| s.to_lowercase())
}

/// Number of whitespace-separated words
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Cut `text` to at most `max_chars` characters (UTF-8 safe).
/// Returns the text and whether it was cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => (&text[..byte_idx], true),
        None => (text, false),
    }
}

/// Run a collaborator call with a hard deadline
pub async fn with_timeout<T, F>(
    operation: &'static str,
    timeout: Duration,
    future: F,
) -> Result<T, CollaboratorError>
where
    F: Future<Output = Result<T, CollaboratorError>>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => result,
        Err(_) => Err(CollaboratorError::Timeout { operation, timeout }),
    }
}

/// Exponential backoff: base, 2*base, 4*base... capped at 30s
pub fn backoff_delay(attempt: u32, base_ms: u64) -> Duration {
    let factor = 1u64 << attempt.min(16);
    Duration::from_millis(base_ms.saturating_mul(factor).min(30_000))
}

/// Run `make_call` with a per-attempt timeout, retrying retryable errors
/// up to `retry.max_attempts` total attempts.
pub async fn call_with_retry<T, F, Fut>(
    operation: &'static str,
    timeout: Duration,
    retry: &RetryConfig,
    make_call: F,
) -> Result<T, CollaboratorError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, CollaboratorError>>,
{
    let max_attempts = retry.max_attempts.max(1);
    let mut attempt = 0;
    loop {
        match with_timeout(operation, timeout, make_call()).await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt + 1 < max_attempts => {
                let wait = backoff_delay(attempt, retry.base_delay_ms);
                warn!(
                    "{} failed (attempt {}/{}): {}, retrying in {:?}",
                    operation,
                    attempt + 1,
                    max_attempts,
                    e,
                    wait
                );
                tokio::time::sleep(wait).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
