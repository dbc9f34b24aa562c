use crate::{LlmError, LlmResult};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Retry an async operation with exponential backoff.
///
/// The operation runs once, then up to `max_retries` more times while it keeps failing
/// with a retryable [`LlmError`]. The delay starts at `initial_delay` and doubles after
/// every failed attempt. The closure receives the 1-based attempt number.
///
/// # Returns
/// The result of the first successful attempt, the first non-retryable error, or the
/// last error once all attempts are used.
pub async fn retry_with_backoff<F, Fut, T>(
    mut operation: F,
    max_retries: u32,
    initial_delay: Duration,
) -> LlmResult<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, LlmError>>,
{
    let total_attempts = max_retries.saturating_add(1);
    let mut delay = initial_delay;
    let mut attempt = 1;

    loop {
        match operation(attempt).await {
            Ok(result) => return Ok(result),
            Err(e) if e.is_retryable() && attempt < total_attempts => {
                warn!(
                    "LLM request failed (attempt {}/{}): {e}. Retrying after {}ms...",
                    attempt,
                    total_attempts,
                    delay.as_millis()
                );
                sleep(delay).await;
                delay = delay.saturating_mul(2);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
