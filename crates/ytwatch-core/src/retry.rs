//! Retry with exponential back-off and jitter, shared by the API clients.
//!
//! Each client decides which of its errors are transient and passes that
//! predicate in; the back-off schedule is the same for every service.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

const MAX_DELAY_MS: u64 = 60_000;

/// Runs `operation` with up to `max_retries` additional attempts while
/// `is_retriable` accepts the error.
///
/// The n-th retry waits `backoff_base_ms * 2^(n-1)` ms ± 25 % jitter,
/// capped at 60 s.
///
/// # Errors
///
/// Returns the last error once it is not retriable or the retries are
/// used up.
pub async fn retry_with_backoff<T, E, F, Fut>(
    service: &str,
    max_retries: u32,
    backoff_base_ms: u64,
    is_retriable: impl Fn(&E) -> bool,
    mut operation: F,
) -> Result<T, E>
where
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let delay_ms = jittered_delay_ms(backoff_base_ms, attempt);
                tracing::warn!(
                    service,
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn jittered_delay_ms(backoff_base_ms: u64, attempt: u32) -> u64 {
    let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
    let capped = computed.min(MAX_DELAY_MS);
    (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64
}
