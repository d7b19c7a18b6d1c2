//! Which classifier errors are worth retrying.
//!
//! The batch scorer already paces calls under the per-minute quota; this
//! layer only absorbs the occasional 429 or 5xx that slips through.

use std::future::Future;

use crate::error::PerspectiveError;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:** timeouts, connection failures, HTTP 429 and 5xx.
///
/// **Not retriable:** 4xx other than 429 (an unsupported language or an
/// oversized comment will fail the same way again), malformed bodies.
pub(crate) fn is_retriable(err: &PerspectiveError) -> bool {
    match err {
        PerspectiveError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        PerspectiveError::Api { status, .. } => *status == 429 || (500..600).contains(status),
        PerspectiveError::Deserialize { .. } | PerspectiveError::InvalidBaseUrl { .. } => false,
    }
}

pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    operation: F,
) -> Result<T, PerspectiveError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, PerspectiveError>>,
{
    ytwatch_core::retry::retry_with_backoff(
        "perspective",
        max_retries,
        backoff_base_ms,
        is_retriable,
        operation,
    )
    .await
}
