//! Which data API errors are worth retrying.
//!
//! Network failures, 429 and 5xx are retried through
//! [`ytwatch_core::retry::retry_with_backoff`]. Quota exhaustion and other
//! 4xx responses are returned immediately.

use std::future::Future;

use crate::error::YoutubeError;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:** timeouts, connection failures, HTTP 429 and 5xx.
///
/// **Not retriable:** every other API status (including `quotaExceeded`,
/// which arrives as 403), malformed bodies, resolution and pagination
/// failures.
pub(crate) fn is_retriable(err: &YoutubeError) -> bool {
    match err {
        YoutubeError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        YoutubeError::Api { status, .. } => *status == 429 || (500..600).contains(status),
        YoutubeError::Deserialize { .. }
        | YoutubeError::ChannelNotFound { .. }
        | YoutubeError::PaginationLimit { .. }
        | YoutubeError::InvalidBaseUrl { .. } => false,
    }
}

pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    operation: F,
) -> Result<T, YoutubeError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, YoutubeError>>,
{
    ytwatch_core::retry::retry_with_backoff(
        "youtube",
        max_retries,
        backoff_base_ms,
        is_retriable,
        operation,
    )
    .await
}
