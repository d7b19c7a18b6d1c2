use thiserror::Error;

/// Errors returned by the video platform data API client.
#[derive(Debug, Error)]
pub enum YoutubeError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status, decoded from the API error envelope when present.
    #[error("YouTube API error {status} ({reason}): {message}")]
    Api {
        status: u16,
        reason: String,
        message: String,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Neither the username lookup nor the channel search matched the handle.
    #[error("no channel found for handle {handle:?}")]
    ChannelNotFound { handle: String },

    #[error("pagination limit reached for {resource}: exceeded {max_pages} pages")]
    PaginationLimit { resource: String, max_pages: usize },

    #[error("invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl YoutubeError {
    /// `true` when the API reported its daily quota as spent.
    #[must_use]
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, YoutubeError::Api { reason, .. } if reason == "quotaExceeded")
    }
}
