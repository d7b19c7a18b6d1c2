//! HTTP client for the Perspective comment analyzer.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::PerspectiveError;
use crate::retry::retry_with_backoff;
use crate::types::{AnalyzeRequest, AnalyzeResponse, AttributeScores, ErrorEnvelope};

/// Client for `comments:analyze`.
pub struct PerspectiveClient {
    client: Client,
    api_key: String,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl PerspectiveClient {
    /// Creates a client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`PerspectiveError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`PerspectiveError::InvalidBaseUrl`] if `base_url` does not
    /// parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, PerspectiveError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| PerspectiveError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            max_retries: 0,
            backoff_base_ms: 0,
        })
    }

    /// Enables retry on transient errors.
    #[must_use]
    pub fn with_retry(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Scores one comment on all seven attributes.
    ///
    /// # Errors
    ///
    /// Returns [`PerspectiveError`] on network, status, or decoding failure.
    /// Attributes the API leaves out are not an error; they come back as
    /// `None` in the returned scores.
    pub async fn analyze(&self, text: &str) -> Result<AttributeScores, PerspectiveError> {
        let url = self.analyze_url();
        let request = AnalyzeRequest::for_text(text);
        let request = &request;

        let response: AnalyzeResponse =
            retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
                let url = url.clone();
                async move {
                    let response = self.client.post(url).json(request).send().await?;
                    let status = response.status();
                    let body = response.text().await?;
                    if !status.is_success() {
                        return Err(api_error(status.as_u16(), &body));
                    }
                    serde_json::from_str(&body).map_err(|e| PerspectiveError::Deserialize {
                        context: "comments:analyze".to_owned(),
                        source: e,
                    })
                }
            })
            .await?;

        Ok(response.into_scores())
    }

    /// `{base}/comments:analyze?key=...`
    fn analyze_url(&self) -> Url {
        // The leading "./" stops `Url::join` reading "comments:" as a scheme.
        let mut url = self
            .base_url
            .join("./comments:analyze")
            .unwrap_or_else(|_| self.base_url.clone());
        url.query_pairs_mut().append_pair("key", &self.api_key);
        url
    }
}

/// Maps a non-success response onto [`PerspectiveError::Api`].
pub(crate) fn api_error(status: u16, body: &str) -> PerspectiveError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => PerspectiveError::Api {
            status,
            reason: envelope.error.reason().unwrap_or("unknown").to_owned(),
            message: envelope.error.message,
        },
        Err(_) => PerspectiveError::Api {
            status,
            reason: "unknown".to_owned(),
            message: body.chars().take(200).collect(),
        },
    }
}
