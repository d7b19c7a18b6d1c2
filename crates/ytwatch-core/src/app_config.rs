use crate::ConfigError;

#[derive(Clone)]
pub struct AppConfig {
    pub youtube_api_key: Option<String>,
    pub perspective_api_key: Option<String>,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub score_batch_size: usize,
    pub score_batch_delay_secs: u64,
    pub score_concurrency: usize,
    pub youtube_base_url: String,
    pub perspective_base_url: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field(
                "youtube_api_key",
                &self.youtube_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "perspective_api_key",
                &self.perspective_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("score_batch_size", &self.score_batch_size)
            .field("score_batch_delay_secs", &self.score_batch_delay_secs)
            .field("score_concurrency", &self.score_concurrency)
            .field("youtube_base_url", &self.youtube_base_url)
            .field("perspective_base_url", &self.perspective_base_url)
            .finish()
    }
}

impl AppConfig {
    /// The Data API key, required by the harvesting jobs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when `YOUTUBE_API_KEY` is unset or blank.
    pub fn require_youtube_api_key(&self) -> Result<&str, ConfigError> {
        self.youtube_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("YOUTUBE_API_KEY".to_string()))
    }

    /// The classification API key, required by the scoring job.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when `PERSPECTIVE_API_KEY` is unset or blank.
    pub fn require_perspective_api_key(&self) -> Result<&str, ConfigError> {
        self.perspective_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("PERSPECTIVE_API_KEY".to_string()))
    }
}
