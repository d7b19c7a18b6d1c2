use crate::app_config::AppConfig;
use crate::ConfigError;

pub const DEFAULT_YOUTUBE_BASE_URL: &str = "https://www.googleapis.com/youtube/v3/";
pub const DEFAULT_PERSPECTIVE_BASE_URL: &str = "https://commentanalyzer.googleapis.com/v1alpha1/";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// API keys are optional here; each job checks for the key it needs before
/// doing any work.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_positive_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        match raw.parse::<usize>() {
            Ok(0) => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be greater than zero".to_string(),
            }),
            Ok(n) => Ok(n),
            Err(e) => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            }),
        }
    };

    let youtube_api_key = optional("YOUTUBE_API_KEY");
    let perspective_api_key = optional("PERSPECTIVE_API_KEY");
    let log_level = or_default("YTWATCH_LOG_LEVEL", "info");

    let request_timeout_secs = parse_u64("YTWATCH_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("YTWATCH_USER_AGENT", "ytwatch/0.1 (comment-research)");
    let max_retries = parse_u32("YTWATCH_MAX_RETRIES", "3")?;
    let retry_backoff_base_ms = parse_u64("YTWATCH_RETRY_BACKOFF_BASE_MS", "1000")?;

    let score_batch_size = parse_positive_usize("YTWATCH_SCORE_BATCH_SIZE", "59")?;
    let score_batch_delay_secs = parse_u64("YTWATCH_SCORE_BATCH_DELAY_SECS", "61")?;
    let score_concurrency = parse_positive_usize("YTWATCH_SCORE_CONCURRENCY", "1")?;

    let youtube_base_url = or_default("YTWATCH_YOUTUBE_BASE_URL", DEFAULT_YOUTUBE_BASE_URL);
    let perspective_base_url =
        or_default("YTWATCH_PERSPECTIVE_BASE_URL", DEFAULT_PERSPECTIVE_BASE_URL);

    Ok(AppConfig {
        youtube_api_key,
        perspective_api_key,
        log_level,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_ms,
        score_batch_size,
        score_batch_delay_secs,
        score_concurrency,
        youtube_base_url,
        perspective_base_url,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
