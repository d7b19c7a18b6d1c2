//! Shared configuration, record types, timestamp rules and retry for `ytwatch`.

pub mod app_config;
pub mod config;
pub mod records;
pub mod retry;
pub mod timestamps;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use records::{CommentRecord, HasComments, VideoRecord, NOT_AVAILABLE};
pub use timestamps::{is_after_cutoff, parse_utc_timestamp, TimestampError};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
