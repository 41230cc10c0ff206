//! Configuration error types

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {message}")]
    ReadFailed { path: String, message: String },

    #[error("failed to parse config: {0}")]
    ParseFailed(String),

    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}
