//! Network-related error types

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum NetworkError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP error {status}: {message}")]
    HttpError { status: u16, message: String },

    #[error("download failed: {0}")]
    DownloadFailed(String),

    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("connection timeout to {url}")]
    Timeout { url: String },
}
