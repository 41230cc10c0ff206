//! Manifest discovery and parsing error types

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ManifestError {
    #[error("failed to read manifest {path}: {message}")]
    ReadFailed { path: String, message: String },

    #[error("failed to parse manifest {path}: {message}")]
    ParseFailed { path: String, message: String },

    #[error("manifest {path} has no usable file name")]
    InvalidFileName { path: String },

    #[error("manifest root {path} is not a directory")]
    RootNotFound { path: String },
}
