//! Pipeline orchestration error types

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum OpsError {
    #[error("no packages found for project pattern `{pattern}`")]
    NoPackagesFound { pattern: String },

    #[error("no packages passed validation")]
    NoValidPackages,

    #[error("sync context is missing required component: {name}")]
    MissingComponent { name: String },
}
