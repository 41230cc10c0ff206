//! Versioned-store tool error types

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("failed to spawn {tool}: {message}")]
    SpawnFailed { tool: String, message: String },

    #[error("`{command}` failed: {stderr}")]
    CommandFailed {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },
}
