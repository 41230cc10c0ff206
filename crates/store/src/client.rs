//! External store tool invocation

use artsync_errors::{Error, StoreError};
use artsync_types::Revision;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Client for the store's command-line tool
///
/// Every call spawns one process with captured stdout/stderr. There are no
/// retries; a non-zero exit is returned to the caller as an error together
/// with the tool's stderr.
#[derive(Debug, Clone)]
pub struct StoreClient {
    tool: String,
    namespace: String,
}

impl StoreClient {
    #[must_use]
    pub fn new(tool: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            namespace: namespace.into(),
        }
    }

    #[must_use]
    pub fn tool(&self) -> &str {
        &self.tool
    }

    /// List the recorded versions of `project` in `cluster`
    ///
    /// Returns the tool's raw stdout; use [`crate::listing`] to extract
    /// revision tokens from it.
    ///
    /// # Errors
    ///
    /// Returns an error if the tool cannot be spawned or exits non-zero.
    pub async fn package_versions(&self, cluster: &str, project: &str) -> Result<String, Error> {
        self.run(&[
            "package_versions",
            &format!("--cluster={cluster}"),
            &self.namespace,
            project,
        ])
        .await
    }

    /// Add a new version of `project` in `cluster` from a local file
    ///
    /// `principal` is the uploading user; `revision` is recorded as the
    /// version's metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if the tool cannot be spawned or exits non-zero.
    pub async fn add_version(
        &self,
        cluster: &str,
        principal: &str,
        project: &str,
        revision: &Revision,
        file: &Path,
    ) -> Result<String, Error> {
        self.run(&[
            "package_add_version",
            &format!("--cluster={cluster}"),
            &format!("--metadata={revision}"),
            principal,
            project,
            &file.display().to_string(),
        ])
        .await
    }

    async fn run(&self, args: &[&str]) -> Result<String, Error> {
        let command_line = format!("{} {}", self.tool, args.join(" "));
        debug!("running {command_line}");

        let output = Command::new(&self.tool)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| StoreError::SpawnFailed {
                tool: self.tool.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(StoreError::CommandFailed {
                command: command_line,
                exit_code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            }
            .into());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
