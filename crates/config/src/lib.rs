#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for artsync
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/artsync/config.toml)
//! - Environment variables (`ARTSYNC_*`)
//! - CLI flags (applied by the binary, highest precedence)

use artsync_errors::{ConfigError, Error};
use artsync_types::ColorChoice;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub sync: SyncConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub network: NetworkConfig,
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_color_choice")]
    pub color: ColorChoice,
}

/// Synchronization configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Deployment regions, each with its own artifact store. Fixed for the
    /// duration of a run; never discovered dynamically.
    #[serde(default)]
    pub clusters: Vec<String>,
    /// Directory containing the JSON manifests
    #[serde(default = "default_manifest_root")]
    pub manifest_root: PathBuf,
    /// Where downloaded artifacts are staged; defaults to `downloads_tmp`
    /// under the working directory
    pub download_dir: Option<PathBuf>,
}

/// Versioned-store tool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Name (or path) of the store command-line tool
    #[serde(default = "default_store_tool")]
    pub tool: String,
    /// Namespace the store lists versions under
    #[serde(default = "default_store_namespace")]
    pub namespace: String,
    /// Uploading principal; defaults to the invoking user
    pub principal: Option<String>,
}

/// Network configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_timeout")]
    pub timeout: u64, // seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64, // seconds
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            color: ColorChoice::Auto,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            clusters: Vec::new(),
            manifest_root: default_manifest_root(),
            download_dir: None,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            tool: default_store_tool(),
            namespace: default_store_namespace(),
            principal: None,
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            connect_timeout: default_connect_timeout(),
        }
    }
}

fn default_color_choice() -> ColorChoice {
    ColorChoice::Auto
}

fn default_manifest_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_store_tool() -> String {
    "aurora".to_string()
}

fn default_store_namespace() -> String {
    "jenkins".to_string()
}

fn default_timeout() -> u64 {
    300
}

fn default_connect_timeout() -> u64 {
    30
}

impl Config {
    /// Default config file location (`~/.config/artsync/config.toml`)
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".config/artsync/config.toml"))
    }

    /// Load configuration from a specific file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub async fn load(path: &Path) -> Result<Self, Error> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::ReadFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        let config: Self =
            toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Ok(config)
    }

    /// Load configuration from `path` if given, else from the default
    /// location if it exists, else fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing config file cannot be read or parsed.
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        if let Some(path) = path {
            return Self::load(path).await;
        }

        if let Some(default) = Self::default_path() {
            if fs::try_exists(&default).await.unwrap_or(false) {
                return Self::load(&default).await;
            }
        }

        Ok(Self::default())
    }

    /// Merge `ARTSYNC_*` environment variables into this configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but cannot be parsed.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        if let Ok(clusters) = std::env::var("ARTSYNC_CLUSTERS") {
            self.sync.clusters = clusters
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }
        if let Ok(root) = std::env::var("ARTSYNC_MANIFEST_ROOT") {
            self.sync.manifest_root = PathBuf::from(root);
        }
        if let Ok(dir) = std::env::var("ARTSYNC_DOWNLOAD_DIR") {
            self.sync.download_dir = Some(PathBuf::from(dir));
        }
        if let Ok(tool) = std::env::var("ARTSYNC_STORE_TOOL") {
            self.store.tool = tool;
        }
        if let Ok(namespace) = std::env::var("ARTSYNC_STORE_NAMESPACE") {
            self.store.namespace = namespace;
        }
        if let Ok(principal) = std::env::var("ARTSYNC_PRINCIPAL") {
            self.store.principal = Some(principal);
        }
        if let Ok(timeout) = std::env::var("ARTSYNC_NET_TIMEOUT") {
            self.network.timeout =
                timeout
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue {
                        key: "ARTSYNC_NET_TIMEOUT".to_string(),
                        message: format!("`{timeout}` is not a number of seconds"),
                    })?;
        }
        Ok(())
    }

    /// Check invariants a run depends on
    ///
    /// # Errors
    ///
    /// Returns an error if the cluster list is empty or a timeout is zero.
    pub fn validate(&self) -> Result<(), Error> {
        if self.sync.clusters.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "sync.clusters".to_string(),
                message: "at least one cluster must be configured".to_string(),
            }
            .into());
        }
        if self.network.timeout == 0 || self.network.connect_timeout == 0 {
            return Err(ConfigError::InvalidValue {
                key: "network.timeout".to_string(),
                message: "timeouts must be non-zero".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Download staging directory, resolving the default relative to `cwd`
    #[must_use]
    pub fn download_root(&self, cwd: &Path) -> PathBuf {
        self.sync
            .download_dir
            .clone()
            .unwrap_or_else(|| cwd.join("downloads_tmp"))
    }
}
