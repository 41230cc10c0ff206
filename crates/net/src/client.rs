//! HTTP client with connection pooling

use artsync_errors::{Error, NetworkError};
use reqwest::{Client, Response};
use std::time::Duration;

/// Network client configuration
#[derive(Debug, Clone)]
pub struct NetConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub pool_idle_timeout: Duration,
    pub pool_max_idle_per_host: usize,
    pub user_agent: String,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(300), // 5 minutes for large downloads
            connect_timeout: Duration::from_secs(30),
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 10,
            user_agent: format!("artsync/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// HTTP client wrapper
#[derive(Clone)]
pub struct NetClient {
    client: Client,
}

impl NetClient {
    /// Create a new network client
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reqwest client fails to
    /// initialize.
    pub fn new(config: &NetConfig) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| NetworkError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client })
    }

    /// Create with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created with default
    /// settings.
    pub fn with_defaults() -> Result<Self, Error> {
        Self::new(&NetConfig::default())
    }

    /// Execute a single GET request (no retries)
    ///
    /// # Errors
    ///
    /// Returns an error on timeout, connection failure, or any other
    /// transport-level failure.
    pub async fn get(&self, url: &str) -> Result<Response, Error> {
        self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                NetworkError::Timeout {
                    url: e
                        .url()
                        .map(std::string::ToString::to_string)
                        .unwrap_or_default(),
                }
                .into()
            } else if e.is_connect() {
                NetworkError::ConnectionFailed(e.to_string()).into()
            } else if e.is_builder() {
                NetworkError::InvalidUrl(e.to_string()).into()
            } else {
                NetworkError::DownloadFailed(e.to_string()).into()
            }
        })
    }

    /// Get the underlying reqwest client for advanced usage
    #[must_use]
    pub fn inner(&self) -> &Client {
        &self.client
    }
}
