//! Shared context for one synchronization run

use artsync_errors::{Error, OpsError};
use artsync_events::{EventEmitter, EventSender};
use artsync_net::NetClient;
use artsync_store::StoreClient;
use std::path::{Path, PathBuf};

/// Everything the pipeline stages need, assembled once per run.
///
/// The context is shared by `Arc` across all spawned tasks and is read-only
/// for the duration of the run; mutable state lives on the package records.
pub struct SyncContext {
    clusters: Vec<String>,
    net: NetClient,
    store: StoreClient,
    principal: String,
    manifest_root: PathBuf,
    download_root: PathBuf,
    event_sender: EventSender,
}

impl SyncContext {
    /// The fixed cluster set for this run.
    #[must_use]
    pub fn clusters(&self) -> &[String] {
        &self.clusters
    }

    #[must_use]
    pub fn net(&self) -> &NetClient {
        &self.net
    }

    #[must_use]
    pub fn store(&self) -> &StoreClient {
        &self.store
    }

    /// Uploading principal passed to the store tool.
    #[must_use]
    pub fn principal(&self) -> &str {
        &self.principal
    }

    #[must_use]
    pub fn manifest_root(&self) -> &Path {
        &self.manifest_root
    }

    /// Staging directory downloads land in; removed at the end of the run.
    #[must_use]
    pub fn download_root(&self) -> &Path {
        &self.download_root
    }

    #[must_use]
    pub fn events(&self) -> &EventSender {
        &self.event_sender
    }
}

impl EventEmitter for SyncContext {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(&self.event_sender)
    }
}

/// Builder for [`SyncContext`]
#[derive(Default)]
pub struct SyncContextBuilder {
    clusters: Vec<String>,
    net: Option<NetClient>,
    store: Option<StoreClient>,
    principal: Option<String>,
    manifest_root: Option<PathBuf>,
    download_root: Option<PathBuf>,
    event_sender: Option<EventSender>,
}

impl SyncContextBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_clusters(mut self, clusters: Vec<String>) -> Self {
        self.clusters = clusters;
        self
    }

    #[must_use]
    pub fn with_net(mut self, net: NetClient) -> Self {
        self.net = Some(net);
        self
    }

    #[must_use]
    pub fn with_store(mut self, store: StoreClient) -> Self {
        self.store = Some(store);
        self
    }

    #[must_use]
    pub fn with_principal(mut self, principal: impl Into<String>) -> Self {
        self.principal = Some(principal.into());
        self
    }

    #[must_use]
    pub fn with_manifest_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.manifest_root = Some(root.into());
        self
    }

    #[must_use]
    pub fn with_download_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.download_root = Some(root.into());
        self
    }

    #[must_use]
    pub fn with_event_sender(mut self, sender: EventSender) -> Self {
        self.event_sender = Some(sender);
        self
    }

    /// Assemble the context
    ///
    /// # Errors
    ///
    /// Returns an error if any required component is missing or the cluster
    /// list is empty.
    pub fn build(self) -> Result<SyncContext, Error> {
        if self.clusters.is_empty() {
            return Err(missing("clusters"));
        }

        Ok(SyncContext {
            clusters: self.clusters,
            net: self.net.ok_or_else(|| missing("net client"))?,
            store: self.store.ok_or_else(|| missing("store client"))?,
            principal: self.principal.ok_or_else(|| missing("principal"))?,
            manifest_root: self.manifest_root.ok_or_else(|| missing("manifest root"))?,
            download_root: self.download_root.ok_or_else(|| missing("download root"))?,
            event_sender: self.event_sender.ok_or_else(|| missing("event sender"))?,
        })
    }
}

fn missing(name: &str) -> Error {
    OpsError::MissingComponent {
        name: name.to_string(),
    }
    .into()
}
