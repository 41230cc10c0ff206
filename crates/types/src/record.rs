//! Per-manifest work records shared across pipeline stages

use crate::Revision;
use dashmap::DashMap;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::OnceLock;

/// A downloaded artifact on local disk.
#[derive(Debug, Clone)]
pub struct DownloadedArtifact {
    pub path: PathBuf,
    pub bytes: u64,
}

/// The unit of work threaded through every pipeline stage.
///
/// One record exists per manifest and is shared by `Arc` across all stages.
/// Stage outputs land in write-once cells: a second write to the same cell is
/// rejected (first write wins) and reported to the caller, so accidental
/// double-spawns surface in tests instead of silently clobbering results.
///
/// `updated` is the one incrementally written field: upload tasks run one per
/// (package, cluster) pair and each writes a distinct key, so concurrent
/// writers never collide.
#[derive(Debug)]
pub struct PackageRecord {
    project: String,
    artifact: String,
    revision: Revision,
    validity: OnceLock<bool>,
    need_update: OnceLock<HashMap<String, bool>>,
    local_file: OnceLock<DownloadedArtifact>,
    updated: DashMap<String, bool>,
}

impl PackageRecord {
    #[must_use]
    pub fn new(project: impl Into<String>, artifact: impl Into<String>, revision: Revision) -> Self {
        Self {
            project: project.into(),
            artifact: artifact.into(),
            revision,
            validity: OnceLock::new(),
            need_update: OnceLock::new(),
            local_file: OnceLock::new(),
            updated: DashMap::new(),
        }
    }

    #[must_use]
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Artifact source URL as declared in the manifest.
    #[must_use]
    pub fn artifact(&self) -> &str {
        &self.artifact
    }

    #[must_use]
    pub fn revision(&self) -> &Revision {
        &self.revision
    }

    /// Record the validation verdict. Returns `false` if a verdict was
    /// already recorded; the first write wins.
    pub fn set_validity(&self, valid: bool) -> bool {
        self.validity.set(valid).is_ok()
    }

    /// Validation verdict. A record that never went through validation reads
    /// as invalid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validity.get().copied().unwrap_or(false)
    }

    /// Whether the validation stage has run for this record.
    #[must_use]
    pub fn validity_recorded(&self) -> bool {
        self.validity.get().is_some()
    }

    /// Record the per-cluster staleness map. Returns `false` if the map was
    /// already recorded.
    pub fn set_need_update(&self, map: HashMap<String, bool>) -> bool {
        self.need_update.set(map).is_ok()
    }

    /// Whether `cluster` was assessed as needing this revision. Unassessed
    /// records (or unknown clusters) read as not needing an update.
    #[must_use]
    pub fn needs_update_in(&self, cluster: &str) -> bool {
        self.need_update
            .get()
            .and_then(|map| map.get(cluster).copied())
            .unwrap_or(false)
    }

    /// Whether any of `clusters` is behind. Short-circuits on the first
    /// stale cluster.
    #[must_use]
    pub fn needs_any_update(&self, clusters: &[String]) -> bool {
        clusters.iter().any(|c| self.needs_update_in(c))
    }

    /// Record the downloaded artifact. Returns `false` if one was already
    /// recorded for this package.
    pub fn record_download(&self, artifact: DownloadedArtifact) -> bool {
        self.local_file.set(artifact).is_ok()
    }

    #[must_use]
    pub fn local_file(&self) -> Option<&DownloadedArtifact> {
        self.local_file.get()
    }

    /// Record the outcome of one cluster's upload attempt.
    pub fn record_update(&self, cluster: &str, success: bool) {
        self.updated.insert(cluster.to_string(), success);
    }

    /// Upload outcome for `cluster`; `None` means no upload was attempted.
    #[must_use]
    pub fn update_outcome(&self, cluster: &str) -> Option<bool> {
        self.updated.get(cluster).map(|entry| *entry)
    }
}
