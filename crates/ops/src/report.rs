//! Final run reporting

use artsync_types::PackageRecord;
use serde::Serialize;
use std::sync::Arc;

/// Final outcome of one synchronization run
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub packages: Vec<PackageReport>,
    /// True when every cluster was already current and the pipeline
    /// short-circuited before downloading anything.
    pub up_to_date: bool,
}

/// Per-package outcome
#[derive(Debug, Clone, Serialize)]
pub struct PackageReport {
    pub project: String,
    pub revision: String,
    pub valid: bool,
    pub clusters: Vec<ClusterOutcome>,
}

/// Per-(package, cluster) outcome
#[derive(Debug, Clone, Serialize)]
pub struct ClusterOutcome {
    pub cluster: String,
    pub needed_update: bool,
    /// `None` when no upload was attempted for this cluster.
    pub updated: Option<bool>,
}

impl SyncReport {
    #[must_use]
    pub fn from_records(
        records: &[Arc<PackageRecord>],
        clusters: &[String],
        up_to_date: bool,
    ) -> Self {
        let packages = records
            .iter()
            .map(|record| PackageReport {
                project: record.project().to_string(),
                revision: record.revision().to_string(),
                valid: record.is_valid(),
                clusters: clusters
                    .iter()
                    .map(|cluster| ClusterOutcome {
                        cluster: cluster.clone(),
                        needed_update: record.needs_update_in(cluster),
                        updated: record.update_outcome(cluster),
                    })
                    .collect(),
            })
            .collect();

        Self {
            packages,
            up_to_date,
        }
    }

    /// Whether no attempted upload failed
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.packages
            .iter()
            .flat_map(|package| &package.clusters)
            .all(|outcome| outcome.updated != Some(false))
    }
}
