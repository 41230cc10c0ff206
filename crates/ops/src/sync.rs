//! Pipeline driver

use crate::context::SyncContext;
use crate::pool::TaskPool;
use crate::report::SyncReport;
use crate::{assess, download, upload, validate};
use artsync_errors::{Error, OpsError};
use artsync_events::{Event, EventEmitter};
use artsync_manifest::Manifest;
use artsync_types::PackageRecord;
use std::sync::Arc;
use tokio::fs;
use tracing::{info, warn};

/// Run the full synchronization pipeline for every manifest matching
/// `pattern`.
///
/// The four stages run strictly in sequence; each stage's tasks all complete
/// before the next stage spawns. Between stages the driver applies the gate
/// logic: abort when no manifests matched or no package passed validation,
/// exit cleanly when every cluster is already current, and otherwise carry
/// the remaining packages through download and upload.
///
/// # Errors
///
/// Returns an error if no manifests match `pattern`, or if every matched
/// package fails validation. Per-package and per-cluster failures inside the
/// stages are recorded in the report instead.
pub async fn sync_artifacts(ctx: &Arc<SyncContext>, pattern: &str) -> Result<SyncReport, Error> {
    let records = load_records(ctx, pattern).await?;
    if records.is_empty() {
        return Err(OpsError::NoPackagesFound {
            pattern: pattern.to_string(),
        }
        .into());
    }

    let projects: Vec<String> = records.iter().map(|r| r.project().to_string()).collect();
    info!("starting projects: {}", projects.join(", "));
    ctx.emit_event(Event::ProjectsDiscovered { projects });

    let mut pool = TaskPool::new();

    validate::spawn_probes(ctx, &records, &mut pool);
    ctx.emit_event(Event::OperationStarted {
        operation: "checking validity of packages".to_string(),
    });
    pool.drain_all("checking validity of packages").await;

    let valid: Vec<_> = records.iter().filter(|r| r.is_valid()).cloned().collect();
    if valid.is_empty() {
        return Err(OpsError::NoValidPackages.into());
    }

    assess::spawn_assessments(ctx, &valid, &mut pool);
    ctx.emit_event(Event::OperationStarted {
        operation: "checking which clusters need updates".to_string(),
    });
    pool.drain_all("checking which clusters need updates").await;

    let stale: Vec<_> = valid
        .iter()
        .filter(|r| r.needs_any_update(ctx.clusters()))
        .cloned()
        .collect();
    if stale.is_empty() {
        info!("all packages are up to date");
        ctx.emit_event(Event::OperationCompleted {
            operation: "synchronization".to_string(),
            success: true,
        });
        return Ok(SyncReport::from_records(&records, ctx.clusters(), true));
    }

    download::spawn_downloads(ctx, &stale, &mut pool);
    ctx.emit_event(Event::OperationStarted {
        operation: "downloading packages".to_string(),
    });
    pool.drain_all("downloading packages").await;

    // Uploads follow downloads unconditionally: at least one cluster was
    // stale, so there is work to attempt even where a download failed.
    upload::spawn_uploads(ctx, &stale, &mut pool);
    ctx.emit_event(Event::OperationStarted {
        operation: "updating packages".to_string(),
    });
    pool.drain_all("updating packages").await;

    let report = SyncReport::from_records(&records, ctx.clusters(), false);
    log_outcomes(&report);
    ctx.emit_event(Event::OperationCompleted {
        operation: "synchronization".to_string(),
        success: report.all_succeeded(),
    });

    // The staging tree is not kept between runs.
    if let Err(e) = fs::remove_dir_all(ctx.download_root()).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(
                "failed to remove {}: {e}",
                ctx.download_root().display()
            );
        }
    }

    Ok(report)
}

/// Discover and decode manifests concurrently, one task per file.
///
/// A manifest that cannot be read or parsed costs only itself: it is logged
/// and excluded from the run.
async fn load_records(
    ctx: &Arc<SyncContext>,
    pattern: &str,
) -> Result<Vec<Arc<PackageRecord>>, Error> {
    let paths = artsync_manifest::discover(ctx.manifest_root(), pattern).await?;

    let mut pool = TaskPool::new();
    for path in paths {
        pool.register(async move {
            let project = artsync_manifest::project_name(&path)?;
            let manifest = Manifest::load(&path).await?;
            Ok::<PackageRecord, Error>(PackageRecord::new(
                project,
                manifest.artifact,
                manifest.revision,
            ))
        });
    }

    let mut records = Vec::new();
    for result in pool.drain_all("loading manifests").await {
        match result {
            Ok(record) => records.push(Arc::new(record)),
            Err(e) => warn!("skipping manifest: {e}"),
        }
    }

    // Completion order is nondeterministic; reports should not be.
    records.sort_by(|a, b| a.project().cmp(b.project()));
    Ok(records)
}

fn log_outcomes(report: &SyncReport) {
    for package in &report.packages {
        for outcome in &package.clusters {
            if !outcome.needed_update {
                continue;
            }
            if outcome.updated == Some(true) {
                info!(
                    "{}: {} was updated successfully",
                    package.project, outcome.cluster
                );
            } else {
                warn!(
                    "{}: {} was NOT updated successfully",
                    package.project, outcome.cluster
                );
            }
        }
    }
}
