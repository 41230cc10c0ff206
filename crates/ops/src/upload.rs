//! Store upload stage
//!
//! One task per (package, cluster) pair that needs the declared revision.
//! Outcomes are recorded per cluster on the shared record; a failed upload
//! to one cluster never blocks the others.

use crate::context::SyncContext;
use crate::pool::TaskPool;
use artsync_events::{Event, EventEmitter};
use artsync_types::PackageRecord;
use std::sync::Arc;
use tracing::{info, warn};

/// Spawn one upload task per stale (package, cluster) pair.
pub(crate) fn spawn_uploads(
    ctx: &Arc<SyncContext>,
    records: &[Arc<PackageRecord>],
    pool: &mut TaskPool<Arc<PackageRecord>>,
) {
    for record in records {
        for cluster in ctx.clusters() {
            if !record.needs_update_in(cluster) {
                continue;
            }
            let ctx = Arc::clone(ctx);
            let record = Arc::clone(record);
            let cluster = cluster.clone();
            pool.register(async move {
                upload_one(&ctx, &record, &cluster).await;
                record
            });
        }
    }
}

async fn upload_one(ctx: &SyncContext, record: &PackageRecord, cluster: &str) {
    // A package whose download failed still has stale clusters; they are
    // recorded as not updated without invoking the tool.
    let Some(file) = record.local_file() else {
        warn!(
            "{}: no local artifact for {cluster}; skipping upload",
            record.project()
        );
        ctx.emit_event(Event::UploadFailed {
            project: record.project().to_string(),
            cluster: cluster.to_string(),
            reason: "artifact was not downloaded".to_string(),
        });
        record.record_update(cluster, false);
        return;
    };

    ctx.emit_event(Event::UploadStarted {
        project: record.project().to_string(),
        cluster: cluster.to_string(),
    });
    info!(
        "{}: uploading {} as {} in {cluster}",
        record.project(),
        file.path.display(),
        ctx.principal()
    );

    match ctx
        .store()
        .add_version(
            cluster,
            ctx.principal(),
            record.project(),
            record.revision(),
            &file.path,
        )
        .await
    {
        Ok(output) => {
            info!("{}: {}", record.project(), output.trim());
            record.record_update(cluster, true);
            ctx.emit_event(Event::UploadCompleted {
                project: record.project().to_string(),
                cluster: cluster.to_string(),
            });
        }
        Err(e) => {
            warn!("{}: upload to {cluster} failed: {e}", record.project());
            record.record_update(cluster, false);
            ctx.emit_event(Event::UploadFailed {
                project: record.project().to_string(),
                cluster: cluster.to_string(),
                reason: e.to_string(),
            });
        }
    }
}
