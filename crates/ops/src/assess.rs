//! Update-need assessment stage
//!
//! One task per valid record. The store is queried once per cluster,
//! serially within the task: the task is the record's only writer in this
//! stage, and the per-cluster loop must stay serial to keep it that way.

use crate::context::SyncContext;
use crate::pool::TaskPool;
use artsync_events::{Event, EventEmitter};
use artsync_store::listing;
use artsync_types::PackageRecord;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Spawn one assessment task per record.
pub(crate) fn spawn_assessments(
    ctx: &Arc<SyncContext>,
    records: &[Arc<PackageRecord>],
    pool: &mut TaskPool<Arc<PackageRecord>>,
) {
    for record in records {
        let ctx = Arc::clone(ctx);
        let record = Arc::clone(record);
        pool.register(async move {
            let mut need = HashMap::with_capacity(ctx.clusters().len());
            for cluster in ctx.clusters() {
                let needs = cluster_needs_update(&ctx, &record, cluster).await;
                let project = record.project().to_string();
                ctx.emit_event(if needs {
                    Event::ClusterStale {
                        project,
                        cluster: cluster.clone(),
                    }
                } else {
                    Event::ClusterCurrent {
                        project,
                        cluster: cluster.clone(),
                    }
                });
                need.insert(cluster.clone(), needs);
            }

            if !record.set_need_update(need) {
                warn!("{}: staleness map already recorded", record.project());
            }
            record
        });
    }
}

/// Decide whether `cluster` is behind the declared revision.
///
/// Fail-open: a failed query or a listing with no revision tokens counts as
/// stale, so a broken listing path costs a redundant upload rather than a
/// skipped one. The last token in the listing is the most recent version.
async fn cluster_needs_update(
    ctx: &SyncContext,
    record: &PackageRecord,
    cluster: &str,
) -> bool {
    let text = match ctx.store().package_versions(cluster, record.project()).await {
        Ok(text) => text,
        Err(e) => {
            warn!(
                "{}: version listing failed in {cluster}: {e}",
                record.project()
            );
            return true;
        }
    };

    match listing::latest_revision(&text) {
        Some(latest) => {
            debug!("{} latest revision in {cluster}: {latest}", record.project());
            &latest != record.revision()
        }
        None => {
            warn!("no revisions found for {} in {cluster}", record.project());
            true
        }
    }
}
