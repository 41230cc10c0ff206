//! Package validation stage
//!
//! One probe task per record: fetch the artifact URL and check that the
//! server reports an archive content type. A failed probe makes the package
//! invalid, never the run.

use crate::context::SyncContext;
use crate::pool::TaskPool;
use artsync_events::{Event, EventEmitter};
use artsync_types::PackageRecord;
use std::sync::Arc;
use tracing::{info, warn};

// accept .zip, .tgz and .gz artifacts
const ACCEPTABLE_CONTENT_TYPES: &[&str] = &[
    "application/x-compressed",
    "application/x-gzip",
    "application/zip",
];

/// Spawn one validation probe per record.
pub(crate) fn spawn_probes(
    ctx: &Arc<SyncContext>,
    records: &[Arc<PackageRecord>],
    pool: &mut TaskPool<Arc<PackageRecord>>,
) {
    for record in records {
        let ctx = Arc::clone(ctx);
        let record = Arc::clone(record);
        pool.register(async move {
            match probe(&ctx, &record).await {
                Ok(()) => {
                    if !record.set_validity(true) {
                        warn!("{}: validity already recorded", record.project());
                    }
                    info!("{} is valid", record.project());
                    ctx.emit_event(Event::PackageValidated {
                        project: record.project().to_string(),
                    });
                }
                Err(reason) => {
                    if !record.set_validity(false) {
                        warn!("{}: validity already recorded", record.project());
                    }
                    warn!("{} is not valid: {reason}", record.project());
                    ctx.emit_event(Event::PackageInvalid {
                        project: record.project().to_string(),
                        reason,
                    });
                }
            }
            record
        });
    }
}

/// Classify one artifact URL; `Err` carries the reason it was rejected.
async fn probe(ctx: &SyncContext, record: &PackageRecord) -> Result<(), String> {
    let content_type =
        artsync_net::probe_content_type(ctx.net(), record.artifact(), ctx.events())
            .await
            .map_err(|e| e.to_string())?;

    match content_type {
        Some(ct) if ACCEPTABLE_CONTENT_TYPES.contains(&ct.as_str()) => Ok(()),
        Some(ct) => Err(format!("disallowed content type `{ct}`")),
        None => Err("no content type reported".to_string()),
    }
}
