//! Artifact download stage
//!
//! One task per package with at least one stale cluster, however many
//! clusters are behind: the downloaded file is shared by all of that
//! package's uploads. A failed download leaves the record's local file
//! unset; the upload stage deals with that.

use crate::context::SyncContext;
use crate::pool::TaskPool;
use artsync_errors::Error;
use artsync_events::{Event, EventEmitter};
use artsync_types::{DownloadedArtifact, PackageRecord};
use std::sync::Arc;
use tokio::fs;
use tracing::{info, warn};

/// Spawn one download task per record.
pub(crate) fn spawn_downloads(
    ctx: &Arc<SyncContext>,
    records: &[Arc<PackageRecord>],
    pool: &mut TaskPool<Arc<PackageRecord>>,
) {
    for record in records {
        let ctx = Arc::clone(ctx);
        let record = Arc::clone(record);
        pool.register(async move {
            ctx.emit_event(Event::DownloadStarted {
                project: record.project().to_string(),
                url: record.artifact().to_string(),
            });

            match fetch(&ctx, &record).await {
                Ok(artifact) => {
                    info!(
                        "{} bytes downloaded for {}",
                        artifact.bytes,
                        record.project()
                    );
                    ctx.emit_event(Event::DownloadCompleted {
                        project: record.project().to_string(),
                        bytes: artifact.bytes,
                    });
                    if !record.record_download(artifact) {
                        warn!("{}: download already recorded", record.project());
                    }
                }
                Err(e) => {
                    warn!("download failed for {}: {e}", record.project());
                    ctx.emit_event(Event::DownloadFailed {
                        project: record.project().to_string(),
                        url: record.artifact().to_string(),
                        reason: e.to_string(),
                    });
                }
            }
            record
        });
    }
}

/// Fetch the artifact into a clean per-project directory.
async fn fetch(ctx: &SyncContext, record: &PackageRecord) -> Result<DownloadedArtifact, Error> {
    let project_dir = ctx.download_root().join(record.project());

    // Leftovers from an earlier run are removed wholesale.
    if fs::try_exists(&project_dir).await.unwrap_or(false) {
        fs::remove_dir_all(&project_dir)
            .await
            .map_err(|e| Error::io_with_path(&e, &project_dir))?;
    }
    fs::create_dir_all(&project_dir)
        .await
        .map_err(|e| Error::io_with_path(&e, &project_dir))?;

    let dest = project_dir.join(artifact_file_name(record.artifact()));
    let bytes =
        artsync_net::download_to_file(ctx.net(), record.artifact(), &dest, ctx.events()).await?;

    Ok(DownloadedArtifact { path: dest, bytes })
}

/// Local file name for an artifact URL: the last path segment, with any
/// query or fragment stripped.
fn artifact_file_name(url: &str) -> String {
    let path = url.split(|c| c == '?' || c == '#').next().unwrap_or(url);
    let name = path.trim_end_matches('/').rsplit('/').next().unwrap_or("");
    if name.is_empty() {
        "artifact".to_string()
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::artifact_file_name;

    #[test]
    fn file_name_from_url() {
        assert_eq!(
            artifact_file_name("https://ci.example.com/builds/webapp.tgz"),
            "webapp.tgz"
        );
        assert_eq!(
            artifact_file_name("https://ci.example.com/builds/webapp.zip?token=abc"),
            "webapp.zip"
        );
        assert_eq!(artifact_file_name("https://ci.example.com/"), "ci.example.com");
        assert_eq!(artifact_file_name(""), "artifact");
    }
}
