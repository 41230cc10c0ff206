//! End-to-end pipeline tests
//!
//! The artifact server is mocked with httpmock; the store tool is a shell
//! script that answers version listings per cluster and records every
//! add-version invocation in a log file.

use artsync_events::Event;
use artsync_net::NetClient;
use artsync_ops::{sync_artifacts, SyncContext, SyncContextBuilder};
use artsync_store::StoreClient;
use httpmock::prelude::*;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::sync::Arc;

const NEW: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
const OLD: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

struct Harness {
    _tmp: tempfile::TempDir,
    manifests: PathBuf,
    downloads: PathBuf,
    log: PathBuf,
    tool: PathBuf,
}

impl Harness {
    fn new() -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let manifests = tmp.path().join("manifests");
        fs::create_dir(&manifests).unwrap();
        Self {
            manifests,
            downloads: tmp.path().join("downloads_tmp"),
            log: tmp.path().join("uploads.log"),
            tool: tmp.path().join("fake-store"),
            _tmp: tmp,
        }
    }

    fn write_tool(&self, body: &str) {
        fs::write(&self.tool, format!("#!/bin/sh\n{body}\n")).unwrap();
        let mut perms = fs::metadata(&self.tool).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&self.tool, perms).unwrap();
    }

    /// Store tool that lists `east`/`west` revisions and logs every upload.
    fn listing_tool(&self, east: &str, west: &str) {
        self.write_tool(&format!(
            r#"case "$1" in
  package_versions)
    case "$2" in
      --cluster=east) echo "{east}" ;;
      --cluster=west) echo "{west}" ;;
    esac
    ;;
  package_add_version)
    echo "$@" >> "{log}"
    echo "version added"
    ;;
esac"#,
            log = self.log.display()
        ));
    }

    fn write_manifest(&self, project: &str, url: &str, revision: &str) {
        fs::write(
            self.manifests.join(format!("{project}.json")),
            format!(r#"{{"artifact": "{url}", "revision": "{revision}"}}"#),
        )
        .unwrap();
    }

    fn context(&self) -> (Arc<SyncContext>, artsync_events::EventReceiver) {
        let (tx, rx) = artsync_events::channel();
        let ctx = SyncContextBuilder::new()
            .with_clusters(vec!["east".to_string(), "west".to_string()])
            .with_net(NetClient::with_defaults().unwrap())
            .with_store(StoreClient::new(self.tool.display().to_string(), "jenkins"))
            .with_principal("test-bot")
            .with_manifest_root(&self.manifests)
            .with_download_root(&self.downloads)
            .with_event_sender(tx)
            .build()
            .unwrap();
        (Arc::new(ctx), rx)
    }

    fn upload_log(&self) -> Vec<String> {
        fs::read_to_string(&self.log)
            .map(|text| text.lines().map(String::from).collect())
            .unwrap_or_default()
    }
}

fn mock_artifact<'a>(server: &'a MockServer, path: &str, content_type: &str) -> httpmock::Mock<'a> {
    server.mock(|when, then| {
        when.method(GET).path(path.to_string());
        then.status(200)
            .header("content-type", content_type)
            .body("artifact bytes");
    })
}

fn drain_events(rx: &mut artsync_events::EventReceiver) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

// Scenario A: every cluster already current -> clean exit, no downloads.
#[tokio::test]
async fn all_clusters_current_exits_cleanly() {
    let server = MockServer::start();
    let harness = Harness::new();
    harness.listing_tool(NEW, NEW);

    let mut mocks = Vec::new();
    for project in ["alpha", "beta", "gamma"] {
        let path = format!("/{project}.tgz");
        harness.write_manifest(project, &server.url(&path), NEW);
        mocks.push(mock_artifact(&server, &path, "application/x-gzip"));
    }

    let (ctx, _rx) = harness.context();
    let report = sync_artifacts(&ctx, "*").await.unwrap();

    assert!(report.up_to_date);
    assert_eq!(report.packages.len(), 3);
    for package in &report.packages {
        assert!(package.valid);
        for outcome in &package.clusters {
            assert!(!outcome.needed_update);
            assert_eq!(outcome.updated, None);
        }
    }

    // One probe per artifact and nothing else.
    for mock in &mocks {
        mock.assert_hits(1);
    }
    assert!(harness.upload_log().is_empty());
    assert!(!harness.downloads.exists());
}

// Scenario B: one stale cluster -> exactly one download, one upload.
#[tokio::test]
async fn one_stale_cluster_updates_only_that_cluster() {
    let server = MockServer::start();
    let harness = Harness::new();
    harness.listing_tool(OLD, NEW);

    harness.write_manifest("webapp", &server.url("/webapp.tgz"), NEW);
    let mock = mock_artifact(&server, "/webapp.tgz", "application/x-gzip");

    let (ctx, mut rx) = harness.context();
    let report = sync_artifacts(&ctx, "*").await.unwrap();

    assert!(!report.up_to_date);
    let package = &report.packages[0];
    assert_eq!(package.project, "webapp");
    assert!(package.valid);

    let east = package.clusters.iter().find(|c| c.cluster == "east").unwrap();
    assert!(east.needed_update);
    assert_eq!(east.updated, Some(true));

    let west = package.clusters.iter().find(|c| c.cluster == "west").unwrap();
    assert!(!west.needed_update);
    assert_eq!(west.updated, None);

    // Probe + download, nothing more.
    mock.assert_hits(2);

    let log = harness.upload_log();
    assert_eq!(log.len(), 1);
    assert!(log[0].contains("--cluster=east"));
    assert!(log[0].contains(&format!("--metadata={NEW}")));
    assert!(log[0].contains("test-bot"));
    assert!(log[0].contains("webapp.tgz"));

    // Staging tree is removed at the end of the run.
    assert!(!harness.downloads.exists());

    let events = drain_events(&mut rx);
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::ClusterStale { cluster, .. } if cluster == "east")));
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::DownloadCompleted { .. })));
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::UploadCompleted { cluster, .. } if cluster == "east")));
    assert!(!events
        .iter()
        .any(|e| matches!(e, Event::UploadStarted { cluster, .. } if cluster == "west")));
}

// Both clusters stale: the artifact is still fetched exactly once.
#[tokio::test]
async fn download_runs_once_for_many_stale_clusters() {
    let server = MockServer::start();
    let harness = Harness::new();
    harness.listing_tool(OLD, OLD);

    harness.write_manifest("webapp", &server.url("/webapp.tgz"), NEW);
    let mock = mock_artifact(&server, "/webapp.tgz", "application/zip");

    let (ctx, _rx) = harness.context();
    let report = sync_artifacts(&ctx, "*").await.unwrap();

    // One probe + one download, then two uploads fed by the same file.
    mock.assert_hits(2);
    assert_eq!(harness.upload_log().len(), 2);

    let package = &report.packages[0];
    for outcome in &package.clusters {
        assert!(outcome.needed_update);
        assert_eq!(outcome.updated, Some(true));
    }
}

// Scenario C: no manifests -> fatal, no stages run.
#[tokio::test]
async fn no_manifests_is_fatal() {
    let harness = Harness::new();
    harness.listing_tool(NEW, NEW);

    let (ctx, _rx) = harness.context();
    let err = sync_artifacts(&ctx, "*").await.unwrap_err();
    assert!(err.to_string().contains("no packages found"));
    assert!(harness.upload_log().is_empty());
}

// Scenario D: every package invalid -> fatal after validation.
#[tokio::test]
async fn all_invalid_packages_is_fatal() {
    let server = MockServer::start();
    let harness = Harness::new();
    harness.listing_tool(NEW, NEW);

    let mut mocks = Vec::new();
    for project in ["alpha", "beta"] {
        let path = format!("/{project}.tgz");
        harness.write_manifest(project, &server.url(&path), NEW);
        mocks.push(mock_artifact(&server, &path, "text/html"));
    }

    let (ctx, _rx) = harness.context();
    let err = sync_artifacts(&ctx, "*").await.unwrap_err();
    assert!(err.to_string().contains("no packages passed validation"));

    // Validation probed each artifact once; nothing ran afterwards.
    for mock in &mocks {
        mock.assert_hits(1);
    }
    assert!(harness.upload_log().is_empty());
    assert!(!harness.downloads.exists());
}

// A failing listing tool counts as stale (fail-open), not as skipped work.
#[tokio::test]
async fn listing_failure_fails_open() {
    let server = MockServer::start();
    let harness = Harness::new();
    harness.write_tool(&format!(
        r#"case "$1" in
  package_versions) exit 1 ;;
  package_add_version)
    echo "$@" >> "{log}"
    echo "version added"
    ;;
esac"#,
        log = harness.log.display()
    ));

    harness.write_manifest("webapp", &server.url("/webapp.tgz"), NEW);
    mock_artifact(&server, "/webapp.tgz", "application/x-compressed");

    let (ctx, _rx) = harness.context();
    let report = sync_artifacts(&ctx, "*").await.unwrap();

    let package = &report.packages[0];
    for outcome in &package.clusters {
        assert!(outcome.needed_update);
        assert_eq!(outcome.updated, Some(true));
    }
    assert_eq!(harness.upload_log().len(), 2);
}

// A broken upload tool is recorded per cluster, not raised as an error.
#[tokio::test]
async fn upload_failure_is_recorded_not_fatal() {
    let server = MockServer::start();
    let harness = Harness::new();
    harness.write_tool(
        r#"case "$1" in
  package_versions) echo "" ;;
  package_add_version) echo "store unavailable" >&2; exit 3 ;;
esac"#,
    );

    harness.write_manifest("webapp", &server.url("/webapp.tgz"), NEW);
    mock_artifact(&server, "/webapp.tgz", "application/x-gzip");

    let (ctx, _rx) = harness.context();
    let report = sync_artifacts(&ctx, "*").await.unwrap();

    assert!(!report.all_succeeded());
    let package = &report.packages[0];
    for outcome in &package.clusters {
        // Empty listing -> fail-open stale; upload then failed.
        assert!(outcome.needed_update);
        assert_eq!(outcome.updated, Some(false));
    }
}

// Project selection: only matching manifests enter the pipeline.
#[tokio::test]
async fn project_pattern_limits_the_run() {
    let server = MockServer::start();
    let harness = Harness::new();
    harness.listing_tool(NEW, NEW);

    harness.write_manifest("webapp", &server.url("/webapp.tgz"), NEW);
    harness.write_manifest("api", &server.url("/api.tgz"), NEW);
    let webapp_mock = mock_artifact(&server, "/webapp.tgz", "application/x-gzip");
    let api_mock = mock_artifact(&server, "/api.tgz", "application/x-gzip");

    let (ctx, _rx) = harness.context();
    let report = sync_artifacts(&ctx, "webapp").await.unwrap();

    assert_eq!(report.packages.len(), 1);
    assert_eq!(report.packages[0].project, "webapp");
    webapp_mock.assert_hits(1);
    api_mock.assert_hits(0);
}
