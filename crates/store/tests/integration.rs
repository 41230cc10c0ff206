//! Integration tests for store crate
//!
//! The client is exercised against real processes: `echo` stands in for the
//! store tool so the exact argument shape can be asserted.

use artsync_store::StoreClient;
use artsync_types::Revision;
use std::path::Path;

#[tokio::test]
async fn package_versions_argument_shape() {
    let client = StoreClient::new("echo", "jenkins");
    let out = client.package_versions("east", "webapp").await.unwrap();
    assert_eq!(out.trim(), "package_versions --cluster=east jenkins webapp");
}

#[tokio::test]
async fn add_version_argument_shape() {
    let client = StoreClient::new("echo", "jenkins");
    let revision = Revision::new("3".repeat(40));
    let out = client
        .add_version(
            "west",
            "deploy-bot",
            "webapp",
            &revision,
            Path::new("/tmp/webapp/webapp.tgz"),
        )
        .await
        .unwrap();

    assert_eq!(
        out.trim(),
        format!(
            "package_add_version --cluster=west --metadata={} deploy-bot webapp /tmp/webapp/webapp.tgz",
            revision
        )
    );
}

#[tokio::test]
async fn nonzero_exit_is_error() {
    let client = StoreClient::new("false", "jenkins");
    let err = client.package_versions("east", "webapp").await.unwrap_err();
    assert!(err.to_string().contains("failed"));
}

#[tokio::test]
async fn missing_tool_is_spawn_error() {
    let client = StoreClient::new("artsync-no-such-tool", "jenkins");
    let err = client.package_versions("east", "webapp").await.unwrap_err();
    assert!(err.to_string().contains("spawn"));
}
