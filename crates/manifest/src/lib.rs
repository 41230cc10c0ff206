#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Package manifest handling for artsync
//!
//! A manifest is a JSON file naming one package's artifact URL and declared
//! revision. The project name is not stored in the file; it is derived from
//! the file name with the extension stripped, so `webapp.json` describes
//! project `webapp`.

use artsync_errors::{Error, ManifestError};
use artsync_types::Revision;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Manifest file contents
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    /// Artifact download URL
    #[serde(alias = "Artifact")]
    pub artifact: String,
    /// Declared revision of the artifact build
    #[serde(alias = "Revision")]
    pub revision: Revision,
}

impl Manifest {
    /// Load and parse a manifest file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid
    /// manifest.
    pub async fn load(path: &Path) -> Result<Self, Error> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| ManifestError::ReadFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        let manifest: Self =
            serde_json::from_str(&content).map_err(|e| ManifestError::ParseFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        Ok(manifest)
    }
}

/// Derive the project name from a manifest path (file stem)
///
/// # Errors
///
/// Returns an error if the path has no usable UTF-8 file stem.
pub fn project_name(path: &Path) -> Result<String, Error> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(String::from)
        .ok_or_else(|| {
            ManifestError::InvalidFileName {
                path: path.display().to_string(),
            }
            .into()
        })
}

/// Find manifest files under `root` whose project name matches `pattern`
///
/// `pattern` is the project selector from the command line: a literal name,
/// or a name with `*` wildcards (`*` alone selects every manifest). Results
/// are sorted by path for deterministic processing order.
///
/// # Errors
///
/// Returns an error if `root` cannot be read as a directory.
pub async fn discover(root: &Path, pattern: &str) -> Result<Vec<PathBuf>, Error> {
    let mut entries = fs::read_dir(root).await.map_err(|_| ManifestError::RootNotFound {
        path: root.display().to_string(),
    })?;

    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if wildcard_match(stem, pattern) {
            paths.push(path);
        }
    }

    paths.sort();
    Ok(paths)
}

/// Match `name` against `pattern`, where `*` matches any run of characters.
fn wildcard_match(name: &str, pattern: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();
    if parts.len() == 1 {
        return name == pattern;
    }

    let last = parts.len() - 1;
    let mut remaining = name;
    for (i, part) in parts.iter().enumerate() {
        if part.is_empty() {
            continue;
        }
        if i == 0 {
            let Some(rest) = remaining.strip_prefix(part) else {
                return false;
            };
            remaining = rest;
        } else if i == last {
            let Some(rest) = remaining.strip_suffix(part) else {
                return false;
            };
            remaining = rest;
        } else {
            let Some(idx) = remaining.find(part) else {
                return false;
            };
            remaining = &remaining[idx + part.len()..];
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    const REV: &str = "0123456789abcdef0123456789abcdef01234567";

    #[test]
    fn wildcard_matching() {
        assert!(wildcard_match("webapp", "*"));
        assert!(wildcard_match("webapp", "webapp"));
        assert!(wildcard_match("webapp", "web*"));
        assert!(wildcard_match("webapp", "*app"));
        assert!(wildcard_match("webapp", "w*p"));

        assert!(!wildcard_match("webapp", "api"));
        assert!(!wildcard_match("webapp", "api*"));
        assert!(!wildcard_match("webapp", "*api"));
    }

    #[tokio::test]
    async fn load_and_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("webapp.json");
        tokio::fs::write(
            &path,
            format!(r#"{{"artifact": "https://ci.example.com/webapp.tgz", "revision": "{REV}"}}"#),
        )
        .await
        .unwrap();

        let manifest = Manifest::load(&path).await.unwrap();
        assert_eq!(manifest.artifact, "https://ci.example.com/webapp.tgz");
        assert_eq!(manifest.revision.as_str(), REV);
        assert_eq!(project_name(&path).unwrap(), "webapp");
    }

    #[tokio::test]
    async fn load_accepts_capitalized_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.json");
        tokio::fs::write(
            &path,
            format!(r#"{{"Artifact": "https://ci.example.com/legacy.zip", "Revision": "{REV}"}}"#),
        )
        .await
        .unwrap();

        let manifest = Manifest::load(&path).await.unwrap();
        assert_eq!(manifest.artifact, "https://ci.example.com/legacy.zip");
    }

    #[tokio::test]
    async fn load_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        tokio::fs::write(&path, "{not json").await.unwrap();
        assert!(Manifest::load(&path).await.is_err());
    }

    #[tokio::test]
    async fn discover_filters_by_pattern() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["webapp.json", "web-admin.json", "api.json", "notes.txt"] {
            tokio::fs::write(dir.path().join(name), "{}").await.unwrap();
        }

        let all = discover(dir.path(), "*").await.unwrap();
        assert_eq!(all.len(), 3);

        let web = discover(dir.path(), "web*").await.unwrap();
        let names: Vec<_> = web
            .iter()
            .map(|p| project_name(p).unwrap())
            .collect();
        assert_eq!(names, vec!["web-admin", "webapp"]);

        let exact = discover(dir.path(), "api").await.unwrap();
        assert_eq!(exact.len(), 1);

        let none = discover(dir.path(), "worker").await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn discover_missing_root() {
        assert!(discover(Path::new("/nonexistent/manifests"), "*")
            .await
            .is_err());
    }
}
