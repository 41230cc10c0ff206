//! Artifact revision identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// A revision identifier for one artifact build.
///
/// Revisions are intended to be 40-character lowercase hex content hashes,
/// but the value is carried verbatim from the manifest and compared by
/// equality only — it is never validated or interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Revision(String);

impl Revision {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the value has the canonical 40-hex shape. Diagnostic only;
    /// nothing gates on this.
    #[must_use]
    pub fn looks_canonical(&self) -> bool {
        self.0.len() == 40
            && self
                .0
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Revision {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Revision {
    fn from(value: String) -> Self {
        Self(value)
    }
}
