//! Revision-token extraction from store listing output
//!
//! The listing tool prints free-form text; the contract this module relies
//! on is that every recorded version appears as a 40-character lowercase hex
//! token, in recording order, so the last token is the most recent version.

use artsync_types::Revision;
use regex::Regex;
use std::sync::LazyLock;

// a revision is a 40-character hex digest
static REVISION_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[0-9a-f]{40}").expect("hard-coded pattern"));

/// All revision tokens in `text`, in order of appearance
#[must_use]
pub fn extract_revisions(text: &str) -> Vec<Revision> {
    REVISION_TOKEN
        .find_iter(text)
        .map(|m| Revision::new(m.as_str()))
        .collect()
}

/// The most recent revision in `text` (the last token), if any
#[must_use]
pub fn latest_revision(text: &str) -> Option<Revision> {
    REVISION_TOKEN
        .find_iter(text)
        .last()
        .map(|m| Revision::new(m.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const OLD: &str = "1111111111111111111111111111111111111111";
    const NEW: &str = "2222222222222222222222222222222222222222";

    #[test]
    fn extracts_tokens_in_order() {
        let text = format!("Versions for webapp:\n  1: {OLD}\n  2: {NEW}\n");
        let revisions = extract_revisions(&text);
        assert_eq!(revisions.len(), 2);
        assert_eq!(revisions[0].as_str(), OLD);
        assert_eq!(revisions[1].as_str(), NEW);
    }

    #[test]
    fn last_token_is_latest() {
        let text = format!("{OLD}\nsome noise\n{NEW}");
        assert_eq!(latest_revision(&text).unwrap().as_str(), NEW);
    }

    #[test]
    fn ignores_short_and_uppercase_tokens() {
        let text = format!(
            "deadbeef {upper} {NEW}",
            upper = "A".repeat(40)
        );
        let revisions = extract_revisions(&text);
        assert_eq!(revisions.len(), 1);
        assert_eq!(revisions[0].as_str(), NEW);
    }

    #[test]
    fn empty_output_has_no_revisions() {
        assert!(extract_revisions("").is_empty());
        assert!(latest_revision("no versions recorded").is_none());
    }
}
