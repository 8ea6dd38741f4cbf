//! Hostname extraction from free text.
//!
//! Scanning is a best-effort heuristic, not a URL parser: anything that looks
//! like one or more lowercase DNS labels followed by an alphabetic final label
//! is a candidate. Resolution against the Public Suffix List happens later.

use std::sync::LazyLock;

use regex::Regex;

/// Lowercase labels (internal hyphens allowed) joined by dots, ending in a label
/// of two or more letters, bounded by word boundaries.
pub const HOSTNAME_PATTERN: &str = r"\b(?:[a-z0-9]+(?:-[a-z0-9]+)*\.)+[a-z]{2,}\b";

static HOSTNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(HOSTNAME_PATTERN).expect("hostname pattern is valid"));

/// Returns the candidate hostnames in `text`, lazily and in order of appearance.
///
/// Matches borrow from `text`. Calling this again on the same text restarts the scan.
pub fn extract_hostnames(text: &str) -> impl Iterator<Item = &str> + '_ {
    HOSTNAME_RE.find_iter(text).map(|m| m.as_str())
}
