//! Domain canonicalization and deduplication.
//!
//! This module resolves candidate hostnames to their registrable domain using
//! the Public Suffix List (PSL) and collapses the results into a unique set.
//!
//! Key functions:
//! - `canonicalize()` - Resolves one hostname to its registrable domain
//! - `dedupe()` - Reduces a sequence of domains to a unique set
//! - `collect_domains()` - Runs extraction, canonicalization and dedup over a text

use std::collections::BTreeSet;

use log::info;
use psl::{List, Psl};

use crate::config::SCHEME_PREFIX;
use crate::error_handling::CanonicalizeError;
use crate::extract::extract_hostnames;

/// Resolves a candidate hostname to its registrable domain.
///
/// # Arguments
///
/// * `list` - The Public Suffix List instance
/// * `hostname` - A candidate produced by the extractor (no scheme)
///
/// # Returns
///
/// The registrable domain (e.g., "example.co.uk" from "sub.example.co.uk")
///
/// # Errors
///
/// Returns `CanonicalizeError::UnrecognizedDomain` if the hostname's suffix is
/// not listed in the PSL or the hostname is itself a public suffix, and
/// `CanonicalizeError::Resolution` for anything else (unparseable URL, missing
/// host, IP address).
pub fn canonicalize(list: &List, hostname: &str) -> Result<String, CanonicalizeError> {
    let url = format!("{SCHEME_PREFIX}{hostname}");
    let resolution = |reason: String| CanonicalizeError::Resolution {
        hostname: hostname.to_string(),
        reason,
    };

    let parsed = url::Url::parse(&url).map_err(|e| resolution(e.to_string()))?;

    let host = match parsed.host() {
        Some(url::Host::Domain(host)) => host,
        Some(url::Host::Ipv4(_)) | Some(url::Host::Ipv6(_)) => {
            return Err(resolution(
                "IP addresses do not have registrable domains".to_string(),
            ))
        }
        None => return Err(resolution("URL has no host component".to_string())),
    };

    // The PSL falls back to the implicit "*" rule, so every host gets a
    // suffix; only listed ones count.
    let domain = list
        .domain(host.as_bytes())
        .filter(|d| d.suffix().is_known())
        .ok_or_else(|| CanonicalizeError::UnrecognizedDomain(hostname.to_string()))?;

    std::str::from_utf8(domain.as_bytes())
        .map(str::to_string)
        .map_err(|e| resolution(e.to_string()))
}

/// Collapses equal domains into a single entry.
///
/// Pure and order-independent; the returned set iterates in sorted order.
pub fn dedupe<I, S>(domains: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    domains.into_iter().map(Into::into).collect()
}

/// Outcome of scanning one text buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Harvest {
    /// Candidates matched by the extraction pattern
    pub candidates: usize,
    /// Candidates dropped because they had no recognized public suffix
    pub skipped: usize,
    /// Canonical domains that resolved, before dedup
    pub resolved: usize,
    /// Unique canonical domains
    pub domains: BTreeSet<String>,
}

/// Extracts, canonicalizes and deduplicates every hostname in `text`.
///
/// Unrecognized domains are logged and skipped.
///
/// # Errors
///
/// Returns the first non-skippable `CanonicalizeError`.
pub fn collect_domains(list: &List, text: &str) -> Result<Harvest, CanonicalizeError> {
    let mut harvest = Harvest::default();
    let mut resolved = Vec::new();

    for candidate in extract_hostnames(text) {
        harvest.candidates += 1;
        match canonicalize(list, candidate) {
            Ok(domain) => resolved.push(domain),
            Err(e) if e.is_skippable() => {
                info!("{candidate} is not using a valid domain. Skipping");
                harvest.skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    harvest.resolved = resolved.len();
    harvest.domains = dedupe(resolved);
    Ok(harvest)
}

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
