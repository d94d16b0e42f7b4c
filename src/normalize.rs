//! Pure text transforms for locale-specific normalization. No I/O.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{CrawlError, CrawlResult};
use crate::records::Hazard;

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)CNVD-\d{4}-\d+").expect("identifier pattern"));

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("whitespace run"));

/// Map a localized hazard string onto the canonical severity levels.
///
/// Substring match, first match wins, in the fixed order 中 → 高 → 低.
/// Well-formed source text carries at most one token; the ordering is
/// pinned by test for the multi-token boundary case.
pub fn map_hazard(text: &str) -> Hazard {
    if text.contains('中') {
        Hazard::Medium
    } else if text.contains('高') {
        Hazard::High
    } else if text.contains('低') {
        Hazard::Low
    } else {
        Hazard::Unknown
    }
}

/// Extract the first CNVD identifier from `text`, uppercased.
///
/// # Errors
///
/// `CrawlError::IdentifierNotFound` when no identifier is present. Callers
/// must treat this as fatal to retaining the row or record in question.
pub fn extract_identifier(text: &str) -> CrawlResult<String> {
    IDENTIFIER
        .find(text)
        .map(|m| m.as_str().to_uppercase())
        .ok_or(CrawlError::IdentifierNotFound)
}

/// Replace every run of whitespace (space, tab, newline) with a single
/// space. Outer trimming is the caller's responsibility.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").into_owned()
}
