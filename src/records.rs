//! Canonical output types for a crawl run.
//!
//! A [`VulnerabilityRecord`] is immutable once created: the detail
//! resolver produces complete records, the orchestrator's fallback path
//! produces partial ones, and nothing mutates a record after it enters
//! the result set.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity classification, normalized from the localized source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hazard {
    Low,
    Medium,
    High,
    Unknown,
}

impl fmt::Display for Hazard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Whether a record carries detail-page fields or only listing fields.
///
/// `Partial` means the detail fetch failed and only `title`, `url`, `id`,
/// `hazard`, and `published_date` are populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Completeness {
    Complete,
    Partial,
}

/// One vulnerability disclosure, either fully resolved from its detail
/// page or degraded to the listing-derived subset.
///
/// JSON field names match the upstream feed (`cnvd_id`, `publishedDate`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VulnerabilityRecord {
    /// Absolute detail-page address; unique key candidate
    pub url: String,
    pub title: String,
    /// Canonical identifier, `CNVD-YYYY-N...`, always uppercase
    #[serde(rename = "cnvd_id")]
    pub id: String,
    /// Opaque date string as presented by the source, not reinterpreted
    #[serde(rename = "publishedDate")]
    pub published_date: String,
    pub hazard: Hazard,
    pub product: String,
    pub description: String,
    pub types: String,
    pub reference: String,
    /// Empty when the source marks the attachment as not yet public
    pub attachment: String,
    pub completeness: Completeness,
}

impl VulnerabilityRecord {
    /// Seed a record from listing-level fields. Detail-only fields start
    /// empty; the detail resolver overwrites what the page provides.
    pub(crate) fn from_listing(row: &ListingRow, completeness: Completeness) -> Self {
        Self {
            url: row.detail_url.clone(),
            title: row.title.clone(),
            id: row.id.clone(),
            published_date: row.published_date.clone(),
            hazard: row.hazard,
            product: String::new(),
            description: String::new(),
            types: String::new(),
            reference: String::new(),
            attachment: String::new(),
            completeness,
        }
    }

    /// Fallback shape for a row whose detail fetch failed.
    pub(crate) fn partial_from(row: &ListingRow) -> Self {
        Self::from_listing(row, Completeness::Partial)
    }

    pub fn is_complete(&self) -> bool {
        self.completeness == Completeness::Complete
    }
}

/// One row of the paginated listing table. Produced by the paginator,
/// consumed exactly once by the detail resolver; never exposed to callers.
#[derive(Debug, Clone)]
pub(crate) struct ListingRow {
    pub(crate) detail_url: String,
    pub(crate) title: String,
    pub(crate) hazard: Hazard,
    pub(crate) published_date: String,
    /// Pre-extracted from `detail_url` during row validation, so the
    /// fallback path never re-parses.
    pub(crate) id: String,
}

/// Counters accumulated over one run.
///
/// The fallback ratio is the observability signal for a session that
/// expired mid-crawl: the site keeps serving listings but detail fetches
/// start bouncing off the challenge, so partials climb.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct CrawlStats {
    pub pages_fetched: usize,
    pub rows_dropped: usize,
    pub complete_records: usize,
    pub partial_records: usize,
}

impl CrawlStats {
    /// Share of records that fell back to listing-only fields, in `[0, 1]`.
    pub fn fallback_ratio(&self) -> f64 {
        let total = self.complete_records + self.partial_records;
        if total == 0 {
            0.0
        } else {
            self.partial_records as f64 / total as f64
        }
    }
}

/// Result of a successful run: records in discovery order plus counters.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlOutcome {
    pub records: Vec<VulnerabilityRecord>,
    pub stats: CrawlStats,
}
