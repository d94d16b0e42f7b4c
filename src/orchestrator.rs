//! End-to-end crawl orchestration
//!
//! Composes session bootstrap, the two fetchers, pagination, and detail
//! resolution into one run. Listing pages proceed strictly in increasing
//! offset order; detail pages within a page resolve concurrently up to
//! the detail fetcher's ceiling, with result order preserved.

use futures::StreamExt;
use futures::stream;
use tracing::{error, info, warn};

use crate::config::CrawlConfig;
use crate::detail;
use crate::error::CrawlResult;
use crate::fetcher::Fetcher;
use crate::listing::ListingPaginator;
use crate::records::{CrawlOutcome, CrawlStats, ListingRow, VulnerabilityRecord};
use crate::session::SessionProvider;

/// Fallback-ratio threshold above which the run warns about a possibly
/// expired session
const FALLBACK_WARN_RATIO: f64 = 0.5;

/// Run one crawl: bootstrap, paginate, resolve, accumulate.
///
/// Only bootstrap and configuration errors terminate the run. Malformed
/// rows are dropped and counted; failed detail fetches degrade to
/// partial records; a failed listing page stops pagination early with
/// whatever was accumulated.
pub async fn run<P: SessionProvider>(
    config: &CrawlConfig,
    provider: &P,
) -> CrawlResult<CrawlOutcome> {
    info!(
        "starting crawl of {} offsets [{}, {}) at page size {}",
        config.list_url(),
        config.start_offset(),
        config.end_offset(),
        config.page_size()
    );

    let credentials = provider.bootstrap(config.bootstrap_timeout()).await?;

    // Each fetcher captures its own immutable cookie snapshot; nothing
    // refreshes the session mid-run.
    let listing_fetcher = Fetcher::new(config, &credentials, false)?;
    let detail_fetcher = Fetcher::new(config, &credentials, true)?;

    let mut paginator = ListingPaginator::new(&listing_fetcher, config)?;
    let mut records: Vec<VulnerabilityRecord> = Vec::new();
    let mut stats = CrawlStats::default();

    loop {
        match paginator.next_page().await {
            Ok(Some(rows)) => {
                stats.pages_fetched += 1;
                let resolved = stream::iter(
                    rows.into_iter()
                        .map(|row| resolve_or_fallback(&detail_fetcher, row)),
                )
                .buffered(config.concurrency())
                .collect::<Vec<_>>()
                .await;

                for record in resolved {
                    if record.is_complete() {
                        stats.complete_records += 1;
                    } else {
                        stats.partial_records += 1;
                    }
                    records.push(record);
                }
            }
            Ok(None) => break,
            Err(e) => {
                error!("listing page fetch failed, stopping pagination early: {e}");
                break;
            }
        }
    }

    stats.rows_dropped = paginator.dropped_rows();

    if stats.partial_records > 0 && stats.fallback_ratio() > FALLBACK_WARN_RATIO {
        warn!(
            "{:.0}% of records fell back to listing fields; session may have expired mid-run",
            stats.fallback_ratio() * 100.0
        );
    }

    info!(
        "crawl finished: {} records ({} complete, {} partial), {} rows dropped over {} pages",
        records.len(),
        stats.complete_records,
        stats.partial_records,
        stats.rows_dropped,
        stats.pages_fetched
    );

    Ok(CrawlOutcome { records, stats })
}

/// Resolve one row's detail page, degrading to the listing-derived
/// partial shape on any failure.
async fn resolve_or_fallback(fetcher: &Fetcher, row: ListingRow) -> VulnerabilityRecord {
    match detail::resolve(fetcher, &row).await {
        Ok(record) => record,
        Err(e) => {
            warn!(
                "detail fetch for {} failed, keeping listing fields only: {e}",
                row.id
            );
            VulnerabilityRecord::partial_from(&row)
        }
    }
}
