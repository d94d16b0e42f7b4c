//! Harvester for CNVD vulnerability disclosures.
//!
//! The site fronts its listing and detail pages with anti-bot challenge
//! middleware, so a crawl is a coordinated sequence: drive a real
//! browser through the challenge once to obtain validation cookies,
//! then fetch paginated listings and per-entry detail pages over plain
//! HTTP under a politeness envelope, normalizing the semi-structured
//! Chinese-language fields into canonical records. A detail page that
//! fails to resolve degrades that one entry to a listing-derived
//! partial record instead of dropping it.
//!
//! ```no_run
//! use cnvd_harvester::CrawlConfig;
//!
//! # async fn demo() -> cnvd_harvester::CrawlResult<()> {
//! let config = CrawlConfig::builder().end_offset(200).build()?;
//! let outcome = cnvd_harvester::crawl(config).await?;
//! for record in &outcome.records {
//!     println!("{} {} ({})", record.id, record.title, record.hazard);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod fetcher;
pub mod normalize;
pub mod orchestrator;
pub mod records;
pub mod session;
pub mod translate;
pub mod utils;

mod detail;
mod listing;

pub use config::CrawlConfig;
pub use error::{CrawlError, CrawlResult};
pub use fetcher::Fetcher;
pub use orchestrator::run;
pub use records::{Completeness, CrawlOutcome, CrawlStats, Hazard, VulnerabilityRecord};
pub use session::{BrowserSessionProvider, SessionCredentials, SessionProvider};

/// Run a crawl with the production browser-backed session provider.
pub async fn crawl(config: CrawlConfig) -> CrawlResult<CrawlOutcome> {
    let provider = BrowserSessionProvider::new(&config);
    orchestrator::run(&config, &provider).await
}
