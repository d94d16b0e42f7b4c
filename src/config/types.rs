//! Core configuration type for crawl runs

use std::time::Duration;

use super::builder::CrawlConfigBuilder;

/// Configuration for one crawl run.
///
/// Construct via [`CrawlConfig::builder`]; every field has a production
/// default, and `build()` rejects invalid combinations up front.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Listing endpoint. Pages are fetched by POSTing `max`/`offset`
    /// form data to `{list_url}?flag=true`.
    pub(crate) list_url: String,
    /// Hosts the fetchers may talk to; everything else is rejected
    /// before being sent.
    pub(crate) allowed_domains: Vec<String>,
    pub(crate) page_size: u32,
    /// Zero-based row offset the crawl starts at
    pub(crate) start_offset: u32,
    /// Exclusive upper bound for the offset range.
    ///
    /// The crawl never discovers the total result count from the site;
    /// this bound is the single knob controlling how far it reaches.
    pub(crate) end_offset: u32,
    /// In-flight request ceiling per fetcher instance
    pub(crate) concurrency: usize,
    /// Upper bound for the randomized per-request delay
    pub(crate) max_delay: Duration,
    pub(crate) request_timeout: Duration,
    pub(crate) bootstrap_timeout: Duration,
    /// How long the bootstrapper waits after navigation for the
    /// challenge scripts to run
    pub(crate) settle_delay: Duration,
    pub(crate) headless: bool,
}

impl CrawlConfig {
    pub fn builder() -> CrawlConfigBuilder {
        CrawlConfigBuilder::default()
    }

    pub fn list_url(&self) -> &str {
        &self.list_url
    }

    pub fn allowed_domains(&self) -> &[String] {
        &self.allowed_domains
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn start_offset(&self) -> u32 {
        self.start_offset
    }

    pub fn end_offset(&self) -> u32 {
        self.end_offset
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn bootstrap_timeout(&self) -> Duration {
        self.bootstrap_timeout
    }

    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    pub fn headless(&self) -> bool {
        self.headless
    }
}
