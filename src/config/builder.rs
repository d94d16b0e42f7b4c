//! Fluent builder for [`CrawlConfig`] with build-time validation

use std::time::Duration;

use url::Url;

use crate::error::{CrawlError, CrawlResult};
use crate::utils::{
    DEFAULT_ALLOWED_DOMAIN, DEFAULT_BOOTSTRAP_TIMEOUT_SECS, DEFAULT_CONCURRENCY,
    DEFAULT_END_OFFSET, DEFAULT_LIST_URL, DEFAULT_MAX_DELAY_SECS, DEFAULT_PAGE_SIZE,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SETTLE_DELAY_SECS, DEFAULT_START_OFFSET,
};

use super::types::CrawlConfig;

pub struct CrawlConfigBuilder {
    list_url: String,
    allowed_domains: Vec<String>,
    page_size: u32,
    start_offset: u32,
    end_offset: u32,
    concurrency: usize,
    max_delay: Duration,
    request_timeout: Duration,
    bootstrap_timeout: Duration,
    settle_delay: Duration,
    headless: bool,
}

impl Default for CrawlConfigBuilder {
    fn default() -> Self {
        Self {
            list_url: DEFAULT_LIST_URL.to_string(),
            allowed_domains: vec![DEFAULT_ALLOWED_DOMAIN.to_string()],
            page_size: DEFAULT_PAGE_SIZE,
            start_offset: DEFAULT_START_OFFSET,
            end_offset: DEFAULT_END_OFFSET,
            concurrency: DEFAULT_CONCURRENCY,
            max_delay: Duration::from_secs(DEFAULT_MAX_DELAY_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            bootstrap_timeout: Duration::from_secs(DEFAULT_BOOTSTRAP_TIMEOUT_SECS),
            settle_delay: Duration::from_secs(DEFAULT_SETTLE_DELAY_SECS),
            headless: true,
        }
    }
}

impl CrawlConfigBuilder {
    /// Listing endpoint URL. Its host must be in the allowlist.
    #[must_use]
    pub fn list_url(mut self, url: impl Into<String>) -> Self {
        self.list_url = url.into();
        self
    }

    /// Replace the domain allowlist.
    #[must_use]
    pub fn allowed_domains(mut self, domains: Vec<String>) -> Self {
        self.allowed_domains = domains;
        self
    }

    #[must_use]
    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = size;
        self
    }

    #[must_use]
    pub fn start_offset(mut self, offset: u32) -> Self {
        self.start_offset = offset;
        self
    }

    #[must_use]
    pub fn end_offset(mut self, offset: u32) -> Self {
        self.end_offset = offset;
        self
    }

    #[must_use]
    pub fn concurrency(mut self, limit: usize) -> Self {
        self.concurrency = limit;
        self
    }

    #[must_use]
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    #[must_use]
    pub fn bootstrap_timeout(mut self, timeout: Duration) -> Self {
        self.bootstrap_timeout = timeout;
        self
    }

    #[must_use]
    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// `CrawlError::Config` on a zero concurrency or page size, an empty
    /// or inverted offset range, an empty allowlist, or a listing URL
    /// that is unparseable or outside the allowlist.
    pub fn build(self) -> CrawlResult<CrawlConfig> {
        if self.concurrency == 0 {
            return Err(CrawlError::Config("concurrency must be at least 1".into()));
        }
        if self.page_size == 0 {
            return Err(CrawlError::Config("page size must be at least 1".into()));
        }
        if self.start_offset >= self.end_offset {
            return Err(CrawlError::Config(format!(
                "offset range [{}, {}) is empty",
                self.start_offset, self.end_offset
            )));
        }
        if self.allowed_domains.is_empty() {
            return Err(CrawlError::Config("domain allowlist is empty".into()));
        }

        let parsed = Url::parse(&self.list_url)
            .map_err(|e| CrawlError::Config(format!("invalid list url {}: {e}", self.list_url)))?;
        let host = parsed
            .host_str()
            .ok_or_else(|| CrawlError::Config(format!("list url {} has no host", self.list_url)))?;
        if !self.allowed_domains.iter().any(|d| d == host) {
            return Err(CrawlError::Config(format!(
                "list url host {host} is not in the allowlist"
            )));
        }

        Ok(CrawlConfig {
            list_url: self.list_url,
            allowed_domains: self.allowed_domains,
            page_size: self.page_size,
            start_offset: self.start_offset,
            end_offset: self.end_offset,
            concurrency: self.concurrency,
            max_delay: self.max_delay,
            request_timeout: self.request_timeout,
            bootstrap_timeout: self.bootstrap_timeout,
            settle_delay: self.settle_delay,
            headless: self.headless,
        })
    }
}
