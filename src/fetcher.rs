//! Rate-limited HTTP fetcher
//!
//! Wraps outbound GET/POST against the allow-listed host set and
//! enforces the politeness envelope: a hard in-flight ceiling, a
//! randomized delay on top of it so cadence never looks mechanical, a
//! per-request timeout, and header/cookie injection on every request.
//!
//! Two instances exist per run, one for listing pages and one for
//! detail pages, with independent limiter state; the detail instance
//! additionally rotates its user agent per request.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use reqwest::Client;
use reqwest::header::{CONNECTION, COOKIE, USER_AGENT};
use tokio::sync::Semaphore;
use tracing::{debug, trace};
use url::Url;

use crate::config::CrawlConfig;
use crate::error::{CrawlError, CrawlResult};
use crate::session::SessionCredentials;
use crate::utils::{DEFAULT_USER_AGENT, USER_AGENT_POOL};

pub struct Fetcher {
    client: Client,
    permits: Arc<Semaphore>,
    allowed_domains: Vec<String>,
    cookie_header: String,
    max_delay: Duration,
    rotate_user_agent: bool,
}

impl Fetcher {
    /// Build a fetcher carrying an immutable snapshot of the session
    /// cookie string.
    ///
    /// # Errors
    ///
    /// `CrawlError::Config` if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(
        config: &CrawlConfig,
        credentials: &SessionCredentials,
        rotate_user_agent: bool,
    ) -> CrawlResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| CrawlError::Config(format!("failed to build http client: {e}")))?;

        Ok(Self {
            client,
            permits: Arc::new(Semaphore::new(config.concurrency())),
            allowed_domains: config.allowed_domains().to_vec(),
            cookie_header: credentials.cookie_header().to_string(),
            max_delay: config.max_delay(),
            rotate_user_agent,
        })
    }

    /// GET `url`, returning the response body.
    pub async fn get(&self, url: &str) -> CrawlResult<String> {
        self.check_allowed(url)?;
        let request = self.client.get(url);
        self.execute(url, request).await
    }

    /// POST `url` with a form-encoded body, returning the response body.
    pub async fn post_form(&self, url: &str, form: &[(&str, String)]) -> CrawlResult<String> {
        self.check_allowed(url)?;
        let request = self.client.post(url).form(form);
        self.execute(url, request).await
    }

    fn check_allowed(&self, url: &str) -> CrawlResult<()> {
        let parsed = Url::parse(url)?;
        let host = parsed
            .host_str()
            .ok_or_else(|| CrawlError::DomainNotAllowed(url.to_string()))?;
        if self.allowed_domains.iter().any(|d| d == host) {
            Ok(())
        } else {
            Err(CrawlError::DomainNotAllowed(url.to_string()))
        }
    }

    async fn execute(&self, url: &str, request: reqwest::RequestBuilder) -> CrawlResult<String> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| CrawlError::Http("request limiter closed".into()))?;

        // Randomized delay while holding the permit, so dispatch cadence
        // stays irregular even at the concurrency ceiling.
        let max_ms = self.max_delay.as_millis() as u64;
        if max_ms > 0 {
            let delay_ms = rand::rng().random_range(0..=max_ms);
            trace!("sleeping {delay_ms}ms before {url}");
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }

        let user_agent = if self.rotate_user_agent {
            USER_AGENT_POOL[rand::rng().random_range(0..USER_AGENT_POOL.len())]
        } else {
            DEFAULT_USER_AGENT
        };

        debug!("fetching {url}");
        let response = request
            .header(USER_AGENT, user_agent)
            .header(CONNECTION, "keep-alive")
            .header(COOKIE, &self.cookie_header)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CrawlError::Http(format!("{status} for {url}")));
        }

        Ok(response.text().await?)
    }
}
