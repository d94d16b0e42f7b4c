//! Anti-bot session acquisition
//!
//! The listing and detail endpoints sit behind challenge middleware that
//! only serves clients carrying its validation cookies. A
//! [`SessionProvider`] produces that cookie material; the production
//! implementation drives a real browser through the challenge, tests use
//! a stub.

mod browser;
mod stealth;

use std::future::Future;
use std::time::Duration;

use crate::error::CrawlResult;
use crate::utils::VALIDATION_COOKIES;

pub use browser::BrowserSessionProvider;

/// Opaque cookie material proving a passed anti-bot challenge.
///
/// Scoped to the run that created it. The challenge response is
/// time-bound and server-issued, so credentials must not be reused
/// across unrelated runs without re-validation.
#[derive(Debug, Clone)]
pub struct SessionCredentials {
    cookie_header: String,
}

impl SessionCredentials {
    pub fn new(cookie_header: impl Into<String>) -> Self {
        Self {
            cookie_header: cookie_header.into(),
        }
    }

    /// The serialized `name=value; name=value` Cookie header string.
    pub fn cookie_header(&self) -> &str {
        &self.cookie_header
    }

    /// Whether both challenge markers are present in the jar.
    pub fn has_validation_cookies(&self) -> bool {
        VALIDATION_COOKIES
            .iter()
            .all(|name| self.cookie_header.contains(name))
    }
}

/// Capability to produce a validated session.
///
/// Any implementation that yields a cookie string passing
/// [`SessionCredentials::has_validation_cookies`] satisfies the crawl's
/// precondition; the orchestrator is agnostic to how it was obtained.
pub trait SessionProvider {
    /// Acquire credentials within `timeout`. Exceeding the deadline is
    /// an error, never a retry loop.
    fn bootstrap(
        &self,
        timeout: Duration,
    ) -> impl Future<Output = CrawlResult<SessionCredentials>> + Send;
}
