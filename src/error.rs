//! Error types for crawl operations
//!
//! Only two variants terminate a run: `Config` (rejected before any
//! network activity) and `Bootstrap` (the crawl cannot proceed without a
//! validated session). Everything else is absorbed locally into a dropped
//! listing row or a partial record.

/// Error type for crawl operations
#[derive(Debug, thiserror::Error)]
pub enum CrawlError {
    /// Invalid configuration, surfaced at setup before any network activity
    #[error("configuration error: {0}")]
    Config(String),

    /// Session bootstrap failed: browser launch, missing validation
    /// cookies, or the bootstrap deadline elapsed
    #[error("session bootstrap failed: {0}")]
    Bootstrap(String),

    /// Request target is outside the domain allowlist, rejected pre-send
    #[error("domain not in allowlist: {0}")]
    DomainNotAllowed(String),

    /// Transport-level failure or non-success status
    #[error("request failed: {0}")]
    Http(String),

    /// Per-request timeout elapsed
    #[error("request timed out")]
    Timeout,

    /// Response did not match the expected page structure
    #[error("unexpected page structure: {0}")]
    PageStructure(String),

    /// Input contained no CNVD identifier
    #[error("no CNVD identifier found")]
    IdentifierNotFound,

    /// Malformed URL
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

impl From<reqwest::Error> for CrawlError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err.to_string())
        }
    }
}

/// Convenience alias for Result with [`CrawlError`]
pub type CrawlResult<T> = Result<T, CrawlError>;
