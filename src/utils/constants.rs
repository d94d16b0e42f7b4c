//! Shared configuration constants for the harvester
//!
//! Default values used throughout the codebase to ensure consistency and
//! avoid magic numbers.

/// Listing endpoint for CNVD flaw disclosures
pub const DEFAULT_LIST_URL: &str = "https://www.cnvd.org.cn/flaw/list.htm";

/// The only host the fetchers will talk to by default
pub const DEFAULT_ALLOWED_DOMAIN: &str = "www.cnvd.org.cn";

/// Rows per listing page. The site serves up to 100 per POST.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Default offset range: one page of 100 rows.
///
/// The site holds well over 100k entries; widening the range is a
/// deliberate configuration decision, never discovered from the site.
pub const DEFAULT_START_OFFSET: u32 = 0;

/// End of the default offset range, exclusive
pub const DEFAULT_END_OFFSET: u32 = 100;

/// Maximum in-flight requests per fetcher instance.
///
/// Conservative ceiling that keeps request pressure below what the
/// challenge middleware tolerates. Applies independently to the listing
/// and detail fetchers.
pub const DEFAULT_CONCURRENCY: usize = 2;

/// Upper bound for the randomized per-request politeness delay
pub const DEFAULT_MAX_DELAY_SECS: u64 = 5;

/// Per-request timeout after which a fetch is abandoned
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

/// Deadline for the whole session bootstrap, browser launch included
pub const DEFAULT_BOOTSTRAP_TIMEOUT_SECS: u64 = 20;

/// Settle interval after navigation, giving the challenge scripts time
/// to execute and set their cookies
pub const DEFAULT_SETTLE_DELAY_SECS: u64 = 5;

/// Cookie names that prove a passed anti-bot challenge. Bootstrap fails
/// hard unless both are present in the jar.
pub const VALIDATION_COOKIES: [&str; 2] = ["__jsluid_s", "__jsl_clearance_s"];

/// Attachment cell text meaning "not yet public"; normalized to empty
pub const ATTACHMENT_PLACEHOLDER: &str = "附件暂不公开";

/// Environment variable overriding browser executable discovery
pub const BROWSER_PATH_ENV: &str = "CNVD_BROWSER_PATH";

/// Chrome user agent string sent on every request
///
/// Updated: 2025-01-29 to Chrome 132 (current stable)
/// Next update: 2025-04-29 (quarterly schedule)
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";

/// Pool the detail fetcher rotates through, one pick per request, to
/// decorrelate the detail phase from the listing phase
pub const USER_AGENT_POOL: [&str; 4] = [
    DEFAULT_USER_AGENT,
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.6778.204 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.6778.264 Safari/537.36",
];
