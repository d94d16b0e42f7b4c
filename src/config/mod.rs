//! Crawl configuration
//!
//! All fields default to the production CNVD values; `build()` validates
//! limits before any network activity happens.

mod builder;
mod types;

pub use builder::CrawlConfigBuilder;
pub use types::CrawlConfig;
