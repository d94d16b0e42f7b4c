//! Machine-translation collaborator
//!
//! Not part of the crawl itself: callers invoke this on whichever
//! extracted fields need localization. Talks to the public gtx endpoint
//! with its own client rather than the rate-limited fetchers, which are
//! scoped to the disclosure site.

use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::error::{CrawlError, CrawlResult};

const TRANSLATE_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

/// Translate `text` into `target_lang` (an ISO 639-1 code such as
/// `"en"`), auto-detecting the source language.
pub async fn translate(text: &str, target_lang: &str) -> CrawlResult<String> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .map_err(|e| CrawlError::Config(format!("failed to build http client: {e}")))?;

    debug!("translating {} chars to {target_lang}", text.len());
    let response = client
        .get(TRANSLATE_ENDPOINT)
        .query(&[
            ("client", "gtx"),
            ("sl", "auto"),
            ("tl", target_lang),
            ("dt", "t"),
            ("q", text),
        ])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(CrawlError::Http(format!("{status} from translation endpoint")));
    }

    let payload: Value = response.json().await?;
    join_segments(&payload)
        .ok_or_else(|| CrawlError::PageStructure("unexpected translation payload".into()))
}

/// Convenience wrapper for the common Chinese-to-English case.
pub async fn cn_to_en(text: &str) -> CrawlResult<String> {
    translate(text, "en").await
}

/// The gtx payload is a nested array whose first element lists
/// `[translated, original, ...]` segments; join the translated parts.
fn join_segments(payload: &Value) -> Option<String> {
    let segments = payload.get(0)?.as_array()?;
    let mut out = String::new();
    for segment in segments {
        if let Some(part) = segment.get(0).and_then(Value::as_str) {
            out.push_str(part);
        }
    }
    Some(out)
}
