//! Automation-detection evasion
//!
//! The challenge script probes `navigator.webdriver` before anything
//! else runs, so the override must be registered for new documents
//! ahead of navigation rather than evaluated afterwards.

use chromiumoxide::Page;
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use tracing::debug;

use crate::error::{CrawlError, CrawlResult};

const WEBDRIVER_EVASION: &str =
    "Object.defineProperty(navigator, 'webdriver', { get: () => false });";

/// Register the webdriver evasion to run before any page script.
pub(crate) async fn inject(page: &Page) -> CrawlResult<()> {
    debug!("registering webdriver evasion for new documents");
    page.execute(AddScriptToEvaluateOnNewDocumentParams {
        source: WEBDRIVER_EVASION.to_string(),
        include_command_line_api: None,
        world_name: None,
        run_immediately: None,
    })
    .await
    .map_err(|e| CrawlError::Bootstrap(format!("failed to register evasion script: {e}")))?;
    Ok(())
}
