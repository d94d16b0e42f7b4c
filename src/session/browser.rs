//! Browser-driven challenge handshake
//!
//! Launches an isolated headless Chromium, suppresses the automation
//! flag, navigates to the listing page, waits for the challenge scripts
//! to settle, and reads back the cookie jar for the domain.

use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfigBuilder, HeadlessMode};
use chromiumoxide::cdp::browser_protocol::network::GetCookiesParams;
use futures::StreamExt;
use tokio::task::{self, JoinHandle};
use tracing::{debug, info, trace, warn};

use crate::config::CrawlConfig;
use crate::error::{CrawlError, CrawlResult};
use crate::utils::{BROWSER_PATH_ENV, DEFAULT_USER_AGENT};

use super::stealth;
use super::{SessionCredentials, SessionProvider};

/// Session provider backed by a real Chromium instance.
pub struct BrowserSessionProvider {
    listing_url: String,
    settle_delay: Duration,
    headless: bool,
}

impl BrowserSessionProvider {
    pub fn new(config: &CrawlConfig) -> Self {
        Self {
            listing_url: config.list_url().to_string(),
            settle_delay: config.settle_delay(),
            headless: config.headless(),
        }
    }

    async fn bootstrap_inner(&self) -> CrawlResult<SessionCredentials> {
        let chrome_path = find_browser_executable()?;

        let profile_dir =
            std::env::temp_dir().join(format!("cnvd_chrome_{}", std::process::id()));
        std::fs::create_dir_all(&profile_dir)
            .map_err(|e| CrawlError::Bootstrap(format!("failed to create profile dir: {e}")))?;

        let mut config_builder = BrowserConfigBuilder::default()
            .request_timeout(Duration::from_secs(10))
            .user_data_dir(profile_dir.clone())
            .chrome_executable(chrome_path);

        if self.headless {
            config_builder = config_builder.headless_mode(HeadlessMode::default());
        } else {
            config_builder = config_builder.with_head();
        }

        config_builder = config_builder
            .arg(format!("--user-agent={DEFAULT_USER_AGENT}"))
            .arg("--disable-gpu")
            .arg("--ignore-certificate-errors")
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--no-sandbox")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--mute-audio");

        let browser_config = config_builder
            .build()
            .map_err(|e| CrawlError::Bootstrap(format!("failed to build browser config: {e}")))?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| CrawlError::Bootstrap(format!("failed to launch browser: {e}")))?;

        let handler_task = task::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    // Chrome emits CDP events chromiumoxide doesn't model;
                    // those deserialization misses are noise.
                    trace!("browser handler event error: {e}");
                }
            }
        });

        let mut session = BrowserSession {
            browser: Some(browser),
            handler_task,
            profile_dir,
        };

        let outcome = session.collect_cookies(&self.listing_url, self.settle_delay).await;
        session.shutdown().await;
        outcome
    }
}

impl SessionProvider for BrowserSessionProvider {
    async fn bootstrap(&self, timeout: Duration) -> CrawlResult<SessionCredentials> {
        info!(
            "bootstrapping session against {} (deadline {:?})",
            self.listing_url, timeout
        );
        match tokio::time::timeout(timeout, self.bootstrap_inner()).await {
            Ok(result) => result,
            Err(_) => Err(CrawlError::Bootstrap(format!(
                "challenge handshake did not finish within {timeout:?}"
            ))),
        }
    }
}

/// Live browser plus its CDP handler task and scratch profile.
///
/// Drop is the backstop for the timeout path: aborting the handler and
/// removing the profile dir; the browser process itself is killed by
/// `Browser`'s own drop when `shutdown` never ran.
struct BrowserSession {
    browser: Option<Browser>,
    handler_task: JoinHandle<()>,
    profile_dir: PathBuf,
}

impl BrowserSession {
    async fn collect_cookies(
        &mut self,
        listing_url: &str,
        settle_delay: Duration,
    ) -> CrawlResult<SessionCredentials> {
        let browser = self
            .browser
            .as_ref()
            .ok_or_else(|| CrawlError::Bootstrap("browser already shut down".into()))?;

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| CrawlError::Bootstrap(format!("failed to open page: {e}")))?;

        // Must precede navigation: the challenge script checks the flag
        // before setting its cookies.
        stealth::inject(&page).await?;

        debug!("navigating to {listing_url}");
        page.goto(listing_url)
            .await
            .map_err(|e| CrawlError::Bootstrap(format!("navigation failed: {e}")))?;

        // Let the challenge scripts run and set their cookies.
        tokio::time::sleep(settle_delay).await;

        let response = page
            .execute(GetCookiesParams::default())
            .await
            .map_err(|e| CrawlError::Bootstrap(format!("failed to read cookies: {e}")))?;

        let cookie_header = response
            .result
            .cookies
            .iter()
            .map(|c| format!("{}={}", c.name, c.value))
            .collect::<Vec<_>>()
            .join("; ");

        let credentials = SessionCredentials::new(cookie_header);
        if !credentials.has_validation_cookies() {
            return Err(CrawlError::Bootstrap(format!(
                "required validation cookies not set: {}",
                credentials.cookie_header()
            )));
        }

        info!("session validated, {} cookie bytes", credentials.cookie_header().len());
        Ok(credentials)
    }

    async fn shutdown(mut self) {
        if let Some(mut browser) = self.browser.take() {
            if let Err(e) = browser.close().await {
                warn!("browser close failed: {e}");
            }
        }
        // Drop handles the handler task and profile dir.
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler_task.abort();
        if self.profile_dir.exists()
            && let Err(e) = std::fs::remove_dir_all(&self.profile_dir)
        {
            warn!("failed to remove profile dir {}: {e}", self.profile_dir.display());
        }
    }
}

/// Find a Chrome/Chromium executable.
///
/// The `CNVD_BROWSER_PATH` environment variable overrides discovery;
/// otherwise well-known install locations are probed, then `which` on
/// Unix.
pub fn find_browser_executable() -> CrawlResult<PathBuf> {
    if let Ok(path) = std::env::var(BROWSER_PATH_ENV) {
        let path = PathBuf::from(path);
        if path.exists() {
            info!("using browser from {BROWSER_PATH_ENV}: {}", path.display());
            return Ok(path);
        }
        warn!(
            "{BROWSER_PATH_ENV} points to non-existent file: {}",
            path.display()
        );
    }

    let paths: &[&str] = if cfg!(target_os = "windows") {
        &[
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files\Chromium\Application\chrome.exe",
        ]
    } else if cfg!(target_os = "macos") {
        &[
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
            "/opt/homebrew/bin/chromium",
        ]
    } else {
        &[
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
            "/opt/google/chrome/chrome",
        ]
    };

    for path_str in paths {
        let path = PathBuf::from(path_str);
        if path.exists() {
            info!("found browser at {}", path.display());
            return Ok(path);
        }
    }

    if !cfg!(target_os = "windows") {
        for cmd in &["chromium", "chromium-browser", "google-chrome", "chrome"] {
            if let Ok(output) = Command::new("which").arg(cmd).output()
                && output.status.success()
            {
                let path_str = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !path_str.is_empty() {
                    let path = PathBuf::from(path_str);
                    info!("found browser via 'which': {}", path.display());
                    return Ok(path);
                }
            }
        }
    }

    Err(CrawlError::Bootstrap(
        "no Chrome/Chromium executable found".into(),
    ))
}
