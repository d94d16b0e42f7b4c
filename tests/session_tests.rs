//! Session credential checks and an optional live-browser smoke test

use std::time::Duration;

use cnvd_harvester::{BrowserSessionProvider, CrawlConfig, SessionCredentials, SessionProvider};

#[test]
fn both_validation_cookies_are_required() {
    let full = SessionCredentials::new("__jsluid_s=a; __jsl_clearance_s=b; other=c");
    assert!(full.has_validation_cookies());

    let missing_clearance = SessionCredentials::new("__jsluid_s=a; other=c");
    assert!(!missing_clearance.has_validation_cookies());

    let missing_jsluid = SessionCredentials::new("__jsl_clearance_s=b");
    assert!(!missing_jsluid.has_validation_cookies());

    let empty = SessionCredentials::new("");
    assert!(!empty.has_validation_cookies());
}

#[test]
fn cookie_header_round_trips() {
    let credentials = SessionCredentials::new("a=1; b=2");
    assert_eq!(credentials.cookie_header(), "a=1; b=2");
}

#[tokio::test]
#[ignore] // Requires browser installation and network access
async fn live_bootstrap_produces_validation_cookies() {
    let config = CrawlConfig::builder().build().expect("default config");
    let provider = BrowserSessionProvider::new(&config);

    let credentials = provider
        .bootstrap(Duration::from_secs(20))
        .await
        .expect("bootstrap succeeds");

    assert!(credentials.has_validation_cookies());
}
