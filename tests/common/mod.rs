//! Test utilities and fixtures for the harvester test suite

use std::time::Duration;

use cnvd_harvester::{CrawlConfig, CrawlResult, SessionCredentials, SessionProvider};

/// Cookie string carrying both validation markers.
#[allow(dead_code)]
pub const VALID_COOKIES: &str = "__jsluid_s=abc123; __jsl_clearance_s=def456";

/// Session provider that hands back canned credentials without touching
/// a browser.
#[allow(dead_code)]
pub struct StubSessionProvider {
    cookie_header: String,
}

impl StubSessionProvider {
    #[allow(dead_code)]
    pub fn new(cookie_header: &str) -> Self {
        Self {
            cookie_header: cookie_header.to_string(),
        }
    }
}

impl SessionProvider for StubSessionProvider {
    async fn bootstrap(&self, _timeout: Duration) -> CrawlResult<SessionCredentials> {
        Ok(SessionCredentials::new(self.cookie_header.clone()))
    }
}

/// Config pointed at a mockito server, with delays zeroed so tests run
/// fast.
#[allow(dead_code)]
pub fn test_config(server_url: &str) -> CrawlConfig {
    CrawlConfig::builder()
        .list_url(format!("{server_url}/flaw/list.htm"))
        .allowed_domains(vec!["127.0.0.1".to_string()])
        .page_size(100)
        .start_offset(0)
        .end_offset(100)
        .concurrency(2)
        .max_delay(Duration::ZERO)
        .request_timeout(Duration::from_secs(5))
        .build()
        .expect("test config is valid")
}

/// A listing page with the given `<tr class="current">` rows.
#[allow(dead_code)]
pub fn listing_page(rows: &str) -> String {
    format!(
        r#"<html><body>
        <div class="mw Main clearfix"><div class="blkContainer"><div>
        <div><table><tbody>{rows}</tbody></table></div>
        </div></div></div>
        </body></html>"#
    )
}

/// One listing row in the layout the parser expects: anchor in the
/// first cell, hazard in the second, date in the sixth.
#[allow(dead_code)]
pub fn listing_row(href: &str, title: &str, hazard: &str, date: &str) -> String {
    format!(
        r#"<tr class="current">
            <td><a href="{href}" title="{title}">{title}</a></td>
            <td>{hazard}</td>
            <td>0</td>
            <td>0</td>
            <td>N/A</td>
            <td>{date}</td>
        </tr>"#
    )
}

/// A detail page with the given labeled field rows.
#[allow(dead_code)]
pub fn detail_page(title: &str, fields: &[(&str, &str)]) -> String {
    let rows: String = fields
        .iter()
        .map(|(label, value)| format!("<tr><td>{label}</td><td>{value}</td></tr>"))
        .collect();
    format!(
        r#"<html><body>
        <div class="mw Main clearfix"><div class="blkContainer">
        <div class="blkContainerPblk"><div class="blkContainerSblk">
            <h1>{title}</h1>
            <div class="blkContainerSblkCon clearfix">
                <div class="tableDiv"><table><tbody>{rows}</tbody></table></div>
            </div>
        </div></div>
        </div></div>
        </body></html>"#
    )
}
