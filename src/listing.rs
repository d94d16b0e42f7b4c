//! Paginated listing discovery
//!
//! The listing endpoint has no GET-addressable page parameter; each page
//! is one `POST {list_url}?flag=true` with `max`/`offset` form data. The
//! paginator walks offsets in strictly increasing order and yields the
//! parseable rows of each page, dropping malformed rows with a log.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;

use crate::config::CrawlConfig;
use crate::error::CrawlResult;
use crate::fetcher::Fetcher;
use crate::normalize::{extract_identifier, map_hazard};
use crate::records::{Hazard, ListingRow};

static ROW_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table tr.current").expect("row selector"));
static CELL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td").expect("cell selector"));
static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("anchor selector"));

/// Lazy, finite, non-restartable sequence of listing pages.
pub struct ListingPaginator<'a> {
    fetcher: &'a Fetcher,
    list_url: Url,
    page_size: u32,
    offset: u32,
    end_offset: u32,
    dropped_rows: usize,
    done: bool,
}

impl<'a> ListingPaginator<'a> {
    pub(crate) fn new(fetcher: &'a Fetcher, config: &CrawlConfig) -> CrawlResult<Self> {
        Ok(Self {
            fetcher,
            list_url: Url::parse(config.list_url())?,
            page_size: config.page_size(),
            offset: config.start_offset(),
            end_offset: config.end_offset(),
            dropped_rows: 0,
            done: false,
        })
    }

    /// Fetch and parse the next page.
    ///
    /// Returns `Ok(None)` once the configured offset range is exhausted
    /// or a page yields zero parseable rows (end-of-results sentinel).
    /// A fetch error is returned as-is; the sequence cannot be resumed
    /// afterwards.
    pub(crate) async fn next_page(&mut self) -> CrawlResult<Option<Vec<ListingRow>>> {
        if self.done || self.offset >= self.end_offset {
            return Ok(None);
        }

        let page_url = format!("{}?flag=true", self.list_url);
        let form = [
            ("max", self.page_size.to_string()),
            ("offset", self.offset.to_string()),
        ];
        debug!("requesting listing page at offset {}", self.offset);
        let body = self.fetcher.post_form(&page_url, &form).await?;
        self.offset += self.page_size;

        let (rows, dropped) = parse_listing_page(&body, &self.list_url);
        self.dropped_rows += dropped;

        if rows.is_empty() {
            debug!("listing page yielded no parseable rows, treating as end of results");
            self.done = true;
            return Ok(None);
        }
        Ok(Some(rows))
    }

    /// Rows dropped as structurally malformed so far.
    pub(crate) fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }
}

/// Scan one listing page for current rows, returning the parseable rows
/// and the count of malformed ones.
///
/// Row layout: the first cell's anchor carries the detail href and
/// title, the second cell the localized hazard string, the sixth the
/// publication date. A row missing link, title, or date, or whose
/// detail URL carries no CNVD identifier, is malformed: dropped and
/// logged, never retried.
pub(crate) fn parse_listing_page(html: &str, base: &Url) -> (Vec<ListingRow>, usize) {
    let document = Html::parse_document(html);
    let mut rows = Vec::new();
    let mut dropped = 0;

    for tr in document.select(&ROW_SELECTOR) {
        let cells: Vec<ElementRef> = tr.select(&CELL_SELECTOR).collect();

        let anchor = cells.first().and_then(|c| c.select(&ANCHOR_SELECTOR).next());
        let href = anchor
            .and_then(|a| a.value().attr("href"))
            .unwrap_or_default()
            .trim();
        let title = anchor.map(|a| cell_text(&a)).unwrap_or_default();
        let title = title.trim();
        let published_date = cells.get(5).map(cell_text).unwrap_or_default();
        let published_date = published_date.trim();

        if href.is_empty() || title.is_empty() || published_date.is_empty() {
            warn!("listing row missing link, title, or date on {base}");
            dropped += 1;
            continue;
        }

        let detail_url = match base.join(href) {
            Ok(url) => url,
            Err(e) => {
                warn!("listing row href {href} did not resolve: {e}");
                dropped += 1;
                continue;
            }
        };

        let id = match extract_identifier(detail_url.as_str()) {
            Ok(id) => id,
            Err(_) => {
                warn!("no identifier in detail link {detail_url}");
                dropped += 1;
                continue;
            }
        };

        let hazard = cells
            .get(1)
            .map(|c| map_hazard(&cell_text(c)))
            .unwrap_or(Hazard::Unknown);

        rows.push(ListingRow {
            detail_url: detail_url.into(),
            title: title.to_string(),
            hazard,
            published_date: published_date.to_string(),
            id,
        });
    }

    (rows, dropped)
}

fn cell_text(cell: &ElementRef) -> String {
    cell.text().collect::<String>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Hazard;

    fn listing_html(rows: &str) -> String {
        format!(
            r#"<html><body><div class="blkContainer"><table><tbody>{rows}</tbody></table></div></body></html>"#
        )
    }

    fn row(href: &str, title: &str, hazard: &str, date: &str) -> String {
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

    fn base() -> Url {
        Url::parse("https://www.cnvd.org.cn/flaw/list.htm").expect("base url")
    }

    #[test]
    fn parses_valid_rows() {
        let html = listing_html(&format!(
            "{}{}",
            row("/flaw/show/CNVD-2024-00001", "Some overflow", "高", "2024-01-15"),
            row("/flaw/show/CNVD-2024-00002", "Some bypass", "低", "2024-01-16"),
        ));
        let (rows, dropped) = parse_listing_page(&html, &base());

        assert_eq!(dropped, 0);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, "CNVD-2024-00001");
        assert_eq!(
            rows[0].detail_url,
            "https://www.cnvd.org.cn/flaw/show/CNVD-2024-00001"
        );
        assert_eq!(rows[0].title, "Some overflow");
        assert_eq!(rows[0].hazard, Hazard::High);
        assert_eq!(rows[0].published_date, "2024-01-15");
        assert_eq!(rows[1].hazard, Hazard::Low);
    }

    #[test]
    fn drops_row_with_empty_href() {
        let html = listing_html(&format!(
            "{}{}",
            row("", "Broken entry", "中", "2024-01-15"),
            row("/flaw/show/CNVD-2024-00003", "Good entry", "中", "2024-01-15"),
        ));
        let (rows, dropped) = parse_listing_page(&html, &base());

        assert_eq!(dropped, 1);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "CNVD-2024-00003");
    }

    #[test]
    fn drops_row_without_identifier_in_link() {
        let html = listing_html(&row("/flaw/show/12345", "No id here", "高", "2024-01-15"));
        let (rows, dropped) = parse_listing_page(&html, &base());

        assert!(rows.is_empty());
        assert_eq!(dropped, 1);
    }

    #[test]
    fn drops_row_missing_date() {
        let html = listing_html(&row("/flaw/show/CNVD-2024-00004", "No date", "高", " "));
        let (rows, dropped) = parse_listing_page(&html, &base());

        assert!(rows.is_empty());
        assert_eq!(dropped, 1);
    }

    #[test]
    fn ignores_rows_without_current_marker() {
        let html = listing_html(
            r#"<tr><td><a href="/flaw/show/CNVD-2024-00005">Not current</a></td><td>高</td><td></td><td></td><td></td><td>2024-01-15</td></tr>"#,
        );
        let (rows, dropped) = parse_listing_page(&html, &base());

        assert!(rows.is_empty());
        assert_eq!(dropped, 0);
    }
}
