//! Detail page resolution
//!
//! Fetches one listing row's detail page and extracts the labeled
//! key/value table into a complete record. Resolution never retries: on
//! any failure the caller falls back to a partial record built from the
//! listing fields, so one bad detail page never drops its listing entry.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::error::{CrawlError, CrawlResult};
use crate::fetcher::Fetcher;
use crate::normalize::{collapse_whitespace, extract_identifier, map_hazard};
use crate::records::{Completeness, ListingRow, VulnerabilityRecord};
use crate::utils::ATTACHMENT_PLACEHOLDER;

static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.blkContainerSblk h1").expect("title selector"));
static FIELD_ROW_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.tableDiv table tr").expect("field row selector"));
static CELL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td").expect("cell selector"));

/// Fetch and parse `row`'s detail page into a complete record.
///
/// # Errors
///
/// Any fetch or structure error, unretried; the caller decides the
/// fallback.
pub(crate) async fn resolve(fetcher: &Fetcher, row: &ListingRow) -> CrawlResult<VulnerabilityRecord> {
    let body = fetcher.get(&row.detail_url).await?;
    let record = parse_detail_page(&body, row)?;
    debug!("resolved detail for {}", record.id);
    Ok(record)
}

/// Extract the labeled key/value table of a detail page.
///
/// The record starts from the row's listing-derived fields; each labeled
/// table row overwrites the canonical field its label selects, so an
/// absent label leaves the listing value in place.
pub(crate) fn parse_detail_page(html: &str, row: &ListingRow) -> CrawlResult<VulnerabilityRecord> {
    let document = Html::parse_document(html);

    let title = document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|h| element_text(&h))
        .unwrap_or_default();
    let title = title.trim();
    if title.is_empty() {
        return Err(CrawlError::PageStructure("detail title missing".into()));
    }

    let mut record = VulnerabilityRecord::from_listing(row, Completeness::Complete);
    record.title = title.to_string();

    let mut labeled_rows = 0;
    for tr in document.select(&FIELD_ROW_SELECTOR) {
        let cells: Vec<ElementRef> = tr.select(&CELL_SELECTOR).collect();
        let (Some(label_cell), Some(value_cell)) = (cells.first(), cells.get(1)) else {
            continue;
        };
        let label = element_text(label_cell);
        let value = element_text(value_cell);

        match label.trim() {
            "CNVD-ID" => {
                if let Ok(id) = extract_identifier(&value) {
                    record.id = id;
                }
            }
            "公开日期" => record.published_date = value.trim().to_string(),
            "危害级别" => record.hazard = map_hazard(&value),
            "影响产品" => record.product = collapse_whitespace(&value).trim().to_string(),
            "漏洞描述" => record.description = collapse_whitespace(&value).trim().to_string(),
            "漏洞类型" => record.types = value.trim().to_string(),
            "参考链接" => record.reference = value.trim().to_string(),
            "漏洞附件" => {
                record.attachment = if value.contains(ATTACHMENT_PLACEHOLDER) {
                    String::new()
                } else {
                    value.trim().to_string()
                };
            }
            _ => continue,
        }
        labeled_rows += 1;
    }

    if labeled_rows == 0 {
        return Err(CrawlError::PageStructure(
            "no labeled field rows in detail page".into(),
        ));
    }

    Ok(record)
}

fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>()
}
