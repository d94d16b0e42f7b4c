use anyhow::{Context, Result};
use tracing::info;

use cnvd_harvester::CrawlConfig;

/// Crawl with the default configuration (offset range overridable via
/// CNVD_START_OFFSET / CNVD_END_OFFSET) and print the records as JSON.
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let mut builder = CrawlConfig::builder();
    if let Ok(value) = std::env::var("CNVD_START_OFFSET") {
        builder = builder.start_offset(
            value
                .parse()
                .with_context(|| format!("invalid CNVD_START_OFFSET: {value}"))?,
        );
    }
    if let Ok(value) = std::env::var("CNVD_END_OFFSET") {
        builder = builder.end_offset(
            value
                .parse()
                .with_context(|| format!("invalid CNVD_END_OFFSET: {value}"))?,
        );
    }
    let config = builder.build()?;

    let outcome = cnvd_harvester::crawl(config).await?;
    info!(
        "{} records ({} partial), fallback ratio {:.2}",
        outcome.records.len(),
        outcome.stats.partial_records,
        outcome.stats.fallback_ratio()
    );

    serde_json::to_writer_pretty(std::io::stdout().lock(), &outcome.records)
        .context("failed to serialize records")?;
    println!();
    Ok(())
}
