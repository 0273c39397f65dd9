use anyhow::Context;
use std::time::Instant;
use tracing::{error, info};
use marktplatz_scraper::{config::ScraperConfig, crawler::Crawler, report::ReportBuilder};

/// The main entry point of the application.
///
/// Loads the configuration, crawls the marketplace and writes the HTML report.
/// Usage: `marktplatz_scraper [max_results] [config_file]`
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let config_file = std::env::args()
        .nth(2)
        .unwrap_or_else(|| "scraper".to_string());

    let mut config = ScraperConfig::load(&config_file)
        .with_context(|| format!("failed to load configuration '{}'", config_file))?;

    if let Some(max_results) = std::env::args().nth(1) {
        config.max_results = max_results
            .parse()
            .with_context(|| format!("invalid result count '{}'", max_results))?;
    }

    let start_time = Instant::now();

    let crawler = Crawler::new(config).context("failed to set up the HTTP client")?;
    let records = crawler.run().await;

    let mut report = ReportBuilder::new(records);
    if crawler.config().sort_by_price {
        report = report.sorted_by_price();
    }

    if let Err(e) = report.save(&crawler.config().output_path).await {
        error!("Failed to write report: {}", e);
    }

    info!("Processing time: {:.2?}", start_time.elapsed());

    Ok(())
}
