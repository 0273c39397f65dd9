use crate::{Result, ScraperConfig, ScraperError};
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Client;
use scraper::Html;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// The `PageFetcher` struct downloads forum pages one at a time.
/// Every request is preceded by a fixed pause so the crawl never hammers the server.
pub struct PageFetcher {
    /// The HTTP client used for making requests.
    client: Client,
    /// Pause before each request.
    delay: Duration,
    /// Value of the `Accept-Language` header.
    accept_language: String,
}

impl PageFetcher {
    /// Creates a new `PageFetcher` with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - The configuration settings for the scraper.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `PageFetcher` instance, or an error if the client could not be created.
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout())
            .gzip(true)
            .build()
            .map_err(ScraperError::RequestError)?;

        Ok(Self {
            client,
            delay: config.request_delay(),
            accept_language: config.accept_language.clone(),
        })
    }

    /// Waits for the configured delay, then fetches and parses a page.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL of the page.
    ///
    /// # Returns
    ///
    /// A `Result` containing the parsed document, or an error if the request
    /// failed or the server answered with a non-success status.
    pub async fn fetch(&self, url: &str) -> Result<Html> {
        sleep(self.delay).await;

        match self.try_fetch(url).await {
            Ok(html) => Ok(Html::parse_document(&html)),
            Err(e) => {
                warn!("Failed to fetch {}: {}", url, e);
                Err(e)
            }
        }
    }

    async fn try_fetch(&self, url: &str) -> Result<String> {
        debug!("Fetching {}", url);

        let response = self
            .client
            .get(url)
            .header(
                ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header(ACCEPT_LANGUAGE, &self.accept_language)
            .send()
            .await?;

        let status = response.status();
        debug!("Response status: {}", status);

        if !status.is_success() {
            return Err(ScraperError::StatusError {
                status,
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}
