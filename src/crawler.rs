use crate::fetch::PageFetcher;
use crate::parser::ListingParser;
use crate::price::extract_price;
use crate::{ListingRecord, Result, ScraperConfig, ThreadDetails, ThreadLink};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, instrument};

/// The `Crawler` walks the marketplace overview pages and collects every
/// listing whose title carries one of the allowed prefixes.
pub struct Crawler {
    /// The configuration settings for the crawl.
    config: ScraperConfig,
    /// Downloads pages with the configured pause between requests.
    fetcher: PageFetcher,
    /// Reads thread entries, posts and images from the markup.
    parser: ListingParser,
}

impl Crawler {
    /// Creates a new `Crawler` with the given configuration.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Crawler`, or an error if the HTTP client could not be created.
    pub fn new(config: ScraperConfig) -> Result<Self> {
        let fetcher = PageFetcher::new(&config)?;

        Ok(Self {
            config,
            fetcher,
            parser: ListingParser::default(),
        })
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Collects listings page by page until `max_results` records are found,
    /// an overview page cannot be fetched, or a page has no thread entries.
    ///
    /// Failures never abort the crawl; whatever was collected so far is returned.
    pub async fn run(&self) -> Vec<ListingRecord> {
        let max_results = self.config.max_results;
        let mut records = Vec::new();
        let mut page = 1;

        info!("Searching for up to {} sale listings", max_results);

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );

        while records.len() < max_results {
            let page_url = self.config.page_url(page);
            spinner.set_message(format!("Scanning overview page {}", page));
            info!("Scanning overview page {}", page);

            let entries = match self.fetcher.fetch(&page_url).await {
                Ok(document) => self.parser.thread_links(&document),
                Err(_) => break,
            };

            if entries.is_empty() {
                info!("No more threads found");
                break;
            }

            for entry in entries {
                if records.len() >= max_results {
                    break;
                }

                let Some(link) = entry else { continue };
                if !self.config.is_allowed_title(&link.title) {
                    debug!("Skipping {}", link.title);
                    continue;
                }

                info!("Match {}: {}", records.len() + 1, link.title);
                spinner.set_message(format!("Reading {}", link.title));

                records.push(self.collect(link).await);
            }

            page += 1;
        }

        spinner.finish_with_message(format!("Collected {} listings", records.len()));
        records
    }

    async fn collect(&self, link: ThreadLink) -> ListingRecord {
        let url = self.config.thread_url(&link.href);
        let details = match self.scrape_thread_details(&url).await {
            Ok(Some(details)) => details,
            Ok(None) => {
                debug!("No first post found in {}", url);
                ThreadDetails::default()
            }
            Err(_) => ThreadDetails::default(),
        };

        ListingRecord::new(link, url, details)
    }

    /// Reads price and images from the first post of a thread.
    ///
    /// # Returns
    ///
    /// `Err` if the page could not be fetched, `Ok(None)` if it has no first post.
    #[instrument(skip(self))]
    pub async fn scrape_thread_details(&self, url: &str) -> Result<Option<ThreadDetails>> {
        let document = self.fetcher.fetch(url).await?;

        let Some(post) = self.parser.first_post(&document) else {
            return Ok(None);
        };

        let price = extract_price(&self.parser.post_text(post));
        let images = self
            .parser
            .post_images(post, self.config.max_images)
            .iter()
            .map(|src| self.config.absolute_url(src))
            .collect();

        Ok(Some(ThreadDetails { price, images }))
    }
}
