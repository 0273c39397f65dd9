use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::Result;

/// The `ScraperConfig` struct holds the configuration settings for a crawl.
/// It is built once and handed to the crawler, which never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Root URL of the forum, prepended to relative links.
    pub base_url: String,
    /// First overview page of the marketplace section.
    pub start_url: String,
    /// Thread titles must start with one of these (case-sensitive).
    pub allowed_prefixes: Vec<String>,
    /// The crawl stops as soon as this many listings have been collected.
    pub max_results: usize,
    /// The maximum number of images taken from a thread's first post.
    pub max_images: usize,
    /// Pause before each request, in milliseconds.
    pub request_delay_ms: u64,
    /// The timeout for HTTP requests, in seconds.
    pub timeout_secs: u64,
    /// The user agent string to be used in HTTP requests.
    pub user_agent: String,
    /// Value of the `Accept-Language` header.
    pub accept_language: String,
    /// Where the HTML report is written.
    pub output_path: String,
    /// Sort the report by price, most expensive first.
    pub sort_by_price: bool,
}

impl Default for ScraperConfig {
    /// Provides default values for the `ScraperConfig` struct.
    ///
    /// # Returns
    ///
    /// A `ScraperConfig` targeting the uhrforum.de sales section.
    fn default() -> Self {
        Self {
            base_url: String::from(crate::DEFAULT_BASE_URL),
            start_url: String::from(crate::DEFAULT_START_URL),
            allowed_prefixes: vec![
                String::from("[Verkauf]"),
                String::from("[Verkauf-Tausch]"),
            ],
            max_results: crate::DEFAULT_MAX_RESULTS,
            max_images: crate::DEFAULT_MAX_IMAGES,
            request_delay_ms: crate::DEFAULT_REQUEST_DELAY.as_millis() as u64,
            timeout_secs: crate::DEFAULT_TIMEOUT.as_secs(),
            user_agent: String::from(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
            ),
            accept_language: String::from("de-DE,de;q=0.9,en-US;q=0.8,en;q=0.7"),
            output_path: String::from(crate::DEFAULT_OUTPUT_PATH),
            sort_by_price: false,
        }
    }
}

impl ScraperConfig {
    /// Loads the configuration in layers: built-in defaults, then the optional
    /// file `path` (any format the `config` crate understands), then
    /// `SCRAPER_*` environment variables.
    ///
    /// `SCRAPER_ALLOWED_PREFIXES` takes a comma-separated list.
    pub fn load(path: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("SCRAPER")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("allowed_prefixes"),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// The pause inserted before every request.
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    /// The per-request network timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// URL of the overview page `page` (1-based).
    pub fn page_url(&self, page: usize) -> String {
        if page > 1 {
            format!("{}page-{}", self.start_url, page)
        } else {
            self.start_url.clone()
        }
    }

    /// Whether a thread title qualifies for the report.
    pub fn is_allowed_title(&self, title: &str) -> bool {
        self.allowed_prefixes
            .iter()
            .any(|prefix| title.starts_with(prefix.as_str()))
    }

    /// Thread URL for an overview `href`, always rooted at the base URL.
    pub fn thread_url(&self, href: &str) -> String {
        format!("{}{}", self.base_url, href)
    }

    /// Turns a site-relative URL into an absolute one by prefixing the base URL.
    /// URLs that already start with `http` are returned unchanged.
    pub fn absolute_url(&self, url: &str) -> String {
        if url.starts_with("http") {
            url.to_string()
        } else {
            format!("{}{}", self.base_url, url)
        }
    }
}
