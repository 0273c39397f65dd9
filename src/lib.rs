use std::time::Duration;
use thiserror::Error;

pub mod config;
pub mod crawler;
pub mod fetch;
pub mod parser;
pub mod price;
pub mod report;
pub mod types;

// Re-export commonly used types
pub use config::ScraperConfig;
pub use crawler::Crawler;
pub use types::{ListingRecord, ThreadDetails, ThreadLink};

/// The `ScraperError` enum represents the errors that can occur while crawling the marketplace.
#[derive(Error, Debug)]
pub enum ScraperError {
    /// Represents an error that occurs during an HTTP request.
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    /// The server answered with a non-success status code.
    #[error("HTTP {status} for {url}")]
    StatusError {
        status: reqwest::StatusCode,
        url: String,
    },
    /// Represents an error that occurs during content extraction.
    #[error("Content extraction failed: {0}")]
    ExtractionError(String),
    /// The configuration could not be loaded or deserialized.
    #[error("Invalid configuration: {0}")]
    ConfigError(#[from] ::config::ConfigError),
    /// Writing the report failed.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// A type alias for `Result` with the `ScraperError` error type.
pub type Result<T> = std::result::Result<T, ScraperError>;

// Constants

/// Root of the forum, prepended to relative links and image sources.
pub const DEFAULT_BASE_URL: &str = "https://uhrforum.de";
/// First overview page of the marketplace section.
pub const DEFAULT_START_URL: &str = "https://uhrforum.de/forums/angebote.11/";
/// The default timeout duration for HTTP requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
/// Pause before every request to keep the load on the forum low.
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(1200);
/// The default number of listings to collect.
pub const DEFAULT_MAX_RESULTS: usize = 100;
/// At most this many images are taken from a thread's first post.
pub const DEFAULT_MAX_IMAGES: usize = 3;
/// File the HTML report is written to.
pub const DEFAULT_OUTPUT_PATH: &str = "angebote.html";
