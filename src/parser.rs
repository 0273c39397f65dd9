use crate::{Result, ScraperError, ThreadLink};
use scraper::{ElementRef, Html, Selector};
use tracing::instrument;

/// The `ListingParser` struct extracts thread entries, first posts and images
/// from the forum's markup. It uses CSS selectors to identify the relevant parts of a page.
pub struct ListingParser {
    /// One entry per thread on an overview page.
    thread_item: Selector,
    /// The primary title anchor inside a thread entry.
    thread_title: Selector,
    /// Body of the first post on a thread page.
    first_post: Selector,
    /// Content images inside a post body.
    post_image: Selector,
}

impl Default for ListingParser {
    /// Provides the selectors matching the XenForo markup of uhrforum.de.
    fn default() -> Self {
        Self::new(
            "div.structItem--thread",
            "div.structItem-title a[data-tp-primary]",
            "article.message-body .bbWrapper",
            "img.bbImage",
        )
        .expect("built-in selectors are valid")
    }
}

impl ListingParser {
    /// Creates a new `ListingParser` with the given selectors.
    ///
    /// # Arguments
    ///
    /// * `thread_item` - Selects each thread entry on an overview page.
    /// * `thread_title` - Selects the title anchor within a thread entry.
    /// * `first_post` - Selects the first post body on a thread page.
    /// * `post_image` - Selects content images within the post body.
    ///
    /// # Returns
    ///
    /// A `Result` containing the parser, or an error if a selector does not parse.
    pub fn new(
        thread_item: &str,
        thread_title: &str,
        first_post: &str,
        post_image: &str,
    ) -> Result<Self> {
        Ok(Self {
            thread_item: parse_selector(thread_item)?,
            thread_title: parse_selector(thread_title)?,
            first_post: parse_selector(first_post)?,
            post_image: parse_selector(post_image)?,
        })
    }

    /// Lists the thread entries of an overview page in document order.
    ///
    /// Entries without a usable title anchor are kept as `None` so that an
    /// empty page can be told apart from a page of unusable entries.
    pub fn thread_links(&self, document: &Html) -> Vec<Option<ThreadLink>> {
        document
            .select(&self.thread_item)
            .map(|item| self.thread_link(item))
            .collect()
    }

    /// The title is built from the anchor's text nodes, each trimmed and
    /// joined without a separator.
    fn thread_link(&self, item: ElementRef<'_>) -> Option<ThreadLink> {
        let anchor = item.select(&self.thread_title).next()?;
        let href = anchor.value().attr("href")?;

        Some(ThreadLink {
            title: anchor.text().map(str::trim).collect(),
            href: href.to_string(),
        })
    }

    /// Finds the body of the first post on a thread page.
    pub fn first_post<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        document.select(&self.first_post).next()
    }

    /// Visible text of a post, text nodes joined by single spaces.
    pub fn post_text(&self, post: ElementRef<'_>) -> String {
        post.text().collect::<Vec<_>>().join(" ")
    }

    /// Collects image sources from the first `limit` content images of a post.
    ///
    /// `src` is preferred over `data-url`; images carrying neither still count
    /// towards the limit.
    #[instrument(skip(self, post))]
    pub fn post_images(&self, post: ElementRef<'_>, limit: usize) -> Vec<String> {
        post.select(&self.post_image)
            .take(limit)
            .filter_map(|img| {
                let attrs = img.value();
                attrs
                    .attr("src")
                    .filter(|src| !src.is_empty())
                    .or_else(|| attrs.attr("data-url").filter(|url| !url.is_empty()))
                    .map(str::to_string)
            })
            .collect()
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| ScraperError::ExtractionError(format!("invalid selector {selector:?}: {e}")))
}
