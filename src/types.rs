/// One sale listing collected from the marketplace.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingRecord {
    /// Thread title as shown on the overview page.
    pub title: String,
    /// Asking price in euro, if one could be found in the first post.
    pub price: Option<f64>,
    /// Absolute image URLs from the first post, in document order.
    pub images: Vec<String>,
    /// Absolute URL of the thread.
    pub link: String,
}

impl ListingRecord {
    pub fn new(thread: ThreadLink, link: String, details: ThreadDetails) -> Self {
        Self {
            title: thread.title,
            price: details.price,
            images: details.images,
            link,
        }
    }
}

/// Price and images found in a thread's first post.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThreadDetails {
    pub price: Option<f64>,
    pub images: Vec<String>,
}

/// Title anchor of one thread entry on an overview page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadLink {
    /// Trimmed anchor text.
    pub title: String,
    /// The raw `href`, relative to the forum root.
    pub href: String,
}
