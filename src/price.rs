use regex::Regex;
use std::sync::LazyLock;

/// Amounts like `950 €`, `1.200,50 Euro` or `80,00 eur`.
static PRICE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d{1,3}(?:\.\d{3})*(?:,\d{2})?)\s*(?:€|Euro|EUR)")
        .expect("price pattern is valid")
});

/// Finds the asking price in a post.
///
/// Sellers usually restate the final price at the end of a post, so the last
/// amount followed by a euro marker wins.
///
/// # Arguments
///
/// * `text` - The visible text of the post.
///
/// # Returns
///
/// The last amount found, or `None` if there is none.
pub fn extract_price(text: &str) -> Option<f64> {
    PRICE_PATTERN
        .captures_iter(text)
        .last()
        .and_then(|caps| caps.get(1))
        .and_then(|amount| clean_price(amount.as_str()))
}

/// Converts a German-formatted amount (`1.234,56`) to a number.
pub fn clean_price(amount: &str) -> Option<f64> {
    amount.replace('.', "").replace(',', ".").parse().ok()
}
