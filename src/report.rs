use crate::{ListingRecord, Result};
use chrono::{DateTime, Local};
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::cmp::Ordering;
use std::path::Path;
use tracing::info;

/// Column headings of the listing table.
const COLUMNS: [&str; 4] = ["Hersteller/Modell", "Preis (€)", "Bilder", "Link"];

/// Shown in the image column when a listing has no pictures.
pub const NO_IMAGES: &str = "Keine Bilder";

/// Shown in the price column when no price was found.
pub const NO_PRICE: &str = "-";

/// The `ReportBuilder` struct turns collected listings into a standalone HTML page.
pub struct ReportBuilder {
    /// The listings to render, in table order.
    records: Vec<ListingRecord>,
    /// When the report was generated.
    generated_at: DateTime<Local>,
}

impl ReportBuilder {
    /// Creates a new `ReportBuilder` for the given listings.
    ///
    /// # Arguments
    ///
    /// * `records` - The listings in discovery order.
    pub fn new(records: Vec<ListingRecord>) -> Self {
        Self {
            records,
            generated_at: Local::now(),
        }
    }

    /// Overrides the generation timestamp shown under the heading.
    pub fn with_generated_at(mut self, generated_at: DateTime<Local>) -> Self {
        self.generated_at = generated_at;
        self
    }

    /// Orders the listings by price, most expensive first.
    /// Listings without a price go last; ties keep their discovery order.
    pub fn sorted_by_price(mut self) -> Self {
        self.records.sort_by(|a, b| match (a.price, b.price) {
            (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Builds the complete HTML document.
    pub fn build(&self) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="de">
<head>
    <meta charset="UTF-8">
    <title>Uhrforum Marktplatz Scraper</title>
    <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/css/bootstrap.min.css">
    <style>
        body {{ padding: 30px; background-color: #f4f7f6; font-family: sans-serif; }}
        .container-fluid {{ background: white; padding: 20px; border-radius: 10px; box-shadow: 0 4px 6px rgba(0,0,0,0.1); }}
        img {{ border-radius: 4px; object-fit: cover; height: 80px; }}
        th {{ background-color: #343a40 !important; color: white; }}
        tr:hover {{ background-color: #f1f1f1; }}
    </style>
</head>
<body>
    <div class="container-fluid">
        <h1 class="mb-4">Gefundene Verkaufsanzeigen ({count})</h1>
        <p class="text-muted">Erstellt am {generated}</p>
{table}
    </div>
</body>
</html>
"#,
            count = self.records.len(),
            generated = self.generated_at.format("%d.%m.%Y %H:%M"),
            table = self.table(),
        )
    }

    /// Renders the listing table, one row per record.
    pub fn table(&self) -> String {
        let header = COLUMNS
            .iter()
            .map(|column| format!("<th>{}</th>", encode_text(column)))
            .collect::<String>();

        let rows = self
            .records
            .iter()
            .map(|record| {
                format!(
                    "      <tr>\n        <td>{}</td>\n        <td>{}</td>\n        <td>{}</td>\n        <td>{}</td>\n      </tr>\n",
                    encode_text(&record.title),
                    format_price(record.price),
                    format_images(&record.images),
                    format_link(&record.link),
                )
            })
            .collect::<String>();

        format!(
            "<table border=\"1\" class=\"dataframe table table-hover\">\n  <thead>\n    <tr style=\"text-align: right;\">{}</tr>\n  </thead>\n  <tbody>\n{}  </tbody>\n</table>",
            header, rows
        )
    }

    /// Writes the report to `path`, replacing any previous file.
    ///
    /// Nothing is written when there are no listings.
    ///
    /// # Returns
    ///
    /// `true` if the file was written.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<bool> {
        let path = path.as_ref();

        if self.is_empty() {
            info!("No listings to save");
            return Ok(false);
        }

        tokio::fs::write(path, self.build()).await?;
        info!("Done! Saved {} listings to '{}'", self.len(), path.display());
        Ok(true)
    }
}

fn format_price(price: Option<f64>) -> String {
    match price {
        Some(price) => format!("{:.2}", price),
        None => NO_PRICE.to_string(),
    }
}

fn format_images(images: &[String]) -> String {
    if images.is_empty() {
        return NO_IMAGES.to_string();
    }

    images
        .iter()
        .map(|url| {
            format!(
                r#"<img src="{}" width="120" style="margin:2px;">"#,
                encode_double_quoted_attribute(url)
            )
        })
        .collect()
}

fn format_link(link: &str) -> String {
    format!(
        r#"<a href="{}" target="_blank">Link</a>"#,
        encode_double_quoted_attribute(link)
    )
}
