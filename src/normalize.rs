//! Turns untrusted provider records into display-ready articles.
//!
//! [`normalize`] is total: whatever the provider sent, the result has every
//! text field filled in. Missing URLs stay missing so the card can leave the
//! corresponding line out.

use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone};

use crate::models::{DisplayArticle, RawArticle};

pub const NO_TITLE: &str = "No title available";
pub const NO_DESCRIPTION: &str = "No description available";
pub const UNKNOWN_SOURCE: &str = "Unknown source";

/// Rendered in place of a publication date that is missing or unparsable.
pub const INVALID_DATE: &str = "Invalid Date";

/// Map one raw record to a display article at 1-based position `ordinal`.
pub fn normalize(raw: RawArticle, ordinal: usize) -> DisplayArticle {
    let published_date = format_published_date(raw.published_at.as_deref(), &Local);

    DisplayArticle {
        ordinal,
        title: raw.title.unwrap_or_else(|| NO_TITLE.to_string()),
        description: raw.description.unwrap_or_else(|| NO_DESCRIPTION.to_string()),
        source_name: raw.source_name.unwrap_or_else(|| UNKNOWN_SOURCE.to_string()),
        published_date,
        article_url: raw.url,
        image_url: raw.url_to_image,
    }
}

/// Normalize a batch, numbering it from 1 in input order.
pub fn normalize_all(raw: Vec<RawArticle>) -> Vec<DisplayArticle> {
    raw.into_iter()
        .enumerate()
        .map(|(i, article)| normalize(article, i + 1))
        .collect()
}

/// Format `publishedAt` as a short `M/D/YYYY` date in `tz`.
///
/// Accepts RFC 3339 timestamps (what the provider sends) and bare
/// `YYYY-MM-DD` dates. Anything else yields [`INVALID_DATE`].
pub fn format_published_date<Tz: TimeZone>(raw: Option<&str>, tz: &Tz) -> String {
    let Some(raw) = raw.map(str::trim) else {
        return INVALID_DATE.to_string();
    };

    let date = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(tz).date_naive())
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"));

    match date {
        Ok(d) => format!("{}/{}/{}", d.month(), d.day(), d.year()),
        Err(_) => INVALID_DATE.to_string(),
    }
}
