//! Data models for provider payloads and their display representation.
//!
//! - [`HeadlinesResponse`]: the envelope returned by `top-headlines`
//! - [`RawArticle`]: one untrusted provider record, every field optional
//! - [`DisplayArticle`]: a fully defaulted record ready to become a card
//! - [`CycleState`]: where the current refresh cycle stands
//!
//! The provider promises nothing about individual records, so [`RawArticle`]
//! is built from an arbitrary JSON value and never fails to deserialize. Only
//! the `articles` array of the envelope is required; its metadata is read
//! leniently like the records themselves.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// The `top-headlines` response envelope.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadlinesResponse {
    /// `"ok"` or `"error"` as reported by the provider.
    #[serde(default, deserialize_with = "lenient_text")]
    pub status: Option<String>,
    /// Total matches on the provider side, not the length of `articles`.
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_results: Option<u64>,
    /// The first page of articles, in provider order.
    pub articles: Vec<RawArticle>,
}

/// A provider record with every field optional.
///
/// Fields of the wrong JSON type and empty strings are treated as missing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct RawArticle {
    pub title: Option<String>,
    pub description: Option<String>,
    /// `source.name` in the payload.
    pub source_name: Option<String>,
    /// `publishedAt` in the payload, unparsed.
    pub published_at: Option<String>,
    pub url: Option<String>,
    /// `urlToImage` in the payload.
    pub url_to_image: Option<String>,
}

impl From<Value> for RawArticle {
    fn from(value: Value) -> Self {
        let text = |key: &str| non_empty(value.get(key));

        Self {
            title: text("title"),
            description: text("description"),
            source_name: non_empty(value.get("source").and_then(|s| s.get("name"))),
            published_at: text("publishedAt"),
            url: text("url"),
            url_to_image: text("urlToImage"),
        }
    }
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(non_empty(Some(&value)))
}

fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    Ok(Value::deserialize(deserializer)?.as_u64())
}

fn non_empty(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// A normalized article, one per rendered card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayArticle {
    /// 1-based position in the batch it was fetched with.
    pub ordinal: usize,
    pub title: String,
    pub description: String,
    pub source_name: String,
    /// Short local date, or `"Invalid Date"`.
    pub published_date: String,
    pub article_url: Option<String>,
    pub image_url: Option<String>,
}

/// Progress of the refresh cycle owned by the controller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CycleState {
    #[default]
    Idle,
    Loading,
    Success(Vec<DisplayArticle>),
    Failed(String),
}

impl CycleState {
    /// Whether a cycle has started but not yet reached an outcome.
    ///
    /// # Returns
    ///
    /// `true` only for [`CycleState::Loading`]. The controller's finalizer uses
    /// this to tell an aborted cycle from a finished one.
    pub fn is_loading(&self) -> bool {
        matches!(self, CycleState::Loading)
    }
}
