//! Command-line interface definitions for Headline Cards.
//!
//! Every option can also come from the environment, so a key can live in the
//! shell profile instead of the command line.

use clap::Parser;
use url::Url;

use crate::config::{DEFAULT_BASE_URL, DEFAULT_CATEGORY, DEFAULT_COUNTRY, PLACEHOLDER_API_KEY};

/// Command-line arguments for the Headline Cards application.
///
/// # Examples
///
/// ```sh
/// # Interactive session, key from the environment
/// NEWS_API_KEY=... headline_cards
///
/// # One refresh for a different category, then exit
/// headline_cards --category science --once
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// NewsAPI credential (get one at https://newsapi.org/register)
    #[arg(long, env = "NEWS_API_KEY", default_value = PLACEHOLDER_API_KEY, hide_default_value = true)]
    pub api_key: String,

    /// Base URL of the headline API
    #[arg(long, env = "NEWS_API_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: Url,

    /// Two-letter country code to request headlines for
    #[arg(long, env = "NEWS_COUNTRY", default_value = DEFAULT_COUNTRY)]
    pub country: String,

    /// Headline category (business, science, technology, ...)
    #[arg(long, env = "NEWS_CATEGORY", default_value = DEFAULT_CATEGORY)]
    pub category: String,

    /// Run a single refresh and exit instead of waiting for commands
    #[arg(long)]
    pub once: bool,

    /// Seconds between connectivity probes
    #[arg(long, default_value_t = 10)]
    pub probe_interval: u64,
}
