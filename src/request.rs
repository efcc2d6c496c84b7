//! Builds the outbound `top-headlines` request for one cycle.

use crate::config::ApiConfig;
use crate::error::{CycleError, CycleResult};

/// One fully resolved provider request. Built fresh for every cycle.
#[derive(Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub endpoint: String,
    /// Filter parameters in the order they are sent.
    pub query: Vec<(String, String)>,
    /// Sent as `apiKey`; kept apart from `query` so it stays out of logs.
    pub credential: String,
}

impl RequestDescriptor {
    /// Query pairs as they go on the wire, credential last.
    pub fn wire_query(&self) -> Vec<(&str, &str)> {
        self.query
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .chain(std::iter::once(("apiKey", self.credential.as_str())))
            .collect()
    }

    /// Look up a filter parameter by name.
    ///
    /// # Arguments
    ///
    /// * `key` - Query parameter name, e.g. `"country"`
    ///
    /// # Returns
    ///
    /// The value, or `None` if the request carries no such filter. The
    /// credential is never returned.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl std::fmt::Debug for RequestDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestDescriptor")
            .field("endpoint", &self.endpoint)
            .field("query", &self.query)
            .finish_non_exhaustive()
    }
}

/// Compose the request, falling back to the configured country and category.
///
/// Values are passed through unchecked; the provider rejects bad ones with a
/// non-2xx status.
///
/// # Arguments
///
/// * `config` - Provider address, credential and default filters
/// * `country` - Country override, or `None` for the configured default
/// * `category` - Category override, or `None` for the configured default
///
/// # Errors
///
/// [`CycleError::Configuration`] when the credential is empty or still the
/// placeholder. No other input fails.
pub fn build(
    config: &ApiConfig,
    country: Option<&str>,
    category: Option<&str>,
) -> CycleResult<RequestDescriptor> {
    if !config.has_credential() {
        return Err(CycleError::Configuration);
    }

    let endpoint = format!(
        "{}/top-headlines",
        config.base_url.as_str().trim_end_matches('/')
    );
    let country = country.unwrap_or(&config.default_country);
    let category = category.unwrap_or(&config.default_category);

    Ok(RequestDescriptor {
        endpoint,
        query: vec![
            ("country".to_string(), country.to_string()),
            ("category".to_string(), category.to_string()),
        ],
        credential: config.api_key.clone(),
    })
}
