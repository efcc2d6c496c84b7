//! Static provider configuration, resolved once at start-up.

use url::Url;

use crate::cli::Cli;

/// Credential value shipped in the sample configuration; never a real key.
pub const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY_HERE";

pub const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2";
pub const DEFAULT_COUNTRY: &str = "us";
pub const DEFAULT_CATEGORY: &str = "technology";

/// Everything the request builder needs to address the provider.
#[derive(Clone)]
pub struct ApiConfig {
    pub api_key: String,
    pub base_url: Url,
    pub default_country: String,
    pub default_category: String,
}

impl ApiConfig {
    /// Build the provider configuration from parsed command-line arguments.
    ///
    /// # Arguments
    ///
    /// * `cli` - Parsed arguments, with environment fallbacks already applied
    ///
    /// # Returns
    ///
    /// An `ApiConfig` whose credential has surrounding whitespace trimmed. A
    /// missing key is not an error here; it surfaces on the first refresh.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            api_key: cli.api_key.trim().to_string(),
            base_url: cli.base_url.clone(),
            default_country: cli.country.clone(),
            default_category: cli.category.clone(),
        }
    }

    /// False when the credential is empty or still the placeholder.
    pub fn has_credential(&self) -> bool {
        !self.api_key.is_empty() && self.api_key != PLACEHOLDER_API_KEY
    }

    /// `host:port` of the provider, used by the reachability probe.
    ///
    /// # Returns
    ///
    /// `None` when the base URL has no host or no known default port.
    pub fn provider_authority(&self) -> Option<(String, u16)> {
        let host = self.base_url.host_str()?.to_string();
        let port = self.base_url.port_or_known_default()?;
        Some((host, port))
    }
}

// Hand-written so the credential never reaches a log line.
impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("api_key", &if self.has_credential() { "<set>" } else { "<unset>" })
            .field("base_url", &self.base_url.as_str())
            .field("default_country", &self.default_country)
            .field("default_category", &self.default_category)
            .finish()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: PLACEHOLDER_API_KEY.to_string(),
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
            default_country: DEFAULT_COUNTRY.to_string(),
            default_category: DEFAULT_CATEGORY.to_string(),
        }
    }
}
