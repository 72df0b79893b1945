use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Client configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    /// Root of the FindMyRecipe API (scheme, host, optional path prefix)
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Number of recipes requested per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Quiescence delay before a typed query is sent, in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Bearer token to start the session with (e.g. from a previous login)
    pub token: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_timeout(),
            page_size: default_page_size(),
            debounce_ms: default_debounce_ms(),
            user_agent: default_user_agent(),
            token: None,
        }
    }
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_page_size() -> u32 {
    20
}

fn default_debounce_ms() -> u64 {
    400
}

fn default_user_agent() -> String {
    format!("findmyrecipe/{}", env!("CARGO_PKG_VERSION"))
}

impl ClientConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with FINDMYRECIPE__ prefix
    /// 2. findmyrecipe.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: FINDMYRECIPE__BASE_URL
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Load configuration from file and environment variables
///
/// See [`ClientConfig::load`] for the source priority.
pub fn load_config() -> Result<ClientConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("findmyrecipe").required(false))
        // Use double underscore for nested keys: FINDMYRECIPE__BASE_URL
        .add_source(
            Environment::with_prefix("FINDMYRECIPE")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
