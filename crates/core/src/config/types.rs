use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::time::Duration;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

/// Medusa Store API connection settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Medusa backend URL (e.g., "http://localhost:9000")
    pub base_url: String,
    /// Publishable API key sent as `x-publishable-api-key`
    pub publishable_key: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_timeout() -> u32 {
    30
}

/// Incremental search behaviour
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke before a lookup is issued.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Maximum number of products returned per lookup.
    #[serde(default = "default_result_limit")]
    pub result_limit: u32,
    /// Full listing view that receives submitted queries.
    #[serde(default = "default_listing_path")]
    pub listing_path: String,
    /// Country used when the storefront URL carries none.
    #[serde(default = "default_country_code")]
    pub default_country_code: String,
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            result_limit: default_result_limit(),
            listing_path: default_listing_path(),
            default_country_code: default_country_code(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_result_limit() -> u32 {
    6
}

fn default_listing_path() -> String {
    "/store".to_string()
}

fn default_country_code() -> String {
    "us".to_string()
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub catalog: SanitizedCatalogConfig,
    pub search: SearchConfig,
    pub server: ServerConfig,
}

/// Sanitized catalog config (publishable key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedCatalogConfig {
    pub base_url: String,
    pub publishable_key_configured: bool,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            catalog: SanitizedCatalogConfig {
                base_url: config.catalog.base_url.clone(),
                publishable_key_configured: !config.catalog.publishable_key.is_empty(),
                timeout_secs: config.catalog.timeout_secs,
            },
            search: config.search.clone(),
            server: config.server.clone(),
        }
    }
}
