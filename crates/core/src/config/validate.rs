use super::{types::Config, ConfigError};

/// Highest `search.result_limit` accepted.
pub const MAX_RESULT_LIMIT: u32 = 100;

/// Validate configuration
/// Currently validates:
/// - Catalog section exists (enforced by serde)
/// - Server port is not 0
/// - Catalog base URL is http(s)
/// - Result limit, listing path and default country are usable
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    // Catalog validation
    let base_url = &config.catalog.base_url;
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(ConfigError::ValidationError(format!(
            "catalog.base_url must start with http:// or https:// (got '{}')",
            base_url
        )));
    }

    // Search validation
    let search = &config.search;
    if search.result_limit == 0 || search.result_limit > MAX_RESULT_LIMIT {
        return Err(ConfigError::ValidationError(format!(
            "search.result_limit must be between 1 and {}",
            MAX_RESULT_LIMIT
        )));
    }

    if !search.listing_path.starts_with('/') {
        return Err(ConfigError::ValidationError(
            "search.listing_path must start with '/'".to_string(),
        ));
    }

    let country = &search.default_country_code;
    if country.len() != 2 || !country.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ConfigError::ValidationError(format!(
            "search.default_country_code must be a two-letter code (got '{}')",
            country
        )));
    }

    Ok(())
}
