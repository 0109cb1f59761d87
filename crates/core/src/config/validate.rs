use url::Url;

use super::{types::Config, ConfigError, StoreBackend};

/// Validate configuration.
///
/// Runs once at startup; any error here keeps the service from accepting requests.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    // Search API validation
    let search_url = Url::parse(&config.search.base_url).map_err(|e| {
        ConfigError::ValidationError(format!(
            "search.base_url '{}' is not a valid URL: {}",
            config.search.base_url, e
        ))
    })?;
    if !matches!(search_url.scheme(), "http" | "https") {
        return Err(ConfigError::ValidationError(format!(
            "search.base_url must use http or https, got '{}'",
            search_url.scheme()
        )));
    }

    if config.search.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "search.timeout_secs cannot be 0".to_string(),
        ));
    }

    // Store validation
    match config.store.backend {
        StoreBackend::Supabase => {
            let configured = config
                .store
                .supabase
                .as_ref()
                .is_some_and(|s| !s.url.trim().is_empty() && !s.anon_key.trim().is_empty());
            if !configured {
                return Err(ConfigError::ValidationError(
                    "supabase configuration is missing: set SUPABASE_URL and SUPABASE_ANON_KEY"
                        .to_string(),
                ));
            }
        }
        StoreBackend::Sqlite => {
            if config.store.sqlite.is_none() {
                return Err(ConfigError::ValidationError(
                    "store.backend = \"sqlite\" requires a [store.sqlite] section".to_string(),
                ));
            }
        }
    }

    Ok(())
}
