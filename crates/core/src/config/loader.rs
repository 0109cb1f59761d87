use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Environment variable names understood without the `PODSEARCH_` prefix,
/// with the config key each one sets.
const PLAIN_ENV_KEYS: &[(&str, &str)] = &[
    ("port", "server.port"),
    ("frontend_url", "server.frontend_url"),
    ("itunes_search_api_url", "search.base_url"),
    ("supabase_url", "store.supabase.url"),
    ("supabase_anon_key", "store.supabase.anon_key"),
];

/// Load configuration from an optional TOML file with environment variable overrides.
///
/// Precedence (lowest first): defaults, the TOML file, plain variables
/// (`PORT`, `SUPABASE_URL`, ...), then `PODSEARCH_<SECTION>__<KEY>`.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut figment = Figment::new();

    if let Some(path) = path {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        figment = figment.merge(Toml::file(path));
    }

    let config: Config = figment
        .merge(plain_env())
        .merge(Env::prefixed("PODSEARCH_").split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Plain variables that are set to something other than whitespace; blank
/// ones leave the default in place.
fn plain_env() -> Env {
    let names: Vec<&str> = PLAIN_ENV_KEYS
        .iter()
        .map(|(name, _)| *name)
        .filter(|name| {
            std::env::var(name.to_ascii_uppercase())
                .map(|value| !value.trim().is_empty())
                .unwrap_or(false)
        })
        .collect();

    Env::raw().only(&names).map(|key| {
        let name = key.as_str().to_ascii_lowercase();
        PLAIN_ENV_KEYS
            .iter()
            .find(|(env_name, _)| *env_name == name)
            .map(|(_, config_key)| config_key.to_string())
            .unwrap_or(name)
            .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreBackend;
    use figment::Jail;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[server]
port = 9000
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_load_config_from_str_invalid_type() {
        let toml = r#"
[server]
port = "not-a-port"
"#;
        let result = load_config_from_str(toml);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Some(Path::new("/nonexistent/podsearch.toml")));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    // Env-reading loads run inside a Jail so they never observe variables
    // set by the other tests.
    #[test]
    fn test_load_config_from_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "custom.toml",
                r#"
[server]
host = "127.0.0.1"
port = 3000

[store]
backend = "sqlite"

[store.sqlite]
path = "/data/podcasts.db"
"#,
            )?;

            let config = load_config(Some(Path::new("custom.toml"))).map_err(|e| e.to_string())?;
            assert_eq!(config.server.port, 3000);
            assert_eq!(config.server.host.to_string(), "127.0.0.1");
            assert_eq!(config.store.backend, StoreBackend::Sqlite);
            assert_eq!(
                config.store.sqlite.expect("sqlite section").path.to_str(),
                Some("/data/podcasts.db")
            );
            Ok(())
        });
    }

    #[test]
    fn test_plain_env_vars_override_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "podsearch.toml",
                r#"
[server]
port = 5000

[store.supabase]
url = "https://from-file.supabase.co"
anon_key = "file-key"
"#,
            )?;
            jail.set_env("PORT", "4500");
            jail.set_env("FRONTEND_URL", "https://podcasts.example.com");
            jail.set_env("ITUNES_SEARCH_API_URL", "http://localhost:9999/search");
            jail.set_env("SUPABASE_URL", "https://from-env.supabase.co");
            jail.set_env("SUPABASE_ANON_KEY", "env-key");

            let config =
                load_config(Some(Path::new("podsearch.toml"))).map_err(|e| e.to_string())?;

            assert_eq!(config.server.port, 4500);
            assert_eq!(config.server.frontend_url, "https://podcasts.example.com");
            assert_eq!(config.search.base_url, "http://localhost:9999/search");
            let supabase = config.store.supabase.expect("supabase section");
            assert_eq!(supabase.url, "https://from-env.supabase.co");
            assert_eq!(supabase.anon_key, "env-key");
            assert_eq!(supabase.table, "podcasts");
            Ok(())
        });
    }

    #[test]
    fn test_blank_plain_env_vars_keep_defaults() {
        Jail::expect_with(|jail| {
            jail.set_env("PORT", "");
            jail.set_env("FRONTEND_URL", "  ");

            let config = load_config(None).map_err(|e| e.to_string())?;

            assert_eq!(config.server.port, 4000);
            assert_eq!(config.server.frontend_url, "http://localhost:3000");
            Ok(())
        });
    }

    #[test]
    fn test_prefixed_env_vars_without_file() {
        Jail::expect_with(|jail| {
            jail.set_env("PODSEARCH_STORE__BACKEND", "sqlite");
            jail.set_env("PODSEARCH_STORE__SQLITE__PATH", "env.db");
            jail.set_env("PODSEARCH_SEARCH__TIMEOUT_SECS", "5");

            let config = load_config(None).map_err(|e| e.to_string())?;

            assert_eq!(config.store.backend, StoreBackend::Sqlite);
            assert_eq!(
                config.store.sqlite.expect("sqlite section").path.to_str(),
                Some("env.db")
            );
            assert_eq!(config.search.timeout_secs, 5);
            Ok(())
        });
    }
}
