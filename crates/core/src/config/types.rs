use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub search: SearchApiConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Origin allowed to call the API from a browser.
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            frontend_url: default_frontend_url(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    4000
}

fn default_frontend_url() -> String {
    "http://localhost:3000".to_string()
}

/// Upstream podcast search API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchApiConfig {
    /// Search endpoint (default: https://itunes.apple.com/search)
    #[serde(default = "default_search_url")]
    pub base_url: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

impl Default for SearchApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_search_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_search_url() -> String {
    "https://itunes.apple.com/search".to_string()
}

fn default_timeout() -> u32 {
    30
}

/// Podcast store configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Store backend type
    #[serde(default)]
    pub backend: StoreBackend,
    /// Supabase settings (required when backend = "supabase")
    #[serde(default)]
    pub supabase: Option<SupabaseConfig>,
    /// SQLite settings (required when backend = "sqlite")
    #[serde(default)]
    pub sqlite: Option<SqliteConfig>,
}

/// Available store backends
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    #[default]
    Supabase,
    Sqlite,
}

/// Supabase (PostgREST) store configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SupabaseConfig {
    /// Project URL (e.g., "https://xyz.supabase.co")
    #[serde(default)]
    pub url: String,
    /// Anon API key
    #[serde(default)]
    pub anon_key: String,
    /// Table holding podcast rows
    #[serde(default = "default_table")]
    pub table: String,
}

fn default_table() -> String {
    "podcasts".to_string()
}

/// SQLite store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SqliteConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("podsearch.db")
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub search: SearchApiConfig,
    pub store: SanitizedStoreConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedStoreConfig {
    pub backend: StoreBackend,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supabase: Option<SanitizedSupabaseConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sqlite: Option<SqliteConfig>,
}

/// Sanitized Supabase config (anon key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedSupabaseConfig {
    pub url: String,
    pub table: String,
    pub anon_key_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            search: config.search.clone(),
            store: SanitizedStoreConfig {
                backend: config.store.backend,
                supabase: config
                    .store
                    .supabase
                    .as_ref()
                    .map(|s| SanitizedSupabaseConfig {
                        url: s.url.clone(),
                        table: s.table.clone(),
                        anon_key_configured: !s.anon_key.is_empty(),
                    }),
                sqlite: config.store.sqlite.clone(),
            },
        }
    }
}
