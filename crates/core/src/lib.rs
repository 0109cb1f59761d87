pub mod config;
pub mod metrics;
pub mod podcast;
pub mod search_api;
pub mod service;
pub mod store;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
    StoreBackend,
};
pub use podcast::{normalize_results, DropReason, PodcastRecord, SearchItem};
pub use search_api::{ItunesClient, PodcastSearch, SearchApiError, SearchResponse};
pub use service::{PodcastService, SearchAndStoreError};
pub use store::{create_store, PodcastStore, SqliteStore, StoreError, SupabaseStore};
