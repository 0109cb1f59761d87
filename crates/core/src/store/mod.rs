//! Podcast store - the persistent `podcasts` table.
//!
//! Rows are keyed by `trackId`; writes are batched upserts that return the
//! rows as stored, including the store-assigned `created_at`.

mod sqlite;
mod supabase;

pub use sqlite::SqliteStore;
pub use supabase::SupabaseStore;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{StoreBackend, StoreConfig};
use crate::podcast::PodcastRecord;

/// Errors that can occur when writing to the podcast store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Local database error.
    #[error("Database error: {0}")]
    Database(String),

    /// HTTP request to the store failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Store API rejected the request.
    #[error("Store API error: {status} - {message}")]
    Api {
        status: u16,
        message: String,
        details: Option<String>,
    },

    /// Failed to parse store response.
    #[error("Failed to parse store response: {0}")]
    ParseError(String),

    /// Store not configured (missing URL, key, etc.).
    #[error("Store not configured: {0}")]
    NotConfigured(String),
}

impl StoreError {
    /// The store's own error message, without the variant prefix where one
    /// was reported by the store.
    pub fn message(&self) -> String {
        match self {
            StoreError::Database(message) => message.clone(),
            StoreError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

/// Trait for podcast storage.
#[async_trait]
pub trait PodcastStore: Send + Sync {
    /// Insert or update all `records` in one batch, keyed by `trackId`.
    ///
    /// Existing rows keep their `created_at`; the rest of their fields are
    /// overwritten. Returns the rows as stored.
    async fn upsert(&self, records: &[PodcastRecord]) -> Result<Vec<PodcastRecord>, StoreError>;

    /// Short name of the backend, used in logs and metrics.
    fn backend_name(&self) -> &'static str;
}

/// Create the store selected by `config.backend`.
pub fn create_store(config: &StoreConfig) -> Result<Arc<dyn PodcastStore>, StoreError> {
    match config.backend {
        StoreBackend::Supabase => {
            let supabase = config.supabase.as_ref().ok_or_else(|| {
                StoreError::NotConfigured("supabase configuration is missing".to_string())
            })?;
            Ok(Arc::new(SupabaseStore::new(supabase)?))
        }
        StoreBackend::Sqlite => {
            let sqlite = config.sqlite.as_ref().ok_or_else(|| {
                StoreError::NotConfigured("sqlite configuration is missing".to_string())
            })?;
            Ok(Arc::new(SqliteStore::new(&sqlite.path)?))
        }
    }
}
