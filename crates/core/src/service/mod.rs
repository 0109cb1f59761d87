//! Search-and-store: query the search API, keep the podcasts, upsert them.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::metrics::{ITEMS_DROPPED, PODCASTS_STORED, SEARCHES_TOTAL};
use crate::podcast::{normalize_results, PodcastRecord};
use crate::search_api::{PodcastSearch, SearchApiError};
use crate::store::{PodcastStore, StoreError};

/// Failure of a search-and-store operation.
#[derive(Debug, Error)]
pub enum SearchAndStoreError {
    /// The search API call failed.
    #[error("search failed: {0}")]
    Upstream(#[from] SearchApiError),

    /// The store rejected the upsert.
    #[error("failed to store data in database: {}", .0.message())]
    Store(#[from] StoreError),
}

impl SearchAndStoreError {
    /// Message suitable for API consumers.
    pub fn message(&self) -> String {
        match self {
            SearchAndStoreError::Upstream(e) => e.message(),
            SearchAndStoreError::Store(e) => {
                format!("failed to store data in database: {}", e.message())
            }
        }
    }

    /// Which side failed, for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            SearchAndStoreError::Upstream(_) => "upstream",
            SearchAndStoreError::Store(_) => "store",
        }
    }
}

/// Searches podcasts and persists the results.
///
/// Stateless apart from the shared client and store handles; one instance
/// serves every request.
pub struct PodcastService {
    search: Arc<dyn PodcastSearch>,
    store: Arc<dyn PodcastStore>,
}

impl PodcastService {
    pub fn new(search: Arc<dyn PodcastSearch>, store: Arc<dyn PodcastStore>) -> Self {
        Self { search, store }
    }

    /// Search `term`, upsert every podcast result keyed by `trackId` and
    /// return the rows as stored.
    ///
    /// Returns an empty list without touching the store when the search
    /// yields nothing storable.
    pub async fn search_and_store(
        &self,
        term: &str,
    ) -> Result<Vec<PodcastRecord>, SearchAndStoreError> {
        info!("Searching {} for term: {}", self.search.name(), term);

        let response = match self.search.search(term).await {
            Ok(response) => response,
            Err(e) => {
                SEARCHES_TOTAL.with_label_values(&["upstream_error"]).inc();
                return Err(e.into());
            }
        };

        let Some(results) = response.results else {
            warn!("Search response for '{}' has no results field", term);
            SEARCHES_TOTAL.with_label_values(&["empty"]).inc();
            return Ok(Vec::new());
        };

        let normalized = normalize_results(results);
        for (reason, count) in normalized.dropped.iter() {
            debug!("Dropped {} search items: {}", count, reason.as_str());
            ITEMS_DROPPED
                .with_label_values(&[reason.as_str()])
                .inc_by(count as u64);
        }

        if normalized.records.is_empty() {
            info!("No podcasts to store for term: {}", term);
            SEARCHES_TOTAL.with_label_values(&["empty"]).inc();
            return Ok(Vec::new());
        }

        info!(
            "Storing {} podcasts in {}",
            normalized.records.len(),
            self.store.backend_name()
        );

        let stored = match self.store.upsert(&normalized.records).await {
            Ok(stored) => stored,
            Err(e) => {
                SEARCHES_TOTAL.with_label_values(&["store_error"]).inc();
                return Err(e.into());
            }
        };

        SEARCHES_TOTAL.with_label_values(&["stored"]).inc();
        PODCASTS_STORED.inc_by(stored.len() as u64);

        Ok(stored)
    }
}
