//! Mock podcast store for testing.

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::podcast::PodcastRecord;
use crate::store::{PodcastStore, StoreError};

/// Mock implementation of the PodcastStore trait.
///
/// Keeps rows in memory keyed by `trackId`, with the same upsert semantics
/// as the real stores: `created_at` is set on first insert and kept on
/// update.
#[derive(Debug)]
pub struct MockPodcastStore {
    /// Stored rows by track id.
    rows: Arc<RwLock<HashMap<i64, PodcastRecord>>>,
    /// Every batch passed to `upsert`, in call order.
    batches: Arc<RwLock<Vec<Vec<PodcastRecord>>>>,
    /// If set, the next upsert will fail with this error.
    next_error: Arc<RwLock<Option<StoreError>>>,
}

impl Default for MockPodcastStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPodcastStore {
    /// Create a new empty mock store.
    pub fn new() -> Self {
        Self {
            rows: Arc::new(RwLock::new(HashMap::new())),
            batches: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Make the next upsert fail with the given error.
    pub async fn set_next_error(&self, error: StoreError) {
        *self.next_error.write().await = Some(error);
    }

    /// Batches that reached the store, failed ones included.
    pub async fn batches(&self) -> Vec<Vec<PodcastRecord>> {
        self.batches.read().await.clone()
    }

    /// Get a stored row.
    pub async fn get(&self, track_id: i64) -> Option<PodcastRecord> {
        self.rows.read().await.get(&track_id).cloned()
    }

    /// Number of stored rows.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    /// Whether no rows are stored.
    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl PodcastStore for MockPodcastStore {
    async fn upsert(&self, records: &[PodcastRecord]) -> Result<Vec<PodcastRecord>, StoreError> {
        self.batches.write().await.push(records.to_vec());

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let mut rows = self.rows.write().await;
        let stored = records
            .iter()
            .map(|record| {
                let created_at = rows
                    .get(&record.track_id)
                    .and_then(|existing| existing.created_at.clone())
                    .unwrap_or_else(|| now.clone());
                let row = PodcastRecord {
                    created_at: Some(created_at),
                    ..record.clone()
                };
                rows.insert(row.track_id, row.clone());
                row
            })
            .collect();

        Ok(stored)
    }

    fn backend_name(&self) -> &'static str {
        "mock"
    }
}
