//! Mock podcast search for testing.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::search_api::{PodcastSearch, SearchApiError, SearchResponse};

/// Mock implementation of the PodcastSearch trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable result items (or no `results` field at all)
/// - Track searched terms for assertions
/// - Simulate failures
#[derive(Debug)]
pub struct MockPodcastSearch {
    /// Raw items to return; `None` mimics a response without `results`.
    results: Arc<RwLock<Option<Vec<Value>>>>,
    /// Recorded search terms.
    queries: Arc<RwLock<Vec<String>>>,
    /// If set, the next search will fail with this error.
    next_error: Arc<RwLock<Option<SearchApiError>>>,
}

impl Default for MockPodcastSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPodcastSearch {
    /// Create a mock returning an empty `results` array.
    pub fn new() -> Self {
        Self {
            results: Arc::new(RwLock::new(Some(Vec::new()))),
            queries: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Set the items returned by every search.
    pub async fn set_results(&self, results: Vec<Value>) {
        *self.results.write().await = Some(results);
    }

    /// Make searches answer without a `results` field.
    pub async fn set_missing_results(&self) {
        *self.results.write().await = None;
    }

    /// Make the next search fail with the given error.
    pub async fn set_next_error(&self, error: SearchApiError) {
        *self.next_error.write().await = Some(error);
    }

    /// Terms searched so far, in order.
    pub async fn queries(&self) -> Vec<String> {
        self.queries.read().await.clone()
    }
}

#[async_trait]
impl PodcastSearch for MockPodcastSearch {
    async fn search(&self, term: &str) -> Result<SearchResponse, SearchApiError> {
        self.queries.write().await.push(term.to_string());

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        Ok(SearchResponse {
            results: self.results.read().await.clone(),
        })
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_returns_configured_results() {
        let search = MockPodcastSearch::new();
        search
            .set_results(fixtures::search_results(&[(1, "A"), (2, "B")]))
            .await;

        let response = search.search("a").await.unwrap();
        assert_eq!(response.results.unwrap().len(), 2);
        assert_eq!(search.queries().await, vec!["a".to_string()]);
    }

    #[tokio::test]
    async fn test_next_error_is_consumed() {
        let search = MockPodcastSearch::new();
        search
            .set_next_error(SearchApiError::ParseError("bad".to_string()))
            .await;

        assert!(search.search("x").await.is_err());
        assert!(search.search("x").await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_results() {
        let search = MockPodcastSearch::new();
        search.set_missing_results().await;

        let response = search.search("x").await.unwrap();
        assert!(response.results.is_none());
    }
}
