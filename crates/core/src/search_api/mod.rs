//! Upstream podcast search API.
//!
//! The service queries a single directory search endpoint (iTunes Search by
//! default) for podcasts matching a free-text term.

mod itunes;

pub use itunes::ItunesClient;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Number of results requested per search.
pub const SEARCH_RESULT_LIMIT: u32 = 20;

/// Errors that can occur when querying the search API.
#[derive(Debug, Error)]
pub enum SearchApiError {
    /// HTTP request failed (unreachable, timeout, TLS...).
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// API answered with a non-success status.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

impl SearchApiError {
    /// Best-effort human readable message for API consumers.
    ///
    /// Prefers the message the upstream API sent, if any.
    pub fn message(&self) -> String {
        match self {
            SearchApiError::ApiError { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Body of a search response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResponse {
    /// Raw result items, `None` when the response had no `results` field.
    pub results: Option<Vec<Value>>,
}

/// A podcast directory that can be searched by term.
#[async_trait]
pub trait PodcastSearch: Send + Sync {
    /// Search podcasts matching `term`, limited to [`SEARCH_RESULT_LIMIT`] results.
    async fn search(&self, term: &str) -> Result<SearchResponse, SearchApiError>;

    /// Short name of the backend, used in logs and metrics.
    fn name(&self) -> &'static str;
}
