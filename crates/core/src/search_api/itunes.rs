//! iTunes Search API client.
//!
//! No API key is needed. Errors come back as `{"errorMessage": "..."}`.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use super::{PodcastSearch, SearchApiError, SearchResponse, SEARCH_RESULT_LIMIT};
use crate::config::SearchApiConfig;
use crate::metrics::{EXTERNAL_SERVICE_DURATION, EXTERNAL_SERVICE_REQUESTS};

/// iTunes Search API client.
pub struct ItunesClient {
    client: Client,
    base_url: String,
}

impl ItunesClient {
    /// Create a new client for the configured search endpoint.
    pub fn new(config: &SearchApiConfig) -> Result<Self, SearchApiError> {
        let client = Client::builder()
            .user_agent(concat!("podsearch/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(u64::from(config.timeout_secs)))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// The endpoint queried by this client.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch(&self, term: &str) -> Result<SearchResponse, SearchApiError> {
        debug!("iTunes search: term='{}', url={}", term, self.base_url);

        let limit = SEARCH_RESULT_LIMIT.to_string();
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("term", term),
                ("entity", "podcast"),
                ("media", "podcast"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("iTunes search returned {}: {}", status, body);
            return Err(SearchApiError::ApiError {
                status: status.as_u16(),
                message: upstream_message(status, &body),
            });
        }

        let body: Value = response.json().await.map_err(|e| {
            SearchApiError::ParseError(format!("search response: {}", e))
        })?;

        parse_search_body(body)
    }
}

#[async_trait]
impl PodcastSearch for ItunesClient {
    async fn search(&self, term: &str) -> Result<SearchResponse, SearchApiError> {
        let start = Instant::now();
        let result = self.fetch(term).await;

        EXTERNAL_SERVICE_DURATION
            .with_label_values(&["itunes", "search"])
            .observe(start.elapsed().as_secs_f64());
        EXTERNAL_SERVICE_REQUESTS
            .with_label_values(&[
                "itunes",
                "search",
                if result.is_ok() { "success" } else { "error" },
            ])
            .inc();

        result
    }

    fn name(&self) -> &'static str {
        "itunes"
    }
}

/// Pull a human readable message out of an error body, falling back to a
/// generic one.
fn upstream_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            ["message", "errorMessage"].iter().find_map(|key| {
                value
                    .get(key)
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|m| !m.is_empty())
                    .map(str::to_string)
            })
        })
        .unwrap_or_else(|| format!("search API returned HTTP {}", status.as_u16()))
}

/// Pull `results` out of a search response body.
///
/// The body must be a JSON object. A missing or null `results` field means
/// no results; any other non-array value is a parse error.
fn parse_search_body(body: Value) -> Result<SearchResponse, SearchApiError> {
    let Value::Object(mut fields) = body else {
        return Err(SearchApiError::ParseError(
            "search response: body is not a JSON object".to_string(),
        ));
    };

    let results = match fields.remove("results") {
        None | Some(Value::Null) => None,
        Some(Value::Array(items)) => Some(items),
        Some(other) => {
            return Err(SearchApiError::ParseError(format!(
                "search response: results is not an array: {}",
                other
            )))
        }
    };

    Ok(SearchResponse { results })
}
