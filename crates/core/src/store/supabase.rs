//! Supabase (PostgREST) podcast store.
//!
//! Upserts go through the REST interface:
//! `POST /rest/v1/<table>?on_conflict=trackId` with
//! `Prefer: resolution=merge-duplicates,return=representation`.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{PodcastStore, StoreError};
use crate::config::SupabaseConfig;
use crate::metrics::{EXTERNAL_SERVICE_DURATION, EXTERNAL_SERVICE_REQUESTS};
use crate::podcast::PodcastRecord;

/// Conflict column for upserts.
const CONFLICT_KEY: &str = "trackId";

/// Supabase REST store.
pub struct SupabaseStore {
    client: Client,
    endpoint: String,
    anon_key: String,
}

impl SupabaseStore {
    /// Create a new Supabase store.
    ///
    /// Fails if the project URL or the anon key is empty.
    pub fn new(config: &SupabaseConfig) -> Result<Self, StoreError> {
        let url = config.url.trim();
        let anon_key = config.anon_key.trim();
        if url.is_empty() || anon_key.is_empty() {
            return Err(StoreError::NotConfigured(
                "supabase URL and anon key are required".to_string(),
            ));
        }

        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/rest/v1/{}", url.trim_end_matches('/'), config.table),
            anon_key: anon_key.to_string(),
        })
    }

    /// REST endpoint of the podcasts table.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post_upsert(
        &self,
        records: &[PodcastRecord],
    ) -> Result<Vec<PodcastRecord>, StoreError> {
        debug!("Supabase upsert: {} rows to {}", records.len(), self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("on_conflict", CONFLICT_KEY)])
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(records)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error: PostgrestError = serde_json::from_str(&body).unwrap_or_default();
            warn!(
                "Supabase upsert failed with {}: {} ({:?})",
                status, body, error.details
            );
            return Err(StoreError::Api {
                status: status.as_u16(),
                message: error
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| format!("store returned HTTP {}", status.as_u16())),
                details: error.details,
            });
        }

        response
            .json::<Vec<PodcastRecord>>()
            .await
            .map_err(|e| StoreError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl PodcastStore for SupabaseStore {
    async fn upsert(&self, records: &[PodcastRecord]) -> Result<Vec<PodcastRecord>, StoreError> {
        let start = Instant::now();
        let result = self.post_upsert(records).await;

        EXTERNAL_SERVICE_DURATION
            .with_label_values(&["supabase", "upsert"])
            .observe(start.elapsed().as_secs_f64());
        EXTERNAL_SERVICE_REQUESTS
            .with_label_values(&[
                "supabase",
                "upsert",
                if result.is_ok() { "success" } else { "error" },
            ])
            .inc();

        result
    }

    fn backend_name(&self) -> &'static str {
        "supabase"
    }
}

// ============================================================================
// PostgREST Response Types (private)
// ============================================================================

#[derive(Debug, Default, Deserialize)]
struct PostgrestError {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    fn store_for(server: &MockServer) -> SupabaseStore {
        SupabaseStore::new(&SupabaseConfig {
            url: format!("{}/", server.uri()),
            anon_key: "anon-key".to_string(),
            table: "podcasts".to_string(),
        })
        .unwrap()
    }

    fn serial() -> PodcastRecord {
        PodcastRecord {
            artist_name: Some("X".to_string()),
            track_name: Some("Serial".to_string()),
            ..PodcastRecord::new(123)
        }
    }

    #[test]
    fn test_new_requires_credentials() {
        let result = SupabaseStore::new(&SupabaseConfig {
            url: "https://xyz.supabase.co".to_string(),
            anon_key: String::new(),
            table: "podcasts".to_string(),
        });
        assert!(matches!(result, Err(StoreError::NotConfigured(_))));

        let result = SupabaseStore::new(&SupabaseConfig {
            url: " ".to_string(),
            anon_key: "anon".to_string(),
            table: "podcasts".to_string(),
        });
        assert!(matches!(result, Err(StoreError::NotConfigured(_))));
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let store = SupabaseStore::new(&SupabaseConfig {
            url: "https://xyz.supabase.co/".to_string(),
            anon_key: "anon".to_string(),
            table: "podcasts".to_string(),
        })
        .unwrap();
        assert_eq!(store.endpoint(), "https://xyz.supabase.co/rest/v1/podcasts");
    }

    #[tokio::test]
    async fn test_upsert_sends_conflict_key_and_returns_rows() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/podcasts"))
            .and(query_param("on_conflict", "trackId"))
            .and(header("apikey", "anon-key"))
            .and(header("authorization", "Bearer anon-key"))
            .and(|req: &Request| {
                req.headers.get("prefer").and_then(|v| v.to_str().ok())
                    == Some("resolution=merge-duplicates,return=representation")
            })
            .and(body_json(json!([{
                "trackId": 123,
                "artistName": "X",
                "collectionName": null,
                "trackName": "Serial",
                "feedUrl": null,
                "artworkUrl100": null,
                "artworkUrl600": null,
                "releaseDate": null
            }])))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!([{
                "trackId": 123,
                "artistName": "X",
                "collectionName": null,
                "trackName": "Serial",
                "feedUrl": null,
                "artworkUrl100": null,
                "artworkUrl600": null,
                "releaseDate": null,
                "created_at": "2024-05-01T10:00:00.000000+00:00"
            }])))
            .expect(1)
            .mount(&server)
            .await;

        let stored = store_for(&server).upsert(&[serial()]).await.unwrap();

        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].track_id, 123);
        assert_eq!(stored[0].track_name.as_deref(), Some("Serial"));
        assert_eq!(stored[0].collection_name, None);
        assert_eq!(
            stored[0].created_at.as_deref(),
            Some("2024-05-01T10:00:00.000000+00:00")
        );
    }

    #[tokio::test]
    async fn test_upsert_maps_postgrest_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/podcasts"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "code": "23505",
                "details": "Key (\"trackId\")=(123) already exists.",
                "hint": null,
                "message": "duplicate key value violates unique constraint \"podcasts_pkey\""
            })))
            .mount(&server)
            .await;

        let err = store_for(&server).upsert(&[serial()]).await.unwrap_err();
        match err {
            StoreError::Api {
                status,
                message,
                details,
            } => {
                assert_eq!(status, 409);
                assert_eq!(
                    message,
                    "duplicate key value violates unique constraint \"podcasts_pkey\""
                );
                assert_eq!(
                    details.as_deref(),
                    Some("Key (\"trackId\")=(123) already exists.")
                );
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_upsert_error_without_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/podcasts"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = store_for(&server).upsert(&[serial()]).await.unwrap_err();
        assert_eq!(err.message(), "store returned HTTP 503");
    }

    #[tokio::test]
    async fn test_upsert_unparseable_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/podcasts"))
            .respond_with(ResponseTemplate::new(201).set_body_string("{}"))
            .mount(&server)
            .await;

        let err = store_for(&server).upsert(&[serial()]).await.unwrap_err();
        assert!(matches!(err, StoreError::ParseError(_)));
    }
}
