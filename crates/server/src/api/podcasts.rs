//! Podcast search API handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    Json,
};
use podsearch_core::PodcastRecord;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchParams {
    #[serde(default)]
    pub term: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: "Bad Request".to_string(),
            message: message.into(),
        }),
    )
}

fn internal_error(message: String) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "Internal Server Error".to_string(),
            message,
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// Search podcasts by term and store the results.
///
/// GET /api/podcasts/search?term=<string>
pub async fn search(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<PodcastRecord>>, ApiError> {
    let Query(params) = params.map_err(|rejection| bad_request(rejection.body_text()))?;

    let term = params
        .term
        .filter(|term| !term.trim().is_empty())
        .ok_or_else(|| bad_request("term should not be empty"))?;

    info!("Received search request for term: {}", term);

    match state.service().search_and_store(&term).await {
        Ok(podcasts) => Ok(Json(podcasts)),
        Err(e) => {
            error!(
                "Search for '{}' failed ({}): {}",
                term,
                e.kind(),
                e.message()
            );
            Err(internal_error(e.message()))
        }
    }
}
