//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - SearchAndStore outcomes
//! - Upstream items dropped during normalization
//! - External services (search API, podcast store)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// SearchAndStore Metrics
// =============================================================================

/// Search requests total by result.
pub static SEARCHES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("podsearch_searches_total", "Total search-and-store operations"),
        &["result"], // "stored", "empty", "upstream_error", "store_error"
    )
    .unwrap()
});

/// Upstream items left out of the stored batch.
pub static ITEMS_DROPPED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "podsearch_items_dropped_total",
            "Upstream search items dropped before storing",
        ),
        &["reason"], // "not_podcast", "missing_track_id", "malformed"
    )
    .unwrap()
});

/// Podcast rows written (inserted or updated).
pub static PODCASTS_STORED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "podsearch_podcasts_stored_total",
        "Total podcast rows upserted into the store",
    )
    .unwrap()
});

// =============================================================================
// External Service Metrics
// =============================================================================

/// External service request duration.
pub static EXTERNAL_SERVICE_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "podsearch_external_service_duration_seconds",
            "Duration of external service calls",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["service", "operation"],
    )
    .unwrap()
});

/// External service requests total.
pub static EXTERNAL_SERVICE_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "podsearch_external_service_requests_total",
            "Total external service requests",
        ),
        &["service", "operation", "status"], // status: "success", "error"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(SEARCHES_TOTAL.clone()),
        Box::new(ITEMS_DROPPED.clone()),
        Box::new(PODCASTS_STORED.clone()),
        Box::new(EXTERNAL_SERVICE_DURATION.clone()),
        Box::new(EXTERNAL_SERVICE_REQUESTS.clone()),
    ]
}
