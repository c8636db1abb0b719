//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Incremental search (lookups issued, outcomes, latency)
//! - Catalog backend requests

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Search Metrics
// =============================================================================

/// Lookups issued by search controllers after the debounce window.
pub static SEARCH_LOOKUPS_ISSUED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "bordados_search_lookups_issued_total",
        "Total catalog lookups issued by search controllers",
    )
    .unwrap()
});

/// Completed lookups by outcome.
pub static SEARCH_LOOKUPS_COMPLETED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "bordados_search_lookups_completed_total",
            "Completed catalog lookups by outcome",
        ),
        &["outcome"], // "populated", "empty", "error", "stale"
    )
    .unwrap()
});

/// Time from issuing a lookup to its completion.
pub static SEARCH_LOOKUP_DURATION: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "bordados_search_lookup_duration_seconds",
            "Duration of search lookups as seen by the controller",
        )
        .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
    )
    .unwrap()
});

// =============================================================================
// Catalog Backend Metrics
// =============================================================================

/// Catalog backend request duration.
pub static CATALOG_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "bordados_catalog_request_duration_seconds",
            "Duration of catalog backend calls",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["operation"],
    )
    .unwrap()
});

/// Catalog backend requests total.
pub static CATALOG_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "bordados_catalog_requests_total",
            "Total catalog backend requests",
        ),
        &["operation", "status"], // status: "success", "error"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Search
        Box::new(SEARCH_LOOKUPS_ISSUED.clone()),
        Box::new(SEARCH_LOOKUPS_COMPLETED.clone()),
        Box::new(SEARCH_LOOKUP_DURATION.clone()),
        // Catalog
        Box::new(CATALOG_REQUEST_DURATION.clone()),
        Box::new(CATALOG_REQUESTS.clone()),
    ]
}
