//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the bordados server:
//! - HTTP request metrics (latency, counts, in flight)
//! - Search proxy requests by result
//! - Core search and catalog metrics, registered alongside

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "bordados_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("bordados_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "bordados_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Search Proxy Metrics
// =============================================================================

/// Search proxy requests by result.
pub static SEARCH_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "bordados_search_requests_total",
            "Search proxy requests by result",
        ),
        &["result"], // "hits", "no_hits", "blank", "error"
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();

    // Search proxy
    registry
        .register(Box::new(SEARCH_REQUESTS_TOTAL.clone()))
        .unwrap();

    // Core metrics (search controller, catalog client)
    for metric in bordados_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Search routes, one per storefront country.
static SEARCH_ROUTE: Lazy<regex_lite::Regex> =
    Lazy::new(|| regex_lite::Regex::new(r"^/api/v1/[A-Za-z]{2}/search$").unwrap());

/// Normalize a path for metric labels.
///
/// The country segment of search routes is collapsed so label cardinality
/// stays bounded by the route table, not by storefront countries.
pub fn normalize_path(path: &str) -> String {
    if SEARCH_ROUTE.is_match(path) {
        return "/api/v1/{country_code}/search".to_string();
    }
    path.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_country() {
        assert_eq!(
            normalize_path("/api/v1/ar/search"),
            "/api/v1/{country_code}/search"
        );
        assert_eq!(
            normalize_path("/api/v1/US/search"),
            "/api/v1/{country_code}/search"
        );
    }

    #[test]
    fn test_normalize_path_leaves_other_segments() {
        assert_eq!(normalize_path("/api/v1/usa/search"), "/api/v1/usa/search");
    }

    #[test]
    fn test_normalize_path_no_ids() {
        assert_eq!(normalize_path("/api/v1/health"), "/api/v1/health");
    }

    #[test]
    fn test_encode_metrics_returns_prometheus_format() {
        HTTP_REQUESTS_TOTAL
            .with_label_values(&["GET", "/test", "200"])
            .inc();

        let output = encode_metrics();
        assert!(output.contains("bordados_http_requests_total"));
        assert!(output.contains("# HELP"));
        assert!(output.contains("# TYPE"));
    }

    #[test]
    fn test_registry_contains_core_metrics() {
        bordados_core::metrics::SEARCH_LOOKUPS_ISSUED.inc();
        SEARCH_REQUESTS_TOTAL.with_label_values(&["blank"]).inc();
        HTTP_REQUESTS_IN_FLIGHT.set(0);

        let output = encode_metrics();
        assert!(output.contains("bordados_http_requests_in_flight"));
        assert!(output.contains("bordados_search_requests_total"));
        assert!(output.contains("bordados_search_lookups_issued_total"));
    }
}
