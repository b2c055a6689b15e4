//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the streamrank server:
//! - HTTP request metrics (latency, counts, errors)
//! - Stream lookup outcomes
//! - Cache and rate limiter occupancy (collected dynamically)

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use regex_lite::Regex;
use tracing::warn;

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
            "streamrank_http_request_duration_seconds",
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
        Opts::new("streamrank_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "streamrank_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Stream Lookup Metrics
// =============================================================================

/// Stream lookups by outcome.
pub static STREAM_LOOKUPS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("streamrank_stream_lookups_total", "Total stream lookups"),
        &["outcome"], // "ok", "empty", "bad_request", "upstream_error", "rate_limited", "timeout"
    )
    .unwrap()
});

// =============================================================================
// Shared State Metrics (collected on scrape)
// =============================================================================

/// Entries in the response cache, expired ones included.
pub static CACHE_ENTRIES: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "streamrank_cache_entries",
        "Number of entries in the response cache",
    )
    .unwrap()
});

/// Keys tracked by the rate limiter.
pub static RATE_LIMITER_KEYS: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "streamrank_rate_limiter_tracked_keys",
        "Number of keys tracked by the rate limiter",
    )
    .unwrap()
});

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

    // Stream lookups
    registry
        .register(Box::new(STREAM_LOOKUPS.clone()))
        .unwrap();

    // Shared state
    registry.register(Box::new(CACHE_ENTRIES.clone())).unwrap();
    registry
        .register(Box::new(RATE_LIMITER_KEYS.clone()))
        .unwrap();

    // Core metrics (cache, rate limiter, sources, ranking)
    for metric in streamrank_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        warn!(error = %e, "Failed to encode metrics");
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Refresh gauges that mirror shared state.
pub async fn collect_dynamic_metrics(state: &crate::state::AppState) {
    CACHE_ENTRIES.set(state.cache().len().await as i64);
    RATE_LIMITER_KEYS.set(state.limiter().tracked_keys().await as i64);
}

static CONTENT_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"/tt\d+[^/]*").unwrap());
static NUMERIC_SEGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"/\d+(/|$)").unwrap());

/// Collapse content ids in a path so metric labels stay bounded.
pub fn normalize_path(path: &str) -> String {
    let result = CONTENT_ID.replace_all(path, "/{id}");
    let result = NUMERIC_SEGMENT.replace_all(&result, "/{id}$1");
    result.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_movie_id() {
        let path = "/api/v1/streams/movie/tt0111161";
        assert_eq!(normalize_path(path), "/api/v1/streams/movie/{id}");
    }

    #[test]
    fn test_normalize_path_episode_id() {
        let path = "/api/v1/streams/series/tt0944947:1:1.json";
        assert_eq!(normalize_path(path), "/api/v1/streams/series/{id}");
    }

    #[test]
    fn test_normalize_path_numeric() {
        let path = "/api/v1/streams/movie/12345";
        assert_eq!(normalize_path(path), "/api/v1/streams/movie/{id}");
    }

    #[test]
    fn test_normalize_path_no_ids() {
        let path = "/api/v1/health";
        assert_eq!(normalize_path(path), "/api/v1/health");
    }

    #[test]
    fn test_encode_metrics_returns_prometheus_format() {
        // Access metrics to ensure they're initialized
        HTTP_REQUESTS_TOTAL
            .with_label_values(&["GET", "/test", "200"])
            .inc();

        let output = encode_metrics();
        assert!(output.contains("streamrank_http_requests_total"));
        assert!(output.contains("# HELP"));
        assert!(output.contains("# TYPE"));
    }

    #[test]
    fn test_registry_contains_core_metrics() {
        // Prometheus only outputs vectors that have been touched
        streamrank_core::metrics::CACHE_LOOKUPS
            .with_label_values(&["miss"])
            .inc();
        streamrank_core::metrics::RATE_LIMIT_DECISIONS
            .with_label_values(&["allowed"])
            .inc();
        STREAM_LOOKUPS.with_label_values(&["ok"]).inc();
        CACHE_ENTRIES.set(0);

        let output = encode_metrics();

        assert!(output.contains("streamrank_cache_lookups_total"));
        assert!(output.contains("streamrank_rate_limit_decisions_total"));
        assert!(output.contains("streamrank_rate_limiter_sweeps_total"));
        assert!(output.contains("streamrank_stream_lookups_total"));
        assert!(output.contains("streamrank_cache_entries"));
    }
}
