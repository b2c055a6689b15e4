//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - TTL cache lookups
//! - Rate limiter decisions and sweeps
//! - Upstream source fetches
//! - Ranking

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Cache
// =============================================================================

/// Cache lookups by result.
pub static CACHE_LOOKUPS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("streamrank_cache_lookups_total", "Total TTL cache lookups"),
        &["result"], // "hit", "miss", "expired"
    )
    .unwrap()
});

// =============================================================================
// Rate limiter
// =============================================================================

/// Admission decisions by result.
pub static RATE_LIMIT_DECISIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "streamrank_rate_limit_decisions_total",
            "Total rate limiter admission decisions",
        ),
        &["result"], // "allowed", "denied"
    )
    .unwrap()
});

/// Sweeper passes.
pub static LIMITER_SWEEPS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "streamrank_rate_limiter_sweeps_total",
        "Total rate limiter sweep passes",
    )
    .unwrap()
});

// =============================================================================
// Sources
// =============================================================================

/// Upstream fetches by source and result.
pub static SOURCE_FETCHES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "streamrank_source_fetches_total",
            "Total upstream source fetches",
        ),
        &["source", "result"], // result: "success", "cached", "rate_limited", "timeout", "error"
    )
    .unwrap()
});

/// Upstream fetch duration in seconds.
pub static SOURCE_FETCH_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "streamrank_source_fetch_duration_seconds",
            "Duration of upstream source fetches",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        &["source"],
    )
    .unwrap()
});

// =============================================================================
// Ranking
// =============================================================================

/// Candidates entering the ranker per request.
pub static CANDIDATES_RANKED: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "streamrank_candidates_ranked",
            "Number of candidates ranked per request",
        )
        .buckets(vec![0.0, 1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0]),
        &["mode"],
    )
    .unwrap()
});

/// Candidates dropped by the size filter.
pub static CANDIDATES_FILTERED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "streamrank_candidates_filtered_total",
        "Total candidates dropped by the size filter",
    )
    .unwrap()
});

/// All core metrics for registration.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Cache
        Box::new(CACHE_LOOKUPS.clone()),
        // Rate limiter
        Box::new(RATE_LIMIT_DECISIONS.clone()),
        Box::new(LIMITER_SWEEPS.clone()),
        // Sources
        Box::new(SOURCE_FETCHES.clone()),
        Box::new(SOURCE_FETCH_DURATION.clone()),
        // Ranking
        Box::new(CANDIDATES_RANKED.clone()),
        Box::new(CANDIDATES_FILTERED.clone()),
    ]
}
