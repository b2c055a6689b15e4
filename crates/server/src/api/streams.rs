//! Stream lookup API handlers.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use streamrank_core::{
    ContentKind, RankingMode, RankingOptions, ScoredStream, SourceError, StreamRequest,
};
use tracing::{info, warn};

use crate::metrics::STREAM_LOOKUPS;
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

/// Per-request overrides of the configured ranking defaults.
#[derive(Debug, Default, Deserialize)]
pub struct StreamQuery {
    #[serde(default)]
    pub prefer_quality: Option<bool>,
    #[serde(default)]
    pub fallback: Option<bool>,
    #[serde(default)]
    pub max_size: Option<u64>,
    /// Comma-separated, most preferred first.
    #[serde(default)]
    pub languages: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
}

impl StreamQuery {
    fn apply(self, mut options: RankingOptions) -> Result<RankingOptions, String> {
        if let Some(prefer_quality) = self.prefer_quality {
            options.prefer_quality = prefer_quality;
        }
        if let Some(fallback) = self.fallback {
            options.higher_tier_fallback = fallback;
        }
        if let Some(max_size) = self.max_size {
            options.max_size_bytes = max_size;
        }
        if let Some(languages) = self.languages {
            options.languages = languages
                .split(',')
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(mode) = self.mode {
            options.mode = mode.parse::<RankingMode>()?;
        }
        Ok(options)
    }
}

#[derive(Debug, Serialize)]
pub struct StreamsResponse {
    pub streams: Vec<ScoredStream>,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub source_errors: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(status: StatusCode, outcome: &str, error: String) -> ApiError {
    STREAM_LOOKUPS.with_label_values(&[outcome]).inc();
    (status, Json(ErrorResponse { error }))
}

fn source_error_response(err: SourceError) -> ApiError {
    let (status, outcome) = match &err {
        SourceError::RateLimited { .. } => (StatusCode::TOO_MANY_REQUESTS, "rate_limited"),
        SourceError::Timeout => (StatusCode::GATEWAY_TIMEOUT, "timeout"),
        SourceError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
        _ => (StatusCode::BAD_GATEWAY, "upstream_error"),
    };
    error_response(status, outcome, err.to_string())
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/streams/{kind}/{id}
///
/// Fetch candidates from every source and return the ranked selection.
pub async fn get_streams(
    State(state): State<Arc<AppState>>,
    Path((kind, id)): Path<(String, String)>,
    Query(query): Query<StreamQuery>,
) -> Result<Json<StreamsResponse>, ApiError> {
    let kind: ContentKind = kind.parse().map_err(source_error_response)?;

    let id = id.trim_end_matches(".json").trim();
    if id.is_empty() {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "bad_request",
            "content id cannot be empty".to_string(),
        ));
    }

    let options = query
        .apply(state.default_options())
        .map_err(|e| error_response(StatusCode::BAD_REQUEST, "bad_request", e))?;

    let request = StreamRequest::new(kind, id);
    let aggregate = state.aggregator().fetch_all(&request).await.map_err(|e| {
        warn!(query = %request.normalized_query(), error = %e, "Stream lookup failed");
        source_error_response(e)
    })?;

    let candidates = aggregate.streams.len();
    let streams = state.ranker().rank(aggregate.streams, &options);

    info!(
        query = %request.normalized_query(),
        candidates = candidates,
        returned = streams.len(),
        duration_ms = aggregate.duration_ms,
        "Stream lookup complete"
    );

    let outcome = if streams.is_empty() { "empty" } else { "ok" };
    STREAM_LOOKUPS.with_label_values(&[outcome]).inc();

    Ok(Json(StreamsResponse {
        streams,
        duration_ms: aggregate.duration_ms,
        source_errors: aggregate.source_errors,
    }))
}
