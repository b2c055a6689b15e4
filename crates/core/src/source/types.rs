//! Types shared by upstream stream sources.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// Fetch timeout used by sources that do not configure one.
pub const DEFAULT_SOURCE_TIMEOUT: Duration = Duration::from_secs(5);

/// A stream descriptor as returned by an upstream service.
///
/// Only the fields the ranking core reads are typed; everything else in
/// `behavior_hints` is carried through untouched for downstream resolution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStream {
    /// Provider name, usually followed by a second line with the quality tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Release title plus seeder/size annotations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Some services put the title text here instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Explicit quality tag, when the service provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
    /// Direct playable URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Torrent info hash.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info_hash: Option<String>,
    /// File index inside the torrent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_idx: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub behavior_hints: Option<serde_json::Value>,
    /// Name of the source this stream came from. Set by the aggregator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

impl RawStream {
    /// The free text scanned for seeders, size and language tokens:
    /// the title, or the description when the title is missing or blank.
    pub fn display_text(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .or(self.description.as_deref())
            .unwrap_or_default()
    }

    /// All text that may carry language markers (name and title text).
    pub fn searchable_text(&self) -> String {
        match self.name.as_deref() {
            Some(name) => format!("{}\n{}", name, self.display_text()),
            None => self.display_text().to_string(),
        }
    }
}

/// Kind of content being looked up.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Movie,
    Series,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Movie => "movie",
            ContentKind::Series => "series",
        }
    }
}

impl std::str::FromStr for ContentKind {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "movie" => Ok(ContentKind::Movie),
            "series" => Ok(ContentKind::Series),
            other => Err(SourceError::InvalidRequest(format!(
                "unknown content kind: {}",
                other
            ))),
        }
    }
}

/// What to look up across sources.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreamRequest {
    pub kind: ContentKind,
    /// Content identifier, e.g. `tt0111161` or `tt0944947:1:1` for an episode.
    pub id: String,
}

impl StreamRequest {
    pub fn new(kind: ContentKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }

    /// Normalized query part of the fetch signature.
    pub fn normalized_query(&self) -> String {
        format!("{}/{}", self.kind.as_str(), self.id.trim().to_lowercase())
    }
}

/// Combined streams from every source for one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateResult {
    /// Streams in source order, each tagged with its origin.
    pub streams: Vec<RawStream>,
    /// How long the fetch took in milliseconds.
    pub duration_ms: u64,
    /// Best-effort sources that failed (name -> error message).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub source_errors: HashMap<String, String>,
}

/// Errors that can occur while fetching from a source.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    #[error("Source connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Source API error: {0}")]
    ApiError(String),

    #[error("Failed to parse source response: {0}")]
    ParseError(String),

    #[error("Rate limited for source {source_name}")]
    RateLimited { source_name: String },

    #[error("Request timeout")]
    Timeout,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Trait for upstream stream providers.
#[async_trait]
pub trait StreamSource: Send + Sync {
    /// Source name, used as the origin tag and rate-limit key.
    fn name(&self) -> &str;

    /// Whether a failure of this source must fail the whole request.
    fn is_primary(&self) -> bool;

    /// Fetch signature used as the cache key.
    fn cache_key(&self, request: &StreamRequest) -> String;

    /// Upper bound on a single fetch, enforced by the aggregator.
    fn timeout(&self) -> Duration {
        DEFAULT_SOURCE_TIMEOUT
    }

    /// Fetch raw streams for the request.
    async fn fetch(&self, request: &StreamRequest) -> Result<Vec<RawStream>, SourceError>;
}
