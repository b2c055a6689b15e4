//! HTTP stream source speaking the addon stream protocol.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::cache::fetch_signature;
use crate::config::SourceConfig;

use super::{RawStream, SourceError, StreamRequest, StreamSource};

/// Fetches `GET {base_url}/stream/{kind}/{id}.json` and reads its `streams`
/// array.
pub struct HttpStreamSource {
    client: Client,
    config: SourceConfig,
}

impl HttpStreamSource {
    pub fn new(config: SourceConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| SourceError::ConnectionFailed(format!("HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    fn build_url(&self, request: &StreamRequest) -> String {
        format!(
            "{}/stream/{}/{}.json",
            self.config.base_url.trim_end_matches('/'),
            request.kind.as_str(),
            urlencoding::encode(request.id.trim())
        )
    }
}

/// Pull stream entries out of a response body.
///
/// A missing or non-list `streams` field yields nothing; entries that do not
/// deserialize are skipped.
fn parse_streams(body: Value, source: &str) -> Vec<RawStream> {
    let entries = match body {
        Value::Object(mut map) => match map.remove("streams") {
            Some(Value::Array(entries)) => entries,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    let total = entries.len();
    let streams: Vec<RawStream> = entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect();

    if streams.len() < total {
        debug!(
            source = source,
            skipped = total - streams.len(),
            "Skipped malformed stream entries"
        );
    }
    streams
}

#[async_trait]
impl StreamSource for HttpStreamSource {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn is_primary(&self) -> bool {
        self.config.primary
    }

    fn cache_key(&self, request: &StreamRequest) -> String {
        fetch_signature(&self.config.base_url, &request.normalized_query())
    }

    fn timeout(&self) -> Duration {
        self.config.timeout()
    }

    async fn fetch(&self, request: &StreamRequest) -> Result<Vec<RawStream>, SourceError> {
        let url = self.build_url(request);
        debug!(source = %self.config.name, url = %url, "Fetching streams");

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout
            } else if e.is_connect() {
                SourceError::ConnectionFailed(e.to_string())
            } else {
                SourceError::ApiError(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::ApiError(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SourceError::ParseError(e.to_string()))?;

        let streams = parse_streams(body, &self.config.name);
        debug!(
            source = %self.config.name,
            streams = streams.len(),
            "Source fetch complete"
        );
        Ok(streams)
    }
}
