//! Mock stream source for testing.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::source::{RawStream, SourceError, StreamRequest, StreamSource, DEFAULT_SOURCE_TIMEOUT};

/// Mock implementation of the StreamSource trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable streams
/// - Track fetches for assertions
/// - Simulate failures and delays
///
/// # Example
///
/// ```rust,ignore
/// use streamrank_core::testing::{fixtures, MockStreamSource};
///
/// let source = MockStreamSource::new("torrentio").primary();
/// source.set_streams(vec![fixtures::stream("1080p", 50, 2.0)]).await;
///
/// let streams = source.fetch(&request).await?;
/// assert_eq!(source.fetch_count().await, 1);
/// ```
pub struct MockStreamSource {
    name: String,
    primary: bool,
    timeout: Duration,
    /// Configured streams to return.
    streams: Arc<RwLock<Vec<RawStream>>>,
    /// If set, every fetch fails with this error.
    failure: Arc<RwLock<Option<SourceError>>>,
    /// Simulated upstream latency.
    delay: Arc<RwLock<Option<Duration>>>,
    /// Recorded fetch requests.
    fetches: Arc<RwLock<Vec<StreamRequest>>>,
}

impl std::fmt::Debug for MockStreamSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockStreamSource")
            .field("name", &self.name)
            .field("primary", &self.primary)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl MockStreamSource {
    /// Create a best-effort mock source with no streams.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            primary: false,
            timeout: DEFAULT_SOURCE_TIMEOUT,
            streams: Arc::new(RwLock::new(Vec::new())),
            failure: Arc::new(RwLock::new(None)),
            delay: Arc::new(RwLock::new(None)),
            fetches: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Mark this source as primary.
    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    /// Override the fetch timeout reported to the aggregator.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the streams to return for subsequent fetches.
    pub async fn set_streams(&self, streams: Vec<RawStream>) {
        *self.streams.write().await = streams;
    }

    /// Make every subsequent fetch fail with `error`.
    pub async fn fail_with(&self, error: SourceError) {
        *self.failure.write().await = Some(error);
    }

    /// Stop failing.
    pub async fn clear_failure(&self) {
        *self.failure.write().await = None;
    }

    /// Delay every subsequent fetch.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    /// Get recorded fetch requests.
    pub async fn recorded_fetches(&self) -> Vec<StreamRequest> {
        self.fetches.read().await.clone()
    }

    /// Get the number of fetches that reached this source.
    pub async fn fetch_count(&self) -> usize {
        self.fetches.read().await.len()
    }
}

#[async_trait]
impl StreamSource for MockStreamSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_primary(&self) -> bool {
        self.primary
    }

    fn cache_key(&self, request: &StreamRequest) -> String {
        format!("mock://{}/{}", self.name, request.normalized_query())
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn fetch(&self, request: &StreamRequest) -> Result<Vec<RawStream>, SourceError> {
        self.fetches.write().await.push(request.clone());

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(error) = self.failure.read().await.clone() {
            return Err(error);
        }

        Ok(self.streams.read().await.clone())
    }
}
