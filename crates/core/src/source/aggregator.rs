//! Concurrent fan-out across sources with caching and rate limiting.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::time::Instant;
use tracing::{debug, error, warn};

use crate::cache::TtlCache;
use crate::events::{emit, EventHook};
use crate::metrics::{SOURCE_FETCHES, SOURCE_FETCH_DURATION};
use crate::rate_limiter::SlidingWindowLimiter;

use super::{AggregateResult, RawStream, SourceError, StreamRequest, StreamSource};

/// Queries every configured source for one request and merges the results.
///
/// Per source the order is: cache, rate limiter (keyed by source name),
/// upstream fetch under the source's timeout, cache store. Best-effort
/// sources that fail contribute nothing and are listed in
/// [`AggregateResult::source_errors`]; a failing primary source fails the
/// whole call.
///
/// Concurrent misses for the same key are not coalesced; both fetch.
pub struct StreamAggregator {
    sources: Vec<Arc<dyn StreamSource>>,
    cache: Arc<TtlCache<Vec<RawStream>>>,
    limiter: Arc<SlidingWindowLimiter>,
    event_hook: Option<EventHook>,
}

impl StreamAggregator {
    pub fn new(
        sources: Vec<Arc<dyn StreamSource>>,
        cache: Arc<TtlCache<Vec<RawStream>>>,
        limiter: Arc<SlidingWindowLimiter>,
    ) -> Self {
        Self {
            sources,
            cache,
            limiter,
            event_hook: None,
        }
    }

    pub fn with_event_hook(mut self, hook: EventHook) -> Self {
        self.event_hook = Some(hook);
        self
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Fetch from all sources concurrently.
    ///
    /// Streams keep source order, then upstream order within a source.
    /// Dropping the returned future cancels every in-flight fetch.
    pub async fn fetch_all(&self, request: &StreamRequest) -> Result<AggregateResult, SourceError> {
        let start = Instant::now();

        let fetches = self.sources.iter().map(|source| async move {
            let result = self.fetch_source(source.as_ref(), request).await;
            (source, result)
        });
        let results = futures::future::join_all(fetches).await;

        let mut streams = Vec::new();
        let mut source_errors = HashMap::new();

        for (source, result) in results {
            match result {
                Ok(mut fetched) => streams.append(&mut fetched),
                Err(e) if source.is_primary() => {
                    error!(source = source.name(), error = %e, "Primary source failed");
                    emit(&self.event_hook, "primary_source_failed", source.name());
                    return Err(e);
                }
                Err(e) => {
                    warn!(source = source.name(), error = %e, "Source failed, continuing without it");
                    emit(
                        &self.event_hook,
                        "source_failed",
                        &format!("{}: {}", source.name(), e),
                    );
                    source_errors.insert(source.name().to_string(), e.to_string());
                }
            }
        }

        let duration_ms = start.elapsed().as_millis() as u64;
        debug!(
            query = %request.normalized_query(),
            streams = streams.len(),
            failed_sources = source_errors.len(),
            duration_ms = duration_ms,
            "Aggregation complete"
        );

        Ok(AggregateResult {
            streams,
            duration_ms,
            source_errors,
        })
    }

    async fn fetch_source(
        &self,
        source: &dyn StreamSource,
        request: &StreamRequest,
    ) -> Result<Vec<RawStream>, SourceError> {
        let name = source.name();
        let key = source.cache_key(request);

        if let Some(cached) = self.cache.get(&key).await {
            SOURCE_FETCHES.with_label_values(&[name, "cached"]).inc();
            return Ok(cached);
        }

        if !self.limiter.is_allowed(name).await {
            SOURCE_FETCHES.with_label_values(&[name, "rate_limited"]).inc();
            return Err(SourceError::RateLimited {
                source_name: name.to_string(),
            });
        }

        let timer = SOURCE_FETCH_DURATION.with_label_values(&[name]).start_timer();
        let result = match tokio::time::timeout(source.timeout(), source.fetch(request)).await {
            Ok(result) => result,
            Err(_) => Err(SourceError::Timeout),
        };
        timer.observe_duration();

        match result {
            Ok(mut streams) => {
                for stream in &mut streams {
                    stream.origin = Some(name.to_string());
                }
                self.cache.set(key, streams.clone()).await;
                SOURCE_FETCHES.with_label_values(&[name, "success"]).inc();
                Ok(streams)
            }
            Err(e) => {
                let label = match e {
                    SourceError::Timeout => "timeout",
                    _ => "error",
                };
                SOURCE_FETCHES.with_label_values(&[name, label]).inc();
                Err(e)
            }
        }
    }
}
