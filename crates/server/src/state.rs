use std::sync::Arc;

use streamrank_core::{
    Config, HttpStreamSource, RankingOptions, RawStream, SanitizedConfig, SlidingWindowConfig,
    SlidingWindowLimiter, SourceError, StreamAggregator, StreamRanker, StreamSource, TtlCache,
};

/// Response cache shared by every source.
pub type StreamCache = TtlCache<Vec<RawStream>>;

/// Shared application state
pub struct AppState {
    config: Config,
    aggregator: StreamAggregator,
    ranker: StreamRanker,
    cache: Arc<StreamCache>,
    limiter: Arc<SlidingWindowLimiter>,
}

impl AppState {
    pub fn new(
        config: Config,
        sources: Vec<Arc<dyn StreamSource>>,
        cache: Arc<StreamCache>,
        limiter: Arc<SlidingWindowLimiter>,
    ) -> Self {
        let aggregator = StreamAggregator::new(sources, Arc::clone(&cache), Arc::clone(&limiter));
        let ranker = StreamRanker::new(config.ranking.weight_presets());

        Self {
            config,
            aggregator,
            ranker,
            cache,
            limiter,
        }
    }

    /// Build HTTP sources, cache and limiter from configuration.
    pub fn from_config(config: Config) -> Result<Self, SourceError> {
        let sources = config
            .sources
            .iter()
            .map(|s| {
                HttpStreamSource::new(s.clone()).map(|src| Arc::new(src) as Arc<dyn StreamSource>)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let cache = Arc::new(TtlCache::new(config.cache.max_entries, config.cache.ttl()));
        let limiter = Arc::new(SlidingWindowLimiter::new(SlidingWindowConfig::from(
            &config.rate_limit,
        )));

        Ok(Self::new(config, sources, cache, limiter))
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    /// Ranking options applied when a request overrides nothing.
    pub fn default_options(&self) -> RankingOptions {
        self.config.ranking.default_options()
    }

    pub fn aggregator(&self) -> &StreamAggregator {
        &self.aggregator
    }

    pub fn ranker(&self) -> &StreamRanker {
        &self.ranker
    }

    pub fn cache(&self) -> &StreamCache {
        &self.cache
    }

    pub fn limiter(&self) -> &Arc<SlidingWindowLimiter> {
        &self.limiter
    }
}
