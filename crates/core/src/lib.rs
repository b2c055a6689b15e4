pub mod cache;
pub mod config;
pub mod events;
pub mod filter;
pub mod language;
pub mod metrics;
pub mod quality;
pub mod ranking;
pub mod rate_limiter;
pub mod scoring;
pub mod source;
pub mod testing;

pub use cache::{fetch_signature, TtlCache};
pub use config::{
    load_config, load_config_from_str, validate_config, CacheConfig, Config, ConfigError,
    RankingConfig, RateLimitConfig, SanitizedConfig, ServerConfig, SourceConfig,
};
pub use events::EventHook;
pub use filter::filter_by_size;
pub use language::{is_supported_language, supported_languages, LanguageMatcher};
pub use quality::{extract_quality, ParsedQuality, QualityTier};
pub use ranking::{RankingMode, RankingOptions, StreamRanker};
pub use rate_limiter::{SlidingWindowConfig, SlidingWindowLimiter, SweepReport};
pub use scoring::{score, select_with_fallback, ScoredStream, ScoringWeights, WeightPresets};
pub use source::{
    AggregateResult, ContentKind, HttpStreamSource, RawStream, SourceError, StreamAggregator,
    StreamRequest, StreamSource,
};
