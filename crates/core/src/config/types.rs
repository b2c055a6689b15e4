use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use crate::ranking::{RankingMode, RankingOptions};
use crate::rate_limiter::SlidingWindowConfig;
use crate::scoring::{ScoringWeights, WeightPresets};

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

/// Default ranking behavior; each request may override it.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RankingConfig {
    /// Use the quality-first weights (false = speed-first).
    #[serde(default = "default_true")]
    pub prefer_quality: bool,
    /// Add a 1080p fallback when the winner is above 1080p.
    #[serde(default = "default_true")]
    pub higher_tier_fallback: bool,
    /// Drop streams larger than this. 0 disables the filter.
    #[serde(default)]
    pub max_size_bytes: u64,
    /// Language codes, most preferred first.
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default = "default_quality_first")]
    pub quality_first: ScoringWeights,
    #[serde(default = "default_speed_first")]
    pub speed_first: ScoringWeights,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            prefer_quality: true,
            higher_tier_fallback: true,
            max_size_bytes: 0,
            languages: Vec::new(),
            quality_first: ScoringWeights::QUALITY_FIRST,
            speed_first: ScoringWeights::SPEED_FIRST,
        }
    }
}

impl RankingConfig {
    pub fn weight_presets(&self) -> WeightPresets {
        WeightPresets {
            quality_first: self.quality_first,
            speed_first: self.speed_first,
        }
    }

    /// Options used when a request does not override anything.
    pub fn default_options(&self) -> RankingOptions {
        RankingOptions {
            prefer_quality: self.prefer_quality,
            higher_tier_fallback: self.higher_tier_fallback,
            max_size_bytes: self.max_size_bytes,
            languages: self.languages.clone(),
            mode: RankingMode::Select,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_quality_first() -> ScoringWeights {
    ScoringWeights::QUALITY_FIRST
}

fn default_speed_first() -> ScoringWeights {
    ScoringWeights::SPEED_FIRST
}

/// Response cache configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_ttl_ms")]
    pub ttl_ms: u64,
    #[serde(default = "default_cache_max_entries")]
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_ms: default_cache_ttl_ms(),
            max_entries: default_cache_max_entries(),
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }
}

fn default_cache_ttl_ms() -> u64 {
    30 * 60 * 1000
}

fn default_cache_max_entries() -> usize {
    500
}

/// Per-source rate limiting configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,
    #[serde(default = "default_max_requests")]
    pub max_requests: usize,
    #[serde(default = "default_max_tracked_keys")]
    pub max_tracked_keys: usize,
    #[serde(default = "default_window_ms")]
    pub sweep_interval_ms: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_ms: default_window_ms(),
            max_requests: default_max_requests(),
            max_tracked_keys: default_max_tracked_keys(),
            sweep_interval_ms: default_window_ms(),
        }
    }
}

impl From<&RateLimitConfig> for SlidingWindowConfig {
    fn from(config: &RateLimitConfig) -> Self {
        Self {
            window: Duration::from_millis(config.window_ms),
            max_requests: config.max_requests,
            max_tracked_keys: config.max_tracked_keys,
            sweep_interval: Duration::from_millis(config.sweep_interval_ms),
        }
    }
}

fn default_window_ms() -> u64 {
    60_000
}

fn default_max_requests() -> usize {
    30
}

fn default_max_tracked_keys() -> usize {
    10_000
}

/// An upstream stream provider
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    /// Unique name, used as origin tag and rate-limit key
    pub name: String,
    /// Base URL (e.g., "https://torrentio.strem.fun")
    pub base_url: String,
    /// Request timeout in milliseconds (default: 5000)
    #[serde(default = "default_source_timeout_ms")]
    pub timeout_ms: u64,
    /// A failing primary source fails the whole request
    #[serde(default)]
    pub primary: bool,
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_source_timeout_ms() -> u64 {
    5_000
}

/// Sanitized config for API responses.
///
/// Source base URLs often embed provider credentials in their path, so only
/// scheme and host are exposed.
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub ranking: RankingConfig,
    pub cache: CacheConfig,
    pub rate_limit: RateLimitConfig,
    pub sources: Vec<SanitizedSourceConfig>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedSourceConfig {
    pub name: String,
    pub host: String,
    pub timeout_ms: u64,
    pub primary: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            ranking: config.ranking.clone(),
            cache: config.cache.clone(),
            rate_limit: config.rate_limit.clone(),
            sources: config
                .sources
                .iter()
                .map(|s| SanitizedSourceConfig {
                    name: s.name.clone(),
                    host: redact_url(&s.base_url),
                    timeout_ms: s.timeout_ms,
                    primary: s.primary,
                })
                .collect(),
        }
    }
}

fn redact_url(raw: &str) -> String {
    match reqwest::Url::parse(raw) {
        Ok(url) => match url.host_str() {
            Some(host) => format!("{}://{}", url.scheme(), host),
            None => url.scheme().to_string(),
        },
        Err(_) => "<invalid>".to_string(),
    }
}
