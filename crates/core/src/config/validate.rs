use std::collections::HashSet;

use super::{types::Config, ConfigError};
use crate::language::{is_supported_language, MAX_LANGUAGE_PRIORITIES};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Cache, rate limit and source timeouts are positive
/// - Language list is short enough and only uses known codes
/// - Weight presets are finite and non-negative
/// - At least one source, with unique non-empty names and http(s) URLs
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(invalid("server.port cannot be 0"));
    }

    // Cache validation
    if config.cache.ttl_ms == 0 {
        return Err(invalid("cache.ttl_ms must be greater than 0"));
    }
    if config.cache.max_entries == 0 {
        return Err(invalid("cache.max_entries must be greater than 0"));
    }

    // Rate limit validation
    let rl = &config.rate_limit;
    if rl.window_ms == 0 {
        return Err(invalid("rate_limit.window_ms must be greater than 0"));
    }
    if rl.max_requests == 0 {
        return Err(invalid("rate_limit.max_requests must be greater than 0"));
    }
    if rl.max_tracked_keys == 0 {
        return Err(invalid("rate_limit.max_tracked_keys must be greater than 0"));
    }
    if rl.sweep_interval_ms == 0 {
        return Err(invalid("rate_limit.sweep_interval_ms must be greater than 0"));
    }

    // Ranking validation
    let languages = &config.ranking.languages;
    if languages.len() > MAX_LANGUAGE_PRIORITIES {
        return Err(ConfigError::ValidationError(format!(
            "ranking.languages has {} entries, at most {} allowed",
            languages.len(),
            MAX_LANGUAGE_PRIORITIES
        )));
    }
    if let Some(code) = languages
        .iter()
        .find(|c| !is_supported_language(&c.trim().to_lowercase()))
    {
        return Err(ConfigError::ValidationError(format!(
            "ranking.languages contains unknown code '{}'",
            code
        )));
    }

    for (preset, weights) in [
        ("quality_first", &config.ranking.quality_first),
        ("speed_first", &config.ranking.speed_first),
    ] {
        for (field, value) in [("quality", weights.quality), ("speed", weights.speed)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "ranking.{}.{} must be a finite non-negative number, got {}",
                    preset, field, value
                )));
            }
        }
    }

    // Source validation
    if config.sources.is_empty() {
        return Err(invalid("at least one [[sources]] entry is required"));
    }
    let mut seen = HashSet::new();
    for source in &config.sources {
        let name = source.name.trim();
        if name.is_empty() {
            return Err(invalid("sources.name cannot be empty"));
        }
        if !seen.insert(name.to_string()) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate source name '{}'",
                name
            )));
        }
        if !(source.base_url.starts_with("http://") || source.base_url.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "source '{}' base_url must start with http:// or https://",
                name
            )));
        }
        if source.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(format!(
                "source '{}' timeout_ms must be greater than 0",
                name
            )));
        }
    }

    Ok(())
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::ValidationError(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceConfig;

    fn source(name: &str) -> SourceConfig {
        SourceConfig {
            name: name.to_string(),
            base_url: "https://example.org".to_string(),
            timeout_ms: 5_000,
            primary: false,
        }
    }

    fn valid_config() -> Config {
        Config {
            sources: vec![source("torrentio")],
            ..Default::default()
        }
    }

    fn assert_invalid(config: &Config, needle: &str) {
        match validate_config(config) {
            Err(ConfigError::ValidationError(msg)) => {
                assert!(msg.contains(needle), "'{}' not in '{}'", needle, msg)
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_validate_bad_weights_fail() {
        let mut config = valid_config();
        config.ranking.quality_first.quality = f64::NAN;
        assert_invalid(&config, "ranking.quality_first.quality");

        let mut config = valid_config();
        config.ranking.speed_first.speed = -1.0;
        assert_invalid(&config, "ranking.speed_first.speed");

        let mut config = valid_config();
        config.ranking.speed_first.quality = f64::INFINITY;
        assert_invalid(&config, "ranking.speed_first.quality");
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let mut config = valid_config();
        config.server.port = 0;
        assert_invalid(&config, "server.port");
    }

    #[test]
    fn test_validate_zero_cache_values_fail() {
        let mut config = valid_config();
        config.cache.ttl_ms = 0;
        assert_invalid(&config, "cache.ttl_ms");

        let mut config = valid_config();
        config.cache.max_entries = 0;
        assert_invalid(&config, "cache.max_entries");
    }

    #[test]
    fn test_validate_zero_rate_limit_values_fail() {
        let mut config = valid_config();
        config.rate_limit.max_requests = 0;
        assert_invalid(&config, "rate_limit.max_requests");

        let mut config = valid_config();
        config.rate_limit.sweep_interval_ms = 0;
        assert_invalid(&config, "rate_limit.sweep_interval_ms");
    }

    #[test]
    fn test_validate_language_list() {
        let mut config = valid_config();
        config.ranking.languages = vec!["en".into(), "ES".into()];
        assert!(validate_config(&config).is_ok());

        config.ranking.languages = vec!["en".into(), "klingon".into()];
        assert_invalid(&config, "klingon");

        config.ranking.languages = ["en", "es", "fr", "de", "it", "pt"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_invalid(&config, "at most 5");
    }

    #[test]
    fn test_validate_sources() {
        let mut config = valid_config();
        config.sources.clear();
        assert_invalid(&config, "at least one");

        let mut config = valid_config();
        config.sources.push(source("torrentio"));
        assert_invalid(&config, "duplicate");

        let mut config = valid_config();
        config.sources[0].name = "  ".to_string();
        assert_invalid(&config, "name cannot be empty");

        let mut config = valid_config();
        config.sources[0].base_url = "ftp://example.org".to_string();
        assert_invalid(&config, "base_url");

        let mut config = valid_config();
        config.sources[0].timeout_ms = 0;
        assert_invalid(&config, "timeout_ms");
    }
}
