//! Language code → pattern table.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use std::collections::HashMap;

/// Patterns per language code, evaluated in order against lowercased text.
const LANGUAGE_PATTERNS: &[(&str, &[&str])] = &[
    ("en", &[r"(?i)\b(?:en|eng|english)\b", "🇬🇧", "🇺🇸"]),
    (
        "es",
        &[
            r"(?i)\b(?:es|esp|spa|spanish|español|espanol|castellano|latino)\b",
            "🇪🇸",
            "🇲🇽",
        ],
    ),
    (
        "fr",
        &[
            r"(?i)\b(?:fre|fra|french|français|francais|truefrench|vff|vf|vostfr)\b",
            "🇫🇷",
        ],
    ),
    ("de", &[r"(?i)\b(?:ger|deu|german|deutsch)\b", "🇩🇪"]),
    ("it", &[r"(?i)\b(?:ita|italian|italiano)\b", "🇮🇹"]),
    (
        "pt",
        &[
            r"(?i)\b(?:por|portuguese|português|portugues|pt-br|ptbr|dublado)\b",
            "🇵🇹",
            "🇧🇷",
        ],
    ),
    ("ru", &[r"(?i)\b(?:rus|russian)\b", "🇷🇺"]),
    ("ja", &[r"(?i)\b(?:jap|jpn|japanese)\b", "🇯🇵"]),
    ("ko", &[r"(?i)\b(?:kor|korean)\b", "🇰🇷"]),
    (
        "zh",
        &[
            r"(?i)\b(?:chi|chs|cht|chinese|mandarin|cantonese)\b",
            "🇨🇳",
            "🇹🇼",
            "🇭🇰",
        ],
    ),
    ("hi", &[r"(?i)\b(?:hin|hindi)\b", "🇮🇳"]),
    ("ar", &[r"(?i)\b(?:ara|arabic)\b", "🇸🇦"]),
    ("nl", &[r"(?i)\b(?:dut|nld|dutch|flemish)\b", "🇳🇱"]),
    ("pl", &[r"(?i)\b(?:pol|polish|lektor)\b", "🇵🇱"]),
    ("tr", &[r"(?i)\b(?:tur|turkish)\b", "🇹🇷"]),
    (
        "multi",
        &[r"(?i)\b(?:multi(?:[ .-]?audio)?|dual[ .-]?audio)\b", "🌐"],
    ),
];

static LANGUAGE_TABLE: Lazy<HashMap<&'static str, Vec<Regex>>> = Lazy::new(|| {
    LANGUAGE_PATTERNS
        .iter()
        .map(|(code, patterns)| {
            let compiled = patterns.iter().map(|p| Regex::new(p).unwrap()).collect();
            (*code, compiled)
        })
        .collect()
});

/// Whether `code` has an entry in the table.
pub fn is_supported_language(code: &str) -> bool {
    LANGUAGE_TABLE.contains_key(code.trim().to_lowercase().as_str())
}

/// All supported codes in table order.
pub fn supported_languages() -> Vec<&'static str> {
    LANGUAGE_PATTERNS.iter().map(|(code, _)| *code).collect()
}

/// Whether `text` (already lowercased) carries a marker for `code`.
pub(super) fn matches_language(code: &str, text: &str) -> bool {
    LANGUAGE_TABLE
        .get(code)
        .map(|patterns| patterns.iter().any(|p| p.is_match(text)))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(code: &str, title: &str) -> bool {
        matches_language(code, &title.to_lowercase())
    }

    #[test]
    fn test_release_name_tokens() {
        assert!(matches("en", "Movie.2023.ENG.1080p.WEB"));
        assert!(matches("en", "Movie 2023 EN 1080p"));
        assert!(matches("it", "Film.2023.iTA.720p"));
        assert!(matches("fr", "Film.2023.VOSTFR.1080p"));
        assert!(matches("fr", "Film 2023 TRUEFRENCH"));
    }

    #[test]
    fn test_tokens_need_boundaries() {
        assert!(!matches("en", "Frozen.2013.1080p"));
        assert!(!matches("es", "The.Bestseller.2023"));
        assert!(!matches("ru", "Truth.2023"));
    }

    #[test]
    fn test_names_and_regional_variants() {
        assert!(matches("es", "Pelicula Castellano 1080p"));
        assert!(matches("es", "Pelicula [Español Latino]"));
        assert!(matches("pt", "Filme PT-BR Dublado"));
        assert!(matches("de", "Film German DL 1080p"));
    }

    #[test]
    fn test_flag_emoji() {
        assert!(matches("es", "Movie 👤 5 🇪🇸"));
        assert!(matches("en", "Movie 🇬🇧 / 🇫🇷"));
        assert!(matches("fr", "Movie 🇬🇧 / 🇫🇷"));
        assert!(!matches("de", "Movie 🇬🇧 / 🇫🇷"));
    }

    #[test]
    fn test_multi_audio() {
        assert!(matches("multi", "Movie.MULTi.1080p"));
        assert!(matches("multi", "Movie Dual Audio 720p"));
    }

    #[test]
    fn test_unknown_code_never_matches() {
        assert!(!matches("xx", "anything xx at all"));
        assert!(!is_supported_language("xx"));
    }

    #[test]
    fn test_supported_languages() {
        assert!(is_supported_language("EN"));
        assert!(is_supported_language(" es "));
        assert_eq!(supported_languages().len(), LANGUAGE_PATTERNS.len());
        assert_eq!(supported_languages()[0], "en");
    }
}
