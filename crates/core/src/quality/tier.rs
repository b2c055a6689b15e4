//! Resolution tiers and the label table that recognizes them.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};

/// Rank of the 720p tier.
pub const RANK_720P: u32 = 1;
/// Rank of the 1080p tier.
pub const RANK_1080P: u32 = 2;

/// Canonical resolution tier of a stream.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum QualityTier {
    Unknown,
    Sd,
    Hd720,
    FullHd1080,
    Qhd1440,
    Uhd2160,
}

impl QualityTier {
    /// Integer rank used by scoring. Higher is better.
    ///
    /// SD shares rank 0 with unrecognized labels.
    pub fn rank(self) -> u32 {
        match self {
            QualityTier::Unknown | QualityTier::Sd => 0,
            QualityTier::Hd720 => RANK_720P,
            QualityTier::FullHd1080 => RANK_1080P,
            QualityTier::Qhd1440 => 3,
            QualityTier::Uhd2160 => 4,
        }
    }

    /// Canonical display label.
    pub fn label(self) -> &'static str {
        match self {
            QualityTier::Unknown => "unknown",
            QualityTier::Sd => "480p",
            QualityTier::Hd720 => "720p",
            QualityTier::FullHd1080 => "1080p",
            QualityTier::Qhd1440 => "1440p",
            QualityTier::Uhd2160 => "2160p",
        }
    }

    /// Normalize a free-form label such as `4K`, `[1080p]` or `FHD`.
    ///
    /// Patterns are tried in table order; the first match wins.
    pub fn from_label(label: &str) -> Self {
        let cleaned = label.trim().trim_matches(|c: char| !c.is_alphanumeric());
        if cleaned.is_empty() {
            return QualityTier::Unknown;
        }

        TIER_TABLE
            .iter()
            .find(|(_, pattern)| pattern.is_match(cleaned))
            .map(|(tier, _)| *tier)
            .unwrap_or(QualityTier::Unknown)
    }
}

/// Canonical tier → aliases, highest tier first.
const TIER_ALIASES: &[(QualityTier, &str)] = &[
    (QualityTier::Uhd2160, r"(?i)^(?:2160p?|4k|uhd)\b"),
    (QualityTier::Qhd1440, r"(?i)^(?:1440p?|2k|qhd)\b"),
    (QualityTier::FullHd1080, r"(?i)^(?:1080[pi]?|fhd|full[-_ ]?hd)\b"),
    (QualityTier::Hd720, r"(?i)^(?:720p?|hd)\b"),
    (QualityTier::Sd, r"(?i)^(?:576p?|480p?|360p?|sd|dvd(?:rip)?)\b"),
];

static TIER_TABLE: Lazy<Vec<(QualityTier, Regex)>> = Lazy::new(|| {
    TIER_ALIASES
        .iter()
        .map(|(tier, pattern)| (*tier, Regex::new(pattern).unwrap()))
        .collect()
});
