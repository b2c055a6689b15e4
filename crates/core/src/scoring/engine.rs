//! Score computation.

use serde::{Deserialize, Serialize};

use crate::quality::{extract_quality, QualityTier};
use crate::source::RawStream;

/// Bytes in one GiB.
pub const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Size in GiB assumed for streams of unknown size. Keeps the speed proxy
/// finite while still rewarding seeders.
pub const UNKNOWN_SIZE_GB: f64 = 0.1;

/// Relative weight of quality rank versus the speed proxy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub quality: f64,
    pub speed: f64,
}

impl ScoringWeights {
    /// Resolution dominates; speed only breaks near-ties.
    pub const QUALITY_FIRST: Self = Self {
        quality: 100.0,
        speed: 0.5,
    };

    /// Seeders per GiB dominate; resolution still counts.
    pub const SPEED_FIRST: Self = Self {
        quality: 10.0,
        speed: 1.0,
    };
}

/// The two weight presets, chosen per request by a boolean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightPresets {
    #[serde(default = "default_quality_first")]
    pub quality_first: ScoringWeights,
    #[serde(default = "default_speed_first")]
    pub speed_first: ScoringWeights,
}

impl WeightPresets {
    pub fn select(&self, prefer_quality: bool) -> ScoringWeights {
        if prefer_quality {
            self.quality_first
        } else {
            self.speed_first
        }
    }
}

impl Default for WeightPresets {
    fn default() -> Self {
        Self {
            quality_first: ScoringWeights::QUALITY_FIRST,
            speed_first: ScoringWeights::SPEED_FIRST,
        }
    }
}

fn default_quality_first() -> ScoringWeights {
    ScoringWeights::QUALITY_FIRST
}

fn default_speed_first() -> ScoringWeights {
    ScoringWeights::SPEED_FIRST
}

/// `rank * w.quality + (seeders / size_gb) * w.speed`.
pub fn score(rank: u32, seeders: u32, size_bytes: u64, weights: &ScoringWeights) -> f64 {
    let size_gb = if size_bytes > 0 {
        size_bytes as f64 / BYTES_PER_GB
    } else {
        UNKNOWN_SIZE_GB
    };
    let speed_score = seeders as f64 / size_gb;

    rank as f64 * weights.quality + speed_score * weights.speed
}

/// A candidate stream annotated with its parsed quality and score.
///
/// Serializes flat: the upstream descriptor keeps its camelCase wire names
/// (`infoHash`, `behaviorHints`) so clients can hand it back to a player
/// untouched, while the annotations use snake_case like the rest of the
/// API (`quality_label`, `size_bytes`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredStream {
    #[serde(flatten)]
    pub stream: RawStream,
    pub quality_label: String,
    pub rank: u32,
    pub seeders: u32,
    pub size_bytes: u64,
    pub score: f64,
}

impl ScoredStream {
    pub fn from_raw(stream: RawStream, weights: &ScoringWeights) -> Self {
        let parsed = extract_quality(&stream);
        let score = score(parsed.rank, parsed.seeders, parsed.size_bytes, weights);
        let quality_label = match parsed.tier {
            QualityTier::Unknown => parsed.label,
            tier => tier.label().to_string(),
        };

        Self {
            stream,
            quality_label,
            rank: parsed.rank,
            seeders: parsed.seeders,
            size_bytes: parsed.size_bytes,
            score,
        }
    }
}

/// Annotate every raw stream, preserving input order.
pub fn score_streams(raw: Vec<RawStream>, weights: &ScoringWeights) -> Vec<ScoredStream> {
    raw.into_iter()
        .map(|s| ScoredStream::from_raw(s, weights))
        .collect()
}
