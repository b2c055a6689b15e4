//! Stream scoring and winner/fallback selection.
//!
//! Scoring is a pure function of quality rank, seeders, size and a pair of
//! weights. Selection picks the global winner plus at most one fallback
//! stream from the adjacent lower tier.

mod engine;
mod selector;

pub use engine::{
    score, score_streams, ScoredStream, ScoringWeights, WeightPresets, BYTES_PER_GB,
    UNKNOWN_SIZE_GB,
};
pub use selector::select_with_fallback;
