//! End-to-end ranking of raw candidates.
//!
//! Ties the pure building blocks together: size filter, quality extraction
//! and scoring, language preference ordering, then winner/fallback
//! selection (or the full ordered list).

mod options;
mod ranker;

pub use options::{RankingMode, RankingOptions};
pub use ranker::StreamRanker;
