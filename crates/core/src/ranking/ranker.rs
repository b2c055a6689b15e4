use tracing::debug;

use crate::events::{emit, EventHook};
use crate::filter::filter_by_size;
use crate::language::LanguageMatcher;
use crate::metrics::{CANDIDATES_FILTERED, CANDIDATES_RANKED};
use crate::scoring::{score_streams, select_with_fallback, ScoredStream, WeightPresets};
use crate::source::RawStream;

use super::{RankingMode, RankingOptions};

/// Turns raw candidates into the final ordered result set.
///
/// Steps, in order:
/// 1. score every candidate with the preset picked by `prefer_quality`;
/// 2. drop candidates above `max_size_bytes` (unknown sizes stay);
/// 3. stable-sort by language preference;
/// 4. `Select`: winner plus fallback. `All`: everything, language
///    preference first, then score descending.
#[derive(Clone, Default)]
pub struct StreamRanker {
    presets: WeightPresets,
    event_hook: Option<EventHook>,
}

impl StreamRanker {
    pub fn new(presets: WeightPresets) -> Self {
        Self {
            presets,
            event_hook: None,
        }
    }

    pub fn with_event_hook(mut self, hook: EventHook) -> Self {
        self.event_hook = Some(hook);
        self
    }

    pub fn presets(&self) -> &WeightPresets {
        &self.presets
    }

    pub fn rank(&self, raw: Vec<RawStream>, options: &RankingOptions) -> Vec<ScoredStream> {
        let total = raw.len();
        CANDIDATES_RANKED
            .with_label_values(&[options.mode.as_str()])
            .observe(total as f64);

        let weights = self.presets.select(options.prefer_quality);
        let scored = score_streams(raw, &weights);

        let mut candidates = filter_by_size(scored, options.max_size_bytes, |s| s.size_bytes);
        let dropped = total - candidates.len();
        if dropped > 0 {
            CANDIDATES_FILTERED.inc_by(dropped as u64);
            emit(&self.event_hook, "size_filtered", &dropped.to_string());
        }

        if options.mode == RankingMode::All {
            // Stable, so equal scores keep upstream order
            candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
        }

        let matcher = LanguageMatcher::new(&options.languages);
        let candidates = matcher.sort(candidates, |s| s.stream.searchable_text());

        let result = match options.mode {
            RankingMode::Select => select_with_fallback(candidates, options.higher_tier_fallback),
            RankingMode::All => candidates,
        };

        debug!(
            candidates = total,
            filtered = dropped,
            returned = result.len(),
            mode = options.mode.as_str(),
            prefer_quality = options.prefer_quality,
            "Ranked streams"
        );
        emit(
            &self.event_hook,
            "ranked",
            &format!("candidates={} returned={}", total, result.len()),
        );

        result
    }
}
