//! Priority-based language scoring and stable reordering.

use std::cmp::Reverse;

use tracing::{debug, warn};

use super::table::{is_supported_language, matches_language};

/// Longest priority list honored; extra entries are dropped.
pub const MAX_LANGUAGE_PRIORITIES: usize = 5;

/// Score gap between adjacent priority slots.
pub const LANGUAGE_SCORE_STEP: u32 = 5;

/// Scores text against an ordered language priority list.
///
/// With priorities `[en, es]` an English title scores 10, a Spanish one 5
/// and anything else 0.
#[derive(Debug, Clone, Default)]
pub struct LanguageMatcher {
    priorities: Vec<String>,
}

impl LanguageMatcher {
    /// Build a matcher from codes ordered most-preferred first.
    pub fn new<S: AsRef<str>>(priorities: &[S]) -> Self {
        let mut codes: Vec<String> = priorities
            .iter()
            .map(|c| c.as_ref().trim().to_lowercase())
            .filter(|c| !c.is_empty())
            .collect();

        if codes.len() > MAX_LANGUAGE_PRIORITIES {
            warn!(
                requested = codes.len(),
                max = MAX_LANGUAGE_PRIORITIES,
                "Language priority list too long, truncating"
            );
            codes.truncate(MAX_LANGUAGE_PRIORITIES);
        }

        for code in codes.iter().filter(|c| !is_supported_language(c)) {
            debug!(code = %code, "Language code has no matchers and will never match");
        }

        Self { priorities: codes }
    }

    pub fn priorities(&self) -> &[String] {
        &self.priorities
    }

    pub fn is_empty(&self) -> bool {
        self.priorities.is_empty()
    }

    /// `(len - i) * 5` for the first matching priority `i`, else 0.
    pub fn score_text(&self, text: &str) -> u32 {
        let text = text.to_lowercase();
        let len = self.priorities.len();

        self.priorities
            .iter()
            .position(|code| matches_language(code, &text))
            .map(|i| (len - i) as u32 * LANGUAGE_SCORE_STEP)
            .unwrap_or(0)
    }

    /// Stable-sort `items` by descending language score.
    ///
    /// Items with equal scores keep their relative order. An empty priority
    /// list returns `items` unchanged.
    pub fn sort<T, F>(&self, items: Vec<T>, text_of: F) -> Vec<T>
    where
        F: Fn(&T) -> String,
    {
        if self.is_empty() {
            return items;
        }

        let mut scored: Vec<(u32, T)> = items
            .into_iter()
            .map(|item| (self.score_text(&text_of(&item)), item))
            .collect();
        scored.sort_by_key(|(score, _)| Reverse(*score));
        scored.into_iter().map(|(_, item)| item).collect()
    }
}
