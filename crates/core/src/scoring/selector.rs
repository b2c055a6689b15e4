//! Winner plus adjacent-tier fallback selection.

use std::collections::BTreeMap;

use super::ScoredStream;
use crate::quality::{RANK_1080P, RANK_720P};

/// Pick the best stream and at most one fallback.
///
/// The result always starts with the highest-scoring candidate (first
/// occurrence wins ties). A fallback is appended when:
/// - `higher_tier_fallback` is set and the winner ranks above 1080p: the
///   best 1080p candidate, if any;
/// - the winner is exactly 1080p: the best 720p candidate, if any.
///
/// Returns at most two streams; empty input gives empty output.
pub fn select_with_fallback(
    candidates: Vec<ScoredStream>,
    higher_tier_fallback: bool,
) -> Vec<ScoredStream> {
    if candidates.is_empty() {
        return Vec::new();
    }

    // Index of the best representative per rank.
    let mut best_by_rank: BTreeMap<u32, usize> = BTreeMap::new();
    let mut winner = 0;

    for (idx, candidate) in candidates.iter().enumerate() {
        best_by_rank
            .entry(candidate.rank)
            .and_modify(|best| {
                if candidate.score > candidates[*best].score {
                    *best = idx;
                }
            })
            .or_insert(idx);

        if candidate.score > candidates[winner].score {
            winner = idx;
        }
    }

    let winner_rank = candidates[winner].rank;
    let mut picks = vec![winner];

    if higher_tier_fallback && winner_rank > RANK_1080P {
        if let Some(&idx) = best_by_rank.get(&RANK_1080P) {
            picks.push(idx);
        }
    }
    if winner_rank == RANK_1080P {
        if let Some(&idx) = best_by_rank.get(&RANK_720P) {
            picks.push(idx);
        }
    }

    let mut slots: Vec<Option<ScoredStream>> = candidates.into_iter().map(Some).collect();
    picks
        .into_iter()
        .filter_map(|idx| slots[idx].take())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::RawStream;

    fn candidate(title: &str, rank: u32, score: f64) -> ScoredStream {
        ScoredStream {
            stream: RawStream {
                title: Some(title.to_string()),
                ..Default::default()
            },
            quality_label: String::new(),
            rank,
            seeders: 0,
            size_bytes: 0,
            score,
        }
    }

    fn titles(result: &[ScoredStream]) -> Vec<&str> {
        result.iter().map(|s| s.stream.display_text()).collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(select_with_fallback(Vec::new(), true).is_empty());
    }

    #[test]
    fn test_single_candidate() {
        let result = select_with_fallback(vec![candidate("only", 3, 1.0)], true);
        assert_eq!(titles(&result), vec!["only"]);
    }

    #[test]
    fn test_winner_is_max_score() {
        let result = select_with_fallback(
            vec![
                candidate("low", 0, 1.0),
                candidate("high", 0, 9.0),
                candidate("mid", 0, 5.0),
            ],
            false,
        );
        assert_eq!(titles(&result), vec!["high"]);
    }

    #[test]
    fn test_ties_keep_first_occurrence() {
        let result = select_with_fallback(
            vec![
                candidate("first", 2, 7.0),
                candidate("second", 2, 7.0),
                candidate("hd-a", 1, 3.0),
                candidate("hd-b", 1, 3.0),
            ],
            false,
        );
        assert_eq!(titles(&result), vec!["first", "hd-a"]);
    }

    #[test]
    fn test_above_1080p_winner_gets_1080p_fallback_when_flag_set() {
        let candidates = vec![
            candidate("4k", 4, 400.0),
            candidate("1080-weak", 2, 100.0),
            candidate("1080-strong", 2, 150.0),
            candidate("720", 1, 120.0),
        ];
        let result = select_with_fallback(candidates, true);
        assert_eq!(titles(&result), vec!["4k", "1080-strong"]);
    }

    #[test]
    fn test_above_1080p_winner_without_flag() {
        let candidates = vec![candidate("4k", 4, 400.0), candidate("1080", 2, 100.0)];
        let result = select_with_fallback(candidates, false);
        assert_eq!(titles(&result), vec!["4k"]);
    }

    #[test]
    fn test_above_1080p_winner_without_1080p_candidates() {
        let candidates = vec![candidate("4k", 4, 400.0), candidate("720", 1, 100.0)];
        let result = select_with_fallback(candidates, true);
        assert_eq!(titles(&result), vec!["4k"]);
    }

    #[test]
    fn test_1080p_winner_gets_720p_fallback_regardless_of_flag() {
        for flag in [true, false] {
            let candidates = vec![
                candidate("720-a", 1, 10.0),
                candidate("1080", 2, 50.0),
                candidate("720-b", 1, 30.0),
                candidate("sd", 0, 40.0),
            ];
            let result = select_with_fallback(candidates, flag);
            assert_eq!(titles(&result), vec!["1080", "720-b"]);
        }
    }

    #[test]
    fn test_1080p_winner_without_720p_candidates() {
        let candidates = vec![candidate("1080", 2, 50.0), candidate("sd", 0, 10.0)];
        assert_eq!(titles(&select_with_fallback(candidates, true)), vec!["1080"]);
    }

    #[test]
    fn test_low_rank_winner_has_no_fallback() {
        let candidates = vec![candidate("720", 1, 99.0), candidate("1080", 2, 10.0)];
        assert_eq!(titles(&select_with_fallback(candidates, true)), vec!["720"]);
    }

    #[test]
    fn test_never_more_than_two() {
        let candidates = (0..20)
            .map(|i| candidate(&format!("c{}", i), i % 5, i as f64))
            .collect();
        assert!(select_with_fallback(candidates, true).len() <= 2);
    }
}
