//! Fuzzy matching: a ready-made ranked lookup and match highlighting.

use super::{LookupOutcome, SearchFunction};
use crate::domain::Selectable;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::fmt;

/// Synchronous lookup ranking options by Skim fuzzy score.
///
/// Options whose display text does not fuzzy-match the search text are dropped.
/// Higher scores come first; equal scores keep their source order.
pub struct FuzzyLookup {
    matcher: SkimMatcherV2,
}

impl FuzzyLookup {
    #[must_use]
    pub fn new() -> Self {
        Self {
            matcher: SkimMatcherV2::default().ignore_case(),
        }
    }
}

impl Default for FuzzyLookup {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FuzzyLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FuzzyLookup").finish_non_exhaustive()
    }
}

impl<T: Selectable> SearchFunction<T> for FuzzyLookup {
    fn search(&self, term: &str, options: &[T]) -> LookupOutcome<T> {
        let _span = tracing::trace_span!("fuzzy_lookup", options = options.len()).entered();

        let mut scored: Vec<(i64, &T)> = options
            .iter()
            .filter_map(|option| {
                self.matcher
                    .fuzzy_match(&option.display_text(), term)
                    .map(|score| (score, option))
            })
            .collect();

        scored.sort_by(|a, b| b.0.cmp(&a.0));

        LookupOutcome::Ready(Ok(scored.into_iter().map(|(_, option)| option.clone()).collect()))
    }
}

/// Character ranges of `text` matched by `query`, as `(start, end)` with exclusive end.
///
/// Consecutive matched characters are coalesced into one range. Returns an empty
/// vector when `query` is empty or does not match.
#[must_use]
pub fn highlight_ranges(matcher: &SkimMatcherV2, text: &str, query: &str) -> Vec<(usize, usize)> {
    if query.is_empty() {
        return vec![];
    }

    let Some((_score, indices)) = matcher.fuzzy_indices(text, query) else {
        return vec![];
    };

    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for idx in indices {
        match ranges.last_mut() {
            Some((_, end)) if *end == idx => *end = idx + 1,
            _ => ranges.push((idx, idx + 1)),
        }
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cities() -> Vec<String> {
        ["Kyiv", "Kharkiv", "Odesa", "Dnipro", "Lviv"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn ready<T: std::fmt::Debug>(outcome: LookupOutcome<T>) -> Vec<T> {
        match outcome {
            LookupOutcome::Ready(result) => result.unwrap(),
            LookupOutcome::Pending(_) => panic!("fuzzy lookup is synchronous"),
        }
    }

    #[test]
    fn drops_non_matching_options() {
        let found = ready(FuzzyLookup::new().search("kv", cities().as_slice()));
        assert!(found.contains(&"Kyiv".to_string()));
        assert!(found.contains(&"Kharkiv".to_string()));
        assert!(!found.contains(&"Odesa".to_string()));
    }

    #[test]
    fn ignores_case() {
        let found = ready(FuzzyLookup::new().search("ODESA", cities().as_slice()));
        assert_eq!(found, vec!["Odesa".to_string()]);
    }

    #[test]
    fn ranks_contiguous_matches_first() {
        let options = vec!["Kyiv Oblast".to_string(), "Lviv".to_string()];
        let found = ready(FuzzyLookup::new().search("lviv", options.as_slice()));
        assert_eq!(found.first().map(String::as_str), Some("Lviv"));
    }

    #[test]
    fn highlight_coalesces_consecutive_characters() {
        let matcher = SkimMatcherV2::default().ignore_case();
        assert_eq!(highlight_ranges(&matcher, "Kharkiv", "kh"), vec![(0, 2)]);
        assert!(highlight_ranges(&matcher, "Kharkiv", "").is_empty());
        assert!(highlight_ranges(&matcher, "Odesa", "zz").is_empty());
    }
}
