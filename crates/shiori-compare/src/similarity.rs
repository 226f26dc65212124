use serde::Serialize;
use tracing::trace;

/// Closest candidate by edit distance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevenshteinResult {
    /// The value that was searched for.
    pub original_value: String,
    /// The chosen candidate.
    pub value: String,
    pub distance: usize,
}

/// Closest candidate by bigram overlap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SorensenDiceResult {
    /// The value that was searched for.
    pub original_value: String,
    /// The chosen candidate.
    pub value: String,
    /// 0.0 (nothing shared) to 1.0 (identical).
    pub rating: f64,
}

/// Case-insensitive edit distance.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    strsim::levenshtein(&a.to_lowercase(), &b.to_lowercase())
}

/// Case-insensitive Sørensen-Dice coefficient over character bigrams.
pub fn sorensen_dice_rating(a: &str, b: &str) -> f64 {
    strsim::sorensen_dice(&a.to_lowercase(), &b.to_lowercase())
}

/// The candidate with the smallest distance to `value`. Ties keep the
/// earlier candidate.
pub fn find_best_match_with_levenshtein<S: AsRef<str>>(
    value: &str,
    candidates: &[S],
) -> Option<LevenshteinResult> {
    let (best, distance) = candidates
        .iter()
        .map(|candidate| (candidate.as_ref(), levenshtein_distance(value, candidate.as_ref())))
        .min_by_key(|&(_, distance)| distance)?;

    Some(LevenshteinResult {
        original_value: value.to_string(),
        value: best.to_string(),
        distance,
    })
}

/// The candidate with the highest rating against `value`. Ties keep the
/// earlier candidate.
pub fn find_best_match_with_sorensen_dice<S: AsRef<str>>(
    value: &str,
    candidates: &[S],
) -> Option<SorensenDiceResult> {
    let mut best: Option<(&str, f64)> = None;
    for candidate in candidates {
        let rating = sorensen_dice_rating(value, candidate.as_ref());
        if best.map_or(true, |(_, top)| rating > top) {
            best = Some((candidate.as_ref(), rating));
        }
    }

    best.map(|(best, rating)| SorensenDiceResult {
        original_value: value.to_string(),
        value: best.to_string(),
        rating,
    })
}

/// Drop the value least similar to the rest, scored by summed Sørensen-Dice
/// rating against every other value. Lists shorter than three are left alone.
pub fn eliminate_least_similar_value<S: AsRef<str>>(values: &mut Vec<S>) {
    if values.len() < 3 {
        return;
    }

    let totals: Vec<f64> = values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            values
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, other)| sorensen_dice_rating(value.as_ref(), other.as_ref()))
                .sum()
        })
        .collect();

    let mut lowest = 0;
    for (i, &total) in totals.iter().enumerate().skip(1) {
        if total < totals[lowest] {
            lowest = i;
        }
    }

    let removed = values.remove(lowest);
    trace!(value = removed.as_ref(), total = totals[lowest], "eliminated least similar value");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_case_insensitive() {
        assert_eq!(levenshtein_distance("Frieren", "FRIEREN"), 0);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
    }

    #[test]
    fn test_sorensen_dice_case_insensitive() {
        assert_eq!(sorensen_dice_rating("Night", "NIGHT"), 1.0);
        assert!(sorensen_dice_rating("Night", "Nacht") < 0.5);
    }

    #[test]
    fn test_best_match_levenshtein() {
        let candidates = ["Sousou no Frieren", "One Piece", "Sousou no Frieren 2"];
        let result = find_best_match_with_levenshtein("sousou no frieren", &candidates).unwrap();
        assert_eq!(result.value, "Sousou no Frieren");
        assert_eq!(result.original_value, "sousou no frieren");
        assert_eq!(result.distance, 0);
    }

    #[test]
    fn test_best_match_levenshtein_tie_keeps_first() {
        let result = find_best_match_with_levenshtein("ab", &["ax", "ay"]).unwrap();
        assert_eq!(result.value, "ax");
        assert_eq!(result.distance, 1);
    }

    #[test]
    fn test_best_match_empty_candidates() {
        let none: [&str; 0] = [];
        assert!(find_best_match_with_levenshtein("Frieren", &none).is_none());
        assert!(find_best_match_with_sorensen_dice("Frieren", &none).is_none());
    }

    #[test]
    fn test_best_match_sorensen_dice() {
        let candidates = vec![
            "Jujutsu Kaisen".to_string(),
            "Jujutsu Kaisen 2nd Season".to_string(),
            "Kaiju No. 8".to_string(),
        ];
        let result =
            find_best_match_with_sorensen_dice("Jujutsu Kaisen Season 2", &candidates).unwrap();
        assert_eq!(result.value, "Jujutsu Kaisen 2nd Season");
        assert!(result.rating > 0.5);
    }

    #[test]
    fn test_eliminate_least_similar() {
        let mut values = vec!["Jujutsu Kaisen", "One Piece", "Jujutsu Kaisen 2nd Season"];
        eliminate_least_similar_value(&mut values);
        assert_eq!(values, vec!["Jujutsu Kaisen", "Jujutsu Kaisen 2nd Season"]);
    }

    #[test]
    fn test_eliminate_short_list_untouched() {
        let mut values = vec!["Jujutsu Kaisen", "One Piece"];
        eliminate_least_similar_value(&mut values);
        assert_eq!(values.len(), 2);

        let mut empty: Vec<String> = Vec::new();
        eliminate_least_similar_value(&mut empty);
        assert!(empty.is_empty());
    }
}
