//! Edit distance functions used by fuzzy matching.

use std::cmp::min;

/// Levenshtein distance, giving up once it is certain to exceed `threshold`.
///
/// Returns `None` when the distance is larger than `threshold`.
pub fn levenshtein_distance_threshold(s1: &str, s2: &str, threshold: usize) -> Option<usize> {
    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();

    if a.len().abs_diff(b.len()) > threshold {
        return None;
    }
    if a.is_empty() || b.is_empty() {
        return Some(a.len().max(b.len()));
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        let mut row_min = curr[0];
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = min(min(prev[j + 1] + 1, curr[j] + 1), prev[j] + cost);
            row_min = row_min.min(curr[j + 1]);
        }
        if row_min > threshold {
            return None;
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    Some(prev[b.len()]).filter(|d| *d <= threshold)
}

/// Optimal string alignment distance: Levenshtein plus adjacent
/// transpositions counted as a single edit.
pub fn damerau_levenshtein_distance(s1: &str, s2: &str) -> usize {
    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();

    if a.is_empty() || b.is_empty() {
        return a.len().max(b.len());
    }

    // Three rows: i-2, i-1 and i.
    let mut before: Vec<usize> = vec![0; b.len() + 1];
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            let mut best = min(min(prev[j] + 1, curr[j - 1] + 1), prev[j - 1] + cost);
            if i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                best = best.min(before[j - 2] + 1);
            }
            curr[j] = best;
        }
        std::mem::swap(&mut before, &mut prev);
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_threshold() {
        assert_eq!(levenshtein_distance_threshold("kitten", "sitting", 3), Some(3));
        assert_eq!(levenshtein_distance_threshold("kitten", "sitting", 2), None);
        assert_eq!(levenshtein_distance_threshold("", "abc", 3), Some(3));
        assert_eq!(levenshtein_distance_threshold("abc", "abc", 0), Some(0));
        assert_eq!(levenshtein_distance_threshold("a", "abcdef", 2), None);
    }

    #[test]
    fn test_damerau_transposition() {
        assert_eq!(damerau_levenshtein_distance("knigth", "knight"), 1);
        assert_eq!(damerau_levenshtein_distance("ab", "ba"), 1);
        assert_eq!(damerau_levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(damerau_levenshtein_distance("", "ab"), 2);
        assert_eq!(damerau_levenshtein_distance("matrix", "matrix"), 0);
    }

    #[test]
    fn test_transposition_costs_two_without_damerau() {
        assert_eq!(levenshtein_distance_threshold("ab", "ba", 2), Some(2));
    }
}
