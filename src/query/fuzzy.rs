//! Fuzzy query implementation for approximate term matching.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::index::IndexSegment;
use crate::query::scorer::BM25Scorer;
use crate::query::{Query, ScoredDocs};
use crate::spelling::levenshtein::{damerau_levenshtein_distance, levenshtein_distance_threshold};

/// A dictionary term accepted by a fuzzy query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzyMatch {
    pub term: String,
    pub edit_distance: u32,
    pub doc_frequency: u64,
    /// `1 - distance / length`, in `[0, 1]`.
    pub similarity_score: f32,
}

/// A fuzzy query for approximate string matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuzzyQuery {
    /// Field to search in
    field: String,
    /// Term to search for, already normalized
    term: String,
    /// Maximum edit distance
    max_edits: u32,
    /// Minimum prefix length that must match exactly
    prefix_length: u32,
    /// Whether transpositions count as single edits (Damerau-Levenshtein)
    transpositions: bool,
    /// Maximum number of dictionary terms to expand to
    max_expansions: usize,
    /// Boost factor for the query
    boost: f32,
}

impl FuzzyQuery {
    /// Create a new fuzzy query with default settings (2 edits, 50 expansions).
    pub fn new<F: Into<String>, T: Into<String>>(field: F, term: T) -> Self {
        FuzzyQuery {
            field: field.into(),
            term: term.into(),
            max_edits: 2,
            prefix_length: 0,
            transpositions: true,
            max_expansions: 50,
            boost: 1.0,
        }
    }

    /// Set the maximum edit distance.
    pub fn max_edits(mut self, max_edits: u32) -> Self {
        self.max_edits = max_edits;
        self
    }

    /// Set the minimum prefix length that must match exactly.
    pub fn prefix_length(mut self, prefix_length: u32) -> Self {
        self.prefix_length = prefix_length;
        self
    }

    /// Set whether transpositions should be considered single edits.
    pub fn transpositions(mut self, transpositions: bool) -> Self {
        self.transpositions = transpositions;
        self
    }

    /// Set the maximum number of terms to expand to.
    pub fn max_expansions(mut self, max_expansions: usize) -> Self {
        self.max_expansions = max_expansions;
        self
    }

    /// Set the boost factor for this query.
    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    fn edit_distance(&self, candidate: &str) -> Option<u32> {
        let max = self.max_edits as usize;
        let distance = if self.transpositions {
            Some(damerau_levenshtein_distance(&self.term, candidate)).filter(|d| *d <= max)
        } else {
            levenshtein_distance_threshold(&self.term, candidate, max)
        };
        distance.map(|d| d as u32)
    }

    fn calculate_similarity_score(&self, edit_distance: u32, candidate: &str) -> f32 {
        let len = self.term.chars().count().min(candidate.chars().count()).max(1);
        (1.0 - edit_distance as f32 / len as f32).max(0.0)
    }

    /// Enumerate dictionary terms within `max_edits` of the query term.
    ///
    /// Results are sorted closest first, then by document frequency, then
    /// alphabetically, and truncated to `max_expansions`.
    pub fn find_matches(&self, segment: &IndexSegment) -> Vec<FuzzyMatch> {
        let Some(field) = segment.field(&self.field) else {
            return Vec::new();
        };
        if self.term.is_empty() {
            return Vec::new();
        }

        let prefix: String = self.term.chars().take(self.prefix_length as usize).collect();
        let term_len = self.term.chars().count();
        let mut matches: Vec<FuzzyMatch> = field
            .terms()
            .filter(|(candidate, _)| candidate.starts_with(&prefix))
            .filter(|(candidate, _)| {
                candidate.chars().count().abs_diff(term_len) <= self.max_edits as usize
            })
            .filter_map(|(candidate, doc_freq)| {
                self.edit_distance(candidate).map(|edit_distance| FuzzyMatch {
                    term: candidate.to_string(),
                    edit_distance,
                    doc_frequency: doc_freq,
                    similarity_score: self.calculate_similarity_score(edit_distance, candidate),
                })
            })
            .collect();

        matches.sort_by(|a, b| {
            a.edit_distance
                .cmp(&b.edit_distance)
                .then_with(|| b.doc_frequency.cmp(&a.doc_frequency))
                .then_with(|| a.term.cmp(&b.term))
        });
        matches.truncate(self.max_expansions);
        matches
    }
}

impl Query for FuzzyQuery {
    /// A document scores as its best matching expansion, weighted by how
    /// close that expansion is to the query term.
    fn execute(&self, segment: &IndexSegment) -> Result<ScoredDocs> {
        let Some(field) = segment.field(&self.field) else {
            return Ok(ScoredDocs::new());
        };

        let mut results = ScoredDocs::new();
        for m in self.find_matches(segment) {
            let Some(postings) = field.postings(&m.term) else {
                continue;
            };
            let scorer = BM25Scorer::new(
                m.doc_frequency,
                segment.doc_count() as u64,
                field.avg_length(),
                self.boost * m.similarity_score,
            );
            for posting in postings {
                let score = scorer.score(posting.term_freq(), field.field_length(posting.doc_id));
                results.keep_max(posting.doc_id, score);
            }
        }
        Ok(results)
    }

    fn boost(&self) -> f32 {
        self.boost
    }

    fn set_boost(&mut self, boost: f32) {
        self.boost = boost;
    }

    fn description(&self) -> String {
        let base = format!("{}:{}~{}", self.field, self.term, self.max_edits);
        if self.boost == 1.0 {
            base
        } else {
            format!("{base}^{}", self.boost)
        }
    }

    fn clone_box(&self) -> Box<dyn Query> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::StandardAnalyzer;
    use crate::document::movie::Movie;

    fn segment() -> IndexSegment {
        let titles = ["Leon The Professional", "Leo Returns Home", "Lion King", "Neon Demon"];
        let movies: Vec<Movie> = titles
            .iter()
            .enumerate()
            .map(|(i, t)| Movie {
                imdb_id: format!("tt{i}"),
                title: t.to_string(),
                ..Default::default()
            })
            .collect();
        IndexSegment::build(&movies, &StandardAnalyzer::default())
    }

    #[test]
    fn test_fuzzy_query_creation() {
        let query = FuzzyQuery::new("title", "leon").max_edits(1).with_boost(1.5);
        assert_eq!(query.field(), "title");
        assert_eq!(query.term(), "leon");
        assert_eq!(query.description(), "title:leon~1^1.5");
    }

    #[test]
    fn test_find_matches_ordering() {
        let segment = segment();
        let matches = FuzzyQuery::new("title", "leon").max_edits(1).find_matches(&segment);

        let terms: Vec<&str> = matches.iter().map(|m| m.term.as_str()).collect();
        assert_eq!(terms, vec!["leon", "leo", "lion", "neon"]);
        assert_eq!(matches[0].edit_distance, 0);
        assert_eq!(matches[0].similarity_score, 1.0);
    }

    #[test]
    fn test_execute_prefers_exact_match() {
        let segment = segment();
        let results = FuzzyQuery::new("title", "leon").execute(&segment).unwrap();

        assert!(results.contains(0));
        assert!(results.contains(1));
        assert!(results.get(0).unwrap() > results.get(1).unwrap());
    }

    #[test]
    fn test_transpositions_and_limits() {
        let segment = segment();
        let swapped = FuzzyQuery::new("title", "loen").max_edits(1);
        assert!(swapped.find_matches(&segment).iter().any(|m| m.term == "leon"));

        let strict = FuzzyQuery::new("title", "loen").max_edits(1).transpositions(false);
        assert!(!strict.find_matches(&segment).iter().any(|m| m.term == "leon"));

        let capped = FuzzyQuery::new("title", "leon").max_expansions(1);
        assert_eq!(capped.find_matches(&segment).len(), 1);

        let prefixed = FuzzyQuery::new("title", "leon").max_edits(1).prefix_length(2);
        assert!(prefixed.find_matches(&segment).iter().all(|m| m.term.starts_with("le")));
    }

    #[test]
    fn test_empty_term_matches_nothing() {
        let segment = segment();
        assert!(FuzzyQuery::new("title", "").execute(&segment).unwrap().is_empty());
    }
}
