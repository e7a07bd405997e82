//! Query system for searching the index.
//!
//! Every query evaluates eagerly against an [`IndexSegment`] and produces a
//! [`ScoredDocs`] match set. Compound queries ([`boolean::BooleanQuery`])
//! combine the match sets of their clauses; the collector then ranks the
//! final set into [`TopDocs`].

pub mod boolean;
pub mod collector;
pub mod fuzzy;
pub mod match_all;
pub mod parser;
pub mod phrase;
pub mod range;
pub mod scorer;
pub mod term;

use std::any::Any;
use std::fmt::Debug;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::index::{DocId, IndexSegment};

pub use boolean::{BooleanClause, BooleanQuery, BooleanQueryBuilder, Occur};
pub use fuzzy::FuzzyQuery;
pub use match_all::MatchAllQuery;
pub use parser::MultiFieldQueryParser;
pub use phrase::PhraseQuery;
pub use range::NumericRangeQuery;
pub use term::TermQuery;

/// Trait for search queries.
pub trait Query: Send + Sync + Debug {
    /// Evaluate this query, returning every matching document with its score.
    fn execute(&self, segment: &IndexSegment) -> Result<ScoredDocs>;

    /// Get the boost factor for this query.
    fn boost(&self) -> f32;

    /// Set the boost factor for this query.
    fn set_boost(&mut self, boost: f32);

    /// Get a human-readable description of this query.
    fn description(&self) -> String;

    /// Clone this query.
    fn clone_box(&self) -> Box<dyn Query>;

    /// Get this query as Any for downcasting.
    fn as_any(&self) -> &dyn Any;
}

impl Clone for Box<dyn Query> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// The match set of a query: document id to relevance score.
#[derive(Debug, Clone, Default)]
pub struct ScoredDocs {
    scores: AHashMap<DocId, f32>,
}

impl ScoredDocs {
    pub fn new() -> Self {
        ScoredDocs {
            scores: AHashMap::new(),
        }
    }

    /// Add `score` to a document, inserting it if absent.
    pub fn accumulate(&mut self, doc_id: DocId, score: f32) {
        *self.scores.entry(doc_id).or_insert(0.0) += score;
    }

    /// Keep the larger of the existing and the new score.
    pub fn keep_max(&mut self, doc_id: DocId, score: f32) {
        let entry = self.scores.entry(doc_id).or_insert(score);
        if score > *entry {
            *entry = score;
        }
    }

    pub fn get(&self, doc_id: DocId) -> Option<f32> {
        self.scores.get(&doc_id).copied()
    }

    pub fn contains(&self, doc_id: DocId) -> bool {
        self.scores.contains_key(&doc_id)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DocId, f32)> + '_ {
        self.scores.iter().map(|(d, s)| (*d, *s))
    }

    /// Documents present in both sets; scores are summed.
    pub fn intersect(self, other: &ScoredDocs) -> ScoredDocs {
        let scores = self
            .scores
            .into_iter()
            .filter_map(|(d, s)| other.get(d).map(|o| (d, s + o)))
            .collect();
        ScoredDocs { scores }
    }

    /// Documents present in either set; scores are summed.
    pub fn union(mut self, other: &ScoredDocs) -> ScoredDocs {
        for (d, s) in other.iter() {
            self.accumulate(d, s);
        }
        self
    }

    /// Add the scores of `other` to documents already in this set.
    pub fn add_optional(mut self, other: &ScoredDocs) -> ScoredDocs {
        for (d, s) in self.scores.iter_mut() {
            if let Some(o) = other.get(*d) {
                *s += o;
            }
        }
        self
    }

    /// Drop documents present in `other`.
    pub fn exclude(mut self, other: &ScoredDocs) -> ScoredDocs {
        self.scores.retain(|d, _| !other.contains(*d));
        self
    }

    /// Same documents, all scores zero. Used for non-scoring filter clauses.
    pub fn without_scores(mut self) -> ScoredDocs {
        self.scores.values_mut().for_each(|s| *s = 0.0);
        self
    }

    pub fn scale(mut self, factor: f32) -> ScoredDocs {
        if factor != 1.0 {
            self.scores.values_mut().for_each(|s| *s *= factor);
        }
        self
    }
}

impl FromIterator<(DocId, f32)> for ScoredDocs {
    fn from_iter<I: IntoIterator<Item = (DocId, f32)>>(iter: I) -> Self {
        ScoredDocs {
            scores: iter.into_iter().collect(),
        }
    }
}

/// A ranked document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreDoc {
    pub doc_id: DocId,
    pub score: f32,
}

/// The ranked head of a result set plus the total number of matches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopDocs {
    /// Total number of matching documents, which may exceed `score_docs.len()`.
    pub total_hits: u64,
    /// Best matches, highest score first.
    pub score_docs: Vec<ScoreDoc>,
}
