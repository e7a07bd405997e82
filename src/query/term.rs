//! Term query implementation for exact term matching.

use crate::error::Result;
use crate::index::IndexSegment;
use crate::query::scorer::BM25Scorer;
use crate::query::{Query, ScoredDocs};

/// A query that matches documents containing a specific term.
#[derive(Debug, Clone)]
pub struct TermQuery {
    /// The field to search in.
    field: String,
    /// The term to search for.
    term: String,
    /// The boost factor for this query.
    boost: f32,
}

impl TermQuery {
    /// Create a new term query.
    ///
    /// The term is matched exactly and is NOT analyzed; pass it already in
    /// normalized (lowercased) form.
    pub fn new<F, T>(field: F, term: T) -> Self
    where
        F: Into<String>,
        T: Into<String>,
    {
        TermQuery {
            field: field.into(),
            term: term.into(),
            boost: 1.0,
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    /// Set the boost factor.
    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }
}

impl Query for TermQuery {
    fn execute(&self, segment: &IndexSegment) -> Result<ScoredDocs> {
        let Some(field) = segment.field(&self.field) else {
            return Ok(ScoredDocs::new());
        };
        let Some(postings) = field.postings(&self.term) else {
            return Ok(ScoredDocs::new());
        };

        let scorer = BM25Scorer::new(
            postings.len() as u64,
            segment.doc_count() as u64,
            field.avg_length(),
            self.boost,
        );
        Ok(postings
            .iter()
            .map(|p| {
                (
                    p.doc_id,
                    scorer.score(p.term_freq(), field.field_length(p.doc_id)),
                )
            })
            .collect())
    }

    fn boost(&self) -> f32 {
        self.boost
    }

    fn set_boost(&mut self, boost: f32) {
        self.boost = boost;
    }

    fn description(&self) -> String {
        if self.boost == 1.0 {
            format!("{}:{}", self.field, self.term)
        } else {
            format!("{}:{}^{}", self.field, self.term, self.boost)
        }
    }

    fn clone_box(&self) -> Box<dyn Query> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
