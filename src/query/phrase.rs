//! Phrase query: terms at consecutive positions within one field.

use ahash::AHashMap;

use crate::error::Result;
use crate::index::{DocId, IndexSegment, Posting};
use crate::query::scorer::BM25Scorer;
use crate::query::{Query, ScoredDocs};

/// A query matching documents where `terms` occur consecutively in `field`.
#[derive(Debug, Clone)]
pub struct PhraseQuery {
    field: String,
    terms: Vec<String>,
    boost: f32,
}

impl PhraseQuery {
    /// Create a phrase query. Terms must already be analyzed.
    pub fn new<F: Into<String>>(field: F, terms: Vec<String>) -> Self {
        PhraseQuery {
            field: field.into(),
            terms,
            boost: 1.0,
        }
    }

    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Number of positions at which the whole phrase starts.
    fn phrase_freq(postings: &[&Posting]) -> u32 {
        let Some((first, rest)) = postings.split_first() else {
            return 0;
        };
        first
            .positions
            .iter()
            .filter(|&&start| {
                rest.iter().enumerate().all(|(offset, p)| {
                    p.positions
                        .binary_search(&(start + offset as u32 + 1))
                        .is_ok()
                })
            })
            .count() as u32
    }
}

impl Query for PhraseQuery {
    fn execute(&self, segment: &IndexSegment) -> Result<ScoredDocs> {
        let Some(field) = segment.field(&self.field) else {
            return Ok(ScoredDocs::new());
        };
        if self.terms.is_empty() {
            return Ok(ScoredDocs::new());
        }

        let mut lists = Vec::with_capacity(self.terms.len());
        for term in &self.terms {
            match field.postings(term) {
                Some(postings) => lists.push(postings),
                None => return Ok(ScoredDocs::new()),
            }
        }

        let total_docs = segment.doc_count() as u64;
        let idf: f32 = lists
            .iter()
            .map(|p| BM25Scorer::new(p.len() as u64, total_docs, field.avg_length(), 1.0).idf())
            .sum();
        let norm = BM25Scorer::new(1, total_docs, field.avg_length(), 1.0);

        let mut per_doc: AHashMap<DocId, Vec<&Posting>> = AHashMap::new();
        for list in &lists {
            for posting in list.iter() {
                per_doc.entry(posting.doc_id).or_default().push(posting);
            }
        }

        let mut results = ScoredDocs::new();
        for (doc_id, postings) in per_doc {
            if postings.len() != lists.len() {
                continue;
            }
            let freq = Self::phrase_freq(&postings);
            if freq > 0 {
                let tf = norm.tf(freq as f32, field.field_length(doc_id) as f32);
                results.accumulate(doc_id, self.boost * idf * tf);
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
        let phrase = format!("{}:\"{}\"", self.field, self.terms.join(" "));
        if self.boost == 1.0 {
            phrase
        } else {
            format!("{phrase}^{}", self.boost)
        }
    }

    fn clone_box(&self) -> Box<dyn Query> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
