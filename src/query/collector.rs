//! Collector gathering the top ranked documents of a match set.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::index::DocId;
use crate::query::{ScoreDoc, ScoredDocs, TopDocs};

/// Keeps the best `max_docs` documents by score.
///
/// Ranking is by score descending; equal scores rank the lower doc id
/// first, so results are deterministic across runs.
#[derive(Debug)]
pub struct TopDocsCollector {
    max_docs: usize,
    /// Worst retained document on top.
    hits: BinaryHeap<HeapEntry>,
    total_hits: u64,
}

#[derive(Debug, Clone, Copy)]
struct HeapEntry {
    doc_id: DocId,
    score: f32,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    /// Greater means worse ranked.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| self.doc_id.cmp(&other.doc_id))
    }
}

impl TopDocsCollector {
    pub fn new(max_docs: usize) -> Self {
        TopDocsCollector {
            max_docs,
            hits: BinaryHeap::with_capacity(max_docs.min(1024)),
            total_hits: 0,
        }
    }

    pub fn max_docs(&self) -> usize {
        self.max_docs
    }

    pub fn total_hits(&self) -> u64 {
        self.total_hits
    }

    /// Collect one matching document.
    pub fn collect(&mut self, doc_id: DocId, score: f32) {
        self.total_hits += 1;
        if self.max_docs == 0 {
            return;
        }

        let entry = HeapEntry { doc_id, score };
        if self.hits.len() < self.max_docs {
            self.hits.push(entry);
        } else if let Some(worst) = self.hits.peek() {
            if entry < *worst {
                self.hits.pop();
                self.hits.push(entry);
            }
        }
    }

    /// Collect every document of a match set.
    pub fn collect_all(&mut self, docs: &ScoredDocs) {
        for (doc_id, score) in docs.iter() {
            self.collect(doc_id, score);
        }
    }

    /// Consume the collector, returning hits best first.
    pub fn into_top_docs(self) -> TopDocs {
        let score_docs = self
            .hits
            .into_sorted_vec()
            .into_iter()
            .map(|e| ScoreDoc {
                doc_id: e.doc_id,
                score: e.score,
            })
            .collect();
        TopDocs {
            total_hits: self.total_hits,
            score_docs,
        }
    }
}
