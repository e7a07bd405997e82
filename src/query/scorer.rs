//! BM25 relevance scoring.

/// BM25 scorer for one term in one field.
#[derive(Debug, Clone)]
pub struct BM25Scorer {
    /// Document frequency of the term.
    doc_freq: u64,
    /// Total number of documents in the index.
    total_docs: u64,
    /// Average field length.
    avg_field_length: f64,
    /// Boost factor.
    boost: f32,
    k1: f32,
    b: f32,
}

impl BM25Scorer {
    /// Create a new BM25 scorer with the usual `k1 = 1.2`, `b = 0.75`.
    pub fn new(doc_freq: u64, total_docs: u64, avg_field_length: f64, boost: f32) -> Self {
        BM25Scorer {
            doc_freq,
            total_docs,
            avg_field_length,
            boost,
            k1: 1.2,
            b: 0.75,
        }
    }

    /// Inverse document frequency, `ln(1 + (N - df + 0.5) / (df + 0.5))`.
    ///
    /// The `1 +` keeps the idf positive even for terms present in most
    /// documents, so scores are never negative.
    pub fn idf(&self) -> f32 {
        if self.doc_freq == 0 || self.total_docs == 0 {
            return 0.0;
        }

        let n = self.total_docs as f32;
        let df = self.doc_freq as f32;
        (1.0 + (n - df + 0.5) / (df + 0.5)).ln()
    }

    /// Saturated term frequency normalized by field length.
    pub fn tf(&self, term_freq: f32, field_length: f32) -> f32 {
        if term_freq == 0.0 {
            return 0.0;
        }

        let avg_len = if self.avg_field_length > 0.0 {
            self.avg_field_length as f32
        } else {
            1.0
        };
        let norm_factor = 1.0 - self.b + self.b * (field_length / avg_len);

        (term_freq * (self.k1 + 1.0)) / (term_freq + self.k1 * norm_factor)
    }

    /// Score a document in which the term occurs `term_freq` times in a field
    /// of `field_length` tokens.
    pub fn score(&self, term_freq: u32, field_length: u32) -> f32 {
        self.boost * self.idf() * self.tf(term_freq as f32, field_length as f32)
    }

    pub fn boost(&self) -> f32 {
        self.boost
    }
}
