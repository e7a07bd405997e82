//! Query matching every document with a constant score.

use crate::error::Result;
use crate::index::{DocId, IndexSegment};
use crate::query::{Query, ScoredDocs};

/// Matches all documents, each scoring its boost.
#[derive(Debug, Clone)]
pub struct MatchAllQuery {
    boost: f32,
}

impl MatchAllQuery {
    pub fn new() -> Self {
        MatchAllQuery { boost: 1.0 }
    }
}

impl Default for MatchAllQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl Query for MatchAllQuery {
    fn execute(&self, segment: &IndexSegment) -> Result<ScoredDocs> {
        Ok((0..segment.doc_count() as DocId)
            .map(|doc_id| (doc_id, self.boost))
            .collect())
    }

    fn boost(&self) -> f32 {
        self.boost
    }

    fn set_boost(&mut self, boost: f32) {
        self.boost = boost;
    }

    fn description(&self) -> String {
        "*:*".to_string()
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

    #[test]
    fn test_match_all() {
        let movies: Vec<Movie> = (0..3)
            .map(|i| Movie {
                imdb_id: format!("tt{i}"),
                title: format!("Movie {i}"),
                ..Default::default()
            })
            .collect();
        let segment = IndexSegment::build(&movies, &StandardAnalyzer::default());

        let results = MatchAllQuery::new().execute(&segment).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results.get(2), Some(1.0));
        assert_eq!(MatchAllQuery::default().description(), "*:*");
    }
}
