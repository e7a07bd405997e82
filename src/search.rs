//! Search orchestration over a movie index.
//!
//! - [`composer::QueryComposer`] turns raw query text into a structured query.
//! - [`searcher::MovieSearcher`] runs plain and range-filtered searches.
//! - [`enhanced::EnhancedSearcher`] adds the spelling check, fuzzy terms and
//!   the low-recall retry, returning a paginated [`results::SearchResults`].
//! - [`facet`] extracts decade and genre facets and filters hits by them.
//! - [`session::BrowseSession`] navigates one result set page by page.
//! - [`catalog::Catalog`] owns an index location and its searchers.

pub mod catalog;
pub mod composer;
pub mod enhanced;
pub mod facet;
pub mod results;
pub mod searcher;
pub mod session;

use std::fmt;

use crate::document::Document;
use crate::error::Result;
use crate::index::DocId;
use crate::index::reader::IndexReader;
use crate::query::TopDocs;
use crate::schema::{
    FIELD_CAST, FIELD_GENRES, FIELD_IMDB_ID, FIELD_OVERVIEW, FIELD_RATING, FIELD_TAGLINE,
    FIELD_TITLE, FIELD_YEAR,
};

pub use catalog::Catalog;
pub use composer::QueryComposer;
pub use enhanced::{EnhancedSearcher, IdentityExpander, QueryExpander};
pub use facet::{FacetKind, FacetTable, filter_by_facet, get_facets};
pub use results::SearchResults;
pub use searcher::{MovieSearcher, RangeFilter, SearchFilters};
pub use session::BrowseSession;

/// One search hit: a document address and its relevance score.
///
/// Stored fields are read lazily through the reader that produced the hit.
/// Once that reader is closed every accessor fails with
/// [`MarqueeError::InvalidHandle`](crate::error::MarqueeError::InvalidHandle).
#[derive(Clone)]
pub struct RankedHit {
    doc_id: DocId,
    score: f32,
    reader: IndexReader,
}

impl RankedHit {
    pub fn new(doc_id: DocId, score: f32, reader: IndexReader) -> Self {
        RankedHit {
            doc_id,
            score,
            reader,
        }
    }

    /// Wrap the ranked head of `top_docs`, keeping at most `limit` hits.
    pub fn from_top_docs(top_docs: &TopDocs, reader: &IndexReader, limit: usize) -> Vec<Self> {
        top_docs
            .score_docs
            .iter()
            .take(limit)
            .map(|sd| RankedHit::new(sd.doc_id, sd.score, reader.clone()))
            .collect()
    }

    pub fn doc_id(&self) -> DocId {
        self.doc_id
    }

    pub fn score(&self) -> f32 {
        self.score
    }

    /// All stored fields of the hit.
    pub fn document(&self) -> Result<Document> {
        self.reader.document(self.doc_id)
    }

    fn text(&self, field: &str) -> Result<String> {
        Ok(self
            .document()?
            .get_text(field)
            .unwrap_or_default()
            .to_string())
    }

    pub fn imdb_id(&self) -> Result<String> {
        self.text(FIELD_IMDB_ID)
    }

    pub fn title(&self) -> Result<String> {
        self.text(FIELD_TITLE)
    }

    pub fn overview(&self) -> Result<String> {
        self.text(FIELD_OVERVIEW)
    }

    pub fn tagline(&self) -> Result<String> {
        self.text(FIELD_TAGLINE)
    }

    pub fn cast(&self) -> Result<String> {
        self.text(FIELD_CAST)
    }

    /// Genre tags as one space separated string.
    pub fn genres(&self) -> Result<String> {
        self.text(FIELD_GENRES)
    }

    pub fn year(&self) -> Result<Option<i64>> {
        Ok(self.document()?.get_integer(FIELD_YEAR))
    }

    pub fn rating(&self) -> Result<Option<f64>> {
        Ok(self.document()?.get_float(FIELD_RATING))
    }
}

impl PartialEq for RankedHit {
    fn eq(&self, other: &Self) -> bool {
        self.doc_id == other.doc_id
            && self.score == other.score
            && self.reader.same_snapshot(&other.reader)
    }
}

impl fmt::Debug for RankedHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RankedHit")
            .field("doc_id", &self.doc_id)
            .field("score", &self.score)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::StandardAnalyzer;
    use crate::document::movie::Movie;
    use crate::error::MarqueeError;
    use crate::index::IndexSegment;

    fn reader() -> IndexReader {
        let movies = vec![Movie {
            imdb_id: "tt0133093".into(),
            title: "The Matrix".into(),
            overview: "A hacker learns the truth.".into(),
            cast: "Keanu Reeves".into(),
            genres: vec!["Action".into(), "Science Fiction".into()],
            year: 1999,
            rating: 8.7,
            ..Default::default()
        }];
        IndexReader::from_segment(IndexSegment::build(&movies, &StandardAnalyzer::default()))
    }

    #[test]
    fn test_lazy_accessors() {
        let hit = RankedHit::new(0, 1.5, reader());
        assert_eq!(hit.imdb_id().unwrap(), "tt0133093");
        assert_eq!(hit.title().unwrap(), "The Matrix");
        assert_eq!(hit.cast().unwrap(), "Keanu Reeves");
        assert_eq!(hit.genres().unwrap(), "Action Science Fiction");
        assert_eq!(hit.year().unwrap(), Some(1999));
        assert_eq!(hit.rating().unwrap(), Some(8.7));
        assert_eq!(hit.tagline().unwrap(), "");
    }

    #[test]
    fn test_accessors_fail_after_close() {
        let reader = reader();
        let hit = RankedHit::new(0, 1.0, reader.clone());
        reader.close();
        assert!(matches!(hit.title().unwrap_err(), MarqueeError::InvalidHandle(_)));
        assert!(matches!(hit.year().unwrap_err(), MarqueeError::InvalidHandle(_)));
    }
}
