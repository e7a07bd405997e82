//! Page-by-page browsing of one search result.

use log::debug;

use crate::error::Result;
use crate::search::facet::{FacetKind, FacetTable, filter_by_facet, get_facets};
use crate::search::results::SearchResults;
use crate::search::RankedHit;

/// Browsing state over one search result.
///
/// Facet filters narrow the hits currently browsed and restart at page 1.
/// Filters stack; [`clear_facets`](Self::clear_facets) returns to the
/// unfiltered result.
#[derive(Debug, Clone)]
pub struct BrowseSession {
    original: SearchResults,
    current: SearchResults,
    applied: Vec<(FacetKind, String)>,
}

impl BrowseSession {
    pub fn new(results: SearchResults) -> Self {
        BrowseSession {
            current: results.clone(),
            original: results,
            applied: Vec::new(),
        }
    }

    /// The result set currently browsed.
    pub fn results(&self) -> &SearchResults {
        &self.current
    }

    /// Hits of the current page.
    pub fn page(&self) -> &[RankedHit] {
        self.current.current_hits()
    }

    /// Jump to page `n`.
    pub fn goto(&mut self, n: usize) -> &[RankedHit] {
        self.current.page(n)
    }

    pub fn next(&mut self) -> bool {
        self.current.next_page()
    }

    pub fn previous(&mut self) -> bool {
        self.current.previous_page()
    }

    /// Facet values of the hits on the current page.
    pub fn facets(&self) -> Result<FacetTable> {
        get_facets(self.page())
    }

    /// Keep only the browsed hits matching a facet value.
    pub fn apply_facet(&mut self, kind: FacetKind, value: &str) -> Result<&SearchResults> {
        let filtered = filter_by_facet(self.current.hits(), &kind, value)?;
        debug!(
            "Facet {kind}={value} kept {} of {} hits",
            filtered.len(),
            self.current.len()
        );
        self.current = SearchResults::from_hits(filtered);
        self.applied.push((kind, value.to_string()));
        Ok(&self.current)
    }

    /// Facet filters applied so far, oldest first.
    pub fn applied_facets(&self) -> &[(FacetKind, String)] {
        &self.applied
    }

    /// Drop every facet filter and return to page 1 of the original result.
    pub fn clear_facets(&mut self) {
        self.current = self.original.clone();
        self.current.page(1);
        self.applied.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::StandardAnalyzer;
    use crate::document::movie::Movie;
    use crate::index::IndexSegment;
    use crate::index::reader::IndexReader;

    fn session() -> BrowseSession {
        let movies: Vec<Movie> = (0..25)
            .map(|i| Movie {
                imdb_id: format!("tt{i}"),
                title: format!("Movie {i}"),
                year: 1980 + i,
                genres: if i % 2 == 0 {
                    vec!["Comedy".into()]
                } else {
                    vec!["Horror".into()]
                },
                ..Default::default()
            })
            .collect();
        let reader =
            IndexReader::from_segment(IndexSegment::build(&movies, &StandardAnalyzer::default()));
        let hits = (0..25).map(|i| RankedHit::new(i, 1.0, reader.clone())).collect();
        BrowseSession::new(SearchResults::new(hits, 25))
    }

    #[test]
    fn test_navigation() {
        let mut session = session();
        assert_eq!(session.page().len(), 10);
        assert!(session.next());
        assert!(session.next());
        assert_eq!(session.page().len(), 5);
        assert!(!session.next());
        assert_eq!(session.goto(1)[0].doc_id(), 0);
        assert!(!session.previous());
    }

    #[test]
    fn test_facets_of_current_page() {
        let mut session = session();
        let table = session.facets().unwrap();
        assert_eq!(table.decades, vec!["1980s"]);
        assert_eq!(table.genres, vec!["Comedy", "Horror"]);

        session.next();
        let table = session.facets().unwrap();
        assert_eq!(table.decades, vec!["1990s"]);
    }

    #[test]
    fn test_apply_and_clear_facets() {
        let mut session = session();
        session.next();

        let filtered = session.apply_facet(FacetKind::Genre, "comedy").unwrap();
        assert_eq!(filtered.total_hits(), 13);
        assert_eq!(filtered.current_page(), 1);

        let filtered = session.apply_facet(FacetKind::Decade, "1990s").unwrap();
        assert_eq!(filtered.total_hits(), 5);
        assert_eq!(session.applied_facets().len(), 2);

        session.clear_facets();
        assert_eq!(session.results().total_hits(), 25);
        assert_eq!(session.results().current_page(), 1);
        assert!(session.applied_facets().is_empty());
    }
}
