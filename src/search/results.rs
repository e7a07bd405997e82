//! Paginated result sets.

use crate::config::RESULTS_PER_PAGE;
use crate::search::RankedHit;

/// An ordered hit snapshot with a page cursor.
///
/// `total_hits` is the count reported by the search and may exceed the
/// number of materialized hits. Pages are 1-indexed and hold
/// [`RESULTS_PER_PAGE`] hits.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResults {
    hits: Vec<RankedHit>,
    total_hits: u64,
    current_page: usize,
    suggestion: Option<String>,
    expanded: bool,
}

impl SearchResults {
    pub fn new(hits: Vec<RankedHit>, total_hits: u64) -> Self {
        SearchResults {
            hits,
            total_hits,
            current_page: 1,
            suggestion: None,
            expanded: false,
        }
    }

    /// A result set whose total is exactly its hit count, as produced by
    /// facet filtering.
    pub fn from_hits(hits: Vec<RankedHit>) -> Self {
        let total = hits.len() as u64;
        Self::new(hits, total)
    }

    /// Attach the corrected query text shown as a "did you mean" notice.
    pub fn with_suggestion(mut self, suggestion: Option<String>) -> Self {
        self.suggestion = suggestion;
        self
    }

    /// Mark the result set as produced by the low-recall retry.
    pub fn with_expanded(mut self, expanded: bool) -> Self {
        self.expanded = expanded;
        self
    }

    /// Move the cursor to page `n` and return its hits.
    ///
    /// The page number is not clamped. A page starting past the last
    /// materialized hit is empty.
    pub fn page(&mut self, n: usize) -> &[RankedHit] {
        self.current_page = n;
        self.current_hits()
    }

    /// Hits of the current page.
    pub fn current_hits(&self) -> &[RankedHit] {
        let start = self.current_page.saturating_sub(1).saturating_mul(RESULTS_PER_PAGE);
        if start >= self.hits.len() {
            return &[];
        }
        let end = (start + RESULTS_PER_PAGE).min(self.hits.len());
        &self.hits[start..end]
    }

    /// Advance one page if there is a next page. Returns whether it moved.
    pub fn next_page(&mut self) -> bool {
        if self.has_next_page() {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    /// Go back one page if there is a previous page. Returns whether it moved.
    pub fn previous_page(&mut self) -> bool {
        if self.has_previous_page() {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    pub fn has_next_page(&self) -> bool {
        self.current_page < self.total_pages()
    }

    pub fn has_previous_page(&self) -> bool {
        self.current_page > 1
    }

    /// `ceil(total_hits / RESULTS_PER_PAGE)`, at least 1.
    pub fn total_pages(&self) -> usize {
        let pages = self.total_hits.div_ceil(RESULTS_PER_PAGE as u64) as usize;
        pages.max(1)
    }

    pub fn total_hits(&self) -> u64 {
        self.total_hits
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Every materialized hit, in rank order.
    pub fn hits(&self) -> &[RankedHit] {
        &self.hits
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn suggestion(&self) -> Option<&str> {
        self.suggestion.as_deref()
    }

    pub fn expanded(&self) -> bool {
        self.expanded
    }
}
