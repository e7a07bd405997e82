//! Plain keyword search with optional numeric range filters.

use std::sync::Arc;

use log::debug;

use crate::analysis::Analyzer;
use crate::config::SearchConfig;
use crate::error::Result;
use crate::index::reader::IndexReader;
use crate::query::{BooleanQuery, MatchAllQuery, MultiFieldQueryParser, NumericRangeQuery, Query};
use crate::schema::{FIELD_RATING, FIELD_YEAR};
use crate::search::RankedHit;

/// An inclusive numeric constraint on one field.
///
/// Missing rating and year bounds default to the configured natural
/// extremes of those fields; other fields stay open-ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RangeFilter {
    Rating { min: Option<f64>, max: Option<f64> },
    Year { min: Option<i64>, max: Option<i64> },
    Integer { field: String, min: Option<i64>, max: Option<i64> },
    Float { field: String, min: Option<f64>, max: Option<f64> },
}

impl RangeFilter {
    pub fn to_query(&self, config: &SearchConfig) -> NumericRangeQuery {
        match self {
            RangeFilter::Rating { min, max } => {
                let (lo, hi) = config.rating_bounds;
                NumericRangeQuery::f64_range(
                    FIELD_RATING,
                    Some(min.unwrap_or(lo)),
                    Some(max.unwrap_or(hi)),
                )
            }
            RangeFilter::Year { min, max } => {
                let (lo, hi) = config.year_bounds;
                NumericRangeQuery::i64_range(
                    FIELD_YEAR,
                    Some(min.unwrap_or(lo)),
                    Some(max.unwrap_or(hi)),
                )
            }
            RangeFilter::Integer { field, min, max } => {
                NumericRangeQuery::i64_range(field.as_str(), *min, *max)
            }
            RangeFilter::Float { field, min, max } => {
                NumericRangeQuery::f64_range(field.as_str(), *min, *max)
            }
        }
    }
}

/// The range filters of one filtered search, all of which must hold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilters {
    ranges: Vec<RangeFilter>,
}

impl SearchFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Constrain the rating. Adds nothing when both bounds are `None`.
    pub fn rating(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        if min.is_some() || max.is_some() {
            self.ranges.push(RangeFilter::Rating { min, max });
        }
        self
    }

    /// Constrain the release year. Adds nothing when both bounds are `None`.
    pub fn year(mut self, min: Option<i64>, max: Option<i64>) -> Self {
        if min.is_some() || max.is_some() {
            self.ranges.push(RangeFilter::Year { min, max });
        }
        self
    }

    pub fn with(mut self, filter: RangeFilter) -> Self {
        self.ranges.push(filter);
        self
    }

    pub fn ranges(&self) -> &[RangeFilter] {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Fold every range into a single conjunctive clause.
    pub fn to_query(&self, config: &SearchConfig) -> Option<Box<dyn Query>> {
        let mut queries = self
            .ranges
            .iter()
            .map(|r| Box::new(r.to_query(config)) as Box<dyn Query>);
        let first = queries.next()?;
        Some(queries.fold(first, |acc, next| {
            Box::new(BooleanQuery::builder().must(acc).must(next).build())
        }))
    }
}

/// Direct keyword search over the boosted text fields.
#[derive(Debug, Clone)]
pub struct MovieSearcher {
    reader: IndexReader,
    parser: MultiFieldQueryParser,
    config: SearchConfig,
}

impl MovieSearcher {
    pub fn new(reader: IndexReader, config: SearchConfig, analyzer: Arc<dyn Analyzer>) -> Self {
        let parser = MultiFieldQueryParser::new(config.field_boosts.clone(), analyzer)
            .with_fuzzy_max_expansions(config.fuzzy_max_expansions);
        MovieSearcher {
            reader,
            parser,
            config,
        }
    }

    pub fn reader(&self) -> &IndexReader {
        &self.reader
    }

    /// Search the text fields for `text`, returning at most `max_results`
    /// hits best first.
    pub fn basic_search(&self, text: &str, max_results: usize) -> Result<Vec<RankedHit>> {
        let query = self.parser.parse(text)?;
        self.run(query.as_ref(), max_results)
    }

    /// Search with range filters that restrict matches without affecting
    /// scores. Blank text with at least one filter matches every record
    /// within the ranges.
    pub fn filtered_search(
        &self,
        text: &str,
        filters: &SearchFilters,
        max_results: usize,
    ) -> Result<Vec<RankedHit>> {
        let Some(filter) = filters.to_query(&self.config) else {
            return self.basic_search(text, max_results);
        };

        let text_query: Box<dyn Query> = if text.trim().is_empty() {
            Box::new(MatchAllQuery::new())
        } else {
            self.parser.parse(text)?
        };
        let query = BooleanQuery::builder().must(text_query).filter(filter).build();
        self.run(&query, max_results)
    }

    fn run(&self, query: &dyn Query, max_results: usize) -> Result<Vec<RankedHit>> {
        let top_docs = self.reader.search(query, max_results)?;
        debug!(
            "{} total hits, returning {}",
            top_docs.total_hits,
            top_docs.score_docs.len()
        );
        Ok(RankedHit::from_top_docs(&top_docs, &self.reader, max_results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::StandardAnalyzer;
    use crate::document::movie::Movie;
    use crate::error::MarqueeError;
    use crate::index::IndexSegment;

    fn searcher() -> MovieSearcher {
        let rows = [
            ("Heat", 1995, 8.3),
            ("Heat Wave", 1989, 5.0),
            ("Cold Heat", 2000, 6.1),
            ("Summer Heat", 1999, 7.2),
        ];
        let movies: Vec<Movie> = rows
            .iter()
            .enumerate()
            .map(|(i, (title, year, rating))| Movie {
                imdb_id: format!("tt{i}"),
                title: title.to_string(),
                year: *year,
                rating: *rating,
                ..Default::default()
            })
            .collect();
        let analyzer = Arc::new(StandardAnalyzer::default());
        let reader = IndexReader::from_segment(IndexSegment::build(&movies, analyzer.as_ref()));
        MovieSearcher::new(reader, SearchConfig::default(), analyzer)
    }

    fn titles(hits: &[RankedHit]) -> Vec<String> {
        let mut titles: Vec<String> = hits.iter().map(|h| h.title().unwrap()).collect();
        titles.sort();
        titles
    }

    #[test]
    fn test_basic_search() {
        let hits = searcher().basic_search("heat", 10).unwrap();
        assert_eq!(hits.len(), 4);
        assert_eq!(hits[0].title().unwrap(), "Heat");

        let hits = searcher().basic_search("heat", 2).unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_year_range_is_inclusive() {
        let filters = SearchFilters::new().year(Some(1990), Some(1999));
        let hits = searcher().filtered_search("heat", &filters, 10).unwrap();
        assert_eq!(titles(&hits), vec!["Heat", "Summer Heat"]);
    }

    #[test]
    fn test_open_bounds_use_defaults() {
        let filters = SearchFilters::new().rating(Some(7.0), None);
        let hits = searcher().filtered_search("heat", &filters, 10).unwrap();
        assert_eq!(titles(&hits), vec!["Heat", "Summer Heat"]);

        let filters = SearchFilters::new().year(None, Some(1995));
        let hits = searcher().filtered_search("heat", &filters, 10).unwrap();
        assert_eq!(titles(&hits), vec!["Heat", "Heat Wave"]);
    }

    #[test]
    fn test_filters_do_not_change_scores() {
        let searcher = searcher();
        let plain = searcher.basic_search("summer heat", 10).unwrap();
        let filters = SearchFilters::new().rating(Some(0.0), Some(10.0));
        let filtered = searcher.filtered_search("summer heat", &filters, 10).unwrap();

        assert_eq!(plain.len(), filtered.len());
        for (a, b) in plain.iter().zip(&filtered) {
            assert_eq!(a.doc_id(), b.doc_id());
            assert_eq!(a.score(), b.score());
        }
    }

    #[test]
    fn test_many_filters_fold_together() {
        let filters = SearchFilters::new()
            .year(Some(1990), None)
            .rating(None, Some(8.0))
            .with(RangeFilter::Integer {
                field: "year".into(),
                min: None,
                max: Some(2000),
            });
        let hits = searcher().filtered_search("", &filters, 10).unwrap();
        assert_eq!(titles(&hits), vec!["Cold Heat", "Summer Heat"]);
        assert!(hits.iter().all(|h| h.score() == 1.0));
    }

    #[test]
    fn test_blank_text_without_filters_is_a_syntax_error() {
        let err = searcher().filtered_search("  ", &SearchFilters::new(), 10).unwrap_err();
        assert!(matches!(err, MarqueeError::QuerySyntax(_)));
        assert!(SearchFilters::new().rating(None, None).is_empty());
    }
}
