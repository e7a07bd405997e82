//! Advanced search: spelling check, fuzzy terms and low-recall expansion.

use std::fmt::Debug;
use std::sync::Arc;

use log::info;

use crate::analysis::Analyzer;
use crate::config::SearchConfig;
use crate::error::Result;
use crate::index::reader::IndexReader;
use crate::query::TopDocs;
use crate::search::composer::QueryComposer;
use crate::search::results::SearchResults;
use crate::search::RankedHit;
use crate::spelling::SpellingAdvisor;

/// Rewrites query text for the low-recall retry.
pub trait QueryExpander: Send + Sync + Debug {
    fn expand(&self, text: &str) -> String;
}

/// Retries with the text unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityExpander;

impl QueryExpander for IdentityExpander {
    fn expand(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Searcher behind the advanced search path.
#[derive(Debug)]
pub struct EnhancedSearcher {
    reader: IndexReader,
    composer: QueryComposer,
    advisor: SpellingAdvisor,
    expander: Arc<dyn QueryExpander>,
    expansion_threshold: u64,
}

impl EnhancedSearcher {
    pub fn new(reader: IndexReader, config: &SearchConfig, analyzer: Arc<dyn Analyzer>) -> Self {
        EnhancedSearcher {
            composer: QueryComposer::new(config, analyzer),
            advisor: SpellingAdvisor::new(reader.clone(), config),
            reader,
            expander: Arc::new(IdentityExpander),
            expansion_threshold: config.expansion_threshold,
        }
    }

    /// Replace the expander used by the low-recall retry.
    pub fn with_expander(mut self, expander: Arc<dyn QueryExpander>) -> Self {
        self.expander = expander;
        self
    }

    pub fn reader(&self) -> &IndexReader {
        &self.reader
    }

    pub fn composer(&self) -> &QueryComposer {
        &self.composer
    }

    /// Run the full advanced search pipeline.
    ///
    /// 1. The spelling advisor normalizes the text. If it differs from the
    ///    input it is reported through [`SearchResults::suggestion`].
    /// 2. The composed query runs, asking for twice `max_results` hits.
    /// 3. If fewer than the expansion threshold matched, the expander's
    ///    rewrite of the checked text is composed and run instead.
    ///
    /// The result set carries the total of whichever pass ran last.
    pub fn perform_search(&self, text: &str, max_results: usize) -> Result<SearchResults> {
        let corrected = self.advisor.check(text);
        let suggestion = if corrected != text {
            info!("Did you mean: \"{corrected}\"? (using corrected query)");
            Some(corrected.clone())
        } else {
            None
        };

        let mut top_docs = self.execute(&corrected, max_results)?;
        let mut expanded = false;
        if top_docs.total_hits < self.expansion_threshold {
            info!(
                "Few results found ({}). Expanding query...",
                top_docs.total_hits
            );
            let expansion = self.expander.expand(&corrected);
            top_docs = self.execute(&expansion, max_results)?;
            expanded = true;
        }

        let hits = RankedHit::from_top_docs(&top_docs, &self.reader, max_results);
        Ok(SearchResults::new(hits, top_docs.total_hits)
            .with_suggestion(suggestion)
            .with_expanded(expanded))
    }

    fn execute(&self, text: &str, max_results: usize) -> Result<TopDocs> {
        let query = self.composer.compose(text)?;
        self.reader.search(query.as_ref(), max_results.saturating_mul(2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::StandardAnalyzer;
    use crate::document::movie::Movie;
    use crate::error::MarqueeError;
    use crate::index::IndexSegment;

    #[derive(Debug)]
    struct Replace(&'static str);

    impl QueryExpander for Replace {
        fn expand(&self, _text: &str) -> String {
            self.0.to_string()
        }
    }

    fn searcher() -> EnhancedSearcher {
        let titles = [
            "The Matrix",
            "The Matrix Reloaded",
            "The Matrix Revolutions",
            "Speed",
            "John Wick",
        ];
        let movies: Vec<Movie> = titles
            .iter()
            .enumerate()
            .map(|(i, t)| Movie {
                imdb_id: format!("tt{i}"),
                title: t.to_string(),
                cast: "Keanu Reeves".into(),
                ..Default::default()
            })
            .collect();
        let analyzer = Arc::new(StandardAnalyzer::default());
        let reader = IndexReader::from_segment(IndexSegment::build(&movies, analyzer.as_ref()));
        EnhancedSearcher::new(reader, &SearchConfig::default(), analyzer)
    }

    #[test]
    fn test_plain_search_is_not_expanded() {
        let results = searcher().perform_search("matrix", 10).unwrap();
        assert_eq!(results.total_hits(), 3);
        assert!(!results.expanded());
        assert!(results.suggestion().is_none());
    }

    #[test]
    fn test_suggestion_when_text_normalizes() {
        let results = searcher().perform_search("  MATRIX ", 10).unwrap();
        assert_eq!(results.suggestion(), Some("matrix"));
        assert_eq!(results.total_hits(), 3);
    }

    #[test]
    fn test_fuzzy_terms() {
        let results = searcher().perform_search("matrx?", 10).unwrap();
        assert_eq!(results.total_hits(), 3);
    }

    #[test]
    fn test_low_recall_triggers_expansion() {
        let searcher = searcher().with_expander(Arc::new(Replace("keanu")));
        let results = searcher.perform_search("speed", 2).unwrap();

        assert!(results.expanded());
        assert_eq!(results.total_hits(), 5);
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_identity_expansion_keeps_result() {
        let results = searcher().perform_search("wick", 10).unwrap();
        assert!(results.expanded());
        assert_eq!(results.total_hits(), 1);
        assert_eq!(results.hits()[0].title().unwrap(), "John Wick");
    }

    #[test]
    fn test_errors() {
        let err = searcher().perform_search("   ", 10).unwrap_err();
        assert!(matches!(err, MarqueeError::QuerySyntax(_)));

        let searcher = searcher();
        searcher.reader().close();
        let err = searcher.perform_search("matrix", 10).unwrap_err();
        assert!(err.is_unavailable());
    }
}
