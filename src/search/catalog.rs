//! A movie catalog: one index location and the searchers over it.
//!
//! The catalog is the owner of the reader lifecycle. Rebuilding writes the
//! new index, then closes every searcher, waits the configured settling
//! delay and reopens. Hits from before a rebuild stay tied
//! to the closed reader and fail with `InvalidHandle` when resolved.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use log::info;

use crate::analysis::{Analyzer, StandardAnalyzer};
use crate::config::SearchConfig;
use crate::document::movie::Movie;
use crate::error::{MarqueeError, Result};
use crate::index::IndexMeta;
use crate::index::reader::IndexReader;
use crate::index::writer::IndexWriter;
use crate::search::enhanced::{EnhancedSearcher, IdentityExpander, QueryExpander};
use crate::search::results::SearchResults;
use crate::search::searcher::{MovieSearcher, SearchFilters};
use crate::search::RankedHit;

#[derive(Debug)]
struct Searchers {
    reader: IndexReader,
    basic: MovieSearcher,
    enhanced: EnhancedSearcher,
}

#[derive(Debug)]
pub struct Catalog {
    location: PathBuf,
    config: SearchConfig,
    analyzer: Arc<dyn Analyzer>,
    expander: Arc<dyn QueryExpander>,
    searchers: Option<Searchers>,
}

impl Catalog {
    /// A catalog at `location` with no searchers open yet.
    pub fn new<P: AsRef<Path>>(location: P, config: SearchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Catalog {
            location: location.as_ref().to_path_buf(),
            config,
            analyzer: Arc::new(StandardAnalyzer::new()?),
            expander: Arc::new(IdentityExpander),
            searchers: None,
        })
    }

    /// Attach to an index that already exists at `location`.
    pub fn open<P: AsRef<Path>>(location: P, config: SearchConfig) -> Result<Self> {
        let mut catalog = Self::new(location, config)?;
        catalog.reopen()?;
        Ok(catalog)
    }

    /// Use `expander` for the low-recall retry of advanced searches.
    pub fn with_expander(mut self, expander: Arc<dyn QueryExpander>) -> Self {
        self.expander = expander;
        if let Some(searchers) = self.searchers.take() {
            self.searchers = Some(self.make_searchers(searchers.reader));
        }
        self
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn is_open(&self) -> bool {
        self.searchers.is_some()
    }

    /// Rebuild the index from `movies` and reopen the searchers.
    ///
    /// If writing the new index fails, the current searchers stay open on
    /// the previous index.
    pub fn rebuild(&mut self, movies: &[Movie]) -> Result<IndexMeta> {
        let mut writer = IndexWriter::with_analyzer(&self.location, self.analyzer.clone());
        writer.add_movies(movies.iter().cloned());
        let meta = writer.commit()?;
        self.close();

        let delay = self.config.reopen_delay();
        if !delay.is_zero() {
            thread::sleep(delay);
        }
        self.reopen()?;
        Ok(meta)
    }

    /// Close the current searchers, if any, and open new ones on the index
    /// at the catalog location.
    pub fn reopen(&mut self) -> Result<()> {
        self.close();
        let reader = IndexReader::open(&self.location)?;
        self.searchers = Some(self.make_searchers(reader));
        info!("Searchers ready on {}", self.location.display());
        Ok(())
    }

    /// Close the searchers. Searches fail with `Unavailable` until reopened.
    pub fn close(&mut self) {
        if let Some(searchers) = self.searchers.take() {
            searchers.reader.close();
        }
    }

    pub fn meta(&self) -> Result<IndexMeta> {
        self.searchers()?.reader.meta()
    }

    pub fn perform_search(&self, text: &str, max_results: usize) -> Result<SearchResults> {
        self.searchers()?.enhanced.perform_search(text, max_results)
    }

    pub fn basic_search(&self, text: &str, max_results: usize) -> Result<Vec<RankedHit>> {
        self.searchers()?.basic.basic_search(text, max_results)
    }

    pub fn filtered_search(
        &self,
        text: &str,
        filters: &SearchFilters,
        max_results: usize,
    ) -> Result<Vec<RankedHit>> {
        self.searchers()?
            .basic
            .filtered_search(text, filters, max_results)
    }

    fn searchers(&self) -> Result<&Searchers> {
        self.searchers.as_ref().ok_or_else(|| {
            MarqueeError::unavailable(format!(
                "no open index at {}; build the index first",
                self.location.display()
            ))
        })
    }

    fn make_searchers(&self, reader: IndexReader) -> Searchers {
        Searchers {
            basic: MovieSearcher::new(reader.clone(), self.config.clone(), self.analyzer.clone()),
            enhanced: EnhancedSearcher::new(reader.clone(), &self.config, self.analyzer.clone())
                .with_expander(self.expander.clone()),
            reader,
        }
    }
}

impl Drop for Catalog {
    fn drop(&mut self) {
        self.close();
    }
}
