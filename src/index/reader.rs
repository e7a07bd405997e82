//! Index reader.
//!
//! A reader loads the segment file of an index location once and serves
//! searches and stored-document lookups from that snapshot. Clones share
//! the same snapshot, so closing any clone closes them all and invalidates
//! every hit resolved through them.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info};
use parking_lot::RwLock;

use crate::document::Document;
use crate::error::{MarqueeError, Result};
use crate::index::{DocId, IndexMeta, IndexSegment, SEGMENT_FILE};
use crate::query::collector::TopDocsCollector;
use crate::query::{Query, TopDocs};

struct ReaderInner {
    location: PathBuf,
    segment: RwLock<Option<Arc<IndexSegment>>>,
}

/// Read access to one index snapshot.
#[derive(Clone)]
pub struct IndexReader {
    inner: Arc<ReaderInner>,
}

impl fmt::Debug for IndexReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexReader")
            .field("location", &self.inner.location)
            .field("open", &self.is_open())
            .finish()
    }
}

impl IndexReader {
    /// Open the index at `location`.
    ///
    /// A missing, unreadable or corrupt index is reported as
    /// [`MarqueeError::Unavailable`].
    pub fn open<P: AsRef<Path>>(location: P) -> Result<Self> {
        let location = location.as_ref().to_path_buf();
        let path = location.join(SEGMENT_FILE);
        let bytes = fs::read(&path).map_err(|e| {
            MarqueeError::unavailable(format!("no index at {}: {e}", location.display()))
        })?;
        let segment = IndexSegment::decode(&bytes).map_err(|e| {
            MarqueeError::unavailable(format!("cannot load index at {}: {e}", location.display()))
        })?;
        info!(
            "Opened index {} with {} documents",
            location.display(),
            segment.doc_count()
        );
        Ok(Self::with_segment(location, segment))
    }

    /// Wrap an in-memory segment, for callers that never touch disk.
    pub fn from_segment(segment: IndexSegment) -> Self {
        Self::with_segment(PathBuf::new(), segment)
    }

    fn with_segment(location: PathBuf, segment: IndexSegment) -> Self {
        IndexReader {
            inner: Arc::new(ReaderInner {
                location,
                segment: RwLock::new(Some(Arc::new(segment))),
            }),
        }
    }

    /// Release the snapshot. Later calls on this reader or any clone fail.
    pub fn close(&self) {
        if self.inner.segment.write().take().is_some() {
            debug!("Closed index reader for {}", self.inner.location.display());
        }
    }

    pub fn is_open(&self) -> bool {
        self.inner.segment.read().is_some()
    }

    /// Whether two readers share the same snapshot.
    pub fn same_snapshot(&self, other: &IndexReader) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn location(&self) -> &Path {
        &self.inner.location
    }

    /// The loaded segment.
    pub fn segment(&self) -> Result<Arc<IndexSegment>> {
        self.inner
            .segment
            .read()
            .clone()
            .ok_or_else(|| MarqueeError::unavailable("index reader is closed"))
    }

    pub fn meta(&self) -> Result<IndexMeta> {
        Ok(self.segment()?.meta().clone())
    }

    pub fn doc_count(&self) -> Result<u32> {
        Ok(self.segment()?.doc_count())
    }

    /// Number of documents whose `field` contains the exact `term`.
    pub fn doc_freq(&self, field: &str, term: &str) -> Result<u64> {
        Ok(self
            .segment()?
            .field(field)
            .map_or(0, |f| f.doc_freq(term)))
    }

    pub fn term_exists(&self, field: &str, term: &str) -> Result<bool> {
        Ok(self.doc_freq(field, term)? > 0)
    }

    /// Resolve a document address to its stored fields.
    pub fn document(&self, doc_id: DocId) -> Result<Document> {
        let guard = self.inner.segment.read();
        let segment = guard
            .as_ref()
            .ok_or_else(|| MarqueeError::invalid_handle("index reader is closed"))?;
        segment.document(doc_id).cloned().ok_or_else(|| {
            MarqueeError::invalid_handle(format!("document {doc_id} is not in this index"))
        })
    }

    /// Run a query, returning at most `limit` hits best first.
    pub fn search(&self, query: &dyn Query, limit: usize) -> Result<TopDocs> {
        let segment = self.segment()?;
        let matches = query.execute(&segment)?;
        let mut collector = TopDocsCollector::new(limit);
        collector.collect_all(&matches);
        let top_docs = collector.into_top_docs();
        debug!(
            "Query {} matched {} documents",
            query.description(),
            top_docs.total_hits
        );
        Ok(top_docs)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::document::movie::Movie;
    use crate::index::writer::IndexWriter;
    use crate::query::TermQuery;

    fn movies() -> Vec<Movie> {
        ["Alien", "Aliens", "Alien Resurrection"]
            .iter()
            .enumerate()
            .map(|(i, t)| Movie {
                imdb_id: format!("tt{i}"),
                title: t.to_string(),
                year: 1979 + i as i64,
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn test_open_and_search() {
        let temp_dir = TempDir::new().unwrap();
        IndexWriter::rebuild(temp_dir.path(), &movies()).unwrap();

        let reader = IndexReader::open(temp_dir.path()).unwrap();
        assert!(reader.is_open());
        assert_eq!(reader.doc_count().unwrap(), 3);
        assert_eq!(reader.doc_freq("title", "alien").unwrap(), 2);
        assert!(reader.term_exists("title", "aliens").unwrap());
        assert!(!reader.term_exists("title", "predator").unwrap());

        let top = reader.search(&TermQuery::new("title", "alien"), 1).unwrap();
        assert_eq!(top.total_hits, 2);
        assert_eq!(top.score_docs.len(), 1);
        assert_eq!(top.score_docs[0].doc_id, 0);

        let doc = reader.document(2).unwrap();
        assert_eq!(doc.get_text("title"), Some("Alien Resurrection"));
    }

    #[test]
    fn test_missing_or_corrupt_index_is_unavailable() {
        let temp_dir = TempDir::new().unwrap();
        let err = IndexReader::open(temp_dir.path()).unwrap_err();
        assert!(matches!(err, MarqueeError::Unavailable(_)));

        fs::write(temp_dir.path().join(SEGMENT_FILE), b"garbage").unwrap();
        let err = IndexReader::open(temp_dir.path()).unwrap_err();
        assert!(matches!(err, MarqueeError::Unavailable(_)));
    }

    #[test]
    fn test_close_invalidates_clones() {
        let reader = IndexReader::from_segment(IndexSegment::build(
            &movies(),
            &crate::analysis::StandardAnalyzer::default(),
        ));
        let clone = reader.clone();
        assert!(reader.same_snapshot(&clone));

        clone.close();
        assert!(!reader.is_open());
        assert!(matches!(
            reader.document(0).unwrap_err(),
            MarqueeError::InvalidHandle(_)
        ));
        assert!(matches!(
            reader.search(&TermQuery::new("title", "alien"), 10).unwrap_err(),
            MarqueeError::Unavailable(_)
        ));
    }

    #[test]
    fn test_out_of_range_document() {
        let reader = IndexReader::from_segment(IndexSegment::build(
            &movies(),
            &crate::analysis::StandardAnalyzer::default(),
        ));
        assert!(matches!(
            reader.document(99).unwrap_err(),
            MarqueeError::InvalidHandle(_)
        ));
    }
}
