//! Index writer.
//!
//! The writer buffers movie records and, on [`IndexWriter::commit`], builds a
//! fresh segment and atomically replaces whatever index already exists at
//! the location. There are no incremental updates: every commit is a full
//! rebuild.
//!
//! # Example
//!
//! ```rust,no_run
//! use marquee::document::movie::Movie;
//! use marquee::index::writer::IndexWriter;
//!
//! let mut writer = IndexWriter::new("index").unwrap();
//! writer.add_movie(Movie {
//!     imdb_id: "tt0111161".into(),
//!     title: "The Shawshank Redemption".into(),
//!     year: 1994,
//!     ..Default::default()
//! });
//! let meta = writer.commit().unwrap();
//! assert_eq!(meta.doc_count, 1);
//! ```

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info};
use uuid::Uuid;

use crate::analysis::{Analyzer, StandardAnalyzer};
use crate::document::movie::Movie;
use crate::error::Result;
use crate::index::{IndexMeta, IndexSegment, SEGMENT_FILE};

/// Builds an index at a directory location.
#[derive(Debug)]
pub struct IndexWriter {
    location: PathBuf,
    analyzer: Arc<dyn Analyzer>,
    pending: Vec<Movie>,
}

impl IndexWriter {
    /// Create a writer for the index directory at `location` using the
    /// standard analyzer. Nothing is written until [`commit`](Self::commit).
    pub fn new<P: AsRef<Path>>(location: P) -> Result<Self> {
        Ok(Self::with_analyzer(location, Arc::new(StandardAnalyzer::new()?)))
    }

    pub fn with_analyzer<P: AsRef<Path>>(location: P, analyzer: Arc<dyn Analyzer>) -> Self {
        IndexWriter {
            location: location.as_ref().to_path_buf(),
            analyzer,
            pending: Vec::new(),
        }
    }

    /// Build a complete index from `movies`, replacing any prior index at
    /// `location`.
    pub fn rebuild<P: AsRef<Path>>(location: P, movies: &[Movie]) -> Result<IndexMeta> {
        let mut writer = Self::new(location)?;
        writer.add_movies(movies.iter().cloned());
        writer.commit()
    }

    pub fn add_movie(&mut self, movie: Movie) {
        self.pending.push(movie);
    }

    pub fn add_movies<I: IntoIterator<Item = Movie>>(&mut self, movies: I) {
        self.pending.extend(movies);
    }

    /// Number of records buffered for the next commit.
    pub fn pending_docs(&self) -> usize {
        self.pending.len()
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Build the segment and write it to disk.
    ///
    /// The file is written under a temporary name and renamed into place,
    /// so a reader never observes a half-written segment.
    pub fn commit(self) -> Result<IndexMeta> {
        info!(
            "Indexing {} movies into {}",
            self.pending.len(),
            self.location.display()
        );
        let segment = IndexSegment::build(&self.pending, self.analyzer.as_ref());
        let bytes = segment.encode()?;

        fs::create_dir_all(&self.location)?;
        let target = self.location.join(SEGMENT_FILE);
        let temp = self
            .location
            .join(format!("{SEGMENT_FILE}.{}.tmp", Uuid::new_v4().simple()));
        if let Err(e) = write_then_rename(&temp, &target, &bytes) {
            let _ = fs::remove_file(&temp);
            return Err(e.into());
        }
        debug!("Wrote {} bytes to {}", bytes.len(), target.display());

        let meta = segment.meta().clone();
        info!("Index created successfully with {} documents", meta.doc_count);
        Ok(meta)
    }
}

fn write_then_rename(temp: &Path, target: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = File::create(temp)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    drop(file);
    fs::rename(temp, target)
}
