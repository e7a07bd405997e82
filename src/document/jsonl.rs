//! JSONL movie ingestion.
//!
//! Each line of the source file is one JSON object:
//! ```jsonl
//! {"index": 0, "imdb_id": "tt0111161", "title": "The Shawshank Redemption", "year": 1994}
//! {"index": 1, "imdb_id": "tt0068646", "title": "The Godfather", "year": 1972}
//! ```
//!
//! Blank lines are ignored and malformed lines are skipped with a warning;
//! one bad record never fails the batch.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use log::{debug, warn};

use crate::document::movie::Movie;
use crate::error::Result;

/// Reads movie records from JSON Lines input.
#[derive(Debug, Clone, Default)]
pub struct JsonlReader {
    skipped: usize,
}

impl JsonlReader {
    pub fn new() -> Self {
        JsonlReader { skipped: 0 }
    }

    /// Read up to `max_records` movies from a file (`0` reads all of them).
    pub fn read_movies<P: AsRef<Path>>(
        &mut self,
        path: P,
        max_records: usize,
    ) -> Result<Vec<Movie>> {
        let path = path.as_ref();
        debug!("Reading movies from {}", path.display());
        let file = File::open(path)?;
        self.read_from(file, max_records)
    }

    /// Read up to `max_records` movies from any reader (`0` reads all of them).
    ///
    /// Lines that are not valid UTF-8 count as malformed records.
    pub fn read_from<R: Read>(&mut self, source: R, max_records: usize) -> Result<Vec<Movie>> {
        let mut reader = BufReader::new(source);
        let mut movies = Vec::new();
        let mut buf = Vec::new();
        let mut line_num = 0;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_num += 1;

            let line = match std::str::from_utf8(&buf) {
                Ok(line) => line,
                Err(e) => {
                    self.skipped += 1;
                    warn!("Skipping record on line {line_num}: invalid UTF-8 ({e})");
                    continue;
                }
            };
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<Movie>(line) {
                Ok(movie) => {
                    movies.push(movie);
                    if max_records > 0 && movies.len() >= max_records {
                        break;
                    }
                }
                Err(e) => {
                    self.skipped += 1;
                    warn!("Skipping malformed record on line {line_num}: {e}");
                }
            }
        }

        Ok(movies)
    }

    /// Number of malformed lines skipped so far by this reader.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}
