//! The on-disk index.
//!
//! An index is a single immutable [`IndexSegment`] built in one pass by the
//! [`writer::IndexWriter`] and loaded whole by the [`reader::IndexReader`].
//! Rebuilding replaces the segment file; readers opened before the rebuild
//! keep serving the old snapshot until they are closed.
//!
//! # File format
//!
//! ```text
//! MAGIC "MQIX" | version u32 LE | crc32 u32 LE | bincode(IndexSegment)
//! ```

pub mod reader;
pub mod writer;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::Analyzer;
use crate::document::Document;
use crate::document::movie::Movie;
use crate::error::{MarqueeError, Result};
use crate::schema::{FIELD_RATING, FIELD_RUNTIME, FIELD_YEAR, TEXT_FIELDS};

/// Document identifier within a segment.
pub type DocId = u32;

/// Name of the segment file inside an index directory.
pub const SEGMENT_FILE: &str = "segment.mqi";

const MAGIC: &[u8; 4] = b"MQIX";
const FORMAT_VERSION: u32 = 1;
const HEADER_LEN: usize = 12;

/// One document's occurrences of a term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    /// Token positions of the term within the field, ascending.
    pub positions: Vec<u32>,
}

impl Posting {
    pub fn term_freq(&self) -> u32 {
        self.positions.len() as u32
    }
}

/// Inverted index of one analyzed field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldIndex {
    /// Term dictionary, sorted. Posting lists are sorted by doc id.
    terms: BTreeMap<String, Vec<Posting>>,
    /// Token count of this field per document, indexed by doc id.
    doc_lengths: Vec<u32>,
    total_length: u64,
}

impl FieldIndex {
    /// Posting list of a term, if the term occurs in this field.
    pub fn postings(&self, term: &str) -> Option<&[Posting]> {
        self.terms.get(term).map(|p| p.as_slice())
    }

    /// Number of documents containing the term.
    pub fn doc_freq(&self, term: &str) -> u64 {
        self.terms.get(term).map_or(0, |p| p.len() as u64)
    }

    /// Iterate the sorted term dictionary with document frequencies.
    pub fn terms(&self) -> impl Iterator<Item = (&str, u64)> {
        self.terms.iter().map(|(t, p)| (t.as_str(), p.len() as u64))
    }

    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    pub fn field_length(&self, doc_id: DocId) -> u32 {
        self.doc_lengths.get(doc_id as usize).copied().unwrap_or(0)
    }

    pub fn avg_length(&self) -> f64 {
        if self.doc_lengths.is_empty() {
            0.0
        } else {
            self.total_length as f64 / self.doc_lengths.len() as f64
        }
    }

    fn add(&mut self, doc_id: DocId, terms: Vec<(String, u32)>) {
        let length = terms.len() as u32;
        for (term, position) in terms {
            let postings = self.terms.entry(term).or_default();
            match postings.last_mut() {
                Some(last) if last.doc_id == doc_id => last.positions.push(position),
                _ => postings.push(Posting {
                    doc_id,
                    positions: vec![position],
                }),
            }
        }
        self.doc_lengths.push(length);
        self.total_length += length as u64;
    }
}

/// Whether a numeric column holds integers or floats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NumericType {
    Integer,
    Float,
}

/// Per-document numeric values of one field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericColumn {
    numeric_type: NumericType,
    values: Vec<Option<f64>>,
}

impl NumericColumn {
    fn new(numeric_type: NumericType) -> Self {
        NumericColumn {
            numeric_type,
            values: Vec::new(),
        }
    }

    pub fn numeric_type(&self) -> NumericType {
        self.numeric_type
    }

    pub fn get(&self, doc_id: DocId) -> Option<f64> {
        self.values.get(doc_id as usize).copied().flatten()
    }

    /// Iterate `(doc_id, value)` for documents that have a value.
    pub fn iter(&self) -> impl Iterator<Item = (DocId, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(doc_id, v)| v.map(|v| (doc_id as DocId, v)))
    }
}

/// Identity and provenance of a built index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexMeta {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub doc_count: u32,
    pub analyzer: String,
}

/// A complete, immutable index snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexSegment {
    meta: IndexMeta,
    fields: BTreeMap<String, FieldIndex>,
    numeric: BTreeMap<String, NumericColumn>,
    documents: Vec<Document>,
}

impl IndexSegment {
    /// Build a segment from movie records. Records without an id or a title
    /// are skipped.
    pub fn build<'a, I>(movies: I, analyzer: &dyn Analyzer) -> Self
    where
        I: IntoIterator<Item = &'a Movie>,
    {
        let mut fields: BTreeMap<String, FieldIndex> = TEXT_FIELDS
            .iter()
            .map(|f| (f.to_string(), FieldIndex::default()))
            .collect();
        let mut numeric = BTreeMap::new();
        numeric.insert(FIELD_YEAR.to_string(), NumericColumn::new(NumericType::Integer));
        numeric.insert(FIELD_RUNTIME.to_string(), NumericColumn::new(NumericType::Integer));
        numeric.insert(FIELD_RATING.to_string(), NumericColumn::new(NumericType::Float));
        let mut documents = Vec::new();

        for movie in movies {
            if !movie.is_indexable() {
                log::debug!("Skipping record {} without id or title", movie.index);
                continue;
            }
            let doc_id = documents.len() as DocId;
            let document = movie.to_document();

            for (name, field) in fields.iter_mut() {
                let text = document.get_text(name).unwrap_or_default();
                let terms = analyzer
                    .analyze(text)
                    .into_iter()
                    .map(|t| (t.text, t.position))
                    .collect();
                field.add(doc_id, terms);
            }
            for (name, column) in numeric.iter_mut() {
                column.values.push(document.get_float(name));
            }
            documents.push(document);
        }

        IndexSegment {
            meta: IndexMeta {
                id: Uuid::new_v4(),
                created_at: Utc::now(),
                doc_count: documents.len() as u32,
                analyzer: analyzer.name().to_string(),
            },
            fields,
            numeric,
            documents,
        }
    }

    pub fn meta(&self) -> &IndexMeta {
        &self.meta
    }

    pub fn doc_count(&self) -> u32 {
        self.documents.len() as u32
    }

    /// Inverted index of an analyzed field. Unknown fields return `None`.
    pub fn field(&self, name: &str) -> Option<&FieldIndex> {
        self.fields.get(name)
    }

    pub fn numeric(&self, name: &str) -> Option<&NumericColumn> {
        self.numeric.get(name)
    }

    pub fn document(&self, doc_id: DocId) -> Option<&Document> {
        self.documents.get(doc_id as usize)
    }

    /// Encode into the segment file format.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let payload = bincode::serialize(self)?;
        let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
        bytes.extend_from_slice(MAGIC);
        bytes.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
        bytes.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
        bytes.extend_from_slice(&payload);
        Ok(bytes)
    }

    /// Decode a segment file, verifying magic, version and checksum.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN || &bytes[0..4] != MAGIC {
            return Err(MarqueeError::serialization("not a marquee index file"));
        }
        let version = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        if version != FORMAT_VERSION {
            return Err(MarqueeError::serialization(format!(
                "unsupported index format version {version}"
            )));
        }
        let checksum = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
        let payload = &bytes[HEADER_LEN..];
        if crc32fast::hash(payload) != checksum {
            return Err(MarqueeError::serialization("index checksum mismatch"));
        }
        Ok(bincode::deserialize(payload)?)
    }
}
