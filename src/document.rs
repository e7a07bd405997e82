//! Stored documents.
//!
//! A [`Document`] is the stored, index-side form of a record: a flat map of
//! field name to [`FieldValue`]. Movie records are converted into documents
//! by [`movie::Movie::to_document`] at indexing time and read back lazily
//! through a [`crate::search::RankedHit`].
//!
//! # Examples
//!
//! ```
//! use marquee::document::{Document, FieldValue};
//!
//! let doc = Document::builder()
//!     .add_text("title", "Heat")
//!     .add_integer("year", 1995)
//!     .add_float("rating", 8.3)
//!     .build();
//!
//! assert_eq!(doc.get_text("title"), Some("Heat"));
//! assert_eq!(doc.get_integer("year"), Some(1995));
//! assert_eq!(doc.get_field("rating"), Some(&FieldValue::Float(8.3)));
//! ```

pub mod jsonl;
pub mod movie;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The value stored for one field of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl FieldValue {
    /// Get the value as text, if it is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as an integer. Floats are not truncated.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            FieldValue::Text(s) => s.trim().parse().ok(),
            FieldValue::Float(_) => None,
        }
    }

    /// Get the value as a float; integers widen.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            FieldValue::Float(f) => Some(*f),
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// A stored document: field name to value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    fields: BTreeMap<String, FieldValue>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Document {
            fields: BTreeMap::new(),
        }
    }

    /// Add a field value to the document, replacing any previous value.
    pub fn add_field<S: Into<String>>(&mut self, name: S, value: FieldValue) {
        self.fields.insert(name.into(), value);
    }

    /// Get a field value from the document.
    pub fn get_field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn get_text(&self, name: &str) -> Option<&str> {
        self.get_field(name).and_then(FieldValue::as_text)
    }

    pub fn get_integer(&self, name: &str) -> Option<i64> {
        self.get_field(name).and_then(FieldValue::as_integer)
    }

    pub fn get_float(&self, name: &str) -> Option<f64> {
        self.get_field(name).and_then(FieldValue::as_float)
    }

    /// Check if the document has a field.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Get all field names.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(|s| s.as_str()).collect()
    }

    /// Get the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Create a builder for constructing documents.
    pub fn builder() -> DocumentBuilder {
        DocumentBuilder::new()
    }
}

/// A builder for constructing documents in a fluent manner.
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    document: Document,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        DocumentBuilder {
            document: Document::new(),
        }
    }

    pub fn add_text<S: Into<String>, T: Into<String>>(mut self, name: S, value: T) -> Self {
        self.document.add_field(name, FieldValue::Text(value.into()));
        self
    }

    pub fn add_integer<S: Into<String>>(mut self, name: S, value: i64) -> Self {
        self.document.add_field(name, FieldValue::Integer(value));
        self
    }

    pub fn add_float<S: Into<String>>(mut self, name: S, value: f64) -> Self {
        self.document.add_field(name, FieldValue::Float(value));
        self
    }

    pub fn build(self) -> Document {
        self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_conversions() {
        assert_eq!(FieldValue::Integer(1999).as_float(), Some(1999.0));
        assert_eq!(FieldValue::Float(7.5).as_integer(), None);
        assert_eq!(FieldValue::Text(" 2004 ".into()).as_integer(), Some(2004));
        assert_eq!(FieldValue::Text("n/a".into()).as_float(), None);
        assert_eq!(FieldValue::Integer(3).as_text(), None);
    }

    #[test]
    fn test_document_builder() {
        let doc = Document::builder()
            .add_text("title", "Alien")
            .add_integer("year", 1979)
            .build();

        assert_eq!(doc.len(), 2);
        assert!(doc.has_field("year"));
        assert_eq!(doc.field_names(), vec!["title", "year"]);
        assert_eq!(doc.get_float("year"), Some(1979.0));
        assert!(doc.get_text("overview").is_none());
    }
}
