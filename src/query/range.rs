//! Numeric range query over a stored numeric column.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::index::IndexSegment;
use crate::index::NumericType;
use crate::query::{Query, ScoredDocs};

/// Inclusive range over a numeric field. A missing bound is open.
///
/// Matching documents receive a constant score equal to the boost; the
/// query is meant to be used as a filter clause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericRangeQuery {
    field: String,
    numeric_type: NumericType,
    lower: Option<f64>,
    upper: Option<f64>,
    boost: f32,
}

impl NumericRangeQuery {
    /// Integer range, both ends inclusive.
    pub fn i64_range<F: Into<String>>(field: F, lower: Option<i64>, upper: Option<i64>) -> Self {
        NumericRangeQuery {
            field: field.into(),
            numeric_type: NumericType::Integer,
            lower: lower.map(|v| v as f64),
            upper: upper.map(|v| v as f64),
            boost: 1.0,
        }
    }

    /// Floating point range, both ends inclusive.
    pub fn f64_range<F: Into<String>>(field: F, lower: Option<f64>, upper: Option<f64>) -> Self {
        NumericRangeQuery {
            field: field.into(),
            numeric_type: NumericType::Float,
            lower,
            upper,
            boost: 1.0,
        }
    }

    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn numeric_type(&self) -> NumericType {
        self.numeric_type
    }

    pub fn lower(&self) -> Option<f64> {
        self.lower
    }

    pub fn upper(&self) -> Option<f64> {
        self.upper
    }

    pub fn contains(&self, value: f64) -> bool {
        self.lower.is_none_or(|lo| value >= lo) && self.upper.is_none_or(|hi| value <= hi)
    }
}

impl Query for NumericRangeQuery {
    fn execute(&self, segment: &IndexSegment) -> Result<ScoredDocs> {
        let Some(column) = segment.numeric(&self.field) else {
            return Ok(ScoredDocs::new());
        };
        Ok(column
            .iter()
            .filter(|(_, value)| self.contains(*value))
            .map(|(doc_id, _)| (doc_id, self.boost))
            .collect())
    }

    fn boost(&self) -> f32 {
        self.boost
    }

    fn set_boost(&mut self, boost: f32) {
        self.boost = boost;
    }

    fn description(&self) -> String {
        let bound = |v: Option<f64>| v.map_or_else(|| "*".to_string(), |v| v.to_string());
        format!("{}:[{} TO {}]", self.field, bound(self.lower), bound(self.upper))
    }

    fn clone_box(&self) -> Box<dyn Query> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::StandardAnalyzer;
    use crate::document::movie::Movie;

    fn segment() -> IndexSegment {
        let movies: Vec<Movie> = [(1989, 7.0), (1990, 8.5), (1999, 6.0), (2000, 9.1)]
            .iter()
            .enumerate()
            .map(|(i, (year, rating))| Movie {
                imdb_id: format!("tt{i}"),
                title: format!("Movie {i}"),
                year: *year,
                rating: *rating,
                ..Default::default()
            })
            .collect();
        IndexSegment::build(&movies, &StandardAnalyzer::default())
    }

    #[test]
    fn test_integer_range_is_inclusive() {
        let segment = segment();
        let query = NumericRangeQuery::i64_range("year", Some(1990), Some(1999));
        let results = query.execute(&segment).unwrap();

        assert_eq!(results.len(), 2);
        assert!(results.contains(1));
        assert!(results.contains(2));
        assert_eq!(query.description(), "year:[1990 TO 1999]");
    }

    #[test]
    fn test_float_range_and_open_bounds() {
        let segment = segment();
        let high = NumericRangeQuery::f64_range("rating", Some(8.5), None);
        let results = high.execute(&segment).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(high.description(), "rating:[8.5 TO *]");

        let everything = NumericRangeQuery::f64_range("rating", None, None);
        assert_eq!(everything.execute(&segment).unwrap().len(), 4);
    }

    #[test]
    fn test_unknown_field_and_inverted_range() {
        let segment = segment();
        let unknown = NumericRangeQuery::i64_range("box_office", Some(0), None);
        assert!(unknown.execute(&segment).unwrap().is_empty());

        let inverted = NumericRangeQuery::i64_range("year", Some(2000), Some(1990));
        assert!(inverted.execute(&segment).unwrap().is_empty());
    }
}
