//! Field names of the movie index and their query-time boosts.

use serde::{Deserialize, Serialize};

/// External identifier (IMDB-style id). Stored, not analyzed.
pub const FIELD_IMDB_ID: &str = "imdb_id";
/// Sequence index of the record in the source file. Stored only.
pub const FIELD_INDEX: &str = "index";
pub const FIELD_TITLE: &str = "title";
pub const FIELD_OVERVIEW: &str = "overview";
pub const FIELD_TAGLINE: &str = "tagline";
pub const FIELD_CAST: &str = "cast";
/// Genre tags joined by single spaces.
pub const FIELD_GENRES: &str = "genres";
pub const FIELD_RUNTIME: &str = "runtime";
pub const FIELD_RATING: &str = "rating";
pub const FIELD_YEAR: &str = "year";

/// Analyzed fields, in the order they are searched.
pub const TEXT_FIELDS: [&str; 5] = [
    FIELD_TITLE,
    FIELD_CAST,
    FIELD_OVERVIEW,
    FIELD_TAGLINE,
    FIELD_GENRES,
];

/// A searchable field together with its relevance multiplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldBoost {
    pub field: String,
    pub boost: f32,
}

impl FieldBoost {
    pub fn new<S: Into<String>>(field: S, boost: f32) -> Self {
        FieldBoost {
            field: field.into(),
            boost,
        }
    }
}

/// The default multi-field boost table: title counts double, cast one and a
/// half times, everything else once.
pub fn default_field_boosts() -> Vec<FieldBoost> {
    vec![
        FieldBoost::new(FIELD_TITLE, 2.0),
        FieldBoost::new(FIELD_CAST, 1.5),
        FieldBoost::new(FIELD_OVERVIEW, 1.0),
        FieldBoost::new(FIELD_TAGLINE, 1.0),
        FieldBoost::new(FIELD_GENRES, 1.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_boosts_cover_all_text_fields() {
        let boosts = default_field_boosts();
        assert_eq!(boosts.len(), TEXT_FIELDS.len());
        for field in TEXT_FIELDS {
            assert!(boosts.iter().any(|b| b.field == field));
        }
        assert_eq!(boosts[0], FieldBoost::new(FIELD_TITLE, 2.0));
    }
}
