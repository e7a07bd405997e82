//! The movie record.

use serde::{Deserialize, Deserializer, Serialize};

use crate::document::Document;
use crate::schema::{
    FIELD_CAST, FIELD_GENRES, FIELD_IMDB_ID, FIELD_INDEX, FIELD_OVERVIEW, FIELD_RATING,
    FIELD_RUNTIME, FIELD_TAGLINE, FIELD_TITLE, FIELD_YEAR,
};

/// A normalized movie record as read from the source catalog.
///
/// Missing or `null` JSON fields take their default value, so a sparse
/// line such as `{"imdb_id": "tt0111161", "title": "The Shawshank Redemption"}`
/// is a valid record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    #[serde(default, deserialize_with = "null_as_default")]
    pub index: i64,
    #[serde(default, alias = "imdbId", deserialize_with = "null_as_default")]
    pub imdb_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overview: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tagline: String,
    /// Free-text list of names.
    #[serde(default, deserialize_with = "null_as_default")]
    pub cast: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<String>,
    /// Minutes.
    #[serde(default, deserialize_with = "null_as_default")]
    pub runtime: i64,
    /// Expected range 0.0 to 10.0.
    #[serde(default, deserialize_with = "null_as_default")]
    pub rating: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub year: i64,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Movie {
    /// Genres as a single space-separated string, the way they are indexed.
    pub fn genres_text(&self) -> String {
        self.genres.join(" ")
    }

    /// Only records with both an external id and a title are indexed.
    pub fn is_indexable(&self) -> bool {
        !self.imdb_id.trim().is_empty() && !self.title.trim().is_empty()
    }

    /// Convert into the stored document form.
    pub fn to_document(&self) -> Document {
        Document::builder()
            .add_integer(FIELD_INDEX, self.index)
            .add_text(FIELD_IMDB_ID, self.imdb_id.clone())
            .add_text(FIELD_TITLE, self.title.clone())
            .add_text(FIELD_OVERVIEW, self.overview.clone())
            .add_text(FIELD_TAGLINE, self.tagline.clone())
            .add_text(FIELD_CAST, self.cast.clone())
            .add_text(FIELD_GENRES, self.genres_text())
            .add_integer(FIELD_RUNTIME, self.runtime)
            .add_float(FIELD_RATING, self.rating)
            .add_integer(FIELD_YEAR, self.year)
            .build()
    }
}
