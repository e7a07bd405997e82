//! Decade and genre facets over a list of hits.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MarqueeError, Result};
use crate::search::RankedHit;

/// Genre tokens must be longer than this to become facet values.
const MIN_GENRE_LEN: usize = 2;

/// The dimension a facet filter applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FacetKind {
    Decade,
    Genre,
    /// Any other name. Filtering by it matches nothing.
    Unknown(String),
}

impl FacetKind {
    /// Map a facet name as typed by a user. `genre` and `genres` are the same.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "decade" => FacetKind::Decade,
            "genre" | "genres" => FacetKind::Genre,
            other => FacetKind::Unknown(other.to_string()),
        }
    }
}

impl FromStr for FacetKind {
    type Err = MarqueeError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(FacetKind::parse(s))
    }
}

impl fmt::Display for FacetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FacetKind::Decade => write!(f, "decade"),
            FacetKind::Genre => write!(f, "genres"),
            FacetKind::Unknown(name) => write!(f, "{name}"),
        }
    }
}

/// Distinct facet values observed in a set of hits, each list sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetTable {
    #[serde(rename = "decade")]
    pub decades: Vec<String>,
    pub genres: Vec<String>,
}

impl FacetTable {
    pub fn get(&self, kind: &FacetKind) -> &[String] {
        match kind {
            FacetKind::Decade => &self.decades,
            FacetKind::Genre => &self.genres,
            FacetKind::Unknown(_) => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.decades.is_empty() && self.genres.is_empty()
    }
}

/// Label of the decade containing `year`, e.g. `1994` gives `"1990s"`.
pub fn decade_label(year: i64) -> String {
    format!("{}s", year.div_euclid(10) * 10)
}

fn hit_decade(hit: &RankedHit) -> Result<Option<String>> {
    Ok(hit.year()?.filter(|y| *y > 0).map(decade_label))
}

/// Collect decade and genre facet values from `hits`.
///
/// Hits without a usable year contribute no decade. Genres are split on
/// whitespace; tokens of two characters or fewer are ignored.
pub fn get_facets(hits: &[RankedHit]) -> Result<FacetTable> {
    let mut decades = BTreeSet::new();
    let mut genres = BTreeSet::new();

    for hit in hits {
        if let Some(decade) = hit_decade(hit)? {
            decades.insert(decade);
        }
        for genre in hit.genres()?.split_whitespace() {
            if genre.chars().count() > MIN_GENRE_LEN {
                genres.insert(genre.to_string());
            }
        }
    }

    Ok(FacetTable {
        decades: decades.into_iter().collect(),
        genres: genres.into_iter().collect(),
    })
}

/// Keep the hits matching a facet value, preserving their order.
///
/// Decades must equal `value` exactly. Genres match when the genre string
/// contains `value`, ignoring case.
pub fn filter_by_facet(
    hits: &[RankedHit],
    kind: &FacetKind,
    value: &str,
) -> Result<Vec<RankedHit>> {
    let needle = value.to_lowercase();
    let mut kept = Vec::new();

    for hit in hits {
        let keep = match kind {
            FacetKind::Decade => hit_decade(hit)?.is_some_and(|d| d == value),
            FacetKind::Genre => hit.genres()?.to_lowercase().contains(&needle),
            FacetKind::Unknown(_) => false,
        };
        if keep {
            kept.push(hit.clone());
        }
    }
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::StandardAnalyzer;
    use crate::document::movie::Movie;
    use crate::index::IndexSegment;
    use crate::index::reader::IndexReader;

    fn hits() -> Vec<RankedHit> {
        let rows: [(&str, i64, &[&str]); 4] = [
            ("Pulp Fiction", 1994, &["Crime", "Thriller"]),
            ("Inception", 2010, &["Action", "Science Fiction"]),
            ("Unknown Year", 0, &["Drama", "TV"]),
            ("Se7en", 1995, &["Crime", "Mystery"]),
        ];
        let movies: Vec<Movie> = rows
            .iter()
            .enumerate()
            .map(|(i, (title, year, genres))| Movie {
                imdb_id: format!("tt{i}"),
                title: title.to_string(),
                year: *year,
                genres: genres.iter().map(|g| g.to_string()).collect(),
                ..Default::default()
            })
            .collect();
        let reader =
            IndexReader::from_segment(IndexSegment::build(&movies, &StandardAnalyzer::default()));
        (0..movies.len() as u32)
            .map(|i| RankedHit::new(i, 1.0, reader.clone()))
            .collect()
    }

    #[test]
    fn test_decade_label() {
        assert_eq!(decade_label(1994), "1990s");
        assert_eq!(decade_label(2000), "2000s");
        assert_eq!(decade_label(1879), "1870s");
    }

    #[test]
    fn test_facet_kind_parse() {
        assert_eq!(FacetKind::parse("decade"), FacetKind::Decade);
        assert_eq!(FacetKind::parse("Genre"), FacetKind::Genre);
        assert_eq!("genres".parse::<FacetKind>().unwrap(), FacetKind::Genre);
        assert_eq!(FacetKind::parse("studio"), FacetKind::Unknown("studio".into()));
        assert_eq!(FacetKind::Genre.to_string(), "genres");
    }

    #[test]
    fn test_get_facets() {
        let table = get_facets(&hits()).unwrap();
        assert_eq!(table.decades, vec!["1990s", "2010s"]);
        assert_eq!(
            table.genres,
            vec!["Action", "Crime", "Drama", "Fiction", "Mystery", "Science", "Thriller"]
        );
        assert_eq!(table.get(&FacetKind::Decade).len(), 2);
        assert!(table.get(&FacetKind::Unknown("x".into())).is_empty());
        assert!(get_facets(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_filter_by_facet() {
        let hits = hits();
        let nineties = filter_by_facet(&hits, &FacetKind::Decade, "1990s").unwrap();
        assert_eq!(nineties.iter().map(|h| h.doc_id()).collect::<Vec<_>>(), vec![0, 3]);

        let crime = filter_by_facet(&hits, &FacetKind::Genre, "crime").unwrap();
        assert_eq!(crime.len(), 2);
        let fiction = filter_by_facet(&hits, &FacetKind::Genre, "FICTION").unwrap();
        assert_eq!(fiction.len(), 1);

        assert!(filter_by_facet(&hits, &FacetKind::Decade, "1990").unwrap().is_empty());
        let unknown = FacetKind::Unknown("studio".into());
        assert!(filter_by_facet(&hits, &unknown, "Crime").unwrap().is_empty());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let hits = hits();
        let once = filter_by_facet(&hits, &FacetKind::Genre, "crime").unwrap();
        let twice = filter_by_facet(&once, &FacetKind::Genre, "crime").unwrap();
        assert_eq!(once, twice);
    }
}
