//! Output formatting for CLI commands.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::cli::args::{MarqueeArgs, OutputFormat};
use crate::search::{FacetTable, RankedHit, SearchResults};

/// Overviews longer than this are cut in human output.
const OVERVIEW_WIDTH: usize = 100;

/// Genres listed by the human facet output.
const MAX_LISTED_GENRES: usize = 10;

/// Result structure for an index rebuild.
#[derive(Debug, Serialize, Deserialize)]
pub struct IndexOutput {
    pub location: String,
    pub records_read: usize,
    pub records_skipped: usize,
    pub documents_indexed: u32,
    pub duration_ms: u64,
}

/// One hit as shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitOutput {
    pub score: f32,
    pub imdb_id: String,
    pub title: String,
    pub year: Option<i64>,
    pub rating: Option<f64>,
    pub genres: String,
    pub overview: String,
}

impl HitOutput {
    pub fn from_hit(hit: &RankedHit) -> crate::error::Result<Self> {
        Ok(HitOutput {
            score: hit.score(),
            imdb_id: hit.imdb_id()?,
            title: hit.title()?,
            year: hit.year()?,
            rating: hit.rating()?,
            genres: hit.genres()?,
            overview: hit.overview()?,
        })
    }

    /// `Score: 1.234 | Title (1994) | Rating: 8.5 | overview...`
    pub fn line(&self) -> String {
        let year = self.year.map(|y| y.to_string()).unwrap_or_else(|| "?".into());
        let rating = self
            .rating
            .map(|r| format!("{r:.1}"))
            .unwrap_or_else(|| "-".into());
        format!(
            "Score: {:.3} | {} ({}) | Rating: {} | {}",
            self.score,
            self.title,
            year,
            rating,
            truncate(&self.overview, OVERVIEW_WIDTH)
        )
    }
}

/// Result structure for search commands.
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchOutput {
    pub query: String,
    pub total_hits: u64,
    pub page: usize,
    pub total_pages: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    pub expanded: bool,
    pub facets: Vec<String>,
    pub hits: Vec<HitOutput>,
}

impl SearchOutput {
    /// Output for a plain hit list.
    pub fn from_hits(query: &str, hits: &[RankedHit]) -> crate::error::Result<Self> {
        Ok(SearchOutput {
            query: query.to_string(),
            total_hits: hits.len() as u64,
            page: 1,
            total_pages: 1,
            suggestion: None,
            expanded: false,
            facets: Vec::new(),
            hits: hits.iter().map(HitOutput::from_hit).collect::<crate::error::Result<_>>()?,
        })
    }

    /// Output for the current page of a result set.
    pub fn from_results(query: &str, results: &SearchResults) -> crate::error::Result<Self> {
        Ok(SearchOutput {
            query: query.to_string(),
            total_hits: results.total_hits(),
            page: results.current_page(),
            total_pages: results.total_pages(),
            suggestion: results.suggestion().map(str::to_string),
            expanded: results.expanded(),
            facets: Vec::new(),
            hits: results
                .current_hits()
                .iter()
                .map(HitOutput::from_hit)
                .collect::<crate::error::Result<_>>()?,
        })
    }

    pub fn with_facets(mut self, facets: Vec<String>) -> Self {
        self.facets = facets;
        self
    }
}

/// Result structure for the facets command.
#[derive(Debug, Serialize, Deserialize)]
pub struct FacetsOutput {
    pub query: String,
    pub hits_examined: usize,
    #[serde(flatten)]
    pub table: FacetTable,
}

/// Human rendering of a command result.
pub trait HumanOutput {
    fn print_human(&self);
}

impl HumanOutput for IndexOutput {
    fn print_human(&self) {
        println!("Index Rebuilt:");
        println!("══════════════");
        println!("Location: {}", self.location);
        println!("Records read: {}", self.records_read);
        if self.records_skipped > 0 {
            println!("Malformed records skipped: {}", self.records_skipped);
        }
        println!("Documents indexed: {}", self.documents_indexed);
        println!("Time: {}ms", self.duration_ms);
    }
}

impl HumanOutput for SearchOutput {
    fn print_human(&self) {
        if let Some(suggestion) = &self.suggestion {
            println!("Did you mean: \"{suggestion}\"? (using corrected query)");
        }
        if self.expanded {
            println!("Few results found. Query was expanded.");
        }
        if !self.facets.is_empty() {
            println!("Facet filters: {}", self.facets.join(", "));
        }

        if self.hits.is_empty() {
            println!("No results found for \"{}\"", self.query);
            return;
        }

        println!("Search Results:");
        println!("═══════════════");
        for hit in &self.hits {
            println!("{}", hit.line());
        }
        println!();
        println!(
            "Total hits: {} | Page {} of {}",
            self.total_hits, self.page, self.total_pages
        );
    }
}

impl HumanOutput for FacetsOutput {
    fn print_human(&self) {
        println!("Facets ({} hits):", self.hits_examined);
        println!("═══════════════");
        println!("Decades: {}", self.table.decades.join(", "));
        let genres: Vec<&str> = self
            .table
            .genres
            .iter()
            .take(MAX_LISTED_GENRES)
            .map(String::as_str)
            .collect();
        println!("Genres: {}", genres.join(", "));
    }
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize + HumanOutput>(result: &T, args: &MarqueeArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            result.print_human();
            Ok(())
        }
        OutputFormat::Json => output_json(result),
    }
}

fn output_json<T: Serialize>(result: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(())
}

/// Cut `text` to at most `width` characters, marking the cut with `...`.
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let head: String = text.chars().take(width).collect();
    format!("{}...", head.trim_end())
}
