//! # Marquee
//!
//! Search a movie catalog: build an index from JSON Lines records, then run
//! plain, range-filtered and "advanced" searches over it.
//!
//! ## Features
//!
//! - BM25 ranking over title, cast, overview, tagline and genres with
//!   per-field boosts
//! - Classic query syntax (`+must -not "phrases" field:term ^boost`)
//! - Fuzzy terms marked with a trailing `?` and a "did you mean" check
//! - Inclusive rating and year range filters
//! - Decade and genre facets, paginated browsing
//!
//! ## Example
//!
//! ```rust,no_run
//! use marquee::prelude::*;
//!
//! let movies = JsonlReader::new().read_movies("movies.jsonl", 0)?;
//! let mut catalog = Catalog::new("index", SearchConfig::default())?;
//! catalog.rebuild(&movies)?;
//!
//! let results = catalog.perform_search("matrx?", 50)?;
//! for hit in results.current_hits() {
//!     println!("{:.3} {}", hit.score(), hit.title()?);
//! }
//! # Ok::<(), marquee::error::MarqueeError>(())
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod index;
pub mod query;
pub mod schema;
pub mod search;
pub mod spelling;

pub mod prelude {
    pub use crate::config::{RESULTS_PER_PAGE, SearchConfig};
    pub use crate::document::jsonl::JsonlReader;
    pub use crate::document::movie::Movie;
    pub use crate::error::{MarqueeError, Result};
    pub use crate::search::{
        BrowseSession, Catalog, FacetKind, FacetTable, RankedHit, SearchFilters, SearchResults,
    };
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
