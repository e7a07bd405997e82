//! Search configuration.
//!
//! Every knob has a sensible default, so `SearchConfig::default()` is what
//! almost every caller wants. A JSON file can override any subset of fields:
//!
//! ```json
//! { "expansion_threshold": 5, "reopen_delay_ms": 0 }
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{MarqueeError, Result};
use crate::schema::{FieldBoost, default_field_boosts};

/// Number of hits shown per page of a result set.
pub const RESULTS_PER_PAGE: usize = 10;

/// Configuration shared by the searchers and the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Fields searched by free-text queries and their boosts.
    pub field_boosts: Vec<FieldBoost>,
    /// Maximum edit distance for `word?` fuzzy terms.
    pub fuzzy_max_edits: u32,
    /// Maximum number of dictionary terms a fuzzy term expands to.
    pub fuzzy_max_expansions: usize,
    /// Maximum edit distance used by the spelling advisor's title lookup.
    pub spelling_max_edits: u32,
    /// Tokens shorter than this are not checked by the spelling advisor.
    pub spelling_min_term_len: usize,
    /// A first pass reporting fewer total hits than this triggers expansion.
    pub expansion_threshold: u64,
    /// Natural extremes of the rating field, used for open-ended filters.
    pub rating_bounds: (f64, f64),
    /// Natural extremes of the year field, used for open-ended filters.
    pub year_bounds: (i64, i64),
    /// Settling delay between an index rebuild and reopening readers.
    pub reopen_delay_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            field_boosts: default_field_boosts(),
            fuzzy_max_edits: 2,
            fuzzy_max_expansions: 50,
            spelling_max_edits: 1,
            spelling_min_term_len: 3,
            expansion_threshold: 3,
            rating_bounds: (0.0, 10.0),
            year_bounds: (1900, 2100),
            reopen_delay_ms: 500,
        }
    }
}

impl SearchConfig {
    /// Load a configuration from a JSON file. Missing fields keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SearchConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations no search could run with.
    pub fn validate(&self) -> Result<()> {
        if self.field_boosts.is_empty() {
            return Err(MarqueeError::invalid_argument(
                "at least one searchable field is required",
            ));
        }
        if let Some(bad) = self.field_boosts.iter().find(|b| b.boost < 0.0) {
            return Err(MarqueeError::invalid_argument(format!(
                "negative boost {} for field {}",
                bad.boost, bad.field
            )));
        }
        if self.rating_bounds.0 > self.rating_bounds.1 || self.year_bounds.0 > self.year_bounds.1 {
            return Err(MarqueeError::invalid_argument("range bounds are inverted"));
        }
        Ok(())
    }

    pub fn reopen_delay(&self) -> Duration {
        Duration::from_millis(self.reopen_delay_ms)
    }
}
