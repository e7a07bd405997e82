//! Text analysis.
//!
//! Turns raw field text and query text into a stream of normalized tokens.
//! The same analyzer runs at index time and at query time, so a query term
//! matches an indexed term exactly when both normalize to the same string.
//!
//! ```text
//! Raw Text → RegexTokenizer (\w+) → LowercaseFilter → Tokens
//! ```
//!
//! # Examples
//!
//! ```
//! use marquee::analysis::{Analyzer, StandardAnalyzer};
//!
//! let analyzer = StandardAnalyzer::new().unwrap();
//! let tokens = analyzer.analyze("The Dark Knight");
//!
//! assert_eq!(tokens.len(), 3);
//! assert_eq!(tokens[1].text, "dark");
//! assert_eq!(tokens[2].position, 2);
//! ```

use std::fmt::Debug;
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{MarqueeError, Result};

/// A single unit of text after tokenization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Normalized token text.
    pub text: String,
    /// Position in the token stream (0-based).
    pub position: u32,
}

impl Token {
    pub fn new<S: Into<String>>(text: S, position: u32) -> Self {
        Token {
            text: text.into(),
            position,
        }
    }
}

/// Trait for text analyzers.
pub trait Analyzer: Send + Sync + Debug {
    /// Analyze text into a sequence of normalized tokens.
    fn analyze(&self, text: &str) -> Vec<Token>;

    /// Name of this analyzer, for diagnostics.
    fn name(&self) -> &'static str;
}

/// The default analyzer: Unicode word characters, lowercased.
///
/// There is no stop word filter, so every word of a title is searchable.
#[derive(Clone, Debug)]
pub struct StandardAnalyzer {
    pattern: Arc<Regex>,
}

impl StandardAnalyzer {
    /// Create a new standard analyzer with the default `\w+` pattern.
    pub fn new() -> Result<Self> {
        Self::with_pattern(r"\w+")
    }

    /// Create a standard analyzer with a custom token pattern.
    pub fn with_pattern(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| MarqueeError::invalid_argument(format!("Invalid regex pattern: {e}")))?;

        Ok(StandardAnalyzer {
            pattern: Arc::new(regex),
        })
    }

    /// Get the regex pattern used by this analyzer.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl Default for StandardAnalyzer {
    fn default() -> Self {
        Self::new().expect("Default regex pattern should be valid")
    }
}

impl Analyzer for StandardAnalyzer {
    fn analyze(&self, text: &str) -> Vec<Token> {
        self.pattern
            .find_iter(text)
            .enumerate()
            .map(|(position, m)| Token::new(m.as_str().to_lowercase(), position as u32))
            .collect()
    }

    fn name(&self) -> &'static str {
        "standard"
    }
}
