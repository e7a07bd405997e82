//! Error types for the Marquee library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`MarqueeError`] enum. Callers that need to decide between "rewrite the
//! query" and "rebuild the index" can match on [`MarqueeError::QuerySyntax`]
//! versus [`MarqueeError::is_unavailable`].
//!
//! # Examples
//!
//! ```
//! use marquee::error::{MarqueeError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(MarqueeError::query_syntax("unbalanced parenthesis"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Marquee operations.
#[derive(Error, Debug)]
pub enum MarqueeError {
    /// I/O errors (reading record files, writing the index, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The raw query text could not be parsed into a structured query.
    #[error("Query syntax error: {0}")]
    QuerySyntax(String),

    /// The index is not built, the reader is closed, or the index on disk
    /// could not be read.
    #[error("Search unavailable: {0}")]
    Unavailable(String),

    /// A document handle was resolved against a reader that is no longer open.
    #[error("Invalid handle: {0}")]
    InvalidHandle(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Binary index encoding errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with MarqueeError.
pub type Result<T> = std::result::Result<T, MarqueeError>;

impl MarqueeError {
    /// Create a new query syntax error.
    pub fn query_syntax<S: Into<String>>(msg: S) -> Self {
        MarqueeError::QuerySyntax(msg.into())
    }

    /// Create a new search unavailable error.
    pub fn unavailable<S: Into<String>>(msg: S) -> Self {
        MarqueeError::Unavailable(msg.into())
    }

    /// Create a new invalid handle error.
    pub fn invalid_handle<S: Into<String>>(msg: S) -> Self {
        MarqueeError::InvalidHandle(msg.into())
    }

    /// Create a new serialization error.
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        MarqueeError::Serialization(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        MarqueeError::InvalidArgument(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        MarqueeError::Other(msg.into())
    }

    /// Whether the caller should treat this as "the engine is unavailable"
    /// (prompt for an index rebuild) rather than a problem with the query.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            MarqueeError::Unavailable(_) | MarqueeError::Io(_) | MarqueeError::Serialization(_)
        )
    }
}

impl From<bincode::Error> for MarqueeError {
    fn from(err: bincode::Error) -> Self {
        MarqueeError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = MarqueeError::query_syntax("unexpected ')'");
        assert_eq!(error.to_string(), "Query syntax error: unexpected ')'");

        let error = MarqueeError::unavailable("index not built");
        assert_eq!(error.to_string(), "Search unavailable: index not built");

        let error = MarqueeError::invalid_handle("reader closed");
        assert_eq!(error.to_string(), "Invalid handle: reader closed");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = MarqueeError::from(io_error);

        match error {
            MarqueeError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }

    #[test]
    fn test_unavailable_classification() {
        assert!(MarqueeError::unavailable("closed").is_unavailable());
        assert!(MarqueeError::from(io::Error::other("disk")).is_unavailable());
        assert!(!MarqueeError::query_syntax("bad").is_unavailable());
        assert!(!MarqueeError::invalid_handle("stale").is_unavailable());
    }
}
