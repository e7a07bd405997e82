//! Advisory spelling check of query text against the title vocabulary.
//!
//! The advisor looks every sufficiently long query token up in the index.
//! Tokens with no exact match go through a fuzzy lookup to see whether
//! a close title term exists. The advisor never rewrites a token; the
//! corrected text is the lowercased, whitespace-normalized query.

use log::{debug, warn};

use crate::config::SearchConfig;
use crate::error::Result;
use crate::index::reader::IndexReader;
use crate::query::FuzzyQuery;
use crate::schema::FIELD_TITLE;

/// Outcome of checking one token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermCheck {
    /// Too short to be checked.
    Skipped,
    /// Present in the title vocabulary.
    Known,
    /// Absent, with close vocabulary terms, best first.
    Near(Vec<String>),
    /// Absent, with nothing close.
    Unknown,
}

#[derive(Debug, Clone)]
pub struct SpellingAdvisor {
    reader: IndexReader,
    field: String,
    max_edits: u32,
    min_term_len: usize,
}

impl SpellingAdvisor {
    pub fn new(reader: IndexReader, config: &SearchConfig) -> Self {
        SpellingAdvisor {
            reader,
            field: FIELD_TITLE.to_string(),
            max_edits: config.spelling_max_edits,
            min_term_len: config.spelling_min_term_len,
        }
    }

    /// Check every token of `text` and return the text to search with.
    ///
    /// Lookup failures are logged and the token passes through unchanged.
    pub fn check(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let mut tokens = Vec::new();

        for token in lowered.split_whitespace() {
            match self.check_term(token) {
                Ok(TermCheck::Near(candidates)) => {
                    debug!("No exact match for '{token}', close terms: {candidates:?}");
                }
                Ok(TermCheck::Unknown) => debug!("No title term resembles '{token}'"),
                Ok(_) => {}
                Err(e) => warn!("Spelling lookup for '{token}' failed: {e}"),
            }
            tokens.push(token);
        }

        tokens.join(" ")
    }

    /// Look one raw token up in the title vocabulary.
    pub fn check_term(&self, token: &str) -> Result<TermCheck> {
        let cleaned: String = token
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        if cleaned.len() < self.min_term_len {
            return Ok(TermCheck::Skipped);
        }
        if self.reader.term_exists(&self.field, &cleaned)? {
            return Ok(TermCheck::Known);
        }

        let segment = self.reader.segment()?;
        let candidates: Vec<String> = FuzzyQuery::new(self.field.as_str(), cleaned)
            .max_edits(self.max_edits)
            .find_matches(&segment)
            .into_iter()
            .map(|m| m.term)
            .collect();
        if candidates.is_empty() {
            Ok(TermCheck::Unknown)
        } else {
            Ok(TermCheck::Near(candidates))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::StandardAnalyzer;
    use crate::document::movie::Movie;
    use crate::index::IndexSegment;

    fn advisor() -> SpellingAdvisor {
        let movies = vec![
            Movie {
                imdb_id: "tt1".into(),
                title: "The Matrix".into(),
                ..Default::default()
            },
            Movie {
                imdb_id: "tt2".into(),
                title: "Inception".into(),
                ..Default::default()
            },
        ];
        let segment = IndexSegment::build(&movies, &StandardAnalyzer::default());
        SpellingAdvisor::new(IndexReader::from_segment(segment), &SearchConfig::default())
    }

    #[test]
    fn test_check_term() {
        let advisor = advisor();
        assert_eq!(advisor.check_term("of").unwrap(), TermCheck::Skipped);
        assert_eq!(advisor.check_term("Matrix!").unwrap(), TermCheck::Known);
        assert_eq!(
            advisor.check_term("matrx").unwrap(),
            TermCheck::Near(vec!["matrix".to_string()])
        );
        assert_eq!(advisor.check_term("zebra").unwrap(), TermCheck::Unknown);
    }

    #[test]
    fn test_check_never_rewrites() {
        let advisor = advisor();
        assert_eq!(advisor.check("  The   MATRX  of "), "the matrx of");
        assert_eq!(advisor.check(""), "");
    }

    #[test]
    fn test_lookup_failure_passes_token_through() {
        let advisor = advisor();
        advisor.reader.close();
        assert!(advisor.check_term("matrix").is_err());
        assert_eq!(advisor.check("Inception Matrix"), "inception matrix");
    }
}
