//! Query composition for the advanced search path.
//!
//! Tokens ending in `?` are fuzzy terms matched against every searchable
//! field; all other tokens form one boosted multi-field query.

use std::sync::Arc;

use crate::analysis::Analyzer;
use crate::config::SearchConfig;
use crate::error::Result;
use crate::query::{BooleanQuery, FuzzyQuery, MultiFieldQueryParser, Query};
use crate::schema::FieldBoost;

/// Query text split into its regular and fuzzy parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposedTerms {
    /// Cleaned regular tokens, in input order.
    pub regular: Vec<String>,
    /// Lowercased fuzzy base words, `?` removed.
    pub fuzzy: Vec<String>,
}

impl ComposedTerms {
    /// Split `text` on whitespace. Characters outside `[A-Za-z0-9?]` are
    /// dropped first; tokens reduced to nothing are ignored.
    pub fn split(text: &str) -> Self {
        let mut terms = ComposedTerms::default();
        for raw in text.split_whitespace() {
            let cleaned: String = raw
                .chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '?')
                .collect();
            if cleaned.is_empty() {
                continue;
            }
            if cleaned.ends_with('?') {
                let base = cleaned.replace('?', "").to_lowercase();
                if !base.is_empty() {
                    terms.fuzzy.push(base);
                }
            } else {
                terms.regular.push(cleaned);
            }
        }
        terms
    }

    pub fn is_empty(&self) -> bool {
        self.regular.is_empty() && self.fuzzy.is_empty()
    }
}

/// Builds structured queries from raw query text.
#[derive(Debug, Clone)]
pub struct QueryComposer {
    parser: MultiFieldQueryParser,
    fields: Vec<FieldBoost>,
    fuzzy_max_edits: u32,
    fuzzy_max_expansions: usize,
}

impl QueryComposer {
    pub fn new(config: &SearchConfig, analyzer: Arc<dyn Analyzer>) -> Self {
        QueryComposer {
            parser: MultiFieldQueryParser::new(config.field_boosts.clone(), analyzer)
                .with_fuzzy_max_expansions(config.fuzzy_max_expansions),
            fields: config.field_boosts.clone(),
            fuzzy_max_edits: config.fuzzy_max_edits,
            fuzzy_max_expansions: config.fuzzy_max_expansions,
        }
    }

    pub fn parser(&self) -> &MultiFieldQueryParser {
        &self.parser
    }

    /// Compose the query for `text`.
    ///
    /// The regular and fuzzy groups are OR-ed when both exist. When neither
    /// survives cleaning, the text is parsed as is with `?` removed, which
    /// reports a syntax error for blank input.
    pub fn compose(&self, text: &str) -> Result<Box<dyn Query>> {
        let terms = ComposedTerms::split(text);

        let regular = if terms.regular.is_empty() {
            None
        } else {
            Some(self.parser.parse(&terms.regular.join(" "))?)
        };
        let fuzzy = self.fuzzy_group(&terms.fuzzy);

        match (regular, fuzzy) {
            (Some(regular), Some(fuzzy)) => {
                let mut query = BooleanQuery::new();
                query.add_should(regular);
                query.add_should(fuzzy);
                Ok(Box::new(query))
            }
            (Some(query), None) | (None, Some(query)) => Ok(query),
            (None, None) => self.parser.parse(&text.replace('?', "")),
        }
    }

    /// One fuzzy clause per (word, field) pair, all optional.
    fn fuzzy_group(&self, words: &[String]) -> Option<Box<dyn Query>> {
        if words.is_empty() {
            return None;
        }
        let mut group = BooleanQuery::new();
        for word in words {
            for field in &self.fields {
                group.add_should(Box::new(
                    FuzzyQuery::new(field.field.as_str(), word.as_str())
                        .max_edits(self.fuzzy_max_edits)
                        .max_expansions(self.fuzzy_max_expansions),
                ));
            }
        }
        Some(Box::new(group))
    }
}
