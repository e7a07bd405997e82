//! Boolean query implementation for combining multiple queries.

use crate::error::Result;
use crate::index::IndexSegment;
use crate::query::{Query, ScoredDocs};

/// Occurrence requirements for boolean clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occur {
    /// The clause must match and contributes to the score (AND).
    Must,
    /// The clause should match (OR).
    Should,
    /// The clause must not match (NOT).
    MustNot,
    /// The clause must match but does not contribute to the score.
    Filter,
}

/// A clause in a boolean query.
#[derive(Debug)]
pub struct BooleanClause {
    /// The query for this clause.
    pub query: Box<dyn Query>,
    /// The occurrence requirement.
    pub occur: Occur,
}

impl Clone for BooleanClause {
    fn clone(&self) -> Self {
        BooleanClause {
            query: self.query.clone_box(),
            occur: self.occur,
        }
    }
}

impl BooleanClause {
    pub fn new(query: Box<dyn Query>, occur: Occur) -> Self {
        BooleanClause { query, occur }
    }

    pub fn must(query: Box<dyn Query>) -> Self {
        BooleanClause::new(query, Occur::Must)
    }

    pub fn should(query: Box<dyn Query>) -> Self {
        BooleanClause::new(query, Occur::Should)
    }

    pub fn must_not(query: Box<dyn Query>) -> Self {
        BooleanClause::new(query, Occur::MustNot)
    }

    pub fn filter(query: Box<dyn Query>) -> Self {
        BooleanClause::new(query, Occur::Filter)
    }
}

/// A boolean query that combines multiple queries with boolean logic.
///
/// Evaluation follows the usual conjunctive rules:
///
/// * `Must` and `Filter` clauses are all required; only `Must` scores.
/// * If any required clause exists, `Should` clauses only add score.
///   Otherwise at least one `Should` clause has to match.
/// * `MustNot` clauses remove documents. A query made only of `MustNot`
///   clauses matches nothing.
#[derive(Debug, Clone)]
pub struct BooleanQuery {
    clauses: Vec<BooleanClause>,
    boost: f32,
}

impl BooleanQuery {
    /// Create a new empty boolean query. An empty query matches nothing.
    pub fn new() -> Self {
        BooleanQuery {
            clauses: Vec::new(),
            boost: 1.0,
        }
    }

    pub fn builder() -> BooleanQueryBuilder {
        BooleanQueryBuilder::new()
    }

    pub fn add_clause(&mut self, clause: BooleanClause) {
        self.clauses.push(clause);
    }

    pub fn add_must(&mut self, query: Box<dyn Query>) {
        self.add_clause(BooleanClause::must(query));
    }

    pub fn add_should(&mut self, query: Box<dyn Query>) {
        self.add_clause(BooleanClause::should(query));
    }

    pub fn add_must_not(&mut self, query: Box<dyn Query>) {
        self.add_clause(BooleanClause::must_not(query));
    }

    pub fn add_filter(&mut self, query: Box<dyn Query>) {
        self.add_clause(BooleanClause::filter(query));
    }

    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }

    pub fn clauses(&self) -> &[BooleanClause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

impl Default for BooleanQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl Query for BooleanQuery {
    fn execute(&self, segment: &IndexSegment) -> Result<ScoredDocs> {
        let mut required: Option<ScoredDocs> = None;
        let mut should: Option<ScoredDocs> = None;
        let mut excluded = ScoredDocs::new();

        for clause in &self.clauses {
            let docs = clause.query.execute(segment)?;
            match clause.occur {
                Occur::Must | Occur::Filter => {
                    let docs = if clause.occur == Occur::Filter {
                        docs.without_scores()
                    } else {
                        docs
                    };
                    required = Some(match required {
                        Some(acc) => acc.intersect(&docs),
                        None => docs,
                    });
                }
                Occur::Should => {
                    should = Some(match should {
                        Some(acc) => acc.union(&docs),
                        None => docs,
                    });
                }
                Occur::MustNot => excluded = excluded.union(&docs),
            }
        }

        let matched = match (required, should) {
            (Some(required), Some(should)) => required.add_optional(&should),
            (Some(required), None) => required,
            (None, Some(should)) => should,
            (None, None) => return Ok(ScoredDocs::new()),
        };
        Ok(matched.exclude(&excluded).scale(self.boost))
    }

    fn boost(&self) -> f32 {
        self.boost
    }

    fn set_boost(&mut self, boost: f32) {
        self.boost = boost;
    }

    fn description(&self) -> String {
        let parts: Vec<String> = self
            .clauses
            .iter()
            .map(|c| {
                let prefix = match c.occur {
                    Occur::Must => "+",
                    Occur::Should => "",
                    Occur::MustNot => "-",
                    Occur::Filter => "#",
                };
                format!("{prefix}{}", c.query.description())
            })
            .collect();
        let body = format!("({})", parts.join(" "));
        if self.boost == 1.0 {
            body
        } else {
            format!("{body}^{}", self.boost)
        }
    }

    fn clone_box(&self) -> Box<dyn Query> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Builder for creating boolean queries.
#[derive(Debug, Default)]
pub struct BooleanQueryBuilder {
    query: BooleanQuery,
}

impl BooleanQueryBuilder {
    pub fn new() -> Self {
        BooleanQueryBuilder {
            query: BooleanQuery::new(),
        }
    }

    pub fn must(mut self, query: Box<dyn Query>) -> Self {
        self.query.add_must(query);
        self
    }

    pub fn should(mut self, query: Box<dyn Query>) -> Self {
        self.query.add_should(query);
        self
    }

    pub fn must_not(mut self, query: Box<dyn Query>) -> Self {
        self.query.add_must_not(query);
        self
    }

    pub fn filter(mut self, query: Box<dyn Query>) -> Self {
        self.query.add_filter(query);
        self
    }

    pub fn boost(mut self, boost: f32) -> Self {
        self.query.boost = boost;
        self
    }

    pub fn build(self) -> BooleanQuery {
        self.query
    }
}
