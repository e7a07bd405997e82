//! Query parser for converting query strings to structured query objects.
//!
//! Supported syntax:
//! - Simple terms: `hello`, searched over every configured field
//! - Field-specific terms: `title:hello`, `title:"hello world"`, `title:(a b)`
//! - Phrases: `"hello world"`
//! - Fuzzy terms: `hello~`, `hello~1`
//! - Required and prohibited clauses: `+required -forbidden optional`
//! - Boolean operators: `a AND b`, `a OR b`, `a NOT b` (also `&&`, `||`, `!`)
//! - Grouping: `(a OR b) AND c`
//! - Boosts: `hello^2`, `"hello world"^0.5`, `(a b)^3`
//!
//! The default operator is OR.

use std::iter::Peekable;
use std::str::Chars;
use std::sync::Arc;

use crate::analysis::Analyzer;
use crate::error::{MarqueeError, Result};
use crate::query::{
    BooleanClause, BooleanQuery, FuzzyQuery, Occur, PhraseQuery, Query, TermQuery,
};
use crate::schema::FieldBoost;

const DEFAULT_FUZZY_EDITS: u32 = 2;
const MAX_FUZZY_EDITS: u32 = 2;

/// Parses user query strings against a set of boosted default fields.
#[derive(Debug, Clone)]
pub struct MultiFieldQueryParser {
    fields: Vec<FieldBoost>,
    analyzer: Arc<dyn Analyzer>,
    fuzzy_max_expansions: usize,
}

impl MultiFieldQueryParser {
    pub fn new(fields: Vec<FieldBoost>, analyzer: Arc<dyn Analyzer>) -> Self {
        MultiFieldQueryParser {
            fields,
            analyzer,
            fuzzy_max_expansions: 50,
        }
    }

    /// Set how many dictionary terms a fuzzy term may expand to.
    pub fn with_fuzzy_max_expansions(mut self, max_expansions: usize) -> Self {
        self.fuzzy_max_expansions = max_expansions;
        self
    }

    pub fn fields(&self) -> &[FieldBoost] {
        &self.fields
    }

    pub fn analyzer(&self) -> &Arc<dyn Analyzer> {
        &self.analyzer
    }

    /// Parse a query string.
    ///
    /// A query whose terms all analyze to nothing becomes an empty boolean
    /// query, which matches no documents.
    pub fn parse(&self, query_str: &str) -> Result<Box<dyn Query>> {
        let trimmed = query_str.trim();
        if trimmed.is_empty() {
            return Err(MarqueeError::query_syntax("query is empty"));
        }

        let tokens = Lexer::new(trimmed).tokenize()?;
        let mut parser = Parser {
            owner: self,
            tokens,
            pos: 0,
        };
        let clauses = parser.parse_clauses(None, 0)?;
        Ok(combine(clauses).unwrap_or_else(|| Box::new(BooleanQuery::new())))
    }

    /// Build the query for a single term or phrase over one field, or over
    /// all default fields when `field` is `None`.
    fn leaf_query(&self, field: Option<&str>, leaf: &Leaf) -> Option<Box<dyn Query>> {
        let targets: Vec<(&str, f32)> = match field {
            Some(field) => vec![(field, 1.0)],
            None => self
                .fields
                .iter()
                .map(|fb| (fb.field.as_str(), fb.boost))
                .collect(),
        };

        let mut per_field: Vec<Box<dyn Query>> = targets
            .into_iter()
            .filter_map(|(field, boost)| self.field_query(field, boost, leaf))
            .collect();

        match per_field.len() {
            0 => None,
            1 => per_field.pop(),
            _ => {
                let mut query = BooleanQuery::new();
                for q in per_field {
                    query.add_should(q);
                }
                Some(Box::new(query))
            }
        }
    }

    fn field_query(&self, field: &str, boost: f32, leaf: &Leaf) -> Option<Box<dyn Query>> {
        match leaf {
            Leaf::Fuzzy { text, max_edits } => {
                let term = text.to_lowercase();
                if term.is_empty() {
                    return None;
                }
                Some(Box::new(
                    FuzzyQuery::new(field, term)
                        .max_edits(*max_edits)
                        .max_expansions(self.fuzzy_max_expansions)
                        .with_boost(boost),
                ))
            }
            Leaf::Word(text) | Leaf::Phrase(text) => {
                let mut terms: Vec<String> = self
                    .analyzer
                    .analyze(text)
                    .into_iter()
                    .map(|t| t.text)
                    .collect();
                if terms.len() > 1 {
                    return Some(Box::new(PhraseQuery::new(field, terms).with_boost(boost)));
                }
                terms.pop().map(|term| {
                    Box::new(TermQuery::new(field, term).with_boost(boost)) as Box<dyn Query>
                })
            }
        }
    }
}

/// Collapse parsed clauses into one query.
fn combine(clauses: Vec<BooleanClause>) -> Option<Box<dyn Query>> {
    if clauses.len() == 1 && clauses[0].occur != Occur::MustNot {
        return clauses.into_iter().next().map(|c| c.query);
    }
    if clauses.is_empty() {
        return None;
    }
    let mut query = BooleanQuery::new();
    for clause in clauses {
        query.add_clause(clause);
    }
    Some(Box::new(query))
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(String),
    Fuzzy(String, u32),
    Phrase(String),
    Field(String),
    Boost(f32),
    LParen,
    RParen,
    Plus,
    Minus,
    And,
    Or,
    Not,
}

#[derive(Debug)]
enum Leaf {
    Word(String),
    Phrase(String),
    Fuzzy { text: String, max_edits: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Conjunction {
    None,
    And,
    Or,
}

struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Lexer {
            chars: input.chars().peekable(),
            tokens: Vec::new(),
        }
    }

    fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut separated = true;
        while let Some(&c) = self.chars.peek() {
            match c {
                c if c.is_whitespace() => {
                    self.chars.next();
                    separated = true;
                    continue;
                }
                '(' => {
                    self.chars.next();
                    self.tokens.push(Token::LParen);
                }
                ')' => {
                    self.chars.next();
                    self.tokens.push(Token::RParen);
                }
                '"' => {
                    self.chars.next();
                    let phrase = self.read_phrase()?;
                    self.tokens.push(Token::Phrase(phrase));
                }
                '^' => {
                    self.chars.next();
                    let boost = self.read_boost()?;
                    self.tokens.push(Token::Boost(boost));
                }
                '+' | '-' | '!' if separated => {
                    self.chars.next();
                    self.tokens.push(match c {
                        '+' => Token::Plus,
                        '-' => Token::Minus,
                        _ => Token::Not,
                    });
                }
                _ => {
                    let run = self.read_run();
                    self.push_run(run)?;
                }
            }
            separated = self.tokens.last() == Some(&Token::LParen);
        }
        Ok(self.tokens)
    }

    fn read_phrase(&mut self) -> Result<String> {
        let mut phrase = String::new();
        for c in self.chars.by_ref() {
            if c == '"' {
                return Ok(phrase);
            }
            phrase.push(c);
        }
        Err(MarqueeError::query_syntax("unterminated quoted phrase"))
    }

    fn read_boost(&mut self) -> Result<f32> {
        let mut number = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_digit() || c == '.' {
                number.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        match number.parse::<f32>() {
            Ok(boost) if boost.is_finite() && boost >= 0.0 => Ok(boost),
            _ => Err(MarqueeError::query_syntax(format!(
                "invalid boost '^{number}'"
            ))),
        }
    }

    fn read_run(&mut self) -> String {
        let mut run = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_whitespace() || matches!(c, '(' | ')' | '"' | '^') {
                break;
            }
            run.push(c);
            self.chars.next();
            // A field prefix ends the run so `title:"x"` and `title:(x)` work.
            if c == ':' && run.len() > 1 {
                break;
            }
        }
        run
    }

    fn push_run(&mut self, run: String) -> Result<()> {
        match run.as_str() {
            "AND" | "&&" => self.tokens.push(Token::And),
            "OR" | "||" => self.tokens.push(Token::Or),
            "NOT" => self.tokens.push(Token::Not),
            _ if run.ends_with(':') && run.len() > 1 => {
                self.tokens.push(Token::Field(run[..run.len() - 1].to_string()));
            }
            _ => return self.push_term(&run),
        }
        Ok(())
    }

    fn push_term(&mut self, text: &str) -> Result<()> {
        let Some((word, edits)) = text.split_once('~') else {
            self.tokens.push(Token::Word(text.to_string()));
            return Ok(());
        };
        if word.is_empty() {
            return Err(MarqueeError::query_syntax("fuzzy operator without a term"));
        }
        let max_edits = if edits.is_empty() {
            DEFAULT_FUZZY_EDITS
        } else {
            match edits.parse::<u32>() {
                Ok(n) if n <= MAX_FUZZY_EDITS => n,
                _ => {
                    return Err(MarqueeError::query_syntax(format!(
                        "invalid fuzzy edit distance '~{edits}'"
                    )));
                }
            }
        };
        self.tokens.push(Token::Fuzzy(word.to_string(), max_edits));
        Ok(())
    }
}

struct Parser<'p> {
    owner: &'p MultiFieldQueryParser,
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn starts_clause(token: Option<&Token>) -> bool {
        matches!(
            token,
            Some(
                Token::Word(_)
                    | Token::Fuzzy(..)
                    | Token::Phrase(_)
                    | Token::Field(_)
                    | Token::LParen
            )
        )
    }

    /// Parse clauses up to the end of input, or up to the closing
    /// parenthesis of the current group when `depth > 0`.
    fn parse_clauses(&mut self, field: Option<&str>, depth: usize) -> Result<Vec<BooleanClause>> {
        let mut clauses: Vec<BooleanClause> = Vec::new();
        let mut conjunction = Conjunction::None;
        let mut seen_clause = false;

        loop {
            match self.peek() {
                None if depth > 0 => {
                    return Err(MarqueeError::query_syntax("missing closing parenthesis"));
                }
                None => break,
                Some(Token::RParen) if depth == 0 => {
                    return Err(MarqueeError::query_syntax("unbalanced closing parenthesis"));
                }
                Some(Token::RParen) => break,
                Some(Token::And | Token::Or) => {
                    if !seen_clause || conjunction != Conjunction::None {
                        return Err(MarqueeError::query_syntax("dangling boolean operator"));
                    }
                    conjunction = if self.next() == Some(Token::And) {
                        Conjunction::And
                    } else {
                        Conjunction::Or
                    };
                    if !Self::starts_clause(self.peek())
                        && !matches!(self.peek(), Some(Token::Plus | Token::Minus | Token::Not))
                    {
                        return Err(MarqueeError::query_syntax("dangling boolean operator"));
                    }
                    continue;
                }
                Some(Token::Boost(_)) => {
                    return Err(MarqueeError::query_syntax("boost without a term"));
                }
                _ => {}
            }

            let modifier = match self.peek() {
                Some(Token::Plus) => Some(Occur::Must),
                Some(Token::Minus | Token::Not) => Some(Occur::MustNot),
                _ => None,
            };
            if modifier.is_some() {
                self.next();
                if !Self::starts_clause(self.peek()) {
                    return Err(MarqueeError::query_syntax("operator without a term"));
                }
            }

            let query = self.parse_clause(field, depth)?;

            if conjunction == Conjunction::And {
                if let Some(last) = clauses.last_mut() {
                    if last.occur == Occur::Should {
                        last.occur = Occur::Must;
                    }
                }
            }
            let occur = match (modifier, conjunction) {
                (Some(occur), _) => occur,
                (None, Conjunction::And) => Occur::Must,
                (None, _) => Occur::Should,
            };
            if let Some(query) = query {
                clauses.push(BooleanClause::new(query, occur));
            }
            conjunction = Conjunction::None;
            seen_clause = true;
        }

        Ok(clauses)
    }

    fn parse_clause(
        &mut self,
        field: Option<&str>,
        depth: usize,
    ) -> Result<Option<Box<dyn Query>>> {
        let explicit_field = match self.peek() {
            Some(Token::Field(name)) => {
                let name = name.clone();
                self.next();
                Some(name)
            }
            _ => None,
        };
        let field = explicit_field.as_deref().or(field);

        let mut query = match self.next() {
            Some(Token::Word(text)) => self.owner.leaf_query(field, &Leaf::Word(text)),
            Some(Token::Phrase(text)) => self.owner.leaf_query(field, &Leaf::Phrase(text)),
            Some(Token::Fuzzy(text, max_edits)) => self
                .owner
                .leaf_query(field, &Leaf::Fuzzy { text, max_edits }),
            Some(Token::LParen) => {
                let clauses = self.parse_clauses(field, depth + 1)?;
                if self.next() != Some(Token::RParen) {
                    return Err(MarqueeError::query_syntax("missing closing parenthesis"));
                }
                combine(clauses)
            }
            _ => {
                return Err(MarqueeError::query_syntax("expected a term"));
            }
        };

        if let Some(Token::Boost(boost)) = self.peek() {
            let boost = *boost;
            self.next();
            if let Some(query) = query.as_mut() {
                let current = query.boost();
                query.set_boost(current * boost);
            }
        }
        Ok(query)
    }
}
