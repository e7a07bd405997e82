//! Spelling support: edit distances and the query spelling advisor.

pub mod advisor;
pub mod levenshtein;

pub use advisor::{SpellingAdvisor, TermCheck};
