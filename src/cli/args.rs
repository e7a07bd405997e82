//! Command line argument parsing for the marquee CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// Marquee - search a movie catalog from the command line
#[derive(Parser, Debug, Clone)]
#[command(name = "marquee")]
#[command(about = "Movie catalog search with fuzzy terms, facets and paginated browsing")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct MarqueeArgs {
    /// Index directory
    #[arg(short, long, global = true, env = "MARQUEE_INDEX", default_value = "index")]
    pub index: PathBuf,

    /// Search configuration file (JSON)
    #[arg(short, long, global = true, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", global = true, default_value = "human")]
    pub output_format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl MarqueeArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Rebuild the index from a JSONL movie file
    Index(IndexArgs),

    /// Search titles, cast, overviews, taglines and genres
    Search(SearchArgs),

    /// Search with rating and year ranges
    Filter(FilterArgs),

    /// Search with spelling check, fuzzy terms (`word?`) and facet filters
    Advanced(AdvancedArgs),

    /// List decade and genre facets of a search
    Facets(FacetsArgs),
}

/// Arguments for rebuilding the index
#[derive(Parser, Debug, Clone)]
pub struct IndexArgs {
    /// Movie records, one JSON object per line
    #[arg(short, long, value_name = "DATA_FILE")]
    pub data: PathBuf,

    /// Maximum number of records to read (0 reads all)
    #[arg(short, long, default_value = "1000")]
    pub max_records: usize,
}

/// Arguments for a basic search
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Query text
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Maximum number of results
    #[arg(short, long, default_value = "10")]
    pub limit: usize,
}

/// Arguments for a range-filtered search
#[derive(Parser, Debug, Clone)]
pub struct FilterArgs {
    /// Query text; empty matches every movie
    #[arg(value_name = "QUERY", default_value = "")]
    pub query: String,

    #[arg(long)]
    pub min_rating: Option<f64>,

    #[arg(long)]
    pub max_rating: Option<f64>,

    #[arg(long)]
    pub min_year: Option<i64>,

    #[arg(long)]
    pub max_year: Option<i64>,

    /// Maximum number of results
    #[arg(short, long, default_value = "10")]
    pub limit: usize,
}

/// Arguments for an advanced search
#[derive(Parser, Debug, Clone)]
pub struct AdvancedArgs {
    /// Query text
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Maximum number of results
    #[arg(short, long, default_value = "100")]
    pub limit: usize,

    /// Result page to show, starting at 1
    #[arg(short, long, default_value = "1", value_parser = parse_page)]
    pub page: usize,

    /// Facet filter as kind=value, e.g. decade=1990s or genre=comedy
    #[arg(long = "facet", value_name = "KIND=VALUE", value_parser = parse_facet)]
    pub facets: Vec<(String, String)>,
}

/// Arguments for listing facets
#[derive(Parser, Debug, Clone)]
pub struct FacetsArgs {
    /// Query text
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Number of hits the facets are collected from
    #[arg(short, long, default_value = "100")]
    pub limit: usize,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}

fn parse_page(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(page) if page >= 1 => Ok(page),
        _ => Err(format!("page must be a number starting at 1, got '{s}'")),
    }
}

fn parse_facet(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((kind, value)) if !kind.trim().is_empty() && !value.trim().is_empty() => {
            Ok((kind.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected KIND=VALUE, got '{s}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_command() {
        let args =
            MarqueeArgs::try_parse_from(["marquee", "index", "--data", "movies.jsonl"]).unwrap();
        assert_eq!(args.index, PathBuf::from("index"));
        match args.command {
            Command::Index(index_args) => {
                assert_eq!(index_args.data, PathBuf::from("movies.jsonl"));
                assert_eq!(index_args.max_records, 1000);
            }
            _ => panic!("Expected Index command"),
        }
    }

    #[test]
    fn test_filter_command() {
        let args = MarqueeArgs::try_parse_from([
            "marquee",
            "filter",
            "heist",
            "--min-rating",
            "7.5",
            "--max-year",
            "1999",
            "--index",
            "/tmp/movies",
        ])
        .unwrap();
        assert_eq!(args.index, PathBuf::from("/tmp/movies"));
        match args.command {
            Command::Filter(filter_args) => {
                assert_eq!(filter_args.query, "heist");
                assert_eq!(filter_args.min_rating, Some(7.5));
                assert_eq!(filter_args.max_rating, None);
                assert_eq!(filter_args.max_year, Some(1999));
                assert_eq!(filter_args.limit, 10);
            }
            _ => panic!("Expected Filter command"),
        }
    }

    #[test]
    fn test_advanced_facets() {
        let args = MarqueeArgs::try_parse_from([
            "marquee",
            "advanced",
            "matrx?",
            "--facet",
            "decade=1990s",
            "--facet",
            "genre=Action",
            "--page",
            "2",
        ])
        .unwrap();
        match args.command {
            Command::Advanced(advanced_args) => {
                assert_eq!(advanced_args.page, 2);
                assert_eq!(
                    advanced_args.facets,
                    vec![
                        ("decade".to_string(), "1990s".to_string()),
                        ("genre".to_string(), "Action".to_string())
                    ]
                );
            }
            _ => panic!("Expected Advanced command"),
        }

        assert!(
            MarqueeArgs::try_parse_from(["marquee", "advanced", "x", "--facet", "decade"]).is_err()
        );
        assert!(MarqueeArgs::try_parse_from(["marquee", "advanced", "x", "--page", "0"]).is_err());
        assert!(MarqueeArgs::try_parse_from(["marquee", "advanced", "x", "--page", "-2"]).is_err());
    }

    #[test]
    fn test_verbosity_levels() {
        let args = MarqueeArgs::try_parse_from(["marquee", "search", "heat"]).unwrap();
        assert_eq!(args.verbosity(), 1);

        let args = MarqueeArgs::try_parse_from(["marquee", "-vv", "search", "heat"]).unwrap();
        assert_eq!(args.verbosity(), 2);

        let args =
            MarqueeArgs::try_parse_from(["marquee", "-q", "-vvv", "search", "heat"]).unwrap();
        assert_eq!(args.verbosity(), 0);
    }

    #[test]
    fn test_output_format() {
        let args =
            MarqueeArgs::try_parse_from(["marquee", "search", "heat", "--format", "json"]).unwrap();
        assert_eq!(args.output_format, OutputFormat::Json);
    }
}
