//! Command implementations for the marquee CLI.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use log::{debug, info};

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::SearchConfig;
use crate::document::jsonl::JsonlReader;
use crate::search::{BrowseSession, Catalog, FacetKind, SearchFilters, get_facets};

/// Execute a CLI command.
pub fn execute_command(args: MarqueeArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    match &args.command {
        Command::Index(index_args) => build_index(index_args, config, &args),
        Command::Search(search_args) => search(search_args, config, &args),
        Command::Filter(filter_args) => filtered_search(filter_args, config, &args),
        Command::Advanced(advanced_args) => advanced_search(advanced_args, config, &args),
        Command::Facets(facets_args) => list_facets(facets_args, config, &args),
    }
}

fn load_config(path: Option<&Path>) -> Result<SearchConfig> {
    match path {
        Some(path) => {
            debug!("Loading configuration from {}", path.display());
            SearchConfig::from_file(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))
        }
        None => Ok(SearchConfig::default()),
    }
}

fn open_catalog(config: SearchConfig, args: &MarqueeArgs) -> Result<Catalog> {
    Catalog::open(&args.index, config).with_context(|| {
        format!(
            "no usable index at {}; run `marquee index --data <file>` first",
            args.index.display()
        )
    })
}

/// Rebuild the index from a JSONL file.
fn build_index(index_args: &IndexArgs, config: SearchConfig, args: &MarqueeArgs) -> Result<()> {
    let start = Instant::now();

    let mut reader = JsonlReader::new();
    let movies = reader
        .read_movies(&index_args.data, index_args.max_records)
        .with_context(|| format!("failed to read movies from {}", index_args.data.display()))?;
    info!("Read {} movies from {}", movies.len(), index_args.data.display());

    let mut catalog = Catalog::new(&args.index, config)?;
    let meta = catalog
        .rebuild(&movies)
        .with_context(|| format!("failed to build index at {}", args.index.display()))?;

    let output = IndexOutput {
        location: args.index.display().to_string(),
        records_read: movies.len(),
        records_skipped: reader.skipped(),
        documents_indexed: meta.doc_count,
        duration_ms: start.elapsed().as_millis() as u64,
    };
    output_result(&output, args)
}

fn search(search_args: &SearchArgs, config: SearchConfig, args: &MarqueeArgs) -> Result<()> {
    let catalog = open_catalog(config, args)?;
    let hits = catalog.basic_search(&search_args.query, search_args.limit)?;
    output_result(&SearchOutput::from_hits(&search_args.query, &hits)?, args)
}

fn filtered_search(
    filter_args: &FilterArgs,
    config: SearchConfig,
    args: &MarqueeArgs,
) -> Result<()> {
    let catalog = open_catalog(config, args)?;
    let filters = SearchFilters::new()
        .rating(filter_args.min_rating, filter_args.max_rating)
        .year(filter_args.min_year, filter_args.max_year);
    let hits = catalog.filtered_search(&filter_args.query, &filters, filter_args.limit)?;
    output_result(&SearchOutput::from_hits(&filter_args.query, &hits)?, args)
}

fn advanced_search(
    advanced_args: &AdvancedArgs,
    config: SearchConfig,
    args: &MarqueeArgs,
) -> Result<()> {
    let catalog = open_catalog(config, args)?;
    let results = catalog.perform_search(&advanced_args.query, advanced_args.limit)?;

    let mut session = BrowseSession::new(results);
    for (kind, value) in &advanced_args.facets {
        session.apply_facet(FacetKind::parse(kind), value)?;
    }
    session.goto(advanced_args.page);

    let applied = session
        .applied_facets()
        .iter()
        .map(|(kind, value)| format!("{kind}={value}"))
        .collect();
    let output = SearchOutput::from_results(&advanced_args.query, session.results())?
        .with_facets(applied);
    output_result(&output, args)
}

fn list_facets(facets_args: &FacetsArgs, config: SearchConfig, args: &MarqueeArgs) -> Result<()> {
    let catalog = open_catalog(config, args)?;
    let results = catalog.perform_search(&facets_args.query, facets_args.limit)?;
    let output = FacetsOutput {
        query: facets_args.query.clone(),
        hits_examined: results.len(),
        table: get_facets(results.hits())?,
    };
    output_result(&output, args)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use clap::Parser;
    use tempfile::TempDir;

    use super::*;

    fn write_movies(dir: &Path) -> std::path::PathBuf {
        let data = dir.join("movies.jsonl");
        fs::write(
            &data,
            concat!(
                r#"{"index": 0, "imdb_id": "tt0110912", "title": "Pulp Fiction", "year": 1994, "rating": 8.9, "genres": ["Crime"]}"#,
                "\n",
                "not json\n",
                r#"{"index": 1, "imdb_id": "tt0113277", "title": "Heat", "year": 1995, "rating": 8.3, "genres": ["Crime", "Drama"]}"#,
                "\n",
            ),
        )
        .unwrap();
        data
    }

    fn run(argv: &[&str]) -> Result<()> {
        execute_command(MarqueeArgs::try_parse_from(argv)?)
    }

    #[test]
    fn test_commands_end_to_end() {
        let temp_dir = TempDir::new().unwrap();
        let data = write_movies(temp_dir.path());
        let config = temp_dir.path().join("config.json");
        fs::write(&config, r#"{"reopen_delay_ms": 0}"#).unwrap();
        let index = temp_dir.path().join("index");
        let index = index.to_str().unwrap();
        let config = config.to_str().unwrap();

        run(&["marquee", "-q", "-c", config, "-i", index, "index", "-d", data.to_str().unwrap()])
            .unwrap();
        run(&["marquee", "-i", index, "search", "heat"]).unwrap();
        run(&["marquee", "-i", index, "-f", "json", "filter", "", "--min-year", "1990"]).unwrap();
        run(&["marquee", "-i", index, "advanced", "hat?", "--facet", "genre=crime"]).unwrap();
        run(&["marquee", "-i", index, "facets", "crime"]).unwrap();
    }

    #[test]
    fn test_search_without_index() {
        let temp_dir = TempDir::new().unwrap();
        let index = temp_dir.path().join("missing");
        let err = run(&["marquee", "-i", index.to_str().unwrap(), "search", "heat"]).unwrap_err();
        assert!(err.to_string().contains("no usable index"));
    }

    #[test]
    fn test_bad_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = temp_dir.path().join("config.json");
        fs::write(&config, "{ not json").unwrap();
        let err = run(&["marquee", "-c", config.to_str().unwrap(), "search", "heat"]).unwrap_err();
        assert!(err.to_string().contains("failed to load configuration"));
    }
}
