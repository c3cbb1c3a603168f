use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::{Path, PathBuf};

use chainql::config::QueryConfig;
use chainql::{PredicateChain, parse_query};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Filter query, e.g. `title == "foo" & age > 42`
    pub query: String,

    /// Record to check (.json object or .yaml mapping)
    #[arg(short, long)]
    pub record: PathBuf,

    /// Configuration file (YAML)
    #[arg(short, long, env = "CHAINQL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Additional date format, tried after the configured ones (repeatable)
    #[arg(short, long = "date-format")]
    pub date_formats: Vec<String>,

    /// Print the normalized query before the result
    #[arg(long)]
    pub explain: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parse the query and register date formats from config and CLI.
pub fn build_chain(cli: &Cli) -> Result<PredicateChain> {
    let mut chain = parse_query(&cli.query)
        .with_context(|| format!("Query: Failed to parse '{}'", cli.query))?;

    if let Some(path) = &cli.config {
        let config = QueryConfig::load(path)
            .with_context(|| format!("Config: Failed to load {:?}", path))?;
        config
            .apply(&mut chain)
            .with_context(|| format!("Config: Invalid date format in {:?}", path))?;
    }
    for pattern in &cli.date_formats {
        chain
            .add_date_format(pattern)
            .context("CLI: Invalid --date-format")?;
    }

    Ok(chain)
}

/// Read one record from a JSON or YAML file, chosen by extension.
pub fn load_record(path: &Path) -> Result<serde_json::Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Record: Failed to read {:?}", path))?;

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);
    let record: serde_json::Value = match ext.as_deref() {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&text)
            .with_context(|| format!("Record: Invalid YAML in {:?}", path))?,
        _ => serde_json::from_str(&text)
            .with_context(|| format!("Record: Invalid JSON in {:?}", path))?,
    };

    if !record.is_object() {
        bail!("Record: {:?} does not contain an object", path);
    }
    Ok(record)
}

/// Check the record against the query, returning the match decision.
pub fn run(cli: &Cli) -> Result<bool> {
    let chain = build_chain(cli)?;
    tracing::info!(
        "Query: {} condition(s), {} date format(s)",
        chain.len(),
        chain.date_formats().count()
    );

    if cli.explain {
        println!("{}", chain);
    }

    let record = load_record(&cli.record)?;
    let matched = chain
        .check(&record)
        .with_context(|| format!("Evaluation: Failed to check {:?}", cli.record))?;

    println!("{}", matched);
    Ok(matched)
}
