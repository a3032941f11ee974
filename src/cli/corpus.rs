//! Config, stopword and deck loading shared by every subcommand.

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};

use crate::bench_log::log_invalid_records;
use crate::config::{
    load_config, merge_cli_with_config, stopwords_for, CliOverrides, ParserConfig,
    DEFAULT_CONFIG_PATH, DEFAULT_DATA_PATH,
};
use crate::deck::load_decks;
use crate::domain::{Document, InvalidRecord};
use crate::text::Stopwords;
use crate::utils::Stopwatch;

#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Deck export file or directory of exports
    #[arg(long, value_name = "PATH", default_value = DEFAULT_DATA_PATH)]
    pub data: PathBuf,

    /// Parser configuration file
    #[arg(long, value_name = "FILE", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
}

/// A loaded corpus with the settings it was parsed under.
pub struct Corpus {
    pub config: ParserConfig,
    pub stopwords: Stopwords,
    pub documents: Vec<Document>,
    pub invalid: Vec<InvalidRecord>,
    /// Time spent reading and parsing deck files
    pub parse_ms: f64,
}

/// Load config and decks. Rejected deck lines go to `invalid_log` when given.
pub fn load_corpus(
    source: &SourceArgs,
    overrides: CliOverrides,
    invalid_log: Option<&Path>,
) -> Result<Corpus> {
    let config = load_config(&source.config).context("Configuration error")?;
    let config = merge_cli_with_config(config, overrides);
    config.validate().context("Configuration error")?;
    let stopwords = stopwords_for(&config).context("Configuration error")?;

    let mut watch = Stopwatch::started();
    let loaded = load_decks(&source.data, &stopwords, &config)
        .with_context(|| format!("Failed to load decks from {}", source.data.display()))?;
    let parse_ms = watch.stop();

    if !loaded.invalid.is_empty() {
        tracing::info!(count = loaded.invalid.len(), "skipped invalid deck records");
        if let Some(path) = invalid_log {
            log_invalid_records(&loaded.invalid, path)?;
        }
    }
    if loaded.documents.is_empty() {
        anyhow::bail!("No valid cards were loaded. Check your data path and data contract.");
    }

    Ok(Corpus {
        config,
        stopwords,
        documents: loaded.documents,
        invalid: loaded.invalid,
        parse_ms,
    })
}
