//! Command-line interface for rulebot
//!
//! Provides `ask` and `topics` subcommands.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod ask;
mod corpus;
mod topics;

/// Answer questions from flashcard deck exports by keyword or TF-IDF retrieval
#[derive(Parser)]
#[command(name = "rulebot")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a single query or run an interactive session
    Ask(Box<ask::AskArgs>),

    /// List topics found in the deck exports with card counts
    Topics(topics::TopicsArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    match cli.command {
        Commands::Ask(args) => ask::run(*args),
        Commands::Topics(args) => topics::run(args),
    }
}
