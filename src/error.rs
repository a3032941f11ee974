//! Error types for the loading collaborators around the retrieval engine.
//!
//! The engine itself (normalisation, tokenisation, scoring) is total and never
//! fails; everything here is raised before an index is ever built.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Parser config not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: Box<figment::Error>,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Stopwords file not found: {0}")]
    StopwordsNotFound(PathBuf),

    #[error("Failed to read stopwords at {path}: {source}")]
    StopwordsRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("Data path not found: {0}")]
    DataPathNotFound(PathBuf),

    #[error("Failed to walk data directory {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

#[derive(Debug, Error)]
pub enum TopicError {
    #[error("Topic cannot be empty; provide a valid deck path.")]
    Empty,

    #[error("Topic not found: '{requested}'. Provide one of: {known}")]
    Unknown { requested: String, known: String },
}
