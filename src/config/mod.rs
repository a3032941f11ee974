//! Parser configuration loading
//!
//! `Parser.json` controls normalisation, tokenisation, topic handling and the
//! TF-IDF variant. Values are layered with figment: built-in defaults, then the
//! JSON file, then `RULEBOT_*` environment variables (nested keys split on `__`,
//! e.g. `RULEBOT_TOKENISATION__MIN_TOKEN_LENGTH=3`).

use figment::providers::{Env, Format, Json, Serialized};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::text::Stopwords;

mod merge;

pub use merge::{merge_cli_with_config, CliOverrides};

/// Default location of the parser config, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "Data/Configs/Parser.json";

/// Default location of the deck exports, relative to the working directory.
pub const DEFAULT_DATA_PATH: &str = "Data/Decks";

const ENV_PREFIX: &str = "RULEBOT_";

/// Tokeniser settings (`tokenisation` section).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenisationConfig {
    /// Always on in practice: the tokeniser splits on every non-alphanumeric character.
    pub split_on_non_alnum: bool,
    pub keep_digits: bool,
    pub min_token_length: usize,
    pub remove_stopwords: bool,
    pub stopwords_path: PathBuf,
}

impl Default for TokenisationConfig {
    fn default() -> Self {
        Self {
            split_on_non_alnum: true,
            keep_digits: true,
            min_token_length: 2,
            remove_stopwords: true,
            stopwords_path: PathBuf::from("Data/Configs/Stopwords"),
        }
    }
}

/// Topic selection settings (`topic` section).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicConfig {
    pub separator: String,
    pub include_subtree: bool,
}

impl Default for TopicConfig {
    fn default() -> Self {
        Self { separator: "::".to_string(), include_subtree: true }
    }
}

/// TF-IDF settings (`algorithms.tfidf` section).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TfidfConfig {
    /// `ln((N + 1) / (df + 1)) + 1` when set, `ln(N / df)` otherwise
    pub idf_smoothing: bool,
    /// Human-readable formula, carried for logs only
    pub idf_formula: String,
    /// Divide the dot product by both vector norms (cosine similarity)
    pub l2_normalise: bool,
}

impl Default for TfidfConfig {
    fn default() -> Self {
        Self {
            idf_smoothing: true,
            idf_formula: "log((N + 1) / (df + 1)) + 1".to_string(),
            l2_normalise: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlgorithmsConfig {
    pub tfidf: TfidfConfig,
}

/// The full configuration bundle passed explicitly to every engine call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub lowercase_for_matching: bool,
    pub strip_html_for_matching: bool,
    pub escape_html_for_display: bool,
    pub decode_html_entities: bool,
    pub trim_whitespace: bool,
    pub tokenisation: TokenisationConfig,
    pub topic: TopicConfig,
    pub algorithms: AlgorithmsConfig,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            lowercase_for_matching: true,
            strip_html_for_matching: true,
            escape_html_for_display: true,
            decode_html_entities: true,
            trim_whitespace: true,
            tokenisation: TokenisationConfig::default(),
            topic: TopicConfig::default(),
            algorithms: AlgorithmsConfig::default(),
        }
    }
}

impl ParserConfig {
    pub fn tfidf(&self) -> &TfidfConfig {
        &self.algorithms.tfidf
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tokenisation.min_token_length < 1 {
            return Err(ConfigError::Invalid(format!(
                "min_token_length must be a positive integer, got {}",
                self.tokenisation.min_token_length
            )));
        }
        if self.tokenisation.remove_stopwords
            && self.tokenisation.stopwords_path.as_os_str().is_empty()
        {
            return Err(ConfigError::Invalid(
                "stopwords_path is required when remove_stopwords=true".to_string(),
            ));
        }
        if self.topic.separator.is_empty() {
            return Err(ConfigError::Invalid(
                "topic.separator must be a non-empty string".to_string(),
            ));
        }
        if self.algorithms.tfidf.idf_formula.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "algorithms.tfidf.idf_formula must be a non-empty string".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load `Parser.json`, layer environment overrides, validate, and resolve the
/// stopwords path against the config file's directory.
pub fn load_config(path: &Path) -> Result<ParserConfig, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut config: ParserConfig = Figment::from(Serialized::defaults(ParserConfig::default()))
        .merge(Json::string(&raw))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source: Box::new(source),
        })?;

    config.validate()?;
    config.tokenisation.stopwords_path =
        resolve_stopwords_path(path, &config.tokenisation.stopwords_path);

    tracing::debug!(
        config = %path.display(),
        stopwords = %config.tokenisation.stopwords_path.display(),
        idf_formula = %config.algorithms.tfidf.idf_formula,
        "loaded parser config"
    );
    Ok(config)
}

/// Relative stopword paths point at a file next to the config (only the final
/// component is kept, so `Data/Configs/Stopwords` works from the repo root).
fn resolve_stopwords_path(config_path: &Path, stopwords_path: &Path) -> PathBuf {
    if stopwords_path.is_absolute() {
        return stopwords_path.to_path_buf();
    }
    let base = config_path.parent().unwrap_or_else(|| Path::new(""));
    match stopwords_path.file_name() {
        Some(name) => base.join(name),
        None => base.join(stopwords_path),
    }
}

/// Read stopwords: one per line, case-folded, `#` starts a comment line.
pub fn load_stopwords(path: &Path) -> Result<Stopwords, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::StopwordsNotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::StopwordsRead {
        path: path.to_path_buf(),
        source,
    })?;
    let stopwords = Stopwords::from_words(
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#')),
    );
    tracing::debug!(count = stopwords.len(), path = %path.display(), "loaded stopwords");
    Ok(stopwords)
}

/// Stopwords for a config: loaded when removal is enabled, empty otherwise.
pub fn stopwords_for(config: &ParserConfig) -> Result<Stopwords, ConfigError> {
    if config.tokenisation.remove_stopwords {
        load_stopwords(&config.tokenisation.stopwords_path)
    } else {
        Ok(Stopwords::default())
    }
}
