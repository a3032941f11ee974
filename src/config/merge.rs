//! CLI argument merging with config

use super::ParserConfig;

#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub include_subtree: Option<bool>,
    pub idf_smoothing: Option<bool>,
    pub l2_normalise: Option<bool>,
    pub min_token_length: Option<usize>,
    pub remove_stopwords: Option<bool>,
}

pub fn merge_cli_with_config(mut base_config: ParserConfig, cli: CliOverrides) -> ParserConfig {
    if let Some(include_subtree) = cli.include_subtree {
        base_config.topic.include_subtree = include_subtree;
    }

    if let Some(idf_smoothing) = cli.idf_smoothing {
        base_config.algorithms.tfidf.idf_smoothing = idf_smoothing;
    }
    if let Some(l2_normalise) = cli.l2_normalise {
        base_config.algorithms.tfidf.l2_normalise = l2_normalise;
    }

    if let Some(min_token_length) = cli.min_token_length {
        base_config.tokenisation.min_token_length = min_token_length;
    }
    if let Some(remove_stopwords) = cli.remove_stopwords {
        base_config.tokenisation.remove_stopwords = remove_stopwords;
    }

    base_config
}
