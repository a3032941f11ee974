//! Alphanumeric tokeniser with stopword, length and digit rules.

use std::collections::HashSet;

use crate::config::ParserConfig;

/// Lowercased stopwords, passed explicitly to every tokeniser call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stopwords {
    words: HashSet<String>,
}

impl Stopwords {
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self { words: words.into_iter().map(|w| w.as_ref().trim().to_lowercase()).collect() }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Split already-normalised text into tokens, in order of appearance.
///
/// No case folding happens here; callers run matching normalisation first.
pub fn tokenize(text: &str, stopwords: &Stopwords, config: &ParserConfig) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut buffer = String::new();
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            buffer.push(ch);
        } else if !buffer.is_empty() {
            flush_token(&mut buffer, stopwords, config, &mut tokens);
        }
    }
    if !buffer.is_empty() {
        flush_token(&mut buffer, stopwords, config, &mut tokens);
    }
    tokens
}

/// Distinct tokens, for overlap scoring.
pub fn tokenize_to_set(
    text: &str,
    stopwords: &Stopwords,
    config: &ParserConfig,
) -> HashSet<String> {
    tokenize(text, stopwords, config).into_iter().collect()
}

fn flush_token(
    buffer: &mut String,
    stopwords: &Stopwords,
    config: &ParserConfig,
    out: &mut Vec<String>,
) {
    let token = std::mem::take(buffer);
    let rules = &config.tokenisation;

    if rules.remove_stopwords && stopwords.contains(&token) {
        return;
    }
    if rules.keep_digits && token.chars().all(|c| c.is_ascii_digit()) {
        out.push(token);
        return;
    }
    if token.chars().count() >= rules.min_token_length {
        out.push(token);
    }
}
