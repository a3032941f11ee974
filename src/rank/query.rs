//! Query preprocessing shared by both scorers.

use std::collections::HashMap;

use crate::config::ParserConfig;
use crate::text::{normalize_for_matching, tokenize, Stopwords};

/// A normalised, tokenised query: each distinct term with its raw frequency,
/// in order of first occurrence.
///
/// The order is fixed so every floating-point sum over query terms is
/// reproducible from run to run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreparedQuery {
    terms: Vec<(String, usize)>,
}

impl PreparedQuery {
    pub fn new(query_text: &str, stopwords: &Stopwords, config: &ParserConfig) -> Self {
        let normalized = normalize_for_matching(query_text, config);
        Self::from_tokens(tokenize(&normalized, stopwords, config))
    }

    pub fn from_tokens<I: IntoIterator<Item = String>>(tokens: I) -> Self {
        let mut terms: Vec<(String, usize)> = Vec::new();
        let mut slots: HashMap<String, usize> = HashMap::new();
        for token in tokens {
            match slots.get(&token) {
                Some(&slot) => terms[slot].1 += 1,
                None => {
                    slots.insert(token.clone(), terms.len());
                    terms.push((token, 1));
                }
            }
        }
        Self { terms }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// `(term, raw frequency)` pairs in first-occurrence order.
    pub fn terms(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.terms.iter().map(|(term, tf)| (term.as_str(), *tf))
    }
}
