//! Keyword-overlap scoring: count of distinct query tokens found in a question.

use std::collections::HashSet;

use super::ordering::{top_k, RankKey};
use super::query::PreparedQuery;
use super::materialize_hits;
use crate::config::ParserConfig;
use crate::domain::{AnswerHit, Document};
use crate::text::{tokenize_to_set, Stopwords};

/// Cached token set of one candidate question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedQuestion {
    /// Position of the document in the candidate pool
    pub doc: usize,
    pub guid: String,
    pub token_set: HashSet<String>,
    /// Size of `token_set`
    pub non_stopword_count: usize,
    pub question_token_count: usize,
}

/// Prepared keyword cache over one candidate pool, reused across queries.
#[derive(Debug, Clone)]
pub struct KeywordIndex<'a> {
    documents: &'a [Document],
    prepared: Vec<PreparedQuestion>,
}

pub fn prepare_keyword_index<'a>(
    documents: &'a [Document],
    stopwords: &Stopwords,
    config: &ParserConfig,
) -> KeywordIndex<'a> {
    let prepared = documents
        .iter()
        .enumerate()
        .map(|(doc, document)| {
            let token_set = tokenize_to_set(&document.question_text, stopwords, config);
            PreparedQuestion {
                doc,
                guid: document.guid.clone(),
                non_stopword_count: token_set.len(),
                token_set,
                question_token_count: document.question_token_count,
            }
        })
        .collect::<Vec<_>>();

    tracing::debug!(documents = prepared.len(), "prepared keyword index");
    KeywordIndex { documents, prepared }
}

impl<'a> KeywordIndex<'a> {
    pub fn documents(&self) -> &'a [Document] {
        self.documents
    }

    pub fn prepared(&self) -> &[PreparedQuestion] {
        &self.prepared
    }

    pub fn len(&self) -> usize {
        self.prepared.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prepared.is_empty()
    }

    /// Rank every prepared question against an already-tokenised query.
    ///
    /// Zero-overlap questions stay in the ranking so a non-empty query always
    /// yields `min(k, pool)` hits.
    pub fn rank(&self, query: &PreparedQuery, k: usize) -> Vec<AnswerHit> {
        if query.is_empty() || self.prepared.is_empty() {
            return Vec::new();
        }

        let scored: Vec<RankKey<'_>> = self
            .prepared
            .iter()
            .map(|prepared| {
                let overlap =
                    query.terms().filter(|(term, _)| prepared.token_set.contains(*term)).count();
                RankKey {
                    score: overlap as f64,
                    overlap,
                    token_count: prepared.question_token_count,
                    guid: &prepared.guid,
                    doc: prepared.doc,
                }
            })
            .collect();

        materialize_hits(self.documents, &top_k(scored, k))
    }
}

/// Normalise, tokenise and rank `query_text` by keyword overlap.
pub fn score_keyword_overlap(
    query_text: &str,
    index: &KeywordIndex<'_>,
    stopwords: &Stopwords,
    config: &ParserConfig,
    k: usize,
) -> Vec<AnswerHit> {
    let query = PreparedQuery::new(query_text, stopwords, config);
    index.rank(&query, k)
}
