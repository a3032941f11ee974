//! Answer ranking over a candidate pool
//!
//! Two interchangeable scorers share one preprocessing path and one tie-break
//! ordering:
//! - [`keyword`]: distinct-token overlap
//! - [`tfidf`]: TF-IDF cosine similarity over an inverted index

use clap::ValueEnum;

use crate::config::ParserConfig;
use crate::domain::{short_preview, AnswerHit, Document, MAX_PREVIEW_CHARS};
use crate::text::Stopwords;

pub mod keyword;
pub mod ordering;
pub mod query;
pub mod tfidf;

pub use keyword::{prepare_keyword_index, score_keyword_overlap, KeywordIndex};
pub use ordering::{clamp_k, top_k, RankKey};
pub use query::PreparedQuery;
pub use tfidf::{build_tfidf_index, score_tfidf, TfidfIndex};

/// Retrieval algorithm selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Algorithm {
    Keyword,
    Tfidf,
}

impl Algorithm {
    /// Name used in the benchmark log.
    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::Keyword => "keyword",
            Algorithm::Tfidf => "tfidf",
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An index over one candidate pool, built once and queried many times.
#[derive(Debug, Clone)]
pub enum Retriever<'a> {
    Keyword(KeywordIndex<'a>),
    Tfidf(TfidfIndex<'a>),
}

impl<'a> Retriever<'a> {
    pub fn build(
        algorithm: Algorithm,
        documents: &'a [Document],
        stopwords: &Stopwords,
        config: &ParserConfig,
    ) -> Self {
        match algorithm {
            Algorithm::Keyword => {
                Retriever::Keyword(prepare_keyword_index(documents, stopwords, config))
            }
            Algorithm::Tfidf => Retriever::Tfidf(build_tfidf_index(documents, stopwords, config)),
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        match self {
            Retriever::Keyword(_) => Algorithm::Keyword,
            Retriever::Tfidf(_) => Algorithm::Tfidf,
        }
    }

    pub fn documents(&self) -> &'a [Document] {
        match self {
            Retriever::Keyword(index) => index.documents(),
            Retriever::Tfidf(index) => index.documents(),
        }
    }

    pub fn prepare_query(
        &self,
        query_text: &str,
        stopwords: &Stopwords,
        config: &ParserConfig,
    ) -> PreparedQuery {
        PreparedQuery::new(query_text, stopwords, config)
    }

    pub fn rank(&self, query: &PreparedQuery, k: usize) -> Vec<AnswerHit> {
        match self {
            Retriever::Keyword(index) => index.rank(query, k),
            Retriever::Tfidf(index) => index.rank(query, k),
        }
    }

    /// One-shot preprocessing and ranking.
    pub fn search(
        &self,
        query_text: &str,
        stopwords: &Stopwords,
        config: &ParserConfig,
        k: usize,
    ) -> Vec<AnswerHit> {
        let query = self.prepare_query(query_text, stopwords, config);
        self.rank(&query, k)
    }
}

/// Turn ranked keys into hits carrying topic and question preview.
pub(crate) fn materialize_hits(documents: &[Document], keys: &[RankKey<'_>]) -> Vec<AnswerHit> {
    keys.iter()
        .map(|key| {
            let document = &documents[key.doc];
            AnswerHit {
                guid: document.guid.clone(),
                score: key.score,
                topic_path: document.topic_path.clone(),
                preview: short_preview(&document.question_text, MAX_PREVIEW_CHARS),
            }
        })
        .collect()
}
