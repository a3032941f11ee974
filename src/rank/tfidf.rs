//! TF-IDF indexing and cosine-similarity scoring over question text.
//!
//! The index is built once per candidate pool and is read-only afterwards.
//! Documents and terms are addressed by dense ids; postings live in one flat
//! array grouped by term, so scoring a query touches only the postings of its
//! own terms.
//!
//! - TF = raw term count
//! - IDF = `ln((N + 1) / (df + 1)) + 1` (smoothed) or `ln(N / df)`
//! - Document norms are precomputed over the TF·IDF weights

use std::collections::HashMap;

use super::ordering::{top_k, RankKey};
use super::query::PreparedQuery;
use super::materialize_hits;
use crate::config::ParserConfig;
use crate::domain::{AnswerHit, Document};
use crate::text::{tokenize, Stopwords};

/// One `(document, raw term frequency)` entry of a term's postings list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posting {
    pub doc: u32,
    pub term_frequency: u32,
}

#[derive(Debug, Clone)]
pub struct TfidfIndex<'a> {
    documents: &'a [Document],
    /// term -> dense term id
    vocabulary: HashMap<String, u32>,
    /// term id -> term, in first-seen order
    terms: Vec<String>,
    /// term id -> IDF
    idf: Vec<f64>,
    /// Postings of term `t` are `postings[offsets[t]..offsets[t + 1]]`,
    /// ordered by ascending document id.
    postings: Vec<Posting>,
    offsets: Vec<usize>,
    /// document id -> L2 norm of its TF·IDF vector (0.0 = unmatchable)
    norms: Vec<f64>,
    l2_normalise: bool,
}

/// IDF for a term seen in `df` of `n` documents (`df >= 1`).
pub fn inverse_document_frequency(n: usize, df: usize, smoothing: bool) -> f64 {
    let n = n as f64;
    let df = df as f64;
    if smoothing {
        ((n + 1.0) / (df + 1.0)).ln() + 1.0
    } else {
        (n / df).ln()
    }
}

pub fn build_tfidf_index<'a>(
    documents: &'a [Document],
    stopwords: &Stopwords,
    config: &ParserConfig,
) -> TfidfIndex<'a> {
    let tfidf = config.tfidf();

    let mut vocabulary: HashMap<String, u32> = HashMap::new();
    let mut terms: Vec<String> = Vec::new();
    let mut document_frequency: Vec<usize> = Vec::new();
    // Per document: (term id, raw tf) in first-occurrence order.
    let mut document_terms: Vec<Vec<(u32, u32)>> = Vec::with_capacity(documents.len());

    for document in documents {
        let mut frequencies: Vec<(u32, u32)> = Vec::new();
        let mut slots: HashMap<u32, usize> = HashMap::new();
        for token in tokenize(&document.question_text, stopwords, config) {
            let term_id = match vocabulary.get(&token) {
                Some(&id) => id,
                None => {
                    let id = terms.len() as u32;
                    vocabulary.insert(token.clone(), id);
                    terms.push(token);
                    document_frequency.push(0);
                    id
                }
            };
            match slots.get(&term_id) {
                Some(&slot) => frequencies[slot].1 += 1,
                None => {
                    slots.insert(term_id, frequencies.len());
                    frequencies.push((term_id, 1));
                }
            }
        }
        for &(term_id, _) in &frequencies {
            document_frequency[term_id as usize] += 1;
        }
        document_terms.push(frequencies);
    }

    let n = documents.len();
    let idf: Vec<f64> = document_frequency
        .iter()
        .map(|&df| inverse_document_frequency(n, df, tfidf.idf_smoothing))
        .collect();

    let mut offsets = Vec::with_capacity(terms.len() + 1);
    offsets.push(0);
    for &df in &document_frequency {
        offsets.push(offsets[offsets.len() - 1] + df);
    }
    let mut cursor: Vec<usize> = offsets[..terms.len()].to_vec();
    let mut postings = vec![Posting { doc: 0, term_frequency: 0 }; offsets[terms.len()]];
    for (doc, frequencies) in document_terms.iter().enumerate() {
        for &(term_id, term_frequency) in frequencies {
            let at = &mut cursor[term_id as usize];
            postings[*at] = Posting { doc: doc as u32, term_frequency };
            *at += 1;
        }
    }

    let norms: Vec<f64> = document_terms
        .iter()
        .map(|frequencies| {
            let sum_of_squares: f64 = frequencies
                .iter()
                .map(|&(term_id, tf)| {
                    let weight = f64::from(tf) * idf[term_id as usize];
                    weight * weight
                })
                .sum();
            if sum_of_squares > 0.0 {
                sum_of_squares.sqrt()
            } else {
                0.0
            }
        })
        .collect();

    tracing::debug!(
        documents = n,
        vocabulary = terms.len(),
        postings = postings.len(),
        smoothing = tfidf.idf_smoothing,
        "built tf-idf index"
    );

    TfidfIndex {
        documents,
        vocabulary,
        terms,
        idf,
        postings,
        offsets,
        norms,
        l2_normalise: tfidf.l2_normalise,
    }
}

impl<'a> TfidfIndex<'a> {
    pub fn documents(&self) -> &'a [Document] {
        self.documents
    }

    pub fn vocabulary_size(&self) -> usize {
        self.terms.len()
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        self.term_id(term).map(|id| self.idf[id])
    }

    /// `(term, idf)` pairs in first-seen order.
    pub fn idf_entries(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.terms.iter().map(String::as_str).zip(self.idf.iter().copied())
    }

    pub fn postings(&self, term: &str) -> &[Posting] {
        match self.term_id(term) {
            Some(id) => self.postings_for(id),
            None => &[],
        }
    }

    pub fn document_norms(&self) -> &[f64] {
        &self.norms
    }

    fn term_id(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).map(|&id| id as usize)
    }

    fn postings_for(&self, term_id: usize) -> &[Posting] {
        &self.postings[self.offsets[term_id]..self.offsets[term_id + 1]]
    }

    /// Rank documents sharing at least one term with the query.
    ///
    /// Query terms unknown to the index are ignored; documents with a zero dot
    /// product or a zero norm never appear in the result.
    pub fn rank(&self, query: &PreparedQuery, k: usize) -> Vec<AnswerHit> {
        if query.is_empty() || self.documents.is_empty() {
            return Vec::new();
        }

        let mut weighted: Vec<(usize, f64)> = Vec::with_capacity(query.len());
        let mut sum_of_squares = 0.0_f64;
        for (term, tf) in query.terms() {
            if let Some(term_id) = self.term_id(term) {
                let weight = tf as f64 * self.idf[term_id];
                sum_of_squares += weight * weight;
                weighted.push((term_id, weight));
            }
        }
        let query_norm = if sum_of_squares > 0.0 { sum_of_squares.sqrt() } else { 0.0 };
        if query_norm == 0.0 {
            return Vec::new();
        }

        // document id -> (dot product, matched query terms)
        let mut accumulators: HashMap<u32, (f64, usize)> = HashMap::new();
        for &(term_id, query_weight) in &weighted {
            let idf = self.idf[term_id];
            for posting in self.postings_for(term_id) {
                let entry = accumulators.entry(posting.doc).or_insert((0.0, 0));
                entry.0 += query_weight * (f64::from(posting.term_frequency) * idf);
                entry.1 += 1;
            }
        }

        let scored: Vec<RankKey<'_>> = accumulators
            .into_iter()
            .filter_map(|(doc, (dot, overlap))| {
                let doc = doc as usize;
                let document_norm = self.norms[doc];
                if dot == 0.0 || document_norm == 0.0 {
                    return None;
                }
                let score =
                    if self.l2_normalise { dot / (document_norm * query_norm) } else { dot };
                let document = &self.documents[doc];
                Some(RankKey {
                    score,
                    overlap,
                    token_count: document.question_token_count,
                    guid: &document.guid,
                    doc,
                })
            })
            .collect();

        materialize_hits(self.documents, &top_k(scored, k))
    }
}

/// Normalise, tokenise and rank `query_text` by TF-IDF cosine similarity.
pub fn score_tfidf(
    query_text: &str,
    index: &TfidfIndex<'_>,
    stopwords: &Stopwords,
    config: &ParserConfig,
    k: usize,
) -> Vec<AnswerHit> {
    let query = PreparedQuery::new(query_text, stopwords, config);
    index.rank(&query, k)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AlgorithmsConfig, TfidfConfig};
    use crate::rank::test_support::{corpus, stopwords};

    fn stack_queue() -> Vec<Document> {
        corpus(&[
            ("a", "what is a stack data structure"),
            ("b", "what is a queue data structure"),
        ])
    }

    #[test]
    fn unique_term_outranks_shared_terms() {
        let docs = stack_queue();
        let config = ParserConfig::default();
        let index = build_tfidf_index(&docs, &stopwords(), &config);

        assert!(index.idf("stack").expect("stack") > index.idf("data").expect("data"));

        let hits = score_tfidf("stack data structure", &index, &stopwords(), &config, 2);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].guid, "a");
        assert!(hits[0].score > hits[1].score);
    }

    #[test]
    fn documents_without_shared_terms_are_excluded() {
        let docs = stack_queue();
        let config = ParserConfig::default();
        let index = build_tfidf_index(&docs, &stopwords(), &config);

        let hits = score_tfidf("stack", &index, &stopwords(), &config, 5);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].guid, "a");
    }

    #[test]
    fn postings_follow_document_order_with_raw_counts() {
        let docs = corpus(&[("a", "tree tree node"), ("b", "node"), ("c", "tree")]);
        let index = build_tfidf_index(&docs, &stopwords(), &ParserConfig::default());

        assert_eq!(
            index.postings("tree"),
            &[Posting { doc: 0, term_frequency: 2 }, Posting { doc: 2, term_frequency: 1 }]
        );
        assert_eq!(index.postings("node").len(), 2);
        assert!(index.postings("graph").is_empty());
        assert_eq!(index.vocabulary_size(), 2);
    }

    #[test]
    fn smoothed_idf_and_norms_match_hand_computation() {
        let docs = corpus(&[("a", "tree tree node"), ("b", "node")]);
        let index = build_tfidf_index(&docs, &stopwords(), &ParserConfig::default());

        let idf_tree = (3.0_f64 / 2.0).ln() + 1.0;
        let idf_node = 1.0;
        assert_eq!(index.idf("tree"), Some(idf_tree));
        assert_eq!(index.idf("node"), Some(idf_node));

        let expected = ((2.0 * idf_tree).powi(2) + idf_node * idf_node).sqrt();
        assert!((index.document_norms()[0] - expected).abs() < 1e-12);
        assert_eq!(index.document_norms()[1], 1.0);
    }

    #[test]
    fn unsmoothed_idf_zeroes_ubiquitous_terms() {
        let docs = stack_queue();
        let config = ParserConfig {
            algorithms: AlgorithmsConfig {
                tfidf: TfidfConfig { idf_smoothing: false, ..TfidfConfig::default() },
            },
            ..ParserConfig::default()
        };
        let index = build_tfidf_index(&docs, &stopwords(), &config);
        assert_eq!(index.idf("data"), Some(0.0));
        assert_eq!(index.idf("stack"), Some(2.0_f64.ln()));

        assert!(score_tfidf("data structure", &index, &stopwords(), &config, 3).is_empty());
        let hits = score_tfidf("queue data", &index, &stopwords(), &config, 3);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].guid, "b");
    }

    #[test]
    fn zero_norm_documents_are_never_matched() {
        let docs = corpus(&[("a", "what is a"), ("b", "stack")]);
        let config = ParserConfig::default();
        let index = build_tfidf_index(&docs, &stopwords(), &config);
        assert_eq!(index.document_norms()[0], 0.0);
        let hits = score_tfidf("stack", &index, &stopwords(), &config, 5);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].guid, "b");
    }

    #[test]
    fn unknown_and_empty_queries_return_nothing() {
        let docs = stack_queue();
        let config = ParserConfig::default();
        let index = build_tfidf_index(&docs, &stopwords(), &config);
        assert!(score_tfidf("graph", &index, &stopwords(), &config, 3).is_empty());
        assert!(score_tfidf("a", &index, &stopwords(), &config, 3).is_empty());
        assert!(score_tfidf("", &index, &stopwords(), &config, 3).is_empty());
    }

    #[test]
    fn raw_dot_product_when_l2_normalisation_is_off() {
        let docs = corpus(&[("a", "tree tree"), ("b", "tree node")]);
        let config = ParserConfig {
            algorithms: AlgorithmsConfig {
                tfidf: TfidfConfig { l2_normalise: false, ..TfidfConfig::default() },
            },
            ..ParserConfig::default()
        };
        let index = build_tfidf_index(&docs, &stopwords(), &config);
        let hits = score_tfidf("tree", &index, &stopwords(), &config, 2);
        // idf(tree) = 1.0 since it appears everywhere
        assert_eq!(hits[0].guid, "a");
        assert_eq!(hits[0].score, 2.0);
        assert_eq!(hits[1].score, 1.0);
    }

    #[test]
    fn identical_question_scores_one() {
        let docs = corpus(&[("a", "binary search tree"), ("b", "hash map")]);
        let config = ParserConfig::default();
        let index = build_tfidf_index(&docs, &stopwords(), &config);
        let hits = score_tfidf("Binary search TREE", &index, &stopwords(), &config, 1);
        assert!((hits[0].score - 1.0).abs() < 1e-12);
    }
}
