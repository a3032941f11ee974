//! Ranking properties checked across generated corpora and queries.

use std::collections::HashSet;

use proptest::prelude::*;
use rulebot::config::{AlgorithmsConfig, ParserConfig, TfidfConfig};
use rulebot::deck::build_document;
use rulebot::domain::{AnswerHit, Document};
use rulebot::rank::tfidf::inverse_document_frequency;
use rulebot::rank::{build_tfidf_index, Algorithm, Retriever};
use rulebot::text::{normalize_for_matching, tokenize_to_set, Stopwords};

const VOCABULARY: &[&str] = &[
    "stack", "queue", "heap", "tree", "graph", "hash", "sort", "what", "is", "a", "x", "42",
];

fn stopwords() -> Stopwords {
    Stopwords::from_words(["what", "is", "a"])
}

fn corpus(questions: &[String]) -> Vec<Document> {
    let config = ParserConfig::default();
    questions
        .iter()
        .enumerate()
        .map(|(i, question)| {
            build_document(
                &format!("d{i:02}"),
                vec!["Deck".to_string()],
                question,
                "answer",
                "",
                &stopwords(),
                &config,
            )
        })
        .collect()
}

fn sentence() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(VOCABULARY), 0..7).prop_map(|words| words.join(" "))
}

/// Distinct query tokens found in the document's question.
fn overlap(query: &str, document: &Document, config: &ParserConfig) -> usize {
    let query_tokens =
        tokenize_to_set(&normalize_for_matching(query, config), &stopwords(), config);
    let doc_tokens = tokenize_to_set(&document.question_text, &stopwords(), config);
    query_tokens.intersection(&doc_tokens).count()
}

fn assert_tie_break_order(hits: &[AnswerHit], documents: &[Document], query: &str) {
    let config = ParserConfig::default();
    let lookup = |guid: &str| {
        documents.iter().find(|d| d.guid == guid).expect("hit refers to a pool document")
    };
    for pair in hits.windows(2) {
        let (a, b) = (lookup(&pair[0].guid), lookup(&pair[1].guid));
        let key_a = (
            std::cmp::Reverse(overlap(query, a, &config)),
            a.question_token_count,
            a.guid.as_str(),
        );
        let key_b = (
            std::cmp::Reverse(overlap(query, b, &config)),
            b.question_token_count,
            b.guid.as_str(),
        );
        assert!(
            pair[0].score > pair[1].score || (pair[0].score == pair[1].score && key_a < key_b),
            "{:?} before {:?}",
            pair[0],
            pair[1]
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn hits_are_bounded_and_ordered(
        questions in prop::collection::vec(sentence(), 0..12),
        query in sentence(),
        k in 0usize..6
    ) {
        let docs = corpus(&questions);
        let config = ParserConfig::default();
        for algorithm in [Algorithm::Keyword, Algorithm::Tfidf] {
            let retriever = Retriever::build(algorithm, &docs, &stopwords(), &config);
            let hits = retriever.search(&query, &stopwords(), &config, k);
            prop_assert!(hits.len() <= k.max(1));
            let guids: HashSet<&str> = hits.iter().map(|h| h.guid.as_str()).collect();
            prop_assert_eq!(guids.len(), hits.len());
            assert_tie_break_order(&hits, &docs, &query);
        }
    }

    #[test]
    fn repeating_query_tokens_keeps_keyword_scores(
        questions in prop::collection::vec(sentence(), 1..10),
        query in sentence()
    ) {
        let docs = corpus(&questions);
        let config = ParserConfig::default();
        let retriever = Retriever::build(Algorithm::Keyword, &docs, &stopwords(), &config);
        let doubled = format!("{query} {query}");
        let once = retriever.search(&query, &stopwords(), &config, docs.len());
        let twice = retriever.search(&doubled, &stopwords(), &config, docs.len());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn keyword_fills_k_and_tfidf_drops_non_matching(
        questions in prop::collection::vec(sentence(), 1..10),
        query in sentence(),
        k in 1usize..12
    ) {
        let docs = corpus(&questions);
        let config = ParserConfig::default();

        let keyword = Retriever::build(Algorithm::Keyword, &docs, &stopwords(), &config)
            .search(&query, &stopwords(), &config, k);
        let query_tokens =
            tokenize_to_set(&normalize_for_matching(&query, &config), &stopwords(), &config);
        if query_tokens.is_empty() {
            prop_assert!(keyword.is_empty());
        } else {
            prop_assert_eq!(keyword.len(), k.min(docs.len()));
        }

        let tfidf = Retriever::build(Algorithm::Tfidf, &docs, &stopwords(), &config)
            .search(&query, &stopwords(), &config, k);
        for hit in &tfidf {
            let doc = docs.iter().find(|d| d.guid == hit.guid).expect("pool document");
            prop_assert!(overlap(&query, doc, &config) > 0);
            prop_assert!(hit.score > 0.0);
            prop_assert!(hit.score <= 1.0 + 1e-12);
        }
    }

    #[test]
    fn rebuilding_is_bit_for_bit_reproducible(
        questions in prop::collection::vec(sentence(), 0..12),
        query in sentence()
    ) {
        let docs = corpus(&questions);
        let config = ParserConfig::default();
        let first = build_tfidf_index(&docs, &stopwords(), &config);
        let second = build_tfidf_index(&docs, &stopwords(), &config);

        let bits = |values: &[f64]| values.iter().map(|v| v.to_bits()).collect::<Vec<_>>();
        prop_assert_eq!(bits(first.document_norms()), bits(second.document_norms()));
        let idf_first: Vec<(String, u64)> =
            first.idf_entries().map(|(t, v)| (t.to_string(), v.to_bits())).collect();
        let idf_second: Vec<(String, u64)> =
            second.idf_entries().map(|(t, v)| (t.to_string(), v.to_bits())).collect();
        prop_assert_eq!(idf_first, idf_second);

        let a = first.rank(&rulebot::rank::PreparedQuery::new(&query, &stopwords(), &config), 5);
        let b = second.rank(&rulebot::rank::PreparedQuery::new(&query, &stopwords(), &config), 5);
        let score_bits = |hits: &[AnswerHit]| {
            hits.iter().map(|h| (h.guid.clone(), h.score.to_bits())).collect::<Vec<_>>()
        };
        prop_assert_eq!(score_bits(&a), score_bits(&b));
    }

    #[test]
    fn smoothed_idf_strictly_decreases_with_document_frequency(n in 1usize..500) {
        for df in 1..n {
            let here = inverse_document_frequency(n, df, true);
            let next = inverse_document_frequency(n, df + 1, true);
            prop_assert!(here > next);
        }
        prop_assert!(inverse_document_frequency(n, n, true) > 0.0);
    }
}

#[test]
fn keyword_scenario_stack_data_structure() {
    let docs = corpus(&[
        "what is a stack data structure".to_string(),
        "what is a queue data structure".to_string(),
    ]);
    let config = ParserConfig::default();
    let retriever = Retriever::build(Algorithm::Keyword, &docs, &stopwords(), &config);
    let hits = retriever.search("stack data structure", &stopwords(), &config, 1);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].guid, "d00");
    assert_eq!(hits[0].score, 3.0);
}

#[test]
fn tfidf_scenario_unique_term_wins() {
    let docs = corpus(&[
        "what is a stack data structure".to_string(),
        "what is a queue data structure".to_string(),
    ]);
    let config = ParserConfig::default();
    let index = build_tfidf_index(&docs, &stopwords(), &config);
    assert!(index.idf("stack") > index.idf("data"));

    let retriever = Retriever::Tfidf(index);
    let hits = retriever.search("stack", &stopwords(), &config, 2);
    assert_eq!(hits[0].guid, "d00");
    assert!(hits.iter().all(|hit| hit.guid != "d01"));
}

#[test]
fn tfidf_cosine_stays_in_unit_interval_on_three_documents() {
    let docs = corpus(&[
        "stack stack heap".to_string(),
        "heap tree".to_string(),
        "tree graph stack".to_string(),
    ]);
    for smoothing in [true, false] {
        let config = ParserConfig {
            algorithms: AlgorithmsConfig {
                tfidf: TfidfConfig { idf_smoothing: smoothing, ..TfidfConfig::default() },
            },
            ..ParserConfig::default()
        };
        let retriever = Retriever::build(Algorithm::Tfidf, &docs, &stopwords(), &config);
        for query in ["stack", "heap tree", "stack graph tree heap", "stack stack heap"] {
            for hit in retriever.search(query, &stopwords(), &config, 3) {
                assert!((0.0..=1.0 + 1e-12).contains(&hit.score), "{query}: {hit:?}");
            }
        }
    }
}
