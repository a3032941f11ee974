//! rulebot: answer questions from flashcard deck exports
//!
//! This library loads question/answer cards from tab-separated deck exports,
//! narrows them to a topic subtree, and ranks them against a free-text query
//! by keyword overlap or TF-IDF cosine similarity.

pub mod bench_log;
pub mod cli;
pub mod config;
pub mod deck;
pub mod domain;
pub mod error;
pub mod rank;
pub mod text;
pub mod topics;
pub mod utils;
