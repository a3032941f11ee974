//! Normalisation and tokenisation shared by documents and queries.

pub mod normalize;
pub mod tokenize;

pub use normalize::{normalize_for_display, normalize_for_matching};
pub use tokenize::{tokenize, tokenize_to_set, Stopwords};
