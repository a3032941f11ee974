//! rulebot: a rule-based question answering bot over flashcard decks
//!
//! Loads deck exports, picks a topic, and returns the best-matching cards for
//! a query using keyword overlap or TF-IDF retrieval.

use anyhow::Result;

fn main() -> Result<()> {
    rulebot::cli::run()
}
