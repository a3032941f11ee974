//! Topics command implementation

use anyhow::Result;
use clap::Args;

use super::corpus::{load_corpus, SourceArgs};
use crate::config::CliOverrides;
use crate::domain::topic_path_to_string;
use crate::topics::TopicTree;

#[derive(Args)]
pub struct TopicsArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

pub fn run(args: TopicsArgs) -> Result<()> {
    let corpus = load_corpus(&args.source, CliOverrides::default(), None)?;
    let summary = TopicTree::build(&corpus.documents).summary();

    println!("{} topics across {} cards.", summary.len(), corpus.documents.len());
    for node in summary {
        println!(
            "{}  cards={}  subtree={}",
            topic_path_to_string(&node.path),
            node.direct,
            node.subtree
        );
    }
    if !corpus.invalid.is_empty() {
        println!("Skipped {} invalid records.", corpus.invalid.len());
    }
    Ok(())
}
