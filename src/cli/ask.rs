//! Ask command implementation

use anyhow::{anyhow, Context, Result};
use clap::Args;
use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use super::corpus::{load_corpus, SourceArgs};
use crate::bench_log::{log_benchmark, QueryRun};
use crate::config::{CliOverrides, ParserConfig};
use crate::domain::{topic_path_to_string, AnswerHit, Document, StageTimings};
use crate::rank::{Algorithm, Retriever};
use crate::text::{normalize_for_display, Stopwords};
use crate::topics::{candidates, TopicTree};
use crate::utils::{timed, Stopwatch};

const ALL_TOPICS_LABEL: &str = "<ALL>";
const WARMUP_QUERY: &str = "warmup";
const EXIT_COMMAND: &str = "exit";

#[derive(Args)]
pub struct AskArgs {
    /// Retrieval algorithm
    #[arg(long, value_enum, value_name = "ALGO")]
    pub algo: Algorithm,

    /// Answer a single query and exit
    #[arg(long, value_name = "TEXT", required_unless_present = "interactive")]
    pub query: Option<String>,

    /// Read queries from stdin until `exit` or end of input
    #[arg(long, conflicts_with = "query")]
    pub interactive: bool,

    /// Deck path to search under (e.g. "Computing::Unit 03"); all cards when omitted
    #[arg(long, value_name = "TOPIC")]
    pub topic: Option<String>,

    /// Number of answers to return (values below 1 mean 1)
    #[arg(long, value_name = "COUNT", default_value_t = 1)]
    pub k: usize,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Append one JSON benchmark record per query to this file
    #[arg(long, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// Append rejected deck lines to this file
    #[arg(long, value_name = "FILE", default_value = "Logs/errors-rust.log")]
    pub invalid_log: PathBuf,

    /// Untimed runs of a fixed query before each timed query
    #[arg(long, value_name = "COUNT", default_value_t = 0)]
    pub warmup: usize,

    /// Override `topic.include_subtree` from the config
    #[arg(long, value_name = "BOOL")]
    pub include_subtree: Option<bool>,

    /// Also print `-> <guid>  score=<score>` for every hit
    #[arg(long)]
    pub show_cards: bool,

    /// Query id written to the benchmark log
    #[arg(long, value_name = "ID", default_value = "ad-hoc")]
    pub query_id: String,

    /// Use the unsmoothed IDF formula `ln(N / df)`
    #[arg(long)]
    pub no_idf_smoothing: bool,

    /// Score TF-IDF by raw dot product instead of cosine similarity
    #[arg(long)]
    pub no_l2_normalise: bool,

    /// Override `tokenisation.min_token_length` from the config
    #[arg(long, value_name = "N")]
    pub min_token_length: Option<usize>,

    /// Keep stopwords in both documents and queries
    #[arg(long)]
    pub keep_stopwords: bool,
}

impl AskArgs {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            include_subtree: self.include_subtree,
            idf_smoothing: self.no_idf_smoothing.then_some(false),
            l2_normalise: self.no_l2_normalise.then_some(false),
            min_token_length: self.min_token_length,
            remove_stopwords: self.keep_stopwords.then_some(false),
        }
    }
}

/// Per-run state shared by every query of one invocation.
struct Session<'a> {
    args: &'a AskArgs,
    config: &'a ParserConfig,
    stopwords: &'a Stopwords,
    retriever: Retriever<'a>,
    by_guid: HashMap<&'a str, &'a Document>,
    topic_label: &'a str,
    parse_ms: f64,
    index_ms: f64,
}

pub fn run(args: AskArgs) -> Result<()> {
    let corpus = load_corpus(&args.source, args.overrides(), Some(&args.invalid_log))?;
    let config = &corpus.config;
    let total = corpus.documents.len();

    let (pool, topic_label) = match args.topic.as_deref() {
        Some(topic) => {
            let tree = TopicTree::build(&corpus.documents);
            let root = tree.resolve(topic, &config.topic.separator)?;
            let pool = candidates(&corpus.documents, &root, config.topic.include_subtree);
            if pool.is_empty() {
                anyhow::bail!("No candidate cards found for the requested topic.");
            }
            (pool, topic.to_string())
        }
        None => (corpus.documents, ALL_TOPICS_LABEL.to_string()),
    };

    println!("Loaded {total} cards; {} candidates in topic '{topic_label}'.", pool.len());

    let (retriever, index_ms) =
        timed(|| Retriever::build(args.algo, &pool, &corpus.stopwords, config));
    tracing::debug!(algo = %args.algo, pool = pool.len(), index_ms, "built retriever");

    let session = Session {
        args: &args,
        config,
        stopwords: &corpus.stopwords,
        retriever,
        by_guid: pool.iter().map(|document| (document.guid.as_str(), document)).collect(),
        topic_label: &topic_label,
        parse_ms: corpus.parse_ms,
        index_ms,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.interactive {
        session.interactive(io::stdin().lock(), &mut out)?;
    } else if let Some(query) = args.query.as_deref() {
        session.answer(query, &mut out)?;
    }

    writeln!(
        out,
        "Parse build: {:.3} ms   Index build: {:.3} ms",
        session.parse_ms, session.index_ms
    )?;
    Ok(())
}

impl Session<'_> {
    fn interactive(&self, input: impl BufRead, out: &mut impl Write) -> Result<()> {
        writeln!(out, "Interactive mode. Type a question, or '{EXIT_COMMAND}' to exit.")?;
        let mut lines = input.lines();
        loop {
            write!(out, "> ")?;
            out.flush()?;
            let Some(line) = lines.next() else {
                writeln!(out, "\nExiting.")?;
                break;
            };
            let line = line.context("Failed to read query from stdin")?;
            let query = line.trim();
            if query.eq_ignore_ascii_case(EXIT_COMMAND) {
                break;
            }
            if query.is_empty() {
                continue;
            }
            self.answer(query, out)?;
        }
        Ok(())
    }

    fn answer(&self, query_text: &str, out: &mut impl Write) -> Result<()> {
        let k = self.args.k;
        for _ in 0..self.args.warmup {
            let _ = self.retriever.search(WARMUP_QUERY, self.stopwords, self.config, k);
        }

        let mut wall = Stopwatch::started();
        let (query, preproc_ms) =
            timed(|| self.retriever.prepare_query(query_text, self.stopwords, self.config));
        let (hits, rank_ms) = timed(|| self.retriever.rank(&query, k));
        let (rendered, format_ms) = timed(|| self.format_hits(&hits));
        let rendered = rendered?;
        let wall_ms = wall.stop();

        writeln!(out, "{rendered}")?;
        if self.args.show_cards {
            for hit in &hits {
                writeln!(out, "-> {}  score={:.6}", hit.guid, hit.score)?;
            }
        }

        if let Some(log_path) = &self.args.log {
            let run = QueryRun {
                algo: self.retriever.algorithm().as_str(),
                deck_size: self.retriever.documents().len(),
                topic: self.topic_label,
                query_id: &self.args.query_id,
                query: query_text,
                stage_ms: StageTimings {
                    parse: self.parse_ms,
                    index: self.index_ms,
                    preproc: preproc_ms,
                    rank: rank_ms,
                    format: format_ms,
                },
                wall_ms,
                hits: &hits,
            };
            log_benchmark(&run.to_record(), log_path)?;
        }
        Ok(())
    }

    fn format_hits(&self, hits: &[AnswerHit]) -> Result<String> {
        if hits.is_empty() {
            return Ok("No results.".to_string());
        }
        let mut lines = Vec::with_capacity(hits.len() * 3);
        for (rank, hit) in hits.iter().enumerate() {
            let document = self.by_guid.get(hit.guid.as_str()).ok_or_else(|| {
                anyhow!(
                    "internal invariant violated: hit {} is not in the candidate pool",
                    hit.guid
                )
            })?;
            lines.push(format!(
                "{}. GUID={}  score={:.6}  topic={}",
                rank + 1,
                hit.guid,
                hit.score,
                topic_path_to_string(&hit.topic_path)
            ));
            lines.push(format!("   Q: {}", hit.preview));
            let answer = normalize_for_display(&document.answer_raw, self.config);
            lines.push(format!("   A: {answer}"));
        }
        Ok(lines.join("\n"))
    }
}
