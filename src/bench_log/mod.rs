//! Append-only run logs
//!
//! - Benchmark log: one JSON object per answered query (JSON Lines). External
//!   tooling reads the last line, so the record shape is fixed by [`LogRecord`].
//! - Invalid-record log: one human-readable line per rejected deck line.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};

use crate::domain::{AnswerHit, InvalidRecord, LogRecord, StageTimings, TopEntry};
use crate::utils::ensure_parent_dir;

/// Value of the `lang` field for records written by this binary.
pub const LOG_LANGUAGE: &str = "rust";

/// Current UTC time in RFC 3339 form with microseconds.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Everything about one answered query that goes into its benchmark record.
#[derive(Debug, Clone)]
pub struct QueryRun<'a> {
    pub algo: &'a str,
    pub deck_size: usize,
    pub topic: &'a str,
    pub query_id: &'a str,
    pub query: &'a str,
    pub stage_ms: StageTimings,
    pub wall_ms: f64,
    pub hits: &'a [AnswerHit],
}

impl QueryRun<'_> {
    pub fn to_record(&self) -> LogRecord {
        LogRecord {
            ts: timestamp_now(),
            lang: LOG_LANGUAGE.to_string(),
            algo: self.algo.to_string(),
            deck_size: self.deck_size,
            topic: self.topic.to_string(),
            query_id: self.query_id.to_string(),
            query: self.query.to_string(),
            stage_ms: self.stage_ms,
            wall_ms: self.wall_ms,
            rss_kb: None,
            top: self
                .hits
                .iter()
                .map(|hit| TopEntry { guid: hit.guid.clone(), score: hit.score })
                .collect(),
        }
    }
}

fn append_lines(path: &Path, lines: &[String]) -> Result<()> {
    ensure_parent_dir(path)
        .with_context(|| format!("Failed to create log directory for {}", path.display()))?;
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file for append: {}", path.display()))?;
    let mut buffer = String::new();
    for line in lines {
        buffer.push_str(line);
        buffer.push('\n');
    }
    file.write_all(buffer.as_bytes())
        .with_context(|| format!("Failed to write log file: {}", path.display()))?;
    Ok(())
}

/// Append one benchmark record as a single JSON line.
pub fn log_benchmark(record: &LogRecord, path: &Path) -> Result<()> {
    let line = serde_json::to_string(record).context("Failed to serialise benchmark record")?;
    append_lines(path, &[line])
}

/// Format a rejected deck line for the invalid-record log.
pub fn format_invalid_record(record: &InvalidRecord, ts: &str) -> String {
    format!(
        "[{ts}] file={} line={} reason={} preview={}",
        record.file_path, record.line_number, record.reason, record.raw_line_preview
    )
}

/// Append rejected deck lines; does nothing when there are none.
pub fn log_invalid_records(records: &[InvalidRecord], path: &Path) -> Result<()> {
    if records.is_empty() {
        return Ok(());
    }
    let ts = timestamp_now();
    let lines: Vec<String> =
        records.iter().map(|record| format_invalid_record(record, &ts)).collect();
    append_lines(path, &lines)
}

/// Every parseable record in a benchmark log; missing files read as empty.
///
/// Blank and malformed lines are skipped.
pub fn read_benchmarks(path: &Path) -> Result<Vec<LogRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read benchmark log: {}", path.display()))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect())
}

/// The most recent parseable record, if any.
pub fn last_record(path: &Path) -> Result<Option<LogRecord>> {
    Ok(read_benchmarks(path)?.pop())
}
