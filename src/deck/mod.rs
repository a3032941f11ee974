//! Deck export loading
//!
//! A deck export is a UTF-8 text file with one card per line and
//! tab-separated fields: `guid, notetype, deck path, question, answer[, tags]`.
//! Bad lines are collected as [`InvalidRecord`]s instead of aborting the load.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::ParserConfig;
use crate::domain::{string_to_topic_path, Document, InvalidRecord, TopicPath, MAX_PREVIEW_CHARS};
use crate::error::DeckError;
use crate::text::{normalize_for_matching, tokenize, Stopwords};

const DECK_EXTENSION: &str = "txt";
const MIN_COLUMNS: usize = 5;
const MAX_COLUMNS: usize = 6;

/// Cards and rejected lines from one or more deck files.
#[derive(Debug, Default, Clone)]
pub struct LoadedDecks {
    pub documents: Vec<Document>,
    pub invalid: Vec<InvalidRecord>,
}

impl LoadedDecks {
    fn extend(&mut self, other: LoadedDecks) {
        self.documents.extend(other.documents);
        self.invalid.extend(other.invalid);
    }
}

fn is_deck_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(DECK_EXTENSION))
}

/// Deck files under `data_path`, sorted.
///
/// A file yields itself when it has a `.txt` extension; a directory is walked
/// recursively.
pub fn list_deck_files(data_path: &Path) -> Result<Vec<PathBuf>, DeckError> {
    if !data_path.exists() {
        return Err(DeckError::DataPathNotFound(data_path.to_path_buf()));
    }
    if data_path.is_file() {
        return Ok(if is_deck_file(data_path) { vec![data_path.to_path_buf()] } else { Vec::new() });
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(data_path).sort_by_file_name() {
        let entry = entry.map_err(|source| DeckError::Walk {
            path: data_path.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_file() && is_deck_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

fn preview_line(line: &str) -> String {
    line.trim_end_matches(['\r', '\n']).chars().take(MAX_PREVIEW_CHARS).collect()
}

/// Column count and required-field checks; `Err` carries the rejection reason.
fn validate_fields(fields: &[&str]) -> Result<(), &'static str> {
    if fields.len() < MIN_COLUMNS {
        return Err("too few columns (<5)");
    }
    if fields.len() > MAX_COLUMNS {
        return Err("too many columns (>6) or TAB inside a field");
    }
    if fields[0].trim().is_empty() {
        return Err("empty guid");
    }
    if fields[3].trim().is_empty() {
        return Err("empty question");
    }
    if fields[4].trim().is_empty() {
        return Err("empty answer");
    }
    Ok(())
}

fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Build a card, normalising both sides and counting question tokens.
pub fn build_document(
    guid: &str,
    topic_path: TopicPath,
    question_raw: &str,
    answer_raw: &str,
    tags_raw: &str,
    stopwords: &Stopwords,
    config: &ParserConfig,
) -> Document {
    let question_text = normalize_for_matching(question_raw, config);
    let answer_text = normalize_for_matching(answer_raw, config);
    let question_token_count = tokenize(&question_text, stopwords, config).len();
    Document {
        guid: guid.trim().to_string(),
        topic_path,
        question_raw: question_raw.to_string(),
        answer_raw: answer_raw.to_string(),
        question_text,
        answer_text,
        tags: parse_tags(tags_raw),
        question_token_count,
    }
}

/// Parse deck text already read into memory.
pub fn parse_deck(
    file_label: &str,
    content: &str,
    stopwords: &Stopwords,
    config: &ParserConfig,
) -> LoadedDecks {
    let mut loaded = LoadedDecks::default();

    for (index, line) in content.lines().enumerate() {
        let line_number = index + 1;
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }

        let reject = |reason: &str| InvalidRecord {
            file_path: file_label.to_string(),
            line_number,
            reason: reason.to_string(),
            raw_line_preview: preview_line(line),
        };

        let fields: Vec<&str> = line.split('\t').collect();
        if let Err(reason) = validate_fields(&fields) {
            loaded.invalid.push(reject(reason));
            continue;
        }

        let topic_path = string_to_topic_path(fields[2].trim(), &config.topic.separator);
        let tags_raw = fields.get(5).map_or("", |tags| tags.trim());
        let document = build_document(
            fields[0],
            topic_path,
            fields[3].trim_end_matches('\r'),
            fields[4].trim_end_matches('\r'),
            tags_raw,
            stopwords,
            config,
        );
        if document.question_text.is_empty() || document.answer_text.is_empty() {
            loaded.invalid.push(reject("empty after normalisation"));
            continue;
        }
        loaded.documents.push(document);
    }

    loaded
}

/// Read one deck file. Unreadable or non-UTF-8 files become a single
/// line-0 invalid record.
pub fn read_deck_file(path: &Path, stopwords: &Stopwords, config: &ParserConfig) -> LoadedDecks {
    let label = path.display().to_string();
    let whole_file = |reason: String| LoadedDecks {
        documents: Vec::new(),
        invalid: vec![InvalidRecord {
            file_path: label.clone(),
            line_number: 0,
            reason,
            raw_line_preview: String::new(),
        }],
    };

    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => return whole_file(format!("file read error: {err}")),
    };
    match String::from_utf8(bytes) {
        Ok(content) => parse_deck(&label, &content, stopwords, config),
        Err(err) => whole_file(format!("unicode decode error: {err}")),
    }
}

/// Load every deck file under `data_path`, concatenated in file order.
pub fn load_decks(
    data_path: &Path,
    stopwords: &Stopwords,
    config: &ParserConfig,
) -> Result<LoadedDecks, DeckError> {
    let files = list_deck_files(data_path)?;
    let mut loaded = LoadedDecks::default();
    for file in &files {
        let part = read_deck_file(file, stopwords, config);
        tracing::debug!(
            file = %file.display(),
            cards = part.documents.len(),
            invalid = part.invalid.len(),
            "read deck file"
        );
        loaded.extend(part);
    }
    tracing::debug!(
        files = files.len(),
        cards = loaded.documents.len(),
        invalid = loaded.invalid.len(),
        "loaded decks"
    );
    Ok(loaded)
}
