//! Core domain types and models
//!
//! Cards loaded from deck exports, ranked hits, and the benchmark record shape.

use serde::{Deserialize, Serialize};

/// Maximum preview length (in characters) for questions shown next to a hit.
pub const MAX_PREVIEW_CHARS: usize = 120;

/// Separator used when rendering a topic path for display and logs.
pub const TOPIC_DISPLAY_SEPARATOR: &str = "::";

/// A hierarchical topic path, e.g. `["Computing", "Unit 03 - Data Structures"]`.
pub type TopicPath = Vec<String>;

/// One question/answer card from a deck export.
///
/// Immutable after construction; the retrieval indexes borrow slices of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Unique, stable identifier from the export
    pub guid: String,

    /// Topic path the card lives under
    pub topic_path: TopicPath,

    /// Question exactly as exported (may contain HTML)
    pub question_raw: String,

    /// Answer exactly as exported (may contain HTML); never render unescaped
    pub answer_raw: String,

    /// Question normalised for matching
    pub question_text: String,

    /// Answer normalised for matching
    pub answer_text: String,

    /// Lowercased tags
    #[serde(default)]
    pub tags: Vec<String>,

    /// Token count of `question_text` under the active tokeniser settings
    pub question_token_count: usize,
}

/// A ranked result.
///
/// Scores are comparable between hits of the same algorithm only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerHit {
    pub guid: String,
    pub score: f64,
    pub topic_path: TopicPath,
    pub preview: String,
}

/// A rejected input line, kept for the invalid-record log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidRecord {
    pub file_path: String,
    pub line_number: usize,
    pub reason: String,
    pub raw_line_preview: String,
}

/// Per-query stage timings in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StageTimings {
    pub parse: f64,
    pub index: f64,
    pub preproc: f64,
    pub rank: f64,
    pub format: f64,
}

/// One `(guid, score)` pair of the benchmark record's `top` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopEntry {
    pub guid: String,
    pub score: f64,
}

/// Structured benchmark row for one answered query.
///
/// The field names are parsed by external tooling and must not change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub ts: String,
    pub lang: String,
    pub algo: String,
    pub deck_size: usize,
    pub topic: String,
    pub query_id: String,
    pub query: String,
    pub stage_ms: StageTimings,
    pub wall_ms: f64,
    pub rss_kb: Option<u64>,
    pub top: Vec<TopEntry>,
}

/// Join a topic path with `::`, skipping blank segments.
pub fn topic_path_to_string(path: &[String]) -> String {
    path.iter()
        .map(|segment| segment.trim())
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(TOPIC_DISPLAY_SEPARATOR)
}

/// Split `A::B::C` style text into a topic path, dropping blank segments.
pub fn string_to_topic_path(text: &str, separator: &str) -> TopicPath {
    text.split(separator)
        .map(|segment| segment.trim())
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Trim and truncate to `max_chars` characters, ending with `…` when cut.
pub fn short_preview(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    let mut out: String = trimmed.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_keeps_short_text() {
        assert_eq!(short_preview("  what is a stack?  ", MAX_PREVIEW_CHARS), "what is a stack?");
    }

    #[test]
    fn preview_truncates_to_limit_with_ellipsis() {
        let long = "é".repeat(200);
        let preview = short_preview(&long, MAX_PREVIEW_CHARS);
        assert_eq!(preview.chars().count(), MAX_PREVIEW_CHARS);
        assert!(preview.ends_with('…'));
    }

    #[test]
    fn topic_paths_round_trip_through_display_form() {
        let path = string_to_topic_path(" Computing :: Unit 03 ::  ", "::");
        assert_eq!(path, vec!["Computing".to_string(), "Unit 03".to_string()]);
        assert_eq!(topic_path_to_string(&path), "Computing::Unit 03");
    }

    #[test]
    fn log_record_serialises_with_stable_field_names() {
        let record = LogRecord {
            ts: "2026-01-01T00:00:00+00:00".to_string(),
            lang: "rust".to_string(),
            algo: "tfidf".to_string(),
            deck_size: 2,
            topic: "<ALL>".to_string(),
            query_id: "ad-hoc".to_string(),
            query: "stack".to_string(),
            stage_ms: StageTimings::default(),
            wall_ms: 0.5,
            rss_kb: None,
            top: vec![TopEntry { guid: "a".to_string(), score: 1.0 }],
        };
        let value = serde_json::to_value(&record).expect("serialise");
        assert_eq!(value["stage_ms"]["preproc"], serde_json::json!(0.0));
        assert_eq!(value["top"][0]["guid"], serde_json::json!("a"));
        assert!(value["rss_kb"].is_null());
    }
}
