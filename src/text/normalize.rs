//! Text normalisation for matching and for safe display.

use crate::config::ParserConfig;

/// Named entities decoded by [`decode_basic_entities`], longest name first.
///
/// Replacement is sequential over the whole string, so `&amp;lt;` ends up as `<`.
const HTML_ENTITIES: &[(&str, &str)] = &[
    ("&quot;", "\""),
    ("&apos;", "'"),
    ("&nbsp;", " "),
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
];

/// Remove every `<...>` span.
///
/// A `>` with no open tag is kept as text; an unterminated `<` swallows the rest.
pub fn strip_html_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for ch in text.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if in_tag => {}
            _ => out.push(ch),
        }
    }
    out
}

pub fn decode_basic_entities(text: &str) -> String {
    let mut out = text.to_string();
    for (entity, replacement) in HTML_ENTITIES {
        if out.contains(entity) {
            out = out.replace(entity, replacement);
        }
    }
    out
}

pub fn escape_angle_brackets(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Canonical form used for tokenising documents and queries.
///
/// Steps run in a fixed order: strip tags, decode entities, lowercase, trim.
pub fn normalize_for_matching(text: &str, config: &ParserConfig) -> String {
    let mut result = if config.strip_html_for_matching {
        strip_html_tags(text)
    } else {
        text.to_string()
    };
    if config.decode_html_entities {
        result = decode_basic_entities(&result);
    }
    if config.lowercase_for_matching {
        result = result.to_lowercase();
    }
    if config.trim_whitespace {
        result = result.trim().to_string();
    }
    result
}

/// Safe-to-print form: entities decoded, angle brackets re-escaped, case kept.
pub fn normalize_for_display(text: &str, config: &ParserConfig) -> String {
    let mut result = if config.decode_html_entities {
        decode_basic_entities(text)
    } else {
        text.to_string()
    };
    if config.escape_html_for_display {
        result = escape_angle_brackets(&result);
    }
    if config.trim_whitespace {
        result = result.trim().to_string();
    }
    result
}
