//! Best-effort parsers for free-text LLM output
//!
//! Nothing in here fails. Malformed evaluation JSON yields `None` and the
//! caller substitutes its defaults; a rewrite response without the expected
//! section headers degrades to the raw response text.

use crate::prompt_optimizer::Improvement;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

/// Section header introducing the rewritten prompt
pub const PROMPT_MARKER: &str = "Optimized Prompt";
/// Section header introducing the list of improvement notes
pub const NOTES_MARKER: &str = "Improvement Notes";

/// Improvement type used for note lines without a `type: description` split
pub const UNTYPED_IMPROVEMENT: &str = "improvement";

static PROMPT_HEADER: Lazy<Regex> = Lazy::new(|| header_pattern(PROMPT_MARKER));
static NOTES_HEADER: Lazy<Regex> = Lazy::new(|| header_pattern(NOTES_MARKER));

static LIST_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:\d+[.)]|[-*•])\s*(.*)$").expect("valid regex"));

/// Matches a line mentioning the marker as whole words, wherever it sits
/// (`## Optimized Prompt`, `1. Optimized Prompt:`, `Here is the optimized
/// prompt:`), and captures whatever follows the marker and its colon
fn header_pattern(marker: &str) -> Regex {
    let pattern = format!(
        r"(?i)\b{}\b[\s*_]*:?[\s*_]*(.*)$",
        regex::escape(marker)
    );
    Regex::new(&pattern).expect("valid header regex")
}

/// Cut the JSON payload out of an LLM reply.
///
/// A ```` ```json ```` fence wins; otherwise the span from the first `{` to
/// the last `}`; otherwise the whole text.
pub fn extract_json(content: &str) -> &str {
    if let Some(start) = content.find("```json") {
        let rest = &content[start + "```json".len()..];
        let body = match rest.find("```") {
            Some(end) => &rest[..end],
            None => rest,
        };
        return body.trim();
    }

    if let (Some(start), Some(end)) = (content.find('{'), content.rfind('}')) {
        if start < end {
            return &content[start..=end];
        }
    }

    content.trim()
}

/// Parse the JSON object embedded in `content`, if there is one
pub fn parse_json_object(content: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(extract_json(content)) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Read a score given either as a JSON number or a numeric string, clamped to `0..=10`
pub fn score_value(value: &Value) -> Option<f64> {
    let raw = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    raw.is_finite().then(|| raw.clamp(0.0, 10.0))
}

/// Collect the string items of a JSON array field; anything else reads as empty
pub fn string_list(map: &Map<String, Value>, key: &str) -> Vec<String> {
    map.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.trim().to_string()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Rewritten prompt and improvement notes recovered from a rewrite reply
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRewrite {
    pub optimized_prompt: String,
    pub improvements: Vec<Improvement>,
}

#[derive(Clone, Copy, PartialEq)]
enum Section {
    Preamble,
    Prompt,
    Notes,
}

/// Split a rewrite reply into the optimized prompt and its improvement notes.
///
/// Lines after the prompt header, up to the notes header, form the prompt.
/// List items after the notes header become improvements, split on their
/// first colon into type and description. An empty prompt section falls back
/// to the whole reply, and a reply without notes gets one generic entry.
pub fn parse_rewrite_response(response: &str) -> ParsedRewrite {
    let mut section = Section::Preamble;
    let mut prompt_lines: Vec<&str> = Vec::new();
    let mut improvements = Vec::new();

    for line in response.lines() {
        if let Some(caps) = PROMPT_HEADER.captures(line) {
            section = Section::Prompt;
            let rest = caps.get(1).map_or("", |m| m.as_str()).trim();
            if !rest.is_empty() {
                prompt_lines.push(rest);
            }
            continue;
        }
        if let Some(caps) = NOTES_HEADER.captures(line) {
            section = Section::Notes;
            let rest = caps.get(1).map_or("", |m| m.as_str());
            improvements.extend(note_item(rest));
            continue;
        }

        match section {
            Section::Prompt => prompt_lines.push(line.trim_end()),
            Section::Notes => improvements.extend(note_item(line)),
            Section::Preamble => {}
        }
    }

    let mut optimized_prompt = prompt_lines.join("\n").trim().to_string();
    if optimized_prompt.is_empty() {
        optimized_prompt = response.trim().to_string();
    }

    if improvements.is_empty() {
        improvements.push(Improvement::new(
            "overall optimization",
            "Improved the clarity and actionability of the prompt",
        ));
    }

    ParsedRewrite { optimized_prompt, improvements }
}

fn note_item(line: &str) -> Option<Improvement> {
    let item = LIST_ITEM.captures(line)?.get(1)?.as_str().trim();
    if !item.chars().any(char::is_alphanumeric) {
        return None;
    }

    let strip = |s: &str| s.trim_matches(|c: char| c == '*' || c == '_' || c.is_whitespace()).to_string();

    if let Some((kind, description)) = item.split_once(':') {
        let kind = strip(kind);
        let description = strip(description);
        if !kind.is_empty() && !description.is_empty() {
            return Some(Improvement::new(kind, description));
        }
    }

    Some(Improvement::new(UNTYPED_IMPROVEMENT, strip(item)))
}
