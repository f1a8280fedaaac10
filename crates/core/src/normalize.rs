//! Turns raw provider text into loosely-typed candidate records.
//!
//! Two strategies are tried in order:
//! 1. **JSON extraction**: the widest `[` … `]` span is parsed as a JSON array.
//! 2. **Labelled lines** (degraded mode): `Name:` / `Link:` / `Description:`
//!    style lines are folded into records.
//!
//! Nothing here validates records; see [`crate::validation`].

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

fn json_array_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)\[.*\]").expect("valid JSON array regex"))
}

pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

/// Best-effort parse: JSON first, labelled lines second, empty on failure.
pub fn parse(raw: &str) -> Vec<Value> {
    let text = strip_code_fences(raw);
    if let Some(candidates) = extract_json_array(text) {
        return candidates;
    }

    debug!(
        event_name = "normalize.degraded_mode",
        raw_len = raw.len(),
        "no JSON array found in provider text, using labelled line parser"
    );
    parse_labelled_lines(text)
}

/// JSON-only parse used where free text must not be accepted.
pub fn parse_strict(raw: &str) -> Option<Vec<Value>> {
    let text = strip_code_fences(raw);
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(candidates)) => Some(candidates),
        _ => extract_json_array(text),
    }
}

fn extract_json_array(text: &str) -> Option<Vec<Value>> {
    let span = json_array_pattern().find(text)?;
    match serde_json::from_str::<Value>(span.as_str()) {
        Ok(Value::Array(candidates)) => Some(candidates),
        Ok(_) => None,
        Err(error) => {
            debug!(
                event_name = "normalize.json_rejected",
                error = %error,
                "bracketed span is not valid JSON"
            );
            None
        }
    }
}

pub fn parse_labelled_lines(text: &str) -> Vec<Value> {
    let mut candidates = Vec::new();
    let mut current = Map::new();

    for line in text.lines() {
        let lowered = line.to_lowercase();
        let field = if lowered.contains("name:") || lowered.contains("tool:") {
            if !current.is_empty() {
                candidates.push(Value::Object(std::mem::take(&mut current)));
            }
            "name"
        } else if lowered.contains("link:") || lowered.contains("url:") {
            "link"
        } else if lowered.contains("description:") {
            "description"
        } else {
            continue;
        };

        let value = line.split_once(':').map(|(_, rest)| rest.trim()).unwrap_or_default();
        current.insert(field.to_string(), Value::String(value.to_string()));
    }

    if !current.is_empty() {
        candidates.push(Value::Object(current));
    }

    candidates
}
