// src/prompt/extract.rs — Recover a JSON object from free-form model output
//
// The pipeline runs in a fixed order:
//   1. strip <think>…</think> spans
//   2. strip code-fence delimiters
//   3. scan minimal {…} candidates, strict parse then trailing-comma repair;
//      a candidate that fails is retried as the brace-balanced span opening
//      at the same `{`, so nested objects are recovered whole
//   4. if nothing parsed, scan brace-balanced candidates the same way
// The first candidate that parses as an object wins.

use regex::Regex;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::sync::OnceLock;

use crate::infra::errors::{RagEvalError, Result};

fn thinking_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<think>.*?</think>").expect("valid thinking pattern"))
}

fn fence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"```[A-Za-z0-9_+\-]*").expect("valid fence pattern"))
}

fn object_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\{.*?\}").expect("valid object pattern"))
}

fn trailing_comma_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r",\s*([}\]])").expect("valid trailing comma pattern"))
}

/// Drop every `<think>…</think>` span, including ones spanning lines.
pub fn strip_thinking(text: &str) -> Cow<'_, str> {
    thinking_re().replace_all(text, "")
}

/// Drop triple-backtick delimiters (and any language tag) but keep the
/// fenced text.
pub fn strip_code_fences(text: &str) -> Cow<'_, str> {
    fence_re().replace_all(text, "")
}

/// Non-overlapping minimal `{ … }` spans in order of appearance.
pub fn object_candidates(text: &str) -> Vec<&str> {
    object_re().find_iter(text).map(|m| m.as_str()).collect()
}

/// The brace-balanced span opening at byte offset `start`, which must hold a
/// `{`. Braces inside JSON strings are skipped. `None` if it never closes.
pub fn balanced_span_at(text: &str, start: usize) -> Option<&str> {
    let tail = text.get(start..)?;
    if !tail.starts_with('{') {
        return None;
    }

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in tail.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&tail[..=i]);
                }
            }
            '"' => in_string = true,
            _ => {}
        }
    }

    None
}

/// Brace-balanced `{ … }` spans in order of appearance.
///
/// Braces inside JSON strings are skipped once an object is open. An object
/// left unclosed at the end of the text yields nothing.
pub fn balanced_candidates(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut pos = 0usize;

    while let Some(offset) = text[pos..].find('{') {
        let start = pos + offset;
        match balanced_span_at(text, start) {
            Some(span) => {
                out.push(span);
                pos = start + span.len();
            }
            None => break,
        }
    }

    out
}

/// Remove a comma (and following whitespace) sitting right before `}` or `]`.
pub fn remove_trailing_commas(candidate: &str) -> Cow<'_, str> {
    trailing_comma_re().replace_all(candidate, "$1")
}

/// Strict parse, then one retry after trailing-comma repair.
pub fn parse_object(candidate: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Map<String, Value>>(candidate) {
        Ok(obj) => Some(obj),
        Err(strict_err) => {
            let repaired = remove_trailing_commas(candidate);
            match serde_json::from_str::<Map<String, Value>>(&repaired) {
                Ok(obj) => Some(obj),
                Err(_) => {
                    tracing::debug!("candidate rejected: {strict_err}");
                    None
                }
            }
        }
    }
}

/// Extract the first valid JSON object from messy model output.
pub fn extract_json(text: &str) -> Result<Map<String, Value>> {
    let without_thinking = strip_thinking(text);
    let cleaned = strip_code_fences(&without_thinking);

    for m in object_re().find_iter(&cleaned) {
        if let Some(obj) = parse_object(m.as_str()) {
            return Ok(obj);
        }
        // A minimal match stops at the first `}`, which cuts nested objects.
        if let Some(obj) = balanced_span_at(&cleaned, m.start()).and_then(parse_object) {
            return Ok(obj);
        }
    }

    balanced_candidates(&cleaned)
        .into_iter()
        .find_map(parse_object)
        .ok_or(RagEvalError::NoStructuredData)
}
