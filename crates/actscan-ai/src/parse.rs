//! Lenient parsing of free-form model output.
//!
//! Models wrap JSON in prose or markdown fences, so [`parse_json_object`]
//! takes the span from the first `{` to the last `}` and parses only that.
//! It is the only place this slicing happens; callers decide what to do when
//! it fails.

use actscan_core::{KEY_SECTION_CATEGORIES, KeySections, RuleCheck, RuleStatus};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResponseParseError {
    #[error("no JSON object found in response")]
    NoObject,
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("JSON value is not an object")]
    NotAnObject,
    #[error("missing or invalid field `{0}`")]
    Field(&'static str),
}

/// Lines that start with a dash, trimmed, in order.
pub fn parse_bullets(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| line.starts_with('-'))
        .map(str::to_string)
        .collect()
}

/// Parse the span from the first `{` to the last `}` as a JSON object.
pub fn parse_json_object(text: &str) -> Result<Map<String, Value>, ResponseParseError> {
    let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) else {
        return Err(ResponseParseError::NoObject);
    };
    if end <= start {
        return Err(ResponseParseError::NoObject);
    }
    match serde_json::from_str::<Value>(&text[start..=end])? {
        Value::Object(map) => Ok(map),
        _ => Err(ResponseParseError::NotAnObject),
    }
}

/// Text value of a section: a string, or an array of strings joined with "; ".
fn section_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str())
            .collect::<Option<Vec<_>>>()
            .map(|parts| parts.join("; ")),
        _ => None,
    }
}

/// Key sections from a parsed object. Every category must be present.
pub fn key_sections_from_object(
    object: &Map<String, Value>,
) -> Result<KeySections, ResponseParseError> {
    let mut entries = Vec::with_capacity(KEY_SECTION_CATEGORIES.len());
    for key in KEY_SECTION_CATEGORIES {
        let text = object
            .get(key)
            .and_then(section_text)
            .ok_or(ResponseParseError::Field(key))?;
        entries.push((key, text));
    }
    KeySections::from_entries(entries).ok_or(ResponseParseError::Field("key sections"))
}

/// Confidence as 0–100. Accepts integers, floats, numeric strings, and a
/// trailing percent sign; values are rounded and clamped.
fn parse_confidence(value: &Value) -> Option<u8> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !n.is_finite() {
        return None;
    }
    Some(n.round().clamp(0.0, 100.0) as u8)
}

/// A rule check from a parsed object. The canonical `rule` text is used
/// regardless of what the model echoed back.
pub fn rule_check_from_object(
    rule: &str,
    object: &Map<String, Value>,
) -> Result<RuleCheck, ResponseParseError> {
    let status = object
        .get("status")
        .and_then(Value::as_str)
        .and_then(RuleStatus::parse)
        .ok_or(ResponseParseError::Field("status"))?;
    let evidence = object
        .get("evidence")
        .and_then(Value::as_str)
        .ok_or(ResponseParseError::Field("evidence"))?
        .trim()
        .to_string();
    let confidence = object
        .get("confidence")
        .and_then(parse_confidence)
        .ok_or(ResponseParseError::Field("confidence"))?;
    Ok(RuleCheck {
        rule: rule.to_string(),
        status,
        evidence,
        confidence,
    })
}
