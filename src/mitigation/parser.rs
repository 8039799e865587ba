//! Lenient decoding of strategy-service replies.
//!
//! Accepts a structured `{ "strategies": [...] }` body, a bare array, or free
//! text (under `text`/`content`, or the raw body). Missing fields fall back to
//! defaults; only a reply that yields no strategy at all is an error.

use serde_json::Value;

use crate::core::{Level, MitigationStrategy};
use crate::mitigation::error::MitigationError;

pub fn decode_response(value: &Value) -> Result<Vec<MitigationStrategy>, MitigationError> {
    let strategies = match value {
        Value::Array(entries) => decode_entries(entries),
        Value::Object(map) => {
            if let Some(Value::Array(entries)) = map.get("strategies") {
                decode_entries(entries)
            } else if let Some(text) = ["text", "content"]
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_str))
            {
                return decode_text(text);
            } else {
                Vec::new()
            }
        }
        Value::String(text) => return decode_text(text),
        _ => Vec::new(),
    };

    non_empty(strategies)
}

/// Free-text reply: an embedded JSON payload wins, labelled blocks otherwise.
pub fn decode_text(text: &str) -> Result<Vec<MitigationStrategy>, MitigationError> {
    if let Some(payload) = parse_json_payload(text) {
        if !payload.is_string() {
            if let Ok(strategies) = decode_response(&payload) {
                return Ok(strategies);
            }
        }
    }
    non_empty(decode_blocks(text))
}

fn non_empty(
    strategies: Vec<MitigationStrategy>,
) -> Result<Vec<MitigationStrategy>, MitigationError> {
    if strategies.is_empty() {
        return Err(MitigationError::InvalidResponse(
            "no mitigation strategies could be extracted".to_string(),
        ));
    }
    Ok(strategies)
}

fn decode_entries(entries: &[Value]) -> Vec<MitigationStrategy> {
    entries.iter().filter_map(decode_entry).collect()
}

fn decode_entry(entry: &Value) -> Option<MitigationStrategy> {
    let map = entry.as_object()?;
    let action = ["action", "title"]
        .iter()
        .find_map(|key| map.get(*key).map(value_to_string))
        .map(|action| action.trim().to_string())
        .filter(|action| !action.is_empty())?;

    let level = |key: &str| {
        map.get(key)
            .map(|value| Level::from_loose(&value_to_string(value)))
            .unwrap_or_default()
    };
    let text = |key: &str| {
        map.get(key)
            .map(value_to_string)
            .unwrap_or_default()
            .trim()
            .to_string()
    };

    Some(MitigationStrategy::new(
        action,
        level("impact"),
        level("difficulty"),
        text("timeframe"),
        text("description"),
    ))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Label {
    Action,
    Impact,
    Difficulty,
    Timeframe,
    Description,
}

fn decode_blocks(text: &str) -> Vec<MitigationStrategy> {
    let mut strategies = Vec::new();
    let mut current: Option<MitigationStrategy> = None;

    for raw in text.lines() {
        let line = raw.trim().trim_start_matches('#').replace("**", "");
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (is_item, body) = strip_list_marker(line);

        if let Some((label, value)) = split_label(body) {
            if label == Label::Action {
                strategies.extend(current.take());
                current = Some(titled(value, ""));
                continue;
            }
            if let Some(strategy) = current.as_mut() {
                match label {
                    Label::Impact => strategy.impact = Level::from_loose(value),
                    Label::Difficulty => strategy.difficulty = Level::from_loose(value),
                    Label::Timeframe => strategy.timeframe = value.to_string(),
                    Label::Description => strategy.description = value.to_string(),
                    Label::Action => {}
                }
            }
            continue;
        }

        if is_item {
            strategies.extend(current.take());
            current = match body.split_once(':') {
                Some((title, rest)) if !title.trim().is_empty() => Some(titled(title, rest)),
                _ => Some(titled(body, "")),
            };
        } else if let Some(strategy) = current.as_mut() {
            if !strategy.description.is_empty() {
                strategy.description.push(' ');
            }
            strategy.description.push_str(body);
        }
    }

    strategies.extend(current);
    strategies.retain(|strategy| !strategy.action.is_empty());
    strategies
}

fn titled(action: &str, description: &str) -> MitigationStrategy {
    MitigationStrategy::new(
        action.trim().trim_end_matches(':').trim(),
        Level::Medium,
        Level::Medium,
        "",
        description.trim(),
    )
}

/// Strips `-`, `*`, `•`, `1.` or `1)` from the start of a line.
fn strip_list_marker(line: &str) -> (bool, &str) {
    for bullet in ["- ", "* ", "• "] {
        if let Some(rest) = line.strip_prefix(bullet) {
            return (true, rest.trim());
        }
    }

    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            return (true, rest.trim());
        }
    }
    (false, line)
}

fn split_label(body: &str) -> Option<(Label, &str)> {
    let (name, value) = body.split_once(':')?;
    let label = match name.trim().to_ascii_lowercase().as_str() {
        "action" | "strategy" => Label::Action,
        "impact" => Label::Impact,
        "difficulty" | "effort" => Label::Difficulty,
        "timeframe" | "time frame" | "timeline" => Label::Timeframe,
        "description" | "details" => Label::Description,
        _ => return None,
    };
    Some((label, value.trim()))
}

pub(crate) fn parse_json_payload(response: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str::<Value>(response.trim()) {
        return Some(value);
    }

    let without_fence_markers = response
        .lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n");
    if let Ok(value) = serde_json::from_str::<Value>(without_fence_markers.trim()) {
        return Some(value);
    }

    let trimmed = response.trim();
    let start = trimmed.find(['{', '['])?;
    let end = trimmed.rfind(['}', ']'])?;
    if end <= start {
        return None;
    }
    serde_json::from_str::<Value>(&trimmed[start..=end]).ok()
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(value) => value.clone(),
        Value::Null => String::new(),
        _ => value.to_string(),
    }
}
