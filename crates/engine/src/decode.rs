//! Turns backend error payloads into user-facing notifications.
//!
//! Two shapes are understood: a flat `{error: "<kind>", message}` (or bare
//! `{message}`) and a structured `{error: {"<entry index>": {"<field>":
//! ["violation", ...]}}}`. Anything else degrades to a fallback summary;
//! decoding never fails.

use serde_json::{Map, Value};

use crate::notify::Notification;

pub const GENERIC_FALLBACK: &str = "An unexpected error occurred. Please try again.";
pub const STRUCTURED_HEADER: &str = "Please correct the following errors:";
pub const UNKNOWN_FORMAT: &str = "unknown error format";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    Flat,
    Structured,
    Unrecognized,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub shape: PayloadShape,
    pub notification: Notification,
}

pub fn decode(payload: &Value) -> Decoded {
    decode_with_fallback(payload, GENERIC_FALLBACK)
}

pub fn decode_with_fallback(payload: &Value, fallback: &str) -> Decoded {
    let unrecognized = || Decoded {
        shape: PayloadShape::Unrecognized,
        notification: Notification::summary_only(fallback),
    };

    let Some(obj) = payload.as_object() else {
        return unrecognized();
    };

    match obj.get("error") {
        Some(Value::String(_)) => flat(obj, fallback),
        Some(Value::Object(entries)) => match structured(entries) {
            Some(details) if !details.is_empty() => Decoded {
                shape: PayloadShape::Structured,
                notification: Notification {
                    summary: STRUCTURED_HEADER.to_string(),
                    details,
                },
            },
            _ => unrecognized(),
        },
        None if obj.get("message").is_some_and(Value::is_string) => flat(obj, fallback),
        _ => unrecognized(),
    }
}

fn flat(obj: &Map<String, Value>, fallback: &str) -> Decoded {
    let summary = obj
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or(fallback);
    Decoded {
        shape: PayloadShape::Flat,
        notification: Notification::summary_only(summary),
    }
}

fn structured(entries: &Map<String, Value>) -> Option<Vec<String>> {
    let mut indexed = Vec::with_capacity(entries.len());
    for (key, fields) in entries {
        let index: u64 = key.trim().parse().ok()?;
        indexed.push((index, fields.as_object()?));
    }
    indexed.sort_by_key(|(index, _)| *index);

    let mut details = Vec::new();
    for (index, fields) in indexed {
        let ordinal = index.saturating_add(1);
        let mut names: Vec<&String> = fields.keys().collect();
        names.sort();
        for name in names {
            match string_list(&fields[name]) {
                Some(violations) => {
                    for violation in violations {
                        details.push(format!("Metric {ordinal}, Field '{name}': {violation}"));
                    }
                }
                None => details.push(format!("Metric {ordinal}, Field '{name}': {UNKNOWN_FORMAT}")),
            }
        }
    }
    Some(details)
}

fn string_list(value: &Value) -> Option<Vec<&str>> {
    value.as_array()?.iter().map(Value::as_str).collect()
}
