//! Field accessors for schema.org `Recipe` objects.
//!
//! Publishers disagree on shapes (a string where a list is expected, objects
//! where strings are expected), so every accessor takes the raw JSON value and
//! falls back to an empty/default result instead of failing.

use serde_json::Value;

pub const DEFAULT_NAME: &str = "Untitled Recipe";

/// String field, or `default` when missing or not a string
pub fn text_or(data: &Value, key: &str, default: &str) -> String {
    data.get(key)
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}

/// List-of-strings field. A bare string counts as a one-element list;
/// non-string elements are skipped.
pub fn string_list(data: &Value, key: &str) -> Vec<String> {
    match data.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(String::from)
            .collect(),
        Some(Value::String(s)) => vec![s.clone()],
        _ => Vec::new(),
    }
}

/// A single instruction element: a plain string or a `HowToStep`-style
/// object with a string `text` field
fn step_text(item: &Value) -> Option<String> {
    match item {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Object(obj) => obj
            .get("text")
            .and_then(Value::as_str)
            .map(|s| s.trim().to_string()),
        _ => None,
    }
}

/// Flatten an instruction field into trimmed step strings, in source order.
/// Elements of any other shape are dropped.
pub fn instruction_steps(data: &Value, key: &str) -> Vec<String> {
    match data.get(key) {
        Some(Value::Array(items)) => items.iter().filter_map(step_text).collect(),
        Some(Value::String(s)) => vec![s.trim().to_string()],
        _ => Vec::new(),
    }
}

fn image_url_of(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) => Some(s.as_str()),
        // ImageObject
        Value::Object(obj) => obj.get("url").and_then(Value::as_str),
        _ => None,
    }
}

/// The recipe's image URL. For a list of images only the first is considered.
pub fn image_reference(data: &Value) -> Option<String> {
    let url = match data.get("image")? {
        Value::Array(items) => image_url_of(items.first()?)?,
        other => image_url_of(other)?,
    };

    let url = url.trim();
    (!url.is_empty()).then(|| url.to_string())
}

/// Everything before the first `?`
pub fn strip_query(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

/// Last path segment of a URL, if non-empty
pub fn filename_from_url(url: &str) -> Option<String> {
    url.rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .map(String::from)
}
