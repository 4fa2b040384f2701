//! Schema-less log records

use serde_json::{Map, Value};

/// One security event as decoded from the export, field order preserved.
pub type LogRecord = Map<String, Value>;

/// Render a value the way it appears in a CEF/LEEF extension.
///
/// Strings are taken verbatim, numbers and booleans as their JSON text,
/// containers as compact JSON. `null` counts as missing.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(_) | Value::Number(_) => Some(value.to_string()),
        Value::Array(_) | Value::Object(_) => serde_json::to_string(value).ok(),
    }
}

/// Resolve a dotted path against a record.
///
/// An exact key match wins (flattened records carry literal dotted keys);
/// otherwise the longest dotted prefix naming a nested object is entered and
/// the remainder resolved inside it.
pub fn lookup<'a>(map: &'a LogRecord, path: &str) -> Option<&'a Value> {
    if let Some(value) = map.get(path) {
        return Some(value);
    }

    let mut end = path.len();
    while let Some(idx) = path[..end].rfind('.') {
        if let Some(Value::Object(inner)) = map.get(&path[..idx])
            && let Some(value) = lookup(inner, &path[idx + 1..])
        {
            return Some(value);
        }
        end = idx;
    }

    None
}

/// Accessors with explicit miss behavior
pub trait RecordExt {
    /// Value at `path` rendered as text; `None` when missing or `null`
    fn text(&self, path: &str) -> Option<String>;

    /// Value at `path` rendered as text, empty when missing
    fn text_or_empty(&self, path: &str) -> String {
        self.text(path).unwrap_or_default()
    }

    /// Top-level string field; non-string values do not match
    fn str_field(&self, key: &str) -> Option<&str>;
}

impl RecordExt for LogRecord {
    fn text(&self, path: &str) -> Option<String> {
        lookup(self, path).and_then(value_text)
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }
}
