// Copyright 2026 the Charta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Data records.
//!
//! Charts consume loosely-shaped rows, so a record is a JSON object with
//! insertion order preserved. Keys may address nested objects with dots
//! (`"stats.mean"`); an exact top-level key always wins over a dotted path.

use serde_json::{Map, Value};

/// One data row.
pub type Record = Map<String, Value>;

/// Looks up `key`, falling back to a dotted path into nested objects.
pub fn value_at<'a>(record: &'a Record, key: &str) -> Option<&'a Value> {
    if let Some(v) = record.get(key) {
        return Some(v);
    }
    if !key.contains('.') {
        return None;
    }
    let mut parts = key.split('.');
    let mut current = record.get(parts.next()?)?;
    for part in parts {
        current = match current {
            Value::Object(map) => map.get(part)?,
            Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Reads a finite number. Strings and other kinds are not coerced.
pub fn number_at(record: &Record, key: &str) -> Option<f64> {
    value_at(record, key)
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite())
}

/// Reads a value as display text; `null` and missing keys are `None`.
pub fn text_at(record: &Record, key: &str) -> Option<String> {
    match value_at(record, key)? {
        Value::Null => None,
        v => Some(display_value(v)),
    }
}

/// Formats a value the way it would appear in a label or tooltip.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.as_f64().map_or_else(|| n.to_string(), format_number),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    }
}

/// Formats a number without a trailing `.0` for integral values.
pub fn format_number(v: f64) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if v.fract() == 0.0 && v.abs() < 1e15 {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "integral and well inside the i64 range"
        )]
        let i = v as i64;
        return format!("{i}");
    }
    format!("{v}")
}

/// Returns `true` if the value is "truthy" for class-name and label lookups.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0 && !v.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}

/// Builds a record from `(key, value)` pairs.
pub fn record<K, V, I>(pairs: I) -> Record
where
    K: Into<String>,
    V: Into<Value>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
