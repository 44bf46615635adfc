// src/extract/response.rs
use serde_json::Value;
use tracing::{debug, warn};

/// Pull the response elements (header first, then raw blocks) out of the
/// extraction service's JSON.
///
/// Accepts a bare array or the service's `{"table": [...]}` envelope. Any
/// other shape yields no elements. Non-array elements are skipped, `null`
/// cells become empty strings and other scalars keep their JSON text.
pub fn decode_elements(body: &Value) -> Vec<Vec<String>> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("table") {
            Some(Value::Array(items)) => items,
            _ => {
                warn!("response object has no `table` array");
                return Vec::new();
            }
        },
        other => {
            warn!(kind = kind_of(other), "response is not an array");
            return Vec::new();
        }
    };

    let elements: Vec<Vec<String>> = items
        .iter()
        .enumerate()
        .filter_map(|(idx, item)| match item {
            Value::Array(cells) => Some(cells.iter().map(cell_text).collect()),
            other => {
                debug!(element = idx, kind = kind_of(other), "skipping non-array element");
                None
            }
        })
        .collect();
    debug!(elements = elements.len(), "decoded response");
    elements
}

fn cell_text(cell: &Value) -> String {
    match cell {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
