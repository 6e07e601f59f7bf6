//! Settings document flattening.
//!
//! Settings files are JSON objects with nested sections; the merged view
//! addresses values by colon-delimited paths (`"Section:SubKey"`). This
//! module turns a parsed document into those flat pairs: objects nest with
//! `:`, arrays contribute zero-based indices, scalars render as their JSON
//! text, and `null` becomes the empty string.

use serde_json::Value;

/// Flatten a parsed settings document into colon-keyed string pairs.
pub(crate) fn flatten(root: &serde_json::Map<String, Value>) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (key, value) in root {
        flatten_value(key.clone(), value, &mut pairs);
    }
    pairs
}

fn flatten_value(prefix: String, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                flatten_value(format!("{prefix}:{key}"), child, out);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten_value(format!("{prefix}:{index}"), child, out);
            }
        }
        Value::String(text) => out.push((prefix, text.clone())),
        Value::Bool(flag) => out.push((prefix, flag.to_string())),
        Value::Number(number) => out.push((prefix, number.to_string())),
        Value::Null => out.push((prefix, String::new())),
    }
}
