//! Value Normalizer
//!
//! The storage layer only holds TEXT, so every field value of a record is
//! converted to its textual form before it goes anywhere near SQL. Nested
//! objects and arrays serialize to compact JSON; scalars use their plain
//! rendering. The conversion is lossy for numeric precision and boolean
//! type.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Convert every value of a record to text, keeping the raw keys.
///
/// Renderings: strings keep their content (no surrounding quotes), numbers
/// and booleans use their display form, `null` becomes the text `"null"`,
/// and objects/arrays become their compact JSON encoding. The JSON form is
/// the canonical one: parsing the stored text reconstructs the original
/// nested structure.
pub fn normalize_record(record: &Map<String, Value>) -> BTreeMap<String, String> {
    record
        .iter()
        .map(|(key, value)| (key.clone(), normalize_value(value)))
        .collect()
}

fn normalize_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        // Compact JSON; `Value::to_string` never fails for a parsed tree.
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}
