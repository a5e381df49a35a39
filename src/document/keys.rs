//! Key Collector
//!
//! Walks an arbitrary JSON value and gathers every string key it finds,
//! at any depth. Keys from nested objects and from objects inside arrays
//! (including arrays of arrays) all land in one flat set; depth and path
//! are discarded.

use serde_json::Value;
use std::collections::BTreeSet;

/// Collect the set of all distinct keys in `value`, at any mapping level.
///
/// Set semantics: duplicate keys collapse, and the result is independent
/// of the order in which sibling keys or array elements appear. The sorted
/// set also gives a deterministic column order when a table is created
/// from the result.
///
/// # Examples
///
/// ```
/// use jsonsink::document::collect_keys;
/// use serde_json::json;
///
/// let keys = collect_keys(&json!({"a": 1, "b": {"c": [{"d": 2}]}}));
/// assert_eq!(keys.into_iter().collect::<Vec<_>>(), vec!["a", "b", "c", "d"]);
/// ```
pub fn collect_keys(value: &Value) -> BTreeSet<String> {
    let mut keys = BTreeSet::new();
    collect_keys_into(value, &mut keys);
    keys
}

/// Walker shared with `Document::key_set`, which unions records without
/// allocating a set per value.
pub(crate) fn collect_keys_into(value: &Value, keys: &mut BTreeSet<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                keys.insert(key.clone());
                collect_keys_into(child, keys);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_keys_into(item, keys);
            }
        }
        // Scalars carry no keys.
        _ => {}
    }
}
