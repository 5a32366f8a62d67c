//! Shared test utilities for the actguard workspace.
//!
//! Lives outside `#[cfg(test)]` so integration tests of several crates can
//! compare reports produced at different times.

use serde_json::Value;

const TIMESTAMP_KEYS: &[&str] = &["started_at", "finished_at"];

/// Normalize non-deterministic JSON fields for golden comparison.
///
/// - `tool.version` becomes `"__VERSION__"`, but only when the root object is
///   a report envelope (`schema`, `tool`, `outcome`, `report`). Verdict
///   snapshots can embed arbitrary markup and must stay untouched.
/// - Envelope timestamps become `"__TIMESTAMP__"` at any depth.
pub fn normalize_nondeterministic(mut value: Value) -> Value {
    if let Some(obj) = value.as_object_mut() {
        let is_envelope = ["schema", "tool", "outcome", "report"]
            .iter()
            .all(|key| obj.contains_key(*key));
        if is_envelope
            && let Some(tool) = obj.get_mut("tool")
            && let Some(tool_obj) = tool.as_object_mut()
            && tool_obj.contains_key("version")
        {
            tool_obj.insert(
                "version".to_string(),
                Value::String("__VERSION__".to_string()),
            );
        }
    }
    normalize_timestamps_recursive(&mut value);
    value
}

fn normalize_timestamps_recursive(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for key in TIMESTAMP_KEYS {
                if let Some(slot) = map.get_mut(*key) {
                    *slot = Value::String("__TIMESTAMP__".to_string());
                }
            }
            map.values_mut().for_each(normalize_timestamps_recursive);
        }
        Value::Array(items) => items.iter_mut().for_each(normalize_timestamps_recursive),
        _ => {}
    }
}
