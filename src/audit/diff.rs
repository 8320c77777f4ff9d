//! Field-level change summaries for audit entries

use serde::Serialize;
use serde_json::Value;

/// Keys that change on every write and carry no information for a reviewer
const IGNORED_KEYS: &[&str] = &["updated_at"];

const MAX_SHOWN_CHARS: usize = 40;

/// Summarize top-level field changes between two JSON objects
///
/// Returns `None` when nothing a reviewer cares about changed.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    let changes = match (before, after) {
        (Value::Object(old), Value::Object(new)) => {
            let mut changes = Vec::new();
            for (key, old_val) in old {
                if IGNORED_KEYS.contains(&key.as_str()) {
                    continue;
                }
                match new.get(key) {
                    Some(new_val) if new_val == old_val => {}
                    Some(new_val) => changes.push(format!(
                        "{}: {} -> {}",
                        key,
                        format_value(old_val),
                        format_value(new_val)
                    )),
                    None => changes.push(format!("{}: {} -> (removed)", key, format_value(old_val))),
                }
            }
            for (key, new_val) in new {
                if !old.contains_key(key) && !IGNORED_KEYS.contains(&key.as_str()) {
                    changes.push(format!("{}: (added) -> {}", key, format_value(new_val)));
                }
            }
            changes
        }
        _ if before != after => vec![format!("{} -> {}", format_value(before), format_value(after))],
        _ => Vec::new(),
    };

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

/// Serialize both records and summarize what changed
pub fn diff_records<T: Serialize>(before: &T, after: &T) -> Option<String> {
    let before = serde_json::to_value(before).ok()?;
    let after = serde_json::to_value(after).ok()?;
    generate_diff(&before, &after)
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::String(s) if s.chars().count() > MAX_SHOWN_CHARS => {
            let head: String = s.chars().take(MAX_SHOWN_CHARS - 3).collect();
            format!("\"{}...\"", head)
        }
        Value::String(s) => format!("\"{}\"", s),
        Value::Array(items) => format!("[{} items]", items.len()),
        Value::Object(fields) => format!("{{{} fields}}", fields.len()),
        other => other.to_string(),
    }
}
