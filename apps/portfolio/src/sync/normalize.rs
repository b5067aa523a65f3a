//! Document-level transforms shared by push, pull and the commit relay.

use serde_json::{Map, Value};

/// Store-managed fields that are not part of the canonical document.
pub const BOOKKEEPING_FIELDS: [&str; 5] = ["_id", "_type", "_rev", "_createdAt", "_updatedAt"];

/// Turns escaped `\n` sequences into real newlines.
///
/// Only strings that contain the two-character escape and no literal newline are
/// touched; everything else is returned unchanged. Applying it twice is a no-op.
pub fn normalize_newlines(value: Value) -> Value {
    match value {
        Value::String(s) if s.contains("\\n") && !s.contains('\n') => {
            Value::String(s.replace("\\n", "\n"))
        }
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_newlines).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, normalize_newlines(v)))
                .collect::<Map<String, Value>>(),
        ),
        other => other,
    }
}

/// Removes the top-level bookkeeping fields. Idempotent.
pub fn strip_bookkeeping(value: Value) -> Value {
    match value {
        Value::Object(mut map) => {
            for field in BOOKKEEPING_FIELDS {
                map.shift_remove(field);
            }
            Value::Object(map)
        }
        other => other,
    }
}

/// Pretty JSON with 2-space indentation and exactly one trailing newline.
pub fn to_canonical_json(value: &Value) -> Result<String, serde_json::Error> {
    let mut out = serde_json::to_string_pretty(value)?;
    out.push('\n');
    Ok(out)
}
