use serde_json::Value;
use tracing::debug;

/// Combines the value currently in a slot with the value parsed from an edit.
///
/// Two objects merge shallowly: incoming keys overwrite, keys only present in
/// `existing` stay, nested values are replaced whole. Any other pairing
/// (arrays, scalars, null, or a missing slot) yields `incoming` unchanged.
/// Nested members left out of a flat projection survive only through this.
pub fn merge(existing: Option<&Value>, incoming: Value) -> Value {
    match (existing, incoming) {
        (Some(Value::Object(old)), Value::Object(new)) => {
            debug!(kept = old.len(), incoming = new.len(), "shallow merge");
            let mut out = old.clone();
            for (k, v) in new {
                out.insert(k, v);
            }
            Value::Object(out)
        }
        (_, incoming) => incoming,
    }
}
