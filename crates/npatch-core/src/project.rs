//! Flat projection of a node: the editable text that hides nested members.
//!
//! The projection is lossy. Object and array members are dropped, and they
//! survive a commit only because the engine merges the edited mapping back
//! into the live document instead of replacing it.

use serde_json::{Map, Value};

use crate::config::to_indented_string;
use crate::model::{ChildRow, Node};

/// Flat text for a selected node, or for no selection (`None` reads as no rows).
pub fn project(node: Option<&Node>) -> String {
    project_rows(node.map(|n| n.rows.as_slice()).unwrap_or_default())
}

pub fn project_rows(rows: &[ChildRow]) -> String {
    match rows {
        [] => "{}".to_string(),
        [only] if only.key.is_none() => bare_text(&only.value),
        rows => {
            let flat: Map<String, Value> = rows
                .iter()
                .filter(|row| !row.kind.is_nested())
                .filter_map(|row| Some((row.key.clone()?, row.value.clone())))
                .collect();
            to_indented_string(&Value::Object(flat), 2)
        }
    }
}

/// Flat text for a value held directly, as produced after a commit: mappings
/// lose their nested members, strings are raw and everything else is JSON.
pub fn project_value(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let flat: Map<String, Value> = map
                .iter()
                .filter(|(_, v)| !matches!(v, Value::Object(_) | Value::Array(_)))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            to_indented_string(&Value::Object(flat), 2)
        }
        other => bare_text(other),
    }
}

fn bare_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null | Value::Bool(_) | Value::Number(_) => value.to_string(),
        nested => to_indented_string(nested, 2),
    }
}
