use serde_json::Value;

use crate::path::{NodePath, lookup};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonKind {
    Null,
    Bool,
    Number,
    String,
    Object,
    Array,
}

impl JsonKind {
    pub fn of(v: &Value) -> Self {
        match v {
            Value::Null => JsonKind::Null,
            Value::Bool(_) => JsonKind::Bool,
            Value::Number(_) => JsonKind::Number,
            Value::String(_) => JsonKind::String,
            Value::Object(_) => JsonKind::Object,
            Value::Array(_) => JsonKind::Array,
        }
    }

    pub fn is_nested(self) -> bool {
        matches!(self, JsonKind::Object | JsonKind::Array)
    }
}

/// One displayed child of a node: a member of an object, or the node's whole
/// value when it is an array element or scalar.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildRow {
    pub key: Option<String>,
    pub value: Value,
    pub kind: JsonKind,
}

impl ChildRow {
    pub fn keyed(key: impl Into<String>, value: Value) -> Self {
        let kind = JsonKind::of(&value);
        Self { key: Some(key.into()), value, kind }
    }

    pub fn unkeyed(value: Value) -> Self {
        let kind = JsonKind::of(&value);
        Self { key: None, value, kind }
    }
}

/// A selected node: where it lives and the rows it was displayed with.
/// The rows are a view of the document at selection time and go stale when
/// the document changes shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    pub path: NodePath,
    pub rows: Vec<ChildRow>,
}

impl Node {
    pub fn new(path: NodePath, rows: Vec<ChildRow>) -> Self {
        Self { path, rows }
    }

    /// The absent selection: root path, no rows.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Derives the rows a graph view shows for the value at `path`: objects
    /// list their members, anything else is one unkeyed row.
    pub fn from_document(root: &Value, path: &NodePath) -> Option<Self> {
        let value = lookup(root, path)?;
        Some(Self::new(path.clone(), rows_of(value)))
    }
}

pub fn rows_of(value: &Value) -> Vec<ChildRow> {
    match value {
        Value::Object(map) => map.iter().map(|(k, v)| ChildRow::keyed(k.clone(), v.clone())).collect(),
        other => vec![ChildRow::unkeyed(other.clone())],
    }
}
