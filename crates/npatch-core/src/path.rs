// Node addressing: ordered key/index segments from the document root.
// - `NodePath::render` gives the `$["a"][0]` form shown to users.
// - `NodePath::parse_expression` and `NodePath::from_pointer` read paths back
//   from that form or from an RFC 6901 JSON Pointer.
// - `resolve_parent` / `resolve_parent_mut` locate the container holding the
//   addressed slot; `lookup` returns the addressed value itself.
use std::fmt;

use serde_json::Value;
use tracing::debug;

use crate::error::PatchError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl Segment {
    fn render_into(&self, out: &mut String) {
        out.push('[');
        match self {
            Segment::Key(k) => out.push_str(&quote(k)),
            Segment::Index(i) => out.push_str(&i.to_string()),
        }
        out.push(']');
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = String::new();
        self.render_into(&mut s);
        f.write_str(&s)
    }
}

impl From<&str> for Segment {
    fn from(k: &str) -> Self {
        Segment::Key(k.to_string())
    }
}

impl From<String> for Segment {
    fn from(k: String) -> Self {
        Segment::Key(k)
    }
}

impl From<usize> for Segment {
    fn from(i: usize) -> Self {
        Segment::Index(i)
    }
}

fn quote(k: &str) -> String {
    // Serializing a str cannot fail.
    serde_json::to_string(k).unwrap_or_else(|_| format!("\"{}\"", k))
}

/// Array indices are only ever spelled canonically: `0`, `17`, never `017` or `+1`.
fn canonical_index(s: &str) -> Option<usize> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if s.len() > 1 && s.starts_with('0') {
        return None;
    }
    s.parse().ok()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath {
    segments: Vec<Segment>,
}

impl NodePath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn push(&mut self, seg: impl Into<Segment>) {
        self.segments.push(seg.into());
    }

    pub fn child(&self, seg: impl Into<Segment>) -> Self {
        let mut out = self.clone();
        out.push(seg);
        out
    }

    /// `$` followed by one bracketed segment per step, e.g. `$["customer"][0]`.
    pub fn render(&self) -> String {
        let mut out = String::from("$");
        for seg in &self.segments {
            seg.render_into(&mut out);
        }
        out
    }

    /// Inverse of [`NodePath::render`].
    pub fn parse_expression(expr: &str) -> Result<Self, PatchError> {
        let bad = |why: &str| PatchError::InvalidPathSyntax(format!("{expr}: {why}"));
        let rest = expr.trim();
        let mut rest = rest.strip_prefix('$').ok_or_else(|| bad("must start with `$`"))?;
        let mut segments = Vec::new();
        while !rest.is_empty() {
            rest = rest.strip_prefix('[').ok_or_else(|| bad("expected `[`"))?;
            if rest.starts_with('"') {
                let end = string_literal_end(rest).ok_or_else(|| bad("unterminated key"))?;
                let key: String = serde_json::from_str(&rest[..end]).map_err(|e| bad(&e.to_string()))?;
                segments.push(Segment::Key(key));
                rest = &rest[end..];
            } else {
                let digits = rest.find(']').ok_or_else(|| bad("expected `]`"))?;
                let idx = canonical_index(&rest[..digits]).ok_or_else(|| bad("index must be a non-negative integer"))?;
                segments.push(Segment::Index(idx));
                rest = &rest[digits..];
            }
            rest = rest.strip_prefix(']').ok_or_else(|| bad("expected `]`"))?;
        }
        Ok(Self { segments })
    }

    /// Reads an RFC 6901 pointer. Purely numeric tokens become indices; they
    /// still address object members of the same name during resolution.
    pub fn from_pointer(pointer: &str) -> Result<Self, PatchError> {
        if pointer.is_empty() {
            return Ok(Self::root());
        }
        let body = pointer
            .strip_prefix('/')
            .ok_or_else(|| PatchError::InvalidPathSyntax(format!("{pointer}: pointer must start with `/`")))?;
        let segments = body
            .split('/')
            .map(|tok| {
                let tok = unescape_token(tok);
                match canonical_index(&tok) {
                    Some(i) => Segment::Index(i),
                    None => Segment::Key(tok),
                }
            })
            .collect();
        Ok(Self { segments })
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<Vec<Segment>> for NodePath {
    fn from(segments: Vec<Segment>) -> Self {
        Self { segments }
    }
}

impl FromIterator<Segment> for NodePath {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Self { segments: iter.into_iter().collect() }
    }
}

fn unescape_token(tok: &str) -> String {
    let s = tok.replace("~1", "/");
    s.replace("~0", "~")
}

/// Byte offset just past the closing quote of the JSON string literal at the
/// start of `s`.
fn string_literal_end(s: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in s.char_indices().skip(1) {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => return Some(i + 1),
            _ => {}
        }
    }
    None
}

fn is_container(v: &Value) -> bool {
    matches!(v, Value::Object(_) | Value::Array(_))
}

/// Reads one slot of a container. Indices address object members by their
/// decimal name and keys address array elements when they spell an index.
pub fn child<'a>(container: &'a Value, seg: &Segment) -> Option<&'a Value> {
    match (container, seg) {
        (Value::Object(map), Segment::Key(k)) => map.get(k),
        (Value::Object(map), Segment::Index(i)) => map.get(&i.to_string()),
        (Value::Array(arr), Segment::Index(i)) => arr.get(*i),
        (Value::Array(arr), Segment::Key(k)) => canonical_index(k).and_then(|i| arr.get(i)),
        _ => None,
    }
}

fn child_mut<'a>(container: &'a mut Value, seg: &Segment) -> Option<&'a mut Value> {
    match (container, seg) {
        (Value::Object(map), Segment::Key(k)) => map.get_mut(k),
        (Value::Object(map), Segment::Index(i)) => map.get_mut(&i.to_string()),
        (Value::Array(arr), Segment::Index(i)) => arr.get_mut(*i),
        (Value::Array(arr), Segment::Key(k)) => canonical_index(k).and_then(move |i| arr.get_mut(i)),
        _ => None,
    }
}

/// Stores `value` in one slot of `container`. New object keys are appended;
/// an array accepts any existing index or exactly its length (append).
/// Returns the value back when the slot cannot exist.
pub fn write_slot(container: &mut Value, seg: &Segment, value: Value) -> Result<(), Value> {
    match (container, seg) {
        (Value::Object(map), Segment::Key(k)) => {
            map.insert(k.clone(), value);
            Ok(())
        }
        (Value::Object(map), Segment::Index(i)) => {
            map.insert(i.to_string(), value);
            Ok(())
        }
        (Value::Array(arr), seg) => {
            let idx = match seg {
                Segment::Index(i) => Some(*i),
                Segment::Key(k) => canonical_index(k),
            };
            match idx {
                Some(i) if i < arr.len() => {
                    arr[i] = value;
                    Ok(())
                }
                Some(i) if i == arr.len() => {
                    arr.push(value);
                    Ok(())
                }
                _ => Err(value),
            }
        }
        _ => Err(value),
    }
}

fn invalid(path: &NodePath, seg: Option<&Segment>) -> PatchError {
    PatchError::InvalidPath {
        path: path.render(),
        segment: seg.map(|s| s.to_string()),
    }
}

/// Walks every segment but the last and returns the container reached plus
/// the terminal segment. Errors name the first segment that is missing or
/// lands on a scalar; a scalar root is reported at the terminal segment.
/// The root path has no parent and is reported as `InvalidPath`; callers
/// handle the root before resolving.
pub fn resolve_parent<'a, 'p>(root: &'a Value, path: &'p NodePath) -> Result<(&'a Value, &'p Segment), PatchError> {
    let (last, init) = path.segments.split_last().ok_or_else(|| invalid(path, None))?;
    let mut cur = root;
    for seg in init {
        cur = child(cur, seg).ok_or_else(|| invalid(path, Some(seg)))?;
        if !is_container(cur) {
            return Err(invalid(path, Some(seg)));
        }
    }
    if !is_container(cur) {
        return Err(invalid(path, Some(last)));
    }
    Ok((cur, last))
}

/// Mutable counterpart of [`resolve_parent`].
pub fn resolve_parent_mut<'a, 'p>(
    root: &'a mut Value,
    path: &'p NodePath,
) -> Result<(&'a mut Value, &'p Segment), PatchError> {
    let (last, init) = path.segments.split_last().ok_or_else(|| invalid(path, None))?;
    let mut cur = root;
    for seg in init {
        cur = match child_mut(cur, seg) {
            Some(next) => next,
            None => {
                debug!(path = %path, segment = %seg, "segment does not resolve");
                return Err(invalid(path, Some(seg)));
            }
        };
        if !is_container(cur) {
            debug!(path = %path, segment = %seg, "segment is not a container");
            return Err(invalid(path, Some(seg)));
        }
    }
    if !is_container(cur) {
        return Err(invalid(path, Some(last)));
    }
    Ok((cur, last))
}

/// The value addressed by the full path, if any.
pub fn lookup<'a>(root: &'a Value, path: &NodePath) -> Option<&'a Value> {
    path.segments.iter().try_fold(root, |cur, seg| child(cur, seg))
}
