use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentStyle {
    Pretty,
    Compact,
}

/// How whole documents are written back after a commit. Flat projections
/// ignore this and always use two-space indentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorOptions {
    pub style: DocumentStyle,
    pub indent: usize,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            style: DocumentStyle::Pretty,
            indent: 2,
        }
    }
}

impl EditorOptions {
    pub fn compact() -> Self {
        Self {
            style: DocumentStyle::Compact,
            ..Self::default()
        }
    }

    pub fn serialize(&self, value: &Value) -> String {
        match self.style {
            DocumentStyle::Pretty => to_indented_string(value, self.indent),
            DocumentStyle::Compact => value.to_string(),
        }
    }
}

pub(crate) fn to_indented_string(value: &Value, indent: usize) -> String {
    let pad = vec![b' '; indent];
    let mut out = Vec::new();
    let mut ser = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(&pad));
    // Writing a Value into a Vec cannot fail and always yields UTF-8.
    match value.serialize(&mut ser) {
        Ok(()) => String::from_utf8(out).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned()),
        Err(_) => value.to_string(),
    }
}
