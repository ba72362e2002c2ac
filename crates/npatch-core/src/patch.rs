//! Commit pipeline: parse the draft, locate the slot, merge, reserialize and
//! re-project the updated node.

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::EditorOptions;
use crate::error::PatchError;
use crate::merge::merge;
use crate::path::{NodePath, child, resolve_parent_mut, write_slot};
use crate::project::project_value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchKind {
    /// The draft was merged into (or replaced) the value at a non-root path.
    Merged,
    /// The path was the root; the draft replaced the whole document.
    RootReplaced,
    /// The old document did not parse and was discarded; the draft is now
    /// the whole document.
    DocumentUnparseable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Patched {
    /// Full document text to hand back to the document store.
    pub document: String,
    /// Flat projection of the updated node, the session's next baseline.
    pub baseline: String,
    pub kind: PatchKind,
}

/// Parses an edited flat projection. Blank text means an empty mapping.
pub fn parse_draft(draft: &str) -> Result<Value, PatchError> {
    if draft.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }
    Ok(serde_json::from_str(draft)?)
}

/// Applies `draft` at `path` inside `document`. On error nothing is produced
/// and the caller's document text is left as it was.
pub fn commit(document: &str, path: &NodePath, draft: &str, opts: &EditorOptions) -> Result<Patched, PatchError> {
    let incoming = parse_draft(draft)?;

    let mut root: Value = match serde_json::from_str(document) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, path = %path, "document does not parse, replacing it with the edited node");
            let text = opts.serialize(&incoming);
            return Ok(Patched {
                document: text.clone(),
                baseline: text,
                kind: PatchKind::DocumentUnparseable,
            });
        }
    };

    if path.is_root() {
        let text = opts.serialize(&incoming);
        info!(path = %path, "root replaced");
        return Ok(Patched {
            document: text.clone(),
            baseline: text,
            kind: PatchKind::RootReplaced,
        });
    }

    let (parent, terminal) = resolve_parent_mut(&mut root, path)?;
    let merged = merge(child(parent, terminal), incoming);
    let baseline = project_value(&merged);
    if write_slot(parent, terminal, merged).is_err() {
        debug!(path = %path, segment = %terminal, "terminal slot cannot be written");
        return Err(PatchError::InvalidPath {
            path: path.render(),
            segment: Some(terminal.to_string()),
        });
    }

    info!(path = %path, "node patched");
    Ok(Patched {
        document: opts.serialize(&root),
        baseline,
        kind: PatchKind::Merged,
    })
}
