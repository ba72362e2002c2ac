//! Edit state for the currently selected node.
//!
//! A session holds the last committed flat text (`baseline`), the text being
//! typed (`draft`), whether editing is active, and the last error message.
//! Failed commits never touch the draft, so typed input survives errors.

use tracing::{debug, info};

use crate::config::EditorOptions;
use crate::error::PatchError;
use crate::model::Node;
use crate::patch::{PatchKind, commit};
use crate::path::NodePath;
use crate::project::project;
use crate::store::{DocumentSource, EditorBuffer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Viewing,
    Editing,
}

#[derive(Debug, Clone)]
pub struct EditSession {
    node: Option<Node>,
    baseline: String,
    draft: String,
    mode: Mode,
    error: Option<String>,
    options: EditorOptions,
}

impl EditSession {
    pub fn new(node: Option<Node>) -> Self {
        Self::with_options(node, EditorOptions::default())
    }

    pub fn with_options(node: Option<Node>, options: EditorOptions) -> Self {
        let flat = project(node.as_ref());
        Self {
            node,
            baseline: flat.clone(),
            draft: flat,
            mode: Mode::Viewing,
            error: None,
            options,
        }
    }

    /// Selection changed: start over from a fresh projection of `node`.
    pub fn reset(&mut self, node: Option<Node>) {
        let flat = project(node.as_ref());
        debug!(path = %node.as_ref().map(|n| n.path.render()).unwrap_or_default(), "session reset");
        self.node = node;
        self.baseline = flat.clone();
        self.draft = flat;
        self.mode = Mode::Viewing;
        self.error = None;
    }

    /// Showing or hiding the view also discards any edit in progress.
    pub fn set_visible(&mut self, visible: bool, node: Option<Node>) {
        self.reset(if visible { node } else { None });
    }

    pub fn enter_edit(&mut self) {
        self.mode = Mode::Editing;
        self.error = None;
    }

    /// Replaces the in-progress text. Ignored unless editing.
    pub fn set_draft(&mut self, text: impl Into<String>) {
        if self.mode == Mode::Editing {
            self.draft = text.into();
        }
    }

    pub fn cancel(&mut self) {
        self.draft = self.baseline.clone();
        self.mode = Mode::Viewing;
        self.error = None;
    }

    /// Writes the draft into the document at the node's path. On success the
    /// new document goes to `source` and then to `buffer`, and the re-projected
    /// node becomes both baseline and draft. On failure the message is kept in
    /// `error` and the session stays in edit mode.
    pub fn commit<S, B>(&mut self, source: &mut S, buffer: &mut B) -> Result<PatchKind, PatchError>
    where
        S: DocumentSource + ?Sized,
        B: EditorBuffer + ?Sized,
    {
        if self.mode != Mode::Editing {
            return Err(PatchError::NotEditing);
        }
        match self.try_commit(source, buffer) {
            Ok((kind, baseline)) => {
                info!(path = %self.path(), ?kind, "commit applied");
                self.draft = baseline.clone();
                self.baseline = baseline;
                self.mode = Mode::Viewing;
                self.error = None;
                Ok(kind)
            }
            Err(e) => {
                debug!(path = %self.path(), error = %e, "commit refused");
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    fn try_commit<S, B>(&self, source: &mut S, buffer: &mut B) -> Result<(PatchKind, String), PatchError>
    where
        S: DocumentSource + ?Sized,
        B: EditorBuffer + ?Sized,
    {
        let document = source.read()?;
        let patched = commit(&document, &self.path(), &self.draft, &self.options)?;
        source.write(patched.document.clone())?;
        buffer.set_contents(patched.document, true);
        Ok((patched.kind, patched.baseline))
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        self.mode == Mode::Editing
    }

    pub fn baseline(&self) -> &str {
        &self.baseline
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn node(&self) -> Option<&Node> {
        self.node.as_ref()
    }

    /// Path of the selected node; the root when nothing is selected.
    pub fn path(&self) -> NodePath {
        self.node.as_ref().map(|n| n.path.clone()).unwrap_or_default()
    }

    pub fn path_expression(&self) -> String {
        self.path().render()
    }

    pub fn is_dirty(&self) -> bool {
        self.draft != self.baseline
    }
}
