//! npatch-core: view and patch one node of a JSON document by path
//!
//! This crate focuses on a small, well-factored surface:
//! - Path addressing (`$["a"][0]` expressions and JSON Pointers) and resolution
//! - Flat projection of a node, hiding nested members
//! - Shallow merge-or-replace of an edited node back into the document
//! - An edit session with baseline/draft state over pluggable document stores
//!
pub mod backup;
pub mod config;
pub mod error;
pub mod merge;
pub mod model;
pub mod patch;
pub mod path;
pub mod project;
pub mod session;
pub mod store;

pub use config::{DocumentStyle, EditorOptions};
pub use error::{PatchError, StoreError};
pub use merge::merge;
pub use model::{ChildRow, JsonKind, Node};
pub use patch::{PatchKind, Patched, commit, parse_draft};
pub use path::{NodePath, Segment, lookup, resolve_parent};
pub use project::{project, project_value};
pub use session::{EditSession, Mode};
pub use store::{DocumentSource, EditorBuffer, FileDocument, MemoryBuffer, MemoryDocument};

/// Renders a path as a bracketed index expression; the root is `$`.
pub fn render_path(path: &NodePath) -> String {
    path.render()
}
