use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure while reading or writing the document through a store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("cannot write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("backup of {} failed: {source}", .path.display())]
    Backup { path: PathBuf, source: io::Error },
}

/// Every way a commit can be refused. The `Display` text is what an edit
/// session reports to the user; all variants go through the same path.
#[derive(Debug, Error)]
pub enum PatchError {
    #[error("invalid JSON: {0}")]
    InvalidJson(String),
    #[error("path {path} does not resolve{}", at_segment(.segment))]
    InvalidPath {
        path: String,
        segment: Option<String>,
    },
    #[error("invalid path expression: {0}")]
    InvalidPathSyntax(String),
    #[error("no edit in progress")]
    NotEditing,
    #[error(transparent)]
    Store(#[from] StoreError),
}

fn at_segment(segment: &Option<String>) -> String {
    segment.as_ref().map(|s| format!(" at {s}")).unwrap_or_default()
}

impl From<serde_json::Error> for PatchError {
    fn from(e: serde_json::Error) -> Self {
        PatchError::InvalidJson(e.to_string())
    }
}
