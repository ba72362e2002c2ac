// Seams to the stores that own the document and the text editor view.
// The session only talks to these traits, so tests and the CLI can supply
// in-memory or file-backed versions.
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::backup::zip_backup_file;
use crate::error::StoreError;

/// Owner of the full document text.
pub trait DocumentSource {
    fn read(&self) -> Result<String, StoreError>;
    fn write(&mut self, text: String) -> Result<(), StoreError>;
}

/// A textual editor showing the whole document, kept in sync after commits.
pub trait EditorBuffer {
    fn set_contents(&mut self, contents: String, has_changes: bool);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryDocument {
    text: String,
    writes: usize,
}

impl MemoryDocument {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), writes: 0 }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl DocumentSource for MemoryDocument {
    fn read(&self) -> Result<String, StoreError> {
        Ok(self.text.clone())
    }

    fn write(&mut self, text: String) -> Result<(), StoreError> {
        self.text = text;
        self.writes += 1;
        Ok(())
    }
}

/// Reads one JSON file and writes commits to it or to a separate output file.
#[derive(Debug, Clone)]
pub struct FileDocument {
    input: PathBuf,
    output: PathBuf,
    backup: bool,
    backed_up: Option<PathBuf>,
}

impl FileDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let input = path.into();
        Self {
            output: input.clone(),
            input,
            backup: false,
            backed_up: None,
        }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    /// Zip the existing output file once, before the first write replaces it.
    pub fn with_backup(mut self, backup: bool) -> Self {
        self.backup = backup;
        self
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Archive written by the backup step, if one ran.
    pub fn backup_path(&self) -> Option<&Path> {
        self.backed_up.as_deref()
    }
}

impl DocumentSource for FileDocument {
    fn read(&self) -> Result<String, StoreError> {
        fs::read_to_string(&self.input).map_err(|source| StoreError::Read {
            path: self.input.clone(),
            source,
        })
    }

    fn write(&mut self, text: String) -> Result<(), StoreError> {
        if self.backup && self.backed_up.is_none() && self.output.is_file() {
            let zip = zip_backup_file(&self.output).map_err(|source| StoreError::Backup {
                path: self.output.clone(),
                source,
            })?;
            info!(backup = %zip.display(), "backup written");
            self.backed_up = Some(zip);
        }
        fs::write(&self.output, text).map_err(|source| StoreError::Write {
            path: self.output.clone(),
            source,
        })?;
        debug!(path = %self.output.display(), "document written");
        Ok(())
    }
}

/// Records what the editor view was last told.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryBuffer {
    pub contents: Option<String>,
    pub has_changes: bool,
}

impl EditorBuffer for MemoryBuffer {
    fn set_contents(&mut self, contents: String, has_changes: bool) {
        self.contents = Some(contents);
        self.has_changes = has_changes;
    }
}
