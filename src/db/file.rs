use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, info, warn};

use super::schema::{self, StoreDocument, Validated};
use crate::error::AppResult;

/// The JSON document on disk holding every bookmark.
///
/// Every read goes back to the file; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct DataFile {
    path: PathBuf,
}

impl DataFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted document.
    ///
    /// A missing file is initialized with an empty document. A file that fails
    /// validation reads as empty and is left untouched on disk. Other I/O errors
    /// propagate.
    pub fn load(&self) -> AppResult<StoreDocument> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("Initializing bookmark store at {}", self.path.display());
                let doc = StoreDocument::default();
                self.persist(&doc)?;
                return Ok(doc);
            }
            Err(e) => return Err(e.into()),
        };

        match schema::validate(&raw) {
            Validated::Valid(doc) => {
                debug!(
                    "Loaded {} bookmarks from {}",
                    doc.bookmarks.len(),
                    self.path.display()
                );
                Ok(doc)
            }
            Validated::Fallback(reason) => {
                warn!(
                    "Ignoring unreadable bookmark store {}: {}",
                    self.path.display(),
                    reason
                );
                Ok(StoreDocument::default())
            }
        }
    }

    /// Overwrite the file with the whole document. Not atomic across crashes.
    ///
    /// A file that currently fails validation is renamed aside first, so a
    /// write after a corrupt read never destroys what was there.
    pub fn persist(&self, doc: &StoreDocument) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        self.set_aside_if_corrupt()?;

        let content = serde_json::to_string_pretty(doc)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    /// Path the corrupt file is moved to: `<name>.corrupt-<UTC timestamp>`.
    fn backup_path(&self) -> PathBuf {
        let stamp = Utc::now().format("%Y%m%dT%H%M%S%3fZ");
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(format!(".corrupt-{}", stamp));
        self.path.with_file_name(name)
    }

    fn set_aside_if_corrupt(&self) -> AppResult<()> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        if let Validated::Fallback(reason) = schema::validate(&raw) {
            let backup = self.backup_path();
            fs::rename(&self.path, &backup)?;
            warn!(
                "Moved unreadable bookmark store ({}) to {} before overwriting",
                reason,
                backup.display()
            );
        }
        Ok(())
    }
}
