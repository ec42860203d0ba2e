//! Persisting rewritten text back to disk.
//!
//! The engine is pure; this is the only module that writes files. Writes
//! are atomic (tempfile + fsync + rename) so a crash mid-write leaves the
//! original file intact.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApplyError {
    #[error("Path has no parent directory: {0}")]
    NoParent(PathBuf),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of writing a file's rewritten text.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "WriteOutcome should be checked for written/unchanged"]
pub enum WriteOutcome {
    /// New text was written to the file.
    Written { file: PathBuf },
    /// The text already matched; nothing was touched.
    Unchanged { file: PathBuf },
}

/// Write `text` to `path` atomically, skipping the write entirely when
/// the on-disk content already matches.
pub fn write_rewritten(path: &Path, text: &str) -> Result<WriteOutcome, ApplyError> {
    let current = fs::read_to_string(path)?;
    if current == text {
        return Ok(WriteOutcome::Unchanged {
            file: path.to_path_buf(),
        });
    }

    atomic_write(path, text.as_bytes())?;

    Ok(WriteOutcome::Written {
        file: path.to_path_buf(),
    })
}

/// Atomic file write: tempfile in the same directory, fsync, rename.
fn atomic_write(path: &Path, content: &[u8]) -> Result<(), ApplyError> {
    // Same directory so the rename never crosses a filesystem.
    let parent = path
        .parent()
        .ok_or_else(|| ApplyError::NoParent(path.to_path_buf()))?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;

    Ok(())
}
