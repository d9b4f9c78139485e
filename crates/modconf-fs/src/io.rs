//! Filesystem primitives used during resolution

use std::fs;

use crate::{Error, NormalizedPath, Result};

/// What a path points at, following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    /// Sockets, FIFOs, devices.
    Other,
}

/// Stat `path` and classify it.
///
/// A missing path is an error, not a variant: callers that reference
/// a path expect it to exist.
pub fn entry_kind(path: &NormalizedPath) -> Result<EntryKind> {
    let native_path = path.to_native();
    let metadata = fs::metadata(&native_path).map_err(|e| Error::io(&native_path, e))?;

    let kind = if metadata.is_file() {
        EntryKind::File
    } else if metadata.is_dir() {
        EntryKind::Directory
    } else {
        EntryKind::Other
    };
    tracing::trace!(path = %path, ?kind, "stat");
    Ok(kind)
}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}
