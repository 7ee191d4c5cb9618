//! Whole-file replacement through a temp file in the target directory.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::debug;
use crate::utils::hash::ContentHash;

/// Replace `path` with `content` atomically.
///
/// Readers see either the old file or the new one, never a partial write.
/// Missing parent directories are created.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Write `content` only when it differs from what is on disk.
///
/// Returns whether the file changed.
pub fn write_if_changed(path: &Path, content: &[u8]) -> io::Result<bool> {
    let new_hash = ContentHash::of(content);
    if ContentHash::of_file(path)? == Some(new_hash) {
        debug!("write"; "unchanged {} ({new_hash})", path.display());
        return Ok(false);
    }
    atomic_write(path, content)?;
    Ok(true)
}
