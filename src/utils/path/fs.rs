//! Path normalization utilities.
//!
//! Provides consistent path handling across the codebase:
//! - `normalize_path` - file system paths (canonicalize + fallback)
//! - `resolve_path` - resolve paths declared relative to a definition file
//! - `same_path` - case-insensitive path equality used for bundle lookups

use std::path::{Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Resolve a path relative to a base directory.
///
/// Absolute paths are used as-is. Bundle definitions declare their inputs and
/// outputs relative to the directory holding the definition file, so that
/// directory is the usual `base_dir`.
#[inline]
pub fn resolve_path(path: &Path, base_dir: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    normalize_path(&base_dir.join(path))
}

/// Compare two paths ignoring ASCII case, after normalization.
///
/// Bundle outputs and inputs are matched the way hosts on case-insensitive
/// filesystems see them.
pub fn same_path(a: &Path, b: &Path) -> bool {
    let a = normalize_path(a);
    let b = normalize_path(b);
    a.to_string_lossy()
        .eq_ignore_ascii_case(&b.to_string_lossy())
}
