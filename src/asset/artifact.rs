//! Derived artifact kinds and their on-disk locations.
//!
//! For a source `name.ext` the pipeline owns exactly three sidecars:
//!
//! ```text
//! name.min.ext       minified
//! name.min.ext.map   source map
//! name.min.ext.gz    gzip copy of the minified file
//! ```
//!
//! Paths are always recomputed from the source path, never stored.

use std::fmt;
use std::path::{Path, PathBuf};

use super::kind::is_minified;

/// A derived file produced from one source or bundle output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Minified,
    SourceMap,
    Gzip,
}

impl ArtifactKind {
    /// All kinds, in the order the writer persists them.
    pub const ALL: [Self; 3] = [Self::Minified, Self::Gzip, Self::SourceMap];

    /// Derived path of this artifact for `source`.
    pub fn path_for(self, source: &Path) -> PathBuf {
        let minified = minified_path(source);
        match self {
            Self::Minified => minified,
            Self::SourceMap => append_extension(&minified, "map"),
            Self::Gzip => append_extension(&minified, "gz"),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Minified => "minified",
            Self::SourceMap => "source map",
            Self::Gzip => "gzip",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `app.js` -> `app.min.js`
///
/// A path that is already `*.min.ext` maps to itself: bundle outputs may be
/// declared with the `.min` name and are then minified in place.
pub fn minified_path(source: &Path) -> PathBuf {
    if is_minified(source) {
        return source.to_path_buf();
    }

    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match source.extension() {
        Some(ext) => format!("{stem}.min.{}", ext.to_string_lossy()),
        None => format!("{stem}.min"),
    };
    source.with_file_name(name)
}

/// `app.min.js` + `map` -> `app.min.js.map`
fn append_extension(path: &Path, ext: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(ext);
    path.with_file_name(name)
}
