//! Source kind detection.

use std::path::Path;

/// Kind of authored front-end source, determines which engine minifies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// JavaScript (.js)
    Script,
    /// CSS (.css)
    Stylesheet,
    /// HTML (.html, .htm)
    Markup,
}

impl SourceKind {
    /// Detect source kind from file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "js" => Some(Self::Script),
            "css" => Some(Self::Stylesheet),
            "html" | "htm" => Some(Self::Markup),
            _ => None,
        }
    }

    /// Detect source kind from file path.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Display name for this source kind.
    pub fn name(self) -> &'static str {
        match self {
            Self::Script => "script",
            Self::Stylesheet => "stylesheet",
            Self::Markup => "markup",
        }
    }

    /// Whether the engine can emit a source map for this kind.
    pub fn has_source_map(self) -> bool {
        matches!(self, Self::Script)
    }
}

/// Check if a path is something the pipeline can minify.
///
/// Already-minified files (`*.min.js`) are outputs, never sources.
#[inline]
pub fn is_supported(path: &Path) -> bool {
    SourceKind::from_path(path).is_some() && !is_minified(path)
}

/// Check if the file stem carries the `.min` marker.
pub fn is_minified(path: &Path) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|stem| stem.to_ascii_lowercase().ends_with(".min"))
}
