//! Transform boundary: source text in, minified artifacts out.
//!
//! A [`Transform`] never writes files. It returns a [`TransformResult`] that
//! holds everything the writer may persist.
//!
//! Two failure channels are kept apart:
//! - source problems (syntax errors) are [`Diagnostic`]s on a result with
//!   `success == false`
//! - a broken invocation (unsupported kind, engine malfunction) is a
//!   [`TransformError`]

mod css;
mod engine;
mod html;
mod js;

pub use engine::MinifyEngine;

use std::path::{Path, PathBuf};
use std::{fmt, fs};

use thiserror::Error;

use crate::asset::SourceKind;

/// Something that turns a source file into minified artifacts.
pub trait Transform: Send + Sync {
    /// Transform `text`, the content of `source`.
    ///
    /// `source` picks the engine and names the file in diagnostics and maps;
    /// it need not exist on disk.
    fn transform(
        &self,
        source: &Path,
        text: &str,
        want_gzip: bool,
        want_source_map: bool,
    ) -> Result<TransformResult, TransformError>;

    /// Read `source` and transform its content.
    fn invoke(
        &self,
        source: &Path,
        want_gzip: bool,
        want_source_map: bool,
    ) -> Result<TransformResult, TransformError> {
        let text =
            fs::read_to_string(source).map_err(|e| TransformError::Read(source.to_path_buf(), e))?;
        self.transform(source, &text, want_gzip, want_source_map)
    }
}

/// The transform boundary itself malfunctioned.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("unsupported source kind: `{0}`")]
    Unsupported(PathBuf),

    #[error("{kind} minification is disabled")]
    Disabled { kind: &'static str },

    #[error("failed to read source `{0}`")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("engine failure: {0}")]
    Engine(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Error => "error",
            Self::Warning => "warning",
        })
    }
}

/// A source-level problem reported by an engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub file: PathBuf,
    /// 1-based
    pub line: Option<u32>,
    /// 1-based
    pub column: Option<u32>,
}

impl Diagnostic {
    pub fn error(file: &Path, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            file: file.to_path_buf(),
            line: None,
            column: None,
        }
    }

    pub fn at(mut self, line: u32, column: u32) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{line}")?;
            if let Some(column) = self.column {
                write!(f, ":{column}")?;
            }
        }
        write!(f, ": {}: {}", self.severity, self.message)
    }
}

/// Output of one transform invocation. Immutable once built.
#[derive(Debug, Clone)]
pub struct TransformResult {
    pub source: PathBuf,
    pub kind: SourceKind,
    /// Absent when minification failed.
    pub minified: Option<String>,
    /// JSON text; only produced when requested and supported.
    pub source_map: Option<String>,
    /// Gzip of `minified`; only produced when requested and successful.
    pub gzip: Option<Vec<u8>>,
    pub diagnostics: Vec<Diagnostic>,
    pub success: bool,
}

impl TransformResult {
    /// Result for a source the engine rejected with diagnostics.
    pub fn failed(source: &Path, kind: SourceKind, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            source: source.to_path_buf(),
            kind,
            minified: None,
            source_map: None,
            gzip: None,
            diagnostics,
            success: false,
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.success
            || self
                .diagnostics
                .iter()
                .any(|d| d.severity == Severity::Error)
    }
}
