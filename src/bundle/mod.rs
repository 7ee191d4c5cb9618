//! Bundles: groups of sources concatenated into one declared output.
//!
//! The definition document belongs to the host; the pipeline only reads it
//! through [`BundleSource`]. [`JsonBundleStore`] reads `bundleconfig.json`.

mod concat;
mod store;

pub use concat::concatenate;
pub use store::JsonBundleStore;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::asset::{RegenPlan, SourceKind};
use crate::log;
use crate::utils::path::{resolve_path, same_path};

/// Bundle definition problems, plus unreadable bundle inputs.
#[derive(Debug, Error)]
pub enum BundleError {
    #[error("failed to read bundle definition `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("malformed bundle definition `{0}`")]
    Json(PathBuf, #[source] serde_json::Error),

    #[error("invalid bundle #{index} in `{path}`: {reason}")]
    Invalid {
        path: PathBuf,
        index: usize,
        reason: &'static str,
    },

    #[error("failed to read bundle input `{0}`")]
    Input(PathBuf, #[source] std::io::Error),
}

/// One entry of a bundle definition document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    /// Output path, relative to the definition file's directory.
    pub output_file_name: PathBuf,

    /// Inputs in concatenation order, relative like the output.
    #[serde(default)]
    pub input_files: Vec<PathBuf>,

    #[serde(default)]
    pub minify: BundleMinify,

    /// Attach regenerated outputs to the host's project tree.
    #[serde(default = "default_true")]
    pub include_in_project: bool,

    #[serde(default)]
    pub source_map: bool,

    /// Definition file this bundle was read from (internal use only)
    #[serde(skip)]
    pub definition: PathBuf,
}

/// `minify` object of a bundle entry. Engine-specific keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleMinify {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub gzip: bool,
}

impl Default for BundleMinify {
    fn default() -> Self {
        Self {
            enabled: true,
            gzip: false,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Bundle {
    fn base_dir(&self) -> &Path {
        self.definition.parent().unwrap_or(Path::new(""))
    }

    /// Absolute output path.
    pub fn output_path(&self) -> PathBuf {
        resolve_path(&self.output_file_name, self.base_dir())
    }

    /// Absolute input paths in declared order.
    pub fn input_paths(&self) -> Vec<PathBuf> {
        let base = self.base_dir();
        self.input_files
            .iter()
            .map(|input| resolve_path(input, base))
            .collect()
    }

    pub fn kind(&self) -> Option<SourceKind> {
        SourceKind::from_path(&self.output_file_name)
    }

    /// Artifacts this bundle opts into.
    pub fn plan(&self) -> RegenPlan {
        RegenPlan::explicit(self.source_map, self.minify.gzip)
    }

    pub fn produces(&self, output: &Path) -> bool {
        same_path(&self.output_path(), output)
    }

    pub fn consumes(&self, source: &Path) -> bool {
        self.input_paths()
            .iter()
            .any(|input| same_path(input, source))
    }

    fn validate(&self, index: usize) -> Result<(), BundleError> {
        let invalid = |reason| BundleError::Invalid {
            path: self.definition.clone(),
            index,
            reason,
        };
        if self.output_file_name.as_os_str().is_empty() {
            return Err(invalid("outputFileName is empty"));
        }
        if self.input_files.is_empty() {
            return Err(invalid("inputFiles is empty"));
        }
        Ok(())
    }
}

/// Read access to bundle definitions.
pub trait BundleSource: Send + Sync {
    /// All bundles declared in `definition`.
    fn bundles(&self, definition: &Path) -> Result<Vec<Bundle>, BundleError>;

    /// Bundles whose output is `output`. A malformed definition yields none.
    fn resolve_bundles_producing(&self, definition: &Path, output: &Path) -> Vec<Bundle> {
        match self.bundles(definition) {
            Ok(bundles) => bundles.into_iter().filter(|b| b.produces(output)).collect(),
            Err(e) => {
                log!("bundle"; "{:#}", anyhow::Error::new(e));
                Vec::new()
            }
        }
    }

    /// Bundles that list `source` among their inputs.
    fn bundles_consuming(
        &self,
        definition: &Path,
        source: &Path,
    ) -> Result<Vec<Bundle>, BundleError> {
        Ok(self
            .bundles(definition)?
            .into_iter()
            .filter(|b| b.consumes(source))
            .collect())
    }
}
