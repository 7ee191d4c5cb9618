//! Tool configuration (`minbundle.toml`).
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── error     # ConfigError
//! ├── section   # [pipeline], [minify.*], [gzip]
//! ├── util      # config file discovery
//! └── mod.rs    # MinbundleConfig (this file)
//! ```
//!
//! The file is optional: without one every section takes its defaults and
//! the project root is the current directory.

mod error;
mod section;
mod util;

pub use error::ConfigError;
pub use section::{CssConfig, HtmlConfig, JsConfig};

use section::{GzipConfig, MinifyConfig, PipelineConfig};

use crate::cli::Cli;
use crate::log;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use util::find_config_file;

/// Root configuration structure representing minbundle.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MinbundleConfig {
    /// Absolute path to the config file, if one was found (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Project root directory - parent of config file or cwd (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Pipeline behavior
    pub pipeline: PipelineConfig,

    /// Per-language engine settings
    pub minify: MinifyConfig,

    /// Gzip sidecar settings
    pub gzip: GzipConfig,
}

impl MinbundleConfig {
    /// Load configuration for a CLI invocation.
    ///
    /// Searches upward from cwd for the config file; falls back to defaults.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cli.config, &cwd) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.root = path.parent().map(Path::to_path_buf).unwrap_or_default();
                config.config_path = Some(path);
                config
            }
            None => Self {
                root: cwd,
                ..Self::default()
            },
        };

        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring: {}", display_path, fields.join(", "));
    }

    /// CLI flags override file settings.
    fn apply_cli(&mut self, cli: &Cli) {
        if cli.exclusive {
            self.pipeline.exclusive_outputs = true;
        }
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gzip.level > 9 {
            return Err(ConfigError::Validation(format!(
                "gzip.level must be between 0 and 9, got {}",
                self.gzip.level
            )));
        }
        if self.pipeline.bundle_file.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "pipeline.bundle_file must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Default bundle definition file under the project root.
    pub fn bundle_file(&self) -> PathBuf {
        self.root.join(&self.pipeline.bundle_file)
    }
}

// ============================================================================
// tests
// ============================================================================
