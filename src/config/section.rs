//! Configuration sections.
//!
//! # Example
//!
//! ```toml
//! [pipeline]
//! bundle_file = "bundleconfig.json"
//! exclusive_outputs = false
//!
//! [minify.js]
//! mangle = true
//! compress = true
//! module = false
//!
//! [minify.css]
//! enable = true
//!
//! [minify.html]
//! remove_comments = true
//! keep_closing_tags = true
//! minify_inline = true
//!
//! [gzip]
//! level = 9
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[pipeline]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Bundle definition file, relative to the project root.
    pub bundle_file: PathBuf,

    /// Serialize jobs that target the same output path.
    ///
    /// Off by default: concurrent jobs for one output may race on the
    /// filesystem, each write is still atomic.
    pub exclusive_outputs: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            bundle_file: PathBuf::from("bundleconfig.json"),
            exclusive_outputs: false,
        }
    }
}

/// `[minify]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MinifyConfig {
    pub js: JsConfig,
    pub css: CssConfig,
    pub html: HtmlConfig,
}

/// `[minify.js]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JsConfig {
    /// Rename local bindings.
    pub mangle: bool,
    /// Apply compressing transforms (dead code, constant folding).
    pub compress: bool,
    /// Parse sources as ES modules instead of classic scripts.
    ///
    /// Unused top-level declarations of a module are private and may be
    /// dropped; in a classic script they are globals and always kept.
    pub module: bool,
}

impl Default for JsConfig {
    fn default() -> Self {
        Self {
            mangle: true,
            compress: true,
            module: false,
        }
    }
}

/// `[minify.css]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CssConfig {
    /// When disabled, stylesheets are rejected by the engine.
    pub enable: bool,
}

impl Default for CssConfig {
    fn default() -> Self {
        Self { enable: true }
    }
}

/// `[minify.html]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HtmlConfig {
    pub remove_comments: bool,
    /// Keep optional closing tags such as `</p>` and `</li>`.
    pub keep_closing_tags: bool,
    /// Minify `<style>` and `<script>` bodies too.
    pub minify_inline: bool,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            remove_comments: true,
            keep_closing_tags: true,
            minify_inline: true,
        }
    }
}

/// `[gzip]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GzipConfig {
    /// Compression level, 0 (store) to 9 (best).
    pub level: u32,
}

impl Default for GzipConfig {
    fn default() -> Self {
        Self { level: 9 }
    }
}
