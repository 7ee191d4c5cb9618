//! `bundleconfig.json` reader.
//!
//! ```json
//! [
//!   {
//!     "outputFileName": "wwwroot/site.min.css",
//!     "inputFiles": ["css/reset.css", "css/site.css"],
//!     "minify": { "enabled": true, "gzip": true },
//!     "includeInProject": true,
//!     "sourceMap": false
//!   }
//! ]
//! ```

use std::fs;
use std::path::Path;

use super::{Bundle, BundleError, BundleSource};
use crate::utils::path::normalize_path;

/// Reads bundle definitions from JSON documents on disk.
///
/// Stateless: every lookup rereads the file, so edits are picked up by the
/// next job without any invalidation.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonBundleStore;

impl JsonBundleStore {
    /// Parse a definition document's text.
    pub fn parse(definition: &Path, content: &str) -> Result<Vec<Bundle>, BundleError> {
        let definition = normalize_path(definition);
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        let mut bundles: Vec<Bundle> = serde_json::from_str(content)
            .map_err(|e| BundleError::Json(definition.clone(), e))?;

        for (index, bundle) in bundles.iter_mut().enumerate() {
            bundle.definition = definition.clone();
            bundle.validate(index)?;
        }
        Ok(bundles)
    }
}

impl BundleSource for JsonBundleStore {
    fn bundles(&self, definition: &Path) -> Result<Vec<Bundle>, BundleError> {
        let content = fs::read_to_string(definition)
            .map_err(|e| BundleError::Io(definition.to_path_buf(), e))?;
        Self::parse(definition, &content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const DEFINITION: &str = r#"[
        {
            "outputFileName": "wwwroot/site.min.css",
            "inputFiles": ["css/reset.css", "css/site.css"],
            "minify": { "enabled": true, "gzip": true, "termSemicolons": true }
        },
        {
            "outputFileName": "wwwroot/app.js",
            "inputFiles": ["js/app.js"],
            "includeInProject": false,
            "sourceMap": true
        }
    ]"#;

    fn write_definition(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("bundleconfig.json");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_parse_with_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write_definition(&dir, DEFINITION);

        let bundles = JsonBundleStore.bundles(&path).unwrap();
        assert_eq!(bundles.len(), 2);

        let css = &bundles[0];
        assert!(css.minify.enabled);
        assert!(css.minify.gzip);
        assert!(css.include_in_project);
        assert!(!css.source_map);
        assert_eq!(css.definition, normalize_path(&path));

        let js = &bundles[1];
        assert!(!js.include_in_project);
        assert!(js.source_map);
        assert!(!js.minify.gzip);
    }

    #[test]
    fn test_bom_is_accepted() {
        let dir = TempDir::new().unwrap();
        let path = write_definition(&dir, &format!("\u{feff}{DEFINITION}"));
        assert_eq!(JsonBundleStore.bundles(&path).unwrap().len(), 2);
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = JsonBundleStore
            .bundles(&dir.path().join("bundleconfig.json"))
            .unwrap_err();
        assert!(matches!(err, BundleError::Io(..)));
    }

    #[test]
    fn test_malformed_json() {
        let dir = TempDir::new().unwrap();
        let path = write_definition(&dir, "[{ \"outputFileName\": ");
        assert!(matches!(
            JsonBundleStore.bundles(&path).unwrap_err(),
            BundleError::Json(..)
        ));
    }

    #[test]
    fn test_resolve_producing() {
        let dir = TempDir::new().unwrap();
        let path = write_definition(&dir, DEFINITION);
        let output = dir.path().join("wwwroot").join("SITE.min.css");

        let found = JsonBundleStore.resolve_bundles_producing(&path, &output);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].output_file_name, PathBuf::from("wwwroot/site.min.css"));
    }

    #[test]
    fn test_resolve_producing_malformed_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = write_definition(&dir, "{ not json");
        let found = JsonBundleStore.resolve_bundles_producing(&path, &dir.path().join("x.css"));
        assert!(found.is_empty());
    }

    #[test]
    fn test_bundles_consuming() {
        let dir = TempDir::new().unwrap();
        let path = write_definition(&dir, DEFINITION);

        let found = JsonBundleStore
            .bundles_consuming(&path, &dir.path().join("css").join("site.css"))
            .unwrap();
        assert_eq!(found.len(), 1);

        let none = JsonBundleStore
            .bundles_consuming(&path, &dir.path().join("js").join("other.js"))
            .unwrap();
        assert!(none.is_empty());
    }
}
