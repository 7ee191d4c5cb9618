//! Built-in transform: oxc for scripts, lightningcss for stylesheets, a
//! conservative minifier for markup, flate2 for gzip copies.

use std::io::Write;
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;

use super::{Diagnostic, Transform, TransformError, TransformResult, css, html, js};
use crate::asset::{ArtifactKind, SourceKind};
use crate::config::{CssConfig, HtmlConfig, JsConfig, MinbundleConfig};

/// Minified code plus an optional source map (JSON).
#[derive(Debug)]
pub struct Minified {
    pub code: String,
    pub map: Option<String>,
}

/// Default [`Transform`] used by the CLI.
#[derive(Debug, Clone)]
pub struct MinifyEngine {
    js: JsConfig,
    css: CssConfig,
    html: HtmlConfig,
    gzip_level: u32,
}

impl MinifyEngine {
    pub fn new(config: &MinbundleConfig) -> Self {
        Self {
            js: config.minify.js.clone(),
            css: config.minify.css.clone(),
            html: config.minify.html.clone(),
            gzip_level: config.gzip.level,
        }
    }

    fn minify(
        &self,
        kind: SourceKind,
        text: &str,
        source: &Path,
        want_source_map: bool,
    ) -> Result<Result<Minified, Vec<Diagnostic>>, TransformError> {
        let output = match kind {
            SourceKind::Script => {
                let map_source =
                    want_source_map.then(|| Path::new(source.file_name().unwrap_or_default()));
                js::minify_js(text, source, &self.js, map_source).map(|mut out| {
                    if out.map.is_some() {
                        out.code.push_str(&source_mapping_comment(source));
                    }
                    out
                })
            }
            SourceKind::Stylesheet => {
                if !self.css.enable {
                    return Err(TransformError::Disabled { kind: kind.name() });
                }
                css::minify_css(text, source).map(|code| Minified { code, map: None })
            }
            SourceKind::Markup => Ok(Minified {
                code: html::minify_html(text, &self.html),
                map: None,
            }),
        };
        Ok(output)
    }

    fn gzip(&self, data: &[u8]) -> Result<Vec<u8>, TransformError> {
        let engine_err = |e: std::io::Error| TransformError::Engine(format!("gzip: {e}"));
        let mut encoder = GzEncoder::new(Vec::new(), Compression::new(self.gzip_level));
        encoder.write_all(data).map_err(engine_err)?;
        encoder.finish().map_err(engine_err)
    }
}

impl Transform for MinifyEngine {
    fn transform(
        &self,
        source: &Path,
        text: &str,
        want_gzip: bool,
        want_source_map: bool,
    ) -> Result<TransformResult, TransformError> {
        let kind = SourceKind::from_path(source)
            .ok_or_else(|| TransformError::Unsupported(source.to_path_buf()))?;
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        let want_source_map = want_source_map && kind.has_source_map();
        let minified = match self.minify(kind, text, source, want_source_map)? {
            Ok(minified) => minified,
            Err(diagnostics) => return Ok(TransformResult::failed(source, kind, diagnostics)),
        };

        let gzip = if want_gzip {
            Some(self.gzip(minified.code.as_bytes())?)
        } else {
            None
        };

        Ok(TransformResult {
            source: source.to_path_buf(),
            kind,
            minified: Some(minified.code),
            source_map: minified.map,
            gzip,
            diagnostics: Vec::new(),
            success: true,
        })
    }
}

/// `\n//# sourceMappingURL=app.min.js.map`
fn source_mapping_comment(source: &Path) -> String {
    let map = ArtifactKind::SourceMap.path_for(source);
    let name = map.file_name().unwrap_or_default().to_string_lossy();
    format!("\n//# sourceMappingURL={name}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::fs;
    use std::io::Read;
    use tempfile::TempDir;

    fn engine() -> MinifyEngine {
        MinifyEngine::new(&MinbundleConfig::default())
    }

    fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_script_with_map_and_gzip() {
        let dir = TempDir::new().unwrap();
        let source = write(&dir, "app.js", "function twice(x) {\n  return x * 2;\n}\n");

        let result = engine().invoke(&source, true, true).unwrap();
        assert!(result.success);
        let code = result.minified.unwrap();
        assert!(code.ends_with("//# sourceMappingURL=app.min.js.map"));
        assert!(result.source_map.is_some());

        let mut unzipped = String::new();
        GzDecoder::new(result.gzip.unwrap().as_slice())
            .read_to_string(&mut unzipped)
            .unwrap();
        assert_eq!(unzipped, code);
    }

    #[test]
    fn test_script_without_extras() {
        let dir = TempDir::new().unwrap();
        let source = write(&dir, "app.js", "var a = 1;\n");

        let result = engine().invoke(&source, false, false).unwrap();
        assert!(result.success);
        assert!(result.source_map.is_none());
        assert!(result.gzip.is_none());
        assert!(!result.minified.unwrap().contains("sourceMappingURL"));
    }

    #[test]
    fn test_stylesheet_never_has_map() {
        let dir = TempDir::new().unwrap();
        let source = write(&dir, "site.css", "\u{feff}body {\n  margin: 0;\n}\n");

        let result = engine().invoke(&source, false, true).unwrap();
        assert!(result.success);
        assert!(result.source_map.is_none());
        assert_eq!(result.minified.as_deref(), Some("body{margin:0}"));
    }

    #[test]
    fn test_syntax_error_is_not_transform_error() {
        let dir = TempDir::new().unwrap();
        let source = write(&dir, "broken.js", "let = ;");

        let result = engine().invoke(&source, true, true).unwrap();
        assert!(!result.success);
        assert!(result.has_errors());
        assert!(result.minified.is_none());
        assert!(result.gzip.is_none());
        assert!(!result.diagnostics.is_empty());
    }

    #[test]
    fn test_unsupported_kind() {
        let dir = TempDir::new().unwrap();
        let source = write(&dir, "notes.txt", "hello");

        let err = engine().invoke(&source, false, false).unwrap_err();
        assert!(matches!(err, TransformError::Unsupported(_)));
    }

    #[test]
    fn test_missing_source() {
        let dir = TempDir::new().unwrap();
        let err = engine()
            .invoke(&dir.path().join("gone.css"), false, false)
            .unwrap_err();
        assert!(matches!(err, TransformError::Read(..)));
    }

    #[test]
    fn test_disabled_css() {
        let dir = TempDir::new().unwrap();
        let source = write(&dir, "site.css", "a{}");
        let mut config = MinbundleConfig::default();
        config.minify.css.enable = false;

        let err = MinifyEngine::new(&config)
            .invoke(&source, false, false)
            .unwrap_err();
        assert!(matches!(err, TransformError::Disabled { .. }));
    }

    #[test]
    fn test_classic_script_is_not_emptied() {
        let dir = TempDir::new().unwrap();
        let source = write(
            &dir,
            "site.js",
            "function greet(name) {\n  return 'hi ' + name;\n}\nvar counter = 0;\n",
        );

        let result = engine().invoke(&source, false, false).unwrap();
        let code = result.minified.unwrap();
        assert!(code.contains("greet"));
        assert!(code.contains("counter"));
    }

    #[test]
    fn test_transform_in_memory_content() {
        // the path only selects the engine, nothing is read
        let result = engine()
            .transform(Path::new("/nowhere/bundle.min.css"), "a {\n  color: red;\n}\n", true, false)
            .unwrap();
        assert!(result.success);
        assert_eq!(result.minified.as_deref(), Some("a{color:red}"));
        assert!(result.gzip.is_some());
    }

    #[test]
    fn test_markup_with_unquoted_apostrophe() {
        let dir = TempDir::new().unwrap();
        let source = write(&dir, "index.html", "<p>\n  <a title=don't href=x>go</a>\n</p>\n");

        let result = engine().invoke(&source, false, false).unwrap();
        assert!(result.success);
        assert!(result.diagnostics.is_empty());
        assert!(result.minified.unwrap().contains("go</a>"));
    }

    #[test]
    fn test_gzip_is_deterministic() {
        let engine = engine();
        assert_eq!(
            engine.gzip(b"body{margin:0}").unwrap(),
            engine.gzip(b"body{margin:0}").unwrap()
        );
    }
}
