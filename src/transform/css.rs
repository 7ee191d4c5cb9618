//! CSS minification with lightningcss.

use std::path::Path;

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

use super::Diagnostic;

/// Minify CSS source code.
pub fn minify_css(source: &str, path: &Path) -> Result<String, Vec<Diagnostic>> {
    let options = ParserOptions {
        filename: path.display().to_string(),
        ..ParserOptions::default()
    };

    let stylesheet = StyleSheet::parse(source, options).map_err(|e| {
        let diag = Diagnostic::error(path, e.kind.to_string());
        // lightningcss lines are 0-based, columns 1-based
        vec![match e.loc {
            Some(loc) => diag.at(loc.line + 1, loc.column),
            None => diag,
        }]
    })?;

    let result = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .map_err(|e| vec![Diagnostic::error(path, e.kind.to_string())])?;

    Ok(result.code)
}
