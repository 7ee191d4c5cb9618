//! JavaScript minification with oxc.

use std::path::Path;

use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;

use super::Diagnostic;
use super::engine::Minified;
use crate::asset::ArtifactKind;
use crate::config::JsConfig;

/// Minify JavaScript source code.
///
/// `map_source` is the name recorded in the source map's `sources`; passing
/// it requests a map, whose `file` is the minified file name. Parse errors are
/// returned as diagnostics.
pub fn minify_js(
    source: &str,
    path: &Path,
    options: &JsConfig,
    map_source: Option<&Path>,
) -> Result<Minified, Vec<Diagnostic>> {
    let allocator = Allocator::default();
    let source_type = if options.module {
        SourceType::mjs()
    } else {
        SourceType::cjs()
    };

    let ret = Parser::new(&allocator, source, source_type).parse();
    if !ret.errors.is_empty() {
        return Err(ret
            .errors
            .iter()
            .map(|e| Diagnostic::error(path, e.to_string()))
            .collect());
    }

    let mut program = ret.program;
    let minifier_options = MinifierOptions {
        mangle: options.mangle.then(MangleOptions::default),
        compress: options.compress.then(CompressOptions::smallest),
    };
    let ret = Minifier::new(minifier_options).minify(&allocator, &mut program);

    let output = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            source_map_path: map_source.map(Path::to_path_buf),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program);

    Ok(Minified {
        code: output.code,
        map: output.map.map(|mut map| {
            map.set_file(&minified_name(path));
            map.to_json_string()
        }),
    })
}

fn minified_name(path: &Path) -> String {
    ArtifactKind::Minified
        .path_for(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
