//! HTML minification with minify-html.

use minify_html::{Cfg, minify};

use crate::config::HtmlConfig;

/// Minify an HTML document.
///
/// minify-html accepts any input, so markup never yields diagnostics.
pub fn minify_html(source: &str, options: &HtmlConfig) -> String {
    let output = minify(source.as_bytes(), &cfg(options));
    String::from_utf8_lossy(&output).into_owned()
}

fn cfg(options: &HtmlConfig) -> Cfg {
    let mut cfg = Cfg::new();
    cfg.keep_closing_tags = options.keep_closing_tags;
    cfg.keep_html_and_head_opening_tags = true;
    cfg.keep_comments = !options.remove_comments;
    cfg.minify_css = options.minify_inline;
    cfg.minify_js = options.minify_inline;
    cfg.remove_bangs = true;
    cfg.remove_processing_instructions = true;
    cfg
}
