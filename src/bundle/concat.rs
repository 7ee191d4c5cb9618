//! Bundle input concatenation.

use std::fs;

use super::{Bundle, BundleError};

/// Join a bundle's inputs in declared order, one line break after each.
pub fn concatenate(bundle: &Bundle) -> Result<String, BundleError> {
    let mut output = String::new();
    for input in bundle.input_paths() {
        let content = fs::read_to_string(&input).map_err(|e| BundleError::Input(input, e))?;
        output.push_str(content.strip_prefix('\u{feff}').unwrap_or(&content));
        output.push('\n');
    }
    Ok(output)
}
