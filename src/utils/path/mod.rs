//! Path utilities.
//!
//! - [`fs`]: Filesystem path normalization and comparison

pub mod fs;

pub use fs::{normalize_path, resolve_path, same_path};
