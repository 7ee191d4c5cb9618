//! Per-output-path exclusive leases.
//!
//! Off by default: without leases two jobs for the same output may
//! interleave their probe and write phases.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use rustc_hash::FxBuildHasher;

use crate::utils::path::normalize_path;

/// One mutex per output path. Entries live as long as the pipeline.
#[derive(Default)]
pub struct PathLeases {
    locks: DashMap<PathBuf, Arc<Mutex<()>>, FxBuildHasher>,
}

impl PathLeases {
    /// The lease for `path`. Lock it for the duration of the work.
    pub fn lease(&self, path: &Path) -> Arc<Mutex<()>> {
        let key = normalize_path(path);
        Arc::clone(&self.locks.entry(key).or_default())
    }
}
