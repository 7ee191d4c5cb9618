//! Staleness policy: which artifacts a job regenerates.
//!
//! Secondary artifacts follow the minified file's history (the parity rule):
//!
//! | min exists | sidecar exists | regenerate sidecar |
//! |------------|----------------|--------------------|
//! | yes        | yes            | yes                |
//! | yes        | no             | no                 |
//! | no         | yes            | no                 |
//! | no         | no             | yes                |
//!
//! The minified artifact itself is always produced. A first-time run (nothing
//! on disk) therefore produces all three.

use super::artifact::ArtifactKind;
use super::probe::ArtifactPresence;

/// The set of artifacts one job will (re)produce for one output path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegenPlan {
    pub minified: bool,
    pub source_map: bool,
    pub gzip: bool,
}

impl RegenPlan {
    /// Apply the parity rule to a presence snapshot.
    pub fn from_presence(presence: ArtifactPresence) -> Self {
        Self {
            minified: true,
            source_map: presence.minified == presence.source_map,
            gzip: presence.minified == presence.gzip,
        }
    }

    /// Plan declared explicitly (bundle options), bypassing the parity rule.
    pub fn explicit(source_map: bool, gzip: bool) -> Self {
        Self {
            minified: true,
            source_map,
            gzip,
        }
    }

    pub fn wants(&self, kind: ArtifactKind) -> bool {
        match kind {
            ArtifactKind::Minified => self.minified,
            ArtifactKind::SourceMap => self.source_map,
            ArtifactKind::Gzip => self.gzip,
        }
    }
}
