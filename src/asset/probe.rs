//! Artifact presence probing.

use std::path::Path;

use super::artifact::ArtifactKind;

/// Which derived artifacts exist on disk for one output path.
///
/// Taken once at job start and never refreshed within the job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArtifactPresence {
    pub minified: bool,
    pub source_map: bool,
    pub gzip: bool,
}

/// Check which artifacts of `source` currently exist.
///
/// Absence is a normal answer, so this never fails.
pub fn probe(source: &Path) -> ArtifactPresence {
    let exists = |kind: ArtifactKind| kind.path_for(source).is_file();
    ArtifactPresence {
        minified: exists(ArtifactKind::Minified),
        source_map: exists(ArtifactKind::SourceMap),
        gzip: exists(ArtifactKind::Gzip),
    }
}
