//! Source files and their derived artifacts.
//!
//! Everything here is pure or read-only: kind detection, derived paths,
//! presence probing and the staleness policy. Writing lives in `writer`.

mod artifact;
mod kind;
mod plan;
mod probe;

pub use artifact::ArtifactKind;
pub use kind::{SourceKind, is_minified, is_supported};
pub use plan::RegenPlan;
pub use probe::probe;
