//! Lifecycle events published around artifact and bundle writes.

use std::error::Error;
use std::fmt;
use std::path::Path;

use crate::asset::ArtifactKind;
use crate::bundle::Bundle;
use crate::transform::TransformResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Before,
    After,
    Error,
}

/// Named hook points around artifact writes. Each carries a [`LifecycleEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    BeforeWriteMinified,
    AfterWriteMinified,
    BeforeWriteGzip,
    AfterWriteGzip,
    BeforeWriteSourceMap,
    AfterWriteSourceMap,
    OnTransformError,
    OnWriteError,
}

impl Hook {
    pub const ALL: [Self; 8] = [
        Self::BeforeWriteMinified,
        Self::AfterWriteMinified,
        Self::BeforeWriteGzip,
        Self::AfterWriteGzip,
        Self::BeforeWriteSourceMap,
        Self::AfterWriteSourceMap,
        Self::OnTransformError,
        Self::OnWriteError,
    ];

    /// Hook fired for `phase` of writing an artifact of `kind`.
    pub fn for_write(phase: Phase, kind: ArtifactKind) -> Self {
        match (phase, kind) {
            (Phase::Before, ArtifactKind::Minified) => Self::BeforeWriteMinified,
            (Phase::After, ArtifactKind::Minified) => Self::AfterWriteMinified,
            (Phase::Before, ArtifactKind::Gzip) => Self::BeforeWriteGzip,
            (Phase::After, ArtifactKind::Gzip) => Self::AfterWriteGzip,
            (Phase::Before, ArtifactKind::SourceMap) => Self::BeforeWriteSourceMap,
            (Phase::After, ArtifactKind::SourceMap) => Self::AfterWriteSourceMap,
            (Phase::Error, _) => Self::OnWriteError,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::BeforeWriteMinified => "BeforeWriteMinified",
            Self::AfterWriteMinified => "AfterWriteMinified",
            Self::BeforeWriteGzip => "BeforeWriteGzip",
            Self::AfterWriteGzip => "AfterWriteGzip",
            Self::BeforeWriteSourceMap => "BeforeWriteSourceMap",
            Self::AfterWriteSourceMap => "AfterWriteSourceMap",
            Self::OnTransformError => "OnTransformError",
            Self::OnWriteError => "OnWriteError",
        }
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Hook points around a bundle's concatenation. Each carries a [`BundleEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BundleHook {
    BeforeBundle,
    AfterBundle,
}

impl BundleHook {
    pub fn name(self) -> &'static str {
        match self {
            Self::BeforeBundle => "BeforeBundle",
            Self::AfterBundle => "AfterBundle",
        }
    }
}

impl fmt::Display for BundleHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Event for one artifact of one source (or bundle output).
#[derive(Debug, Clone, Copy)]
pub struct LifecycleEvent<'a> {
    pub phase: Phase,
    pub kind: ArtifactKind,
    /// Source the artifact derives from.
    pub original: &'a Path,
    /// Artifact path being written.
    pub result: &'a Path,
    /// `result` was on disk before this write.
    pub existed: bool,
    /// Set when the source is a bundle output.
    pub bundle: Option<&'a Bundle>,
    pub transform: Option<&'a TransformResult>,
    /// Underlying failure for `Phase::Error`.
    pub cause: Option<&'a (dyn Error + 'static)>,
}

impl<'a> LifecycleEvent<'a> {
    pub fn new(phase: Phase, kind: ArtifactKind, original: &'a Path, result: &'a Path) -> Self {
        Self {
            phase,
            kind,
            original,
            result,
            existed: false,
            bundle: None,
            transform: None,
            cause: None,
        }
    }

    pub fn with_existing(mut self, existed: bool) -> Self {
        self.existed = existed;
        self
    }

    pub fn with_bundle(mut self, bundle: Option<&'a Bundle>) -> Self {
        self.bundle = bundle;
        self
    }

    pub fn with_transform(mut self, transform: &'a TransformResult) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn with_cause(mut self, cause: &'a (dyn Error + 'static)) -> Self {
        self.cause = Some(cause);
        self
    }
}

/// Event for a bundle's concatenated output.
#[derive(Debug, Clone, Copy)]
pub struct BundleEvent<'a> {
    pub phase: Phase,
    pub bundle: &'a Bundle,
    pub output: &'a Path,
    /// After-phase only: the output's content actually changed.
    pub changed: bool,
}
