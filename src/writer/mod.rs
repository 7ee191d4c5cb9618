//! Artifact writer: persists a [`TransformResult`] and publishes the
//! lifecycle events around every file it touches.
//!
//! Per planned artifact, in [`ArtifactKind::ALL`] order:
//!
//! ```text
//! BeforeWrite<Kind>  ->  atomic write  ->  AfterWrite<Kind>
//!                              |
//!                              +-- io failure -> OnWriteError, stop
//! ```
//!
//! A failed result writes nothing and publishes nothing.

mod atomic;

pub use atomic::{atomic_write, write_if_changed};

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::asset::{ArtifactKind, RegenPlan};
use crate::bundle::Bundle;
use crate::hooks::{Hook, HookError, HookRegistry, LifecycleEvent, Phase};
use crate::transform::TransformResult;
use crate::{debug, log};

/// Source maps are written with a UTF-8 byte order mark.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to write `{path}`")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Hook(#[from] HookError),
}

/// Writes artifacts for one output path.
pub struct ArtifactWriter<'a> {
    hooks: &'a HookRegistry,
}

impl<'a> ArtifactWriter<'a> {
    pub fn new(hooks: &'a HookRegistry) -> Self {
        Self { hooks }
    }

    /// Persist every artifact `plan` asks for that `result` can supply.
    ///
    /// Returns the written paths in write order.
    pub fn write(
        &self,
        original: &Path,
        result: &TransformResult,
        plan: RegenPlan,
        bundle: Option<&Bundle>,
    ) -> Result<Vec<PathBuf>, WriteError> {
        if !result.success {
            debug!("write"; "skip {}: transform failed", original.display());
            return Ok(Vec::new());
        }

        let mut written = Vec::new();
        for kind in ArtifactKind::ALL {
            if !plan.wants(kind) {
                continue;
            }
            let Some(content) = payload(result, kind) else {
                continue;
            };

            let path = kind.path_for(original);
            self.write_one(original, &path, kind, &content, result, bundle)?;
            written.push(path);
        }
        Ok(written)
    }

    fn write_one(
        &self,
        original: &Path,
        path: &Path,
        kind: ArtifactKind,
        content: &[u8],
        result: &TransformResult,
        bundle: Option<&Bundle>,
    ) -> Result<(), WriteError> {
        let existed = path.exists();
        let event = |phase| {
            LifecycleEvent::new(phase, kind, original, path)
                .with_existing(existed)
                .with_bundle(bundle)
                .with_transform(result)
        };

        self.hooks
            .publish(Hook::for_write(Phase::Before, kind), &event(Phase::Before))?;

        if let Err(source) = atomic_write(path, content) {
            let failed = event(Phase::Error).with_cause(&source);
            if let Err(e) = self.hooks.publish(Hook::OnWriteError, &failed) {
                log!("error"; "{:#}", anyhow::Error::new(e));
            }
            return Err(WriteError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
        debug!("write"; "{kind} {}", path.display());

        self.hooks
            .publish(Hook::for_write(Phase::After, kind), &event(Phase::After))?;
        Ok(())
    }
}

/// Bytes to persist for `kind`, `None` when the result has nothing for it.
fn payload(result: &TransformResult, kind: ArtifactKind) -> Option<Cow<'_, [u8]>> {
    match kind {
        ArtifactKind::Minified => result.minified.as_deref().map(|m| Cow::Borrowed(m.as_bytes())),
        ArtifactKind::Gzip => result.gzip.as_deref().map(Cow::Borrowed),
        ArtifactKind::SourceMap => {
            if result.has_errors() {
                return None;
            }
            let map = result.source_map.as_deref().filter(|m| !m.is_empty())?;
            let mut bytes = Vec::with_capacity(UTF8_BOM.len() + map.len());
            bytes.extend_from_slice(UTF8_BOM);
            bytes.extend_from_slice(map.as_bytes());
            Some(Cow::Owned(bytes))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::SourceKind;
    use crate::transform::Diagnostic;
    use parking_lot::Mutex;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn result(source: &Path) -> TransformResult {
        TransformResult {
            source: source.to_path_buf(),
            kind: SourceKind::Script,
            minified: Some("let a=1;".into()),
            source_map: Some(r#"{"version":3}"#.into()),
            gzip: Some(vec![0x1f, 0x8b, 0x08]),
            diagnostics: Vec::new(),
            success: true,
        }
    }

    fn recording() -> (Arc<Mutex<Vec<(Hook, PathBuf)>>>, HookRegistry) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let mut registry = HookRegistry::new();
        for hook in Hook::ALL {
            let events = Arc::clone(&events);
            registry.subscribe(hook, move |e| {
                events.lock().push((hook, e.result.to_path_buf()));
                Ok(())
            });
        }
        (events, registry)
    }

    #[test]
    fn test_writes_in_order_with_events() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("app.js");
        let (events, registry) = recording();

        let written = ArtifactWriter::new(&registry)
            .write(&source, &result(&source), RegenPlan::explicit(true, true), None)
            .unwrap();

        let min = dir.path().join("app.min.js");
        let gz = dir.path().join("app.min.js.gz");
        let map = dir.path().join("app.min.js.map");
        assert_eq!(written, vec![min.clone(), gz.clone(), map.clone()]);
        assert_eq!(
            *events.lock(),
            vec![
                (Hook::BeforeWriteMinified, min.clone()),
                (Hook::AfterWriteMinified, min.clone()),
                (Hook::BeforeWriteGzip, gz.clone()),
                (Hook::AfterWriteGzip, gz),
                (Hook::BeforeWriteSourceMap, map.clone()),
                (Hook::AfterWriteSourceMap, map.clone()),
            ]
        );
        assert_eq!(fs::read_to_string(&min).unwrap(), "let a=1;");
        assert!(fs::read(&map).unwrap().starts_with(UTF8_BOM));
    }

    #[test]
    fn test_events_report_prior_existence() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("app.js");
        fs::write(dir.path().join("app.min.js.map"), "old").unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut registry = HookRegistry::new();
        for hook in [Hook::AfterWriteMinified, Hook::AfterWriteSourceMap] {
            let seen = Arc::clone(&seen);
            registry.subscribe(hook, move |e| {
                seen.lock().push((e.kind, e.existed));
                Ok(())
            });
        }

        ArtifactWriter::new(&registry)
            .write(&source, &result(&source), RegenPlan::explicit(true, false), None)
            .unwrap();

        assert_eq!(
            *seen.lock(),
            vec![(ArtifactKind::Minified, false), (ArtifactKind::SourceMap, true)]
        );
    }

    #[test]
    fn test_plan_limits_artifacts() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("app.js");
        let (events, registry) = recording();

        let written = ArtifactWriter::new(&registry)
            .write(&source, &result(&source), RegenPlan::explicit(false, false), None)
            .unwrap();

        assert_eq!(written, vec![dir.path().join("app.min.js")]);
        assert_eq!(events.lock().len(), 2);
        assert!(!dir.path().join("app.min.js.map").exists());
    }

    #[test]
    fn test_failed_result_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("app.js");
        let (events, registry) = recording();
        let failed = TransformResult::failed(
            &source,
            SourceKind::Script,
            vec![Diagnostic::error(&source, "unexpected token")],
        );

        let written = ArtifactWriter::new(&registry)
            .write(&source, &failed, RegenPlan::explicit(true, true), None)
            .unwrap();

        assert!(written.is_empty());
        assert!(events.lock().is_empty());
        assert!(!dir.path().join("app.min.js").exists());
    }

    #[test]
    fn test_empty_map_is_skipped() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("app.js");
        let (_, registry) = recording();
        let mut result = result(&source);
        result.source_map = Some(String::new());

        let written = ArtifactWriter::new(&registry)
            .write(&source, &result, RegenPlan::explicit(true, false), None)
            .unwrap();
        assert_eq!(written, vec![dir.path().join("app.min.js")]);
    }

    #[test]
    fn test_io_failure_publishes_error_and_stops() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("app.js");
        // A directory where the minified file should go makes the rename fail.
        fs::create_dir(dir.path().join("app.min.js")).unwrap();
        let (events, registry) = recording();

        let err = ArtifactWriter::new(&registry)
            .write(&source, &result(&source), RegenPlan::explicit(true, true), None)
            .unwrap_err();

        assert!(matches!(err, WriteError::Io { .. }));
        let min = dir.path().join("app.min.js");
        assert_eq!(
            *events.lock(),
            vec![
                (Hook::BeforeWriteMinified, min.clone()),
                (Hook::OnWriteError, min),
            ]
        );
        assert!(!dir.path().join("app.min.js.gz").exists());
    }

    #[test]
    fn test_hook_failure_fails_the_write() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("app.js");
        let mut registry = HookRegistry::new();
        registry.subscribe(Hook::BeforeWriteMinified, |_| anyhow::bail!("checkout refused"));

        let err = ArtifactWriter::new(&registry)
            .write(&source, &result(&source), RegenPlan::explicit(false, false), None)
            .unwrap_err();
        assert!(matches!(err, WriteError::Hook(_)));
        assert!(!dir.path().join("app.min.js").exists());
    }
}
