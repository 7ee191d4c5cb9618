//! Fixtures shared by the pipeline tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use parking_lot::Mutex;
use tempfile::TempDir;

use super::{Pipeline, PipelineBuilder};
use crate::asset::SourceKind;
use crate::bundle::Bundle;
use crate::hooks::{ArtifactObserver, BundleEvent, BundleHook, Hook, Host, LifecycleEvent};
use crate::transform::{Diagnostic, Transform, TransformError, TransformResult};

/// Collapses whitespace. `SYNTAX` in the source yields a diagnostics failure,
/// `CRASH` a transform error.
pub struct FakeTransform;

impl Transform for FakeTransform {
    fn transform(
        &self,
        source: &Path,
        text: &str,
        want_gzip: bool,
        want_source_map: bool,
    ) -> Result<TransformResult, TransformError> {
        let kind = SourceKind::from_path(source)
            .ok_or_else(|| TransformError::Unsupported(source.to_path_buf()))?;

        if text.contains("CRASH") {
            return Err(TransformError::Engine("engine crashed".into()));
        }
        if text.contains("SYNTAX") {
            let diag = Diagnostic::error(source, "unexpected token").at(1, 1);
            return Ok(TransformResult::failed(source, kind, vec![diag]));
        }

        let minified = text.split_whitespace().collect::<Vec<_>>().join(" ");
        Ok(TransformResult {
            source: source.to_path_buf(),
            kind,
            source_map: (want_source_map && kind.has_source_map())
                .then(|| r#"{"version":3,"mappings":"AAAA"}"#.to_string()),
            gzip: want_gzip.then(|| minified.as_bytes().to_vec()),
            minified: Some(minified),
            diagnostics: Vec::new(),
            success: true,
        })
    }
}

fn name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Records host calls as short strings using file names only.
#[derive(Default)]
pub struct RecordingHost {
    calls: Mutex<Vec<String>>,
}

impl RecordingHost {
    fn push(&self, call: String) {
        self.calls.lock().push(call);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

impl Host for RecordingHost {
    fn checkout(&self, path: &Path) -> Result<()> {
        self.push(format!("checkout {}", name(path)));
        Ok(())
    }

    fn attach_nested(&self, parent: &Path, child: &Path) -> Result<()> {
        self.push(format!("nest {} {}", name(parent), name(child)));
        Ok(())
    }

    fn attach_to_project(&self, _bundle: &Bundle, output: &Path) -> Result<()> {
        self.push(format!("attach {}", name(output)));
        Ok(())
    }

    fn clear_diagnostics(&self, path: &Path) {
        self.push(format!("clear {}", name(path)));
    }

    fn publish_diagnostics(&self, source: &Path, diagnostics: &[Diagnostic]) {
        if !diagnostics.is_empty() {
            self.push(format!("diag {} {}", name(source), diagnostics.len()));
        }
    }

    fn status(&self, message: &str) {
        self.push(format!("status {message}"));
    }

    fn notify_failure(&self, message: &str) {
        self.push(format!("notify {message}"));
    }
}

/// Records every hook with the artifact path or bundle change flag.
#[derive(Default)]
pub struct EventLog {
    artifacts: Mutex<Vec<(Hook, PathBuf)>>,
    bundles: Mutex<Vec<(BundleHook, bool)>>,
}

impl ArtifactObserver for EventLog {
    fn on_before_artifact_write(&self, event: &LifecycleEvent<'_>) -> Result<()> {
        let hook = Hook::for_write(event.phase, event.kind);
        self.artifacts.lock().push((hook, event.result.to_path_buf()));
        Ok(())
    }

    fn on_after_artifact_write(&self, event: &LifecycleEvent<'_>) -> Result<()> {
        self.on_before_artifact_write(event)
    }

    fn on_transform_failed(&self, event: &LifecycleEvent<'_>) -> Result<()> {
        self.artifacts
            .lock()
            .push((Hook::OnTransformError, event.result.to_path_buf()));
        Ok(())
    }

    fn on_write_failed(&self, event: &LifecycleEvent<'_>) -> Result<()> {
        self.artifacts
            .lock()
            .push((Hook::OnWriteError, event.result.to_path_buf()));
        Ok(())
    }

    fn on_before_bundle(&self, event: &BundleEvent<'_>) -> Result<()> {
        self.bundles.lock().push((BundleHook::BeforeBundle, event.changed));
        Ok(())
    }

    fn on_after_bundle(&self, event: &BundleEvent<'_>) -> Result<()> {
        self.bundles.lock().push((BundleHook::AfterBundle, event.changed));
        Ok(())
    }
}

/// A pipeline over a temp directory with a recording host and event log.
pub struct Harness {
    pub dir: TempDir,
    pub host: Arc<RecordingHost>,
    pub log: Arc<EventLog>,
    pub pipeline: Arc<Pipeline>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with(|builder| builder)
    }

    pub fn with(configure: impl FnOnce(PipelineBuilder) -> PipelineBuilder) -> Self {
        Self::build(FakeTransform, configure)
    }

    /// Harness over a real transform instead of [`FakeTransform`].
    pub fn with_transform(transform: impl Transform + 'static) -> Self {
        Self::build(transform, |builder| builder)
    }

    fn build(
        transform: impl Transform + 'static,
        configure: impl FnOnce(PipelineBuilder) -> PipelineBuilder,
    ) -> Self {
        let dir = TempDir::new().unwrap();
        let host = Arc::new(RecordingHost::default());
        let log = Arc::new(EventLog::default());
        let builder = Pipeline::builder(transform, host.clone()).observer(log.clone());
        Self {
            dir,
            host,
            log,
            pipeline: Arc::new(configure(builder).build()),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write a fixture file, creating parent directories.
    pub fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    pub fn events(&self) -> Vec<(Hook, PathBuf)> {
        self.log.artifacts.lock().clone()
    }

    pub fn bundle_events(&self) -> Vec<(BundleHook, bool)> {
        self.log.bundles.lock().clone()
    }

    pub fn host_calls(&self) -> Vec<String> {
        self.host.calls()
    }

    pub fn clear(&self) {
        self.log.artifacts.lock().clear();
        self.log.bundles.lock().clear();
        self.host.calls.lock().clear();
    }
}
