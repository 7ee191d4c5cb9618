//! Single output path: probe, plan, transform, write.

use std::path::{Path, PathBuf};

use super::{JobError, Pipeline};
use crate::asset::{ArtifactKind, RegenPlan, is_supported, probe};
use crate::bundle::Bundle;
use crate::hooks::{Hook, LifecycleEvent, Phase};
use crate::transform::TransformError;
use crate::writer::ArtifactWriter;
use crate::{debug, log};

impl Pipeline {
    /// Minify one authored file, regenerating its stale artifacts.
    ///
    /// Returns the artifact paths written.
    pub fn minify_file(&self, source: &Path) -> Result<Vec<PathBuf>, JobError> {
        if !is_supported(source) {
            return Err(TransformError::Unsupported(source.to_path_buf()).into());
        }
        self.host.clear_diagnostics(source);
        self.with_lease(source, || self.regenerate(source, None, None, None))
    }

    /// Regenerate artifacts of `original`.
    ///
    /// `content` replaces the file on disk as transform input. Without an
    /// explicit plan the parity rule decides, from one presence snapshot
    /// taken here.
    pub(super) fn regenerate(
        &self,
        original: &Path,
        content: Option<&str>,
        explicit: Option<RegenPlan>,
        bundle: Option<&Bundle>,
    ) -> Result<Vec<PathBuf>, JobError> {
        let presence = probe(original);
        let plan = explicit.unwrap_or_else(|| RegenPlan::from_presence(presence));
        debug!("minify"; "{}: {presence:?} -> {plan:?}", original.display());

        let invoked = match content {
            Some(text) => self
                .transform
                .transform(original, text, plan.gzip, plan.source_map),
            None => self.transform.invoke(original, plan.gzip, plan.source_map),
        };
        let result = match invoked {
            Ok(result) => result,
            Err(e) => {
                let minified = ArtifactKind::Minified.path_for(original);
                let event =
                    LifecycleEvent::new(Phase::Error, ArtifactKind::Minified, original, &minified)
                        .with_bundle(bundle)
                        .with_cause(&e);
                self.hooks.publish(Hook::OnTransformError, &event)?;
                return Err(e.into());
            }
        };

        debug!(
            "minify"; "{} {}: {} diagnostics",
            result.kind.name(),
            result.source.display(),
            result.diagnostics.len()
        );
        self.host.publish_diagnostics(original, &result.diagnostics);
        if !result.success {
            log!("minify"; "{} has errors, nothing written", original.display());
            return Ok(Vec::new());
        }

        let written = ArtifactWriter::new(&self.hooks).write(original, &result, plan, bundle)?;
        log!("minify"; "{}", describe(original, &written));
        Ok(written)
    }
}

/// `app.js -> app.min.js, app.min.js.gz`
fn describe(original: &Path, written: &[PathBuf]) -> String {
    let name = |p: &Path| {
        p.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    };
    let outputs: Vec<_> = written.iter().map(|p| name(p)).collect();
    format!("{} -> {}", name(original), outputs.join(", "))
}
