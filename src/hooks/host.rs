//! The editor or build host the pipeline reports to.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;

use super::event::{BundleEvent, LifecycleEvent};
use super::registry::ArtifactObserver;
use crate::asset::ArtifactKind;
use crate::bundle::Bundle;
use crate::transform::{Diagnostic, Severity};
use crate::{debug, log};

/// Capabilities the host offers around written files.
///
/// Every method is called from job threads.
pub trait Host: Send + Sync {
    /// Make `path` writable (source control checkout).
    fn checkout(&self, path: &Path) -> Result<()>;

    /// Show `child` nested under `parent` in the project tree.
    fn attach_nested(&self, parent: &Path, child: &Path) -> Result<()>;

    fn attach_to_project(&self, bundle: &Bundle, output: &Path) -> Result<()>;

    fn clear_diagnostics(&self, path: &Path);

    fn publish_diagnostics(&self, source: &Path, diagnostics: &[Diagnostic]);

    fn status(&self, message: &str);

    /// Coarse user-visible failure notice.
    fn notify_failure(&self, message: &str);
}

/// Host for the command line: everything becomes a log line.
#[derive(Debug, Default)]
pub struct ConsoleHost {
    failures: AtomicUsize,
}

impl ConsoleHost {
    /// Number of failure notices so far.
    pub fn failure_count(&self) -> usize {
        self.failures.load(Ordering::SeqCst)
    }
}

impl Host for ConsoleHost {
    fn checkout(&self, path: &Path) -> Result<()> {
        debug!("host"; "checkout {}", path.display());
        Ok(())
    }

    fn attach_nested(&self, parent: &Path, child: &Path) -> Result<()> {
        debug!("host"; "nest {} under {}", child.display(), parent.display());
        Ok(())
    }

    fn attach_to_project(&self, bundle: &Bundle, output: &Path) -> Result<()> {
        debug!("host"; "attach {} ({} inputs)", output.display(), bundle.input_files.len());
        Ok(())
    }

    fn clear_diagnostics(&self, path: &Path) {
        debug!("host"; "clear diagnostics for {}", path.display());
    }

    fn publish_diagnostics(&self, _source: &Path, diagnostics: &[Diagnostic]) {
        for diag in diagnostics {
            match diag.severity {
                Severity::Error => log!("error"; "{diag}"),
                Severity::Warning => log!("warning"; "{diag}"),
            }
        }
    }

    fn status(&self, message: &str) {
        log!("status"; "{message}");
    }

    fn notify_failure(&self, message: &str) {
        self.failures.fetch_add(1, Ordering::SeqCst);
        log!("error"; "{message}");
    }
}

/// Drives a [`Host`] from lifecycle events.
pub struct HostObserver {
    host: Arc<dyn Host>,
}

impl HostObserver {
    pub fn new(host: Arc<dyn Host>) -> Self {
        Self { host }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

impl ArtifactObserver for HostObserver {
    fn on_before_artifact_write(&self, event: &LifecycleEvent<'_>) -> Result<()> {
        self.host.checkout(event.result)
    }

    fn on_after_artifact_write(&self, event: &LifecycleEvent<'_>) -> Result<()> {
        match event.kind {
            // a refreshed map is already nested
            ArtifactKind::SourceMap if event.existed => Ok(()),
            ArtifactKind::SourceMap => {
                let minified = ArtifactKind::Minified.path_for(event.original);
                self.host.attach_nested(&minified, event.result)
            }
            ArtifactKind::Minified | ArtifactKind::Gzip => {
                if event.bundle.is_some_and(|b| !b.include_in_project)
                    || event.result == event.original
                {
                    return Ok(());
                }
                self.host.attach_nested(event.original, event.result)
            }
        }
    }

    fn on_transform_failed(&self, event: &LifecycleEvent<'_>) -> Result<()> {
        if let Some(cause) = event.cause {
            let diag = Diagnostic::error(event.original, cause.to_string());
            self.host.publish_diagnostics(event.original, &[diag]);
        }
        self.host
            .status(&format!("There was a error minifying {}", file_name(event.original)));
        Ok(())
    }

    fn on_write_failed(&self, event: &LifecycleEvent<'_>) -> Result<()> {
        self.host
            .status(&format!("Failed to write {}", file_name(event.result)));
        Ok(())
    }

    fn on_before_bundle(&self, event: &BundleEvent<'_>) -> Result<()> {
        self.host.clear_diagnostics(event.output);
        self.host.checkout(event.output)
    }

    fn on_after_bundle(&self, event: &BundleEvent<'_>) -> Result<()> {
        if event.bundle.include_in_project {
            self.host.attach_to_project(event.bundle, event.output)?;
        }
        self.host.status("Bundle updated");
        Ok(())
    }
}
