//! The regeneration pipeline.
//!
//! # Architecture
//!
//! ```text
//! job ─► probe ─► plan ─► transform ─► writer ─► hooks ─► observers
//!                                          │
//!                  bundle jobs first ──────┘ concatenate + write output
//! ```
//!
//! A [`Pipeline`] is built once with [`Pipeline::builder`] and shared by
//! every job. Its hook registry is frozen at build time.

mod artifacts;
mod bundles;
mod lease;

#[cfg(test)]
pub(crate) mod testing;

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use crate::bundle::{Bundle, BundleError, BundleSource, JsonBundleStore};
use crate::hooks::{ArtifactObserver, HookError, HookRegistry, Host, HostObserver};
use crate::transform::{Transform, TransformError};
use crate::writer::WriteError;
use lease::PathLeases;

/// Why a job failed. Caught at the job boundary by the dispatcher.
#[derive(Debug, Error)]
pub enum JobError {
    #[error(transparent)]
    Bundle(#[from] BundleError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error(transparent)]
    Hook(#[from] HookError),

    #[error("{failed} of {total} bundles failed")]
    Bundles { failed: usize, total: usize },
}

/// Shared, immutable pipeline state.
pub struct Pipeline {
    transform: Box<dyn Transform>,
    bundles: Box<dyn BundleSource>,
    hooks: HookRegistry,
    host: Arc<dyn Host>,
    leases: Option<PathLeases>,
}

impl Pipeline {
    /// Start building a pipeline around `transform` reporting to `host`.
    ///
    /// The host observer is registered first, so host side effects run
    /// before any observer added later.
    pub fn builder(transform: impl Transform + 'static, host: Arc<dyn Host>) -> PipelineBuilder {
        let mut hooks = HookRegistry::new();
        hooks.register(Arc::new(HostObserver::new(Arc::clone(&host))));
        PipelineBuilder {
            transform: Box::new(transform),
            bundles: Box::new(JsonBundleStore),
            hooks,
            host,
            exclusive_outputs: false,
        }
    }

    pub fn host(&self) -> &dyn Host {
        self.host.as_ref()
    }

    /// Bundles in `definition` whose output is `output`.
    pub fn resolve_bundles_producing(&self, definition: &Path, output: &Path) -> Vec<Bundle> {
        self.bundles.resolve_bundles_producing(definition, output)
    }

    /// Run `f` holding the output path's lease, when leases are enabled.
    fn with_lease<T>(&self, path: &Path, f: impl FnOnce() -> T) -> T {
        let Some(leases) = &self.leases else {
            return f();
        };
        let lease = leases.lease(path);
        let _guard = lease.lock();
        f()
    }
}

pub struct PipelineBuilder {
    transform: Box<dyn Transform>,
    bundles: Box<dyn BundleSource>,
    hooks: HookRegistry,
    host: Arc<dyn Host>,
    exclusive_outputs: bool,
}

impl PipelineBuilder {
    pub fn observer(mut self, observer: Arc<dyn ArtifactObserver>) -> Self {
        self.hooks.register(observer);
        self
    }

    /// Serialize jobs that target the same output path.
    pub fn exclusive_outputs(mut self, enabled: bool) -> Self {
        self.exclusive_outputs = enabled;
        self
    }

    pub fn build(self) -> Pipeline {
        Pipeline {
            transform: self.transform,
            bundles: self.bundles,
            hooks: self.hooks,
            host: self.host,
            leases: self.exclusive_outputs.then(PathLeases::default),
        }
    }
}
