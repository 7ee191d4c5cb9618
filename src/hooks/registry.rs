use std::sync::Arc;

use anyhow::Result;
use thiserror::Error;

use super::event::{BundleEvent, BundleHook, Hook, LifecycleEvent};
use crate::debug;

type ArtifactHandler = Box<dyn Fn(&LifecycleEvent<'_>) -> Result<()> + Send + Sync>;
type BundleHandler = Box<dyn Fn(&BundleEvent<'_>) -> Result<()> + Send + Sync>;

/// A handler returned an error. The job that published the event fails.
#[derive(Debug, Error)]
#[error("`{hook}` handler failed")]
pub struct HookError {
    /// Name of the hook point.
    pub hook: &'static str,
    #[source]
    pub source: anyhow::Error,
}

/// Observer interface over every hook. All methods default to no-ops.
pub trait ArtifactObserver: Send + Sync {
    fn on_before_artifact_write(&self, _event: &LifecycleEvent<'_>) -> Result<()> {
        Ok(())
    }

    fn on_after_artifact_write(&self, _event: &LifecycleEvent<'_>) -> Result<()> {
        Ok(())
    }

    fn on_transform_failed(&self, _event: &LifecycleEvent<'_>) -> Result<()> {
        Ok(())
    }

    fn on_write_failed(&self, _event: &LifecycleEvent<'_>) -> Result<()> {
        Ok(())
    }

    fn on_before_bundle(&self, _event: &BundleEvent<'_>) -> Result<()> {
        Ok(())
    }

    fn on_after_bundle(&self, _event: &BundleEvent<'_>) -> Result<()> {
        Ok(())
    }
}

/// Ordered handler lists per hook.
///
/// Handlers run synchronously on the publishing job's thread, in
/// registration order. The first failing handler stops the remaining ones.
#[derive(Default)]
pub struct HookRegistry {
    artifact: Vec<(Hook, ArtifactHandler)>,
    bundle: Vec<(BundleHook, BundleHandler)>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, hook: Hook, handler: F) -> &mut Self
    where
        F: Fn(&LifecycleEvent<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.artifact.push((hook, Box::new(handler)));
        self
    }

    pub fn subscribe_bundle<F>(&mut self, hook: BundleHook, handler: F) -> &mut Self
    where
        F: Fn(&BundleEvent<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.bundle.push((hook, Box::new(handler)));
        self
    }

    /// Subscribe every method of `observer` to its hooks.
    pub fn register(&mut self, observer: Arc<dyn ArtifactObserver>) -> &mut Self {
        for hook in Hook::ALL {
            let observer = Arc::clone(&observer);
            match hook {
                Hook::BeforeWriteMinified | Hook::BeforeWriteGzip | Hook::BeforeWriteSourceMap => {
                    self.subscribe(hook, move |e| observer.on_before_artifact_write(e));
                }
                Hook::AfterWriteMinified | Hook::AfterWriteGzip | Hook::AfterWriteSourceMap => {
                    self.subscribe(hook, move |e| observer.on_after_artifact_write(e));
                }
                Hook::OnTransformError => {
                    self.subscribe(hook, move |e| observer.on_transform_failed(e));
                }
                Hook::OnWriteError => {
                    self.subscribe(hook, move |e| observer.on_write_failed(e));
                }
            }
        }

        let before = Arc::clone(&observer);
        self.subscribe_bundle(BundleHook::BeforeBundle, move |e| before.on_before_bundle(e));
        self.subscribe_bundle(BundleHook::AfterBundle, move |e| observer.on_after_bundle(e));
        self
    }

    pub fn publish(&self, hook: Hook, event: &LifecycleEvent<'_>) -> Result<(), HookError> {
        debug!("hook"; "{hook} {}", event.result.display());
        for (_, handler) in self.artifact.iter().filter(|(h, _)| *h == hook) {
            handler(event).map_err(|source| HookError {
                hook: hook.name(),
                source,
            })?;
        }
        Ok(())
    }

    pub fn publish_bundle(&self, hook: BundleHook, event: &BundleEvent<'_>) -> Result<(), HookError> {
        debug!("hook"; "{hook} {}", event.output.display());
        for (_, handler) in self.bundle.iter().filter(|(h, _)| *h == hook) {
            handler(event).map_err(|source| HookError {
                hook: hook.name(),
                source,
            })?;
        }
        Ok(())
    }
}
