//! Event hub: lifecycle hooks around artifact and bundle writes.
//!
//! This module provides:
//! - `event`: hook names and the event payloads
//! - `registry`: [`HookRegistry`] and the [`ArtifactObserver`] trait
//! - `host`: the [`Host`] capability and the observer that drives it
//!
//! Handlers are registered while the pipeline is built and the registry is
//! frozen afterwards, so publishing never takes a lock.

mod event;
mod host;
mod registry;

pub use event::{BundleEvent, BundleHook, Hook, LifecycleEvent, Phase};
pub use host::{ConsoleHost, Host, HostObserver};
pub use registry::{ArtifactObserver, HookError, HookRegistry};
