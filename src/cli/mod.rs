//! Command-line interface module.
//!
//! Every command except `outputs` submits jobs to a [`Dispatcher`] and then
//! waits for it to go idle, so the process outlives its background jobs.

mod args;

pub use args::{Cli, Commands};

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Result, bail};

use crate::asset::is_supported;
use crate::config::MinbundleConfig;
use crate::dispatch::Dispatcher;
use crate::hooks::{ArtifactObserver, ConsoleHost, Host, LifecycleEvent};
use crate::log;
use crate::pipeline::{Pipeline, PipelineBuilder};
use crate::transform::MinifyEngine;
use crate::utils::path::normalize_path;
use crate::utils::plural::plural_count;

/// Run the parsed command line.
pub fn run(cli: &Cli, config: &MinbundleConfig) -> Result<()> {
    let host = Arc::new(ConsoleHost::default());
    let written = Arc::new(WriteCounter::default());
    let pipeline = build_pipeline(config, host.clone()).observer(written.clone());
    let pipeline = Arc::new(pipeline.build());

    if let Commands::Outputs { definition, output } = &cli.command {
        return list_outputs(&pipeline, definition, output);
    }

    let dispatcher = Dispatcher::new(pipeline);
    let submitted = submit(&dispatcher, &cli.command, config);
    dispatcher.wait_idle();
    log!("minify"; "wrote {}", plural_count(written.count(), "artifact"));

    match host.failure_count() {
        0 => Ok(()),
        failed => bail!("{failed} of {} failed", plural_count(submitted, "job")),
    }
}

/// Wire the built-in engine and a host into a pipeline builder.
pub fn build_pipeline(config: &MinbundleConfig, host: Arc<dyn Host>) -> PipelineBuilder {
    Pipeline::builder(MinifyEngine::new(config), host)
        .exclusive_outputs(config.pipeline.exclusive_outputs)
}

/// Counts artifacts written across all jobs.
#[derive(Default)]
struct WriteCounter(AtomicUsize);

impl WriteCounter {
    fn count(&self) -> usize {
        self.0.load(Ordering::Relaxed)
    }
}

impl ArtifactObserver for WriteCounter {
    fn on_after_artifact_write(&self, _event: &LifecycleEvent<'_>) -> Result<()> {
        self.0.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

/// Submit the jobs for `command`, returning how many were submitted.
fn submit(dispatcher: &Dispatcher, command: &Commands, config: &MinbundleConfig) -> usize {
    match command {
        Commands::Bundle { definition } => {
            let definition = definition
                .as_deref()
                .map_or_else(|| config.bundle_file(), normalize_path);
            dispatcher.process_bundle(definition);
            1
        }
        Commands::Changed { definition, source } => {
            dispatcher.source_changed(normalize_path(definition), normalize_path(source));
            1
        }
        Commands::Minify { files } => {
            let mut submitted = 0;
            for file in files {
                if !is_supported(file) {
                    log!("minify"; "skip {}: not a supported source", file.display());
                    continue;
                }
                dispatcher.minify_file(normalize_path(file));
                submitted += 1;
            }
            submitted
        }
        Commands::Outputs { .. } => 0,
    }
}

fn list_outputs(pipeline: &Pipeline, definition: &Path, output: &Path) -> Result<()> {
    let definition = normalize_path(definition);
    let bundles = pipeline.resolve_bundles_producing(&definition, &normalize_path(output));
    if bundles.is_empty() {
        log!("bundle"; "no bundle produces {}", output.display());
        return Ok(());
    }

    for bundle in &bundles {
        let inputs: Vec<_> = bundle
            .input_files
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        log!("bundle"; "{} <- {}", bundle.output_file_name.display(), inputs.join(", "));
    }
    Ok(())
}
