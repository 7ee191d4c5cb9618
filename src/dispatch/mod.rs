//! Job dispatcher.
//!
//! Every submitted job gets its own thread and runs to completion. There is
//! no queue, no bound on concurrency, no deduplication and no cancellation.
//! Failures and panics stop at the job boundary: they are logged and turned
//! into one coarse host notification, never returned to the submitter.

mod job;

pub use job::ProcessingJob;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Condvar, Mutex};

use crate::pipeline::{JobError, Pipeline};
use crate::{debug, log};

/// Submits jobs against one shared [`Pipeline`].
pub struct Dispatcher {
    pipeline: Arc<Pipeline>,
    in_flight: Arc<InFlight>,
    next_id: AtomicU64,
}

/// Count of running jobs plus a condvar signalled when it drops to zero.
#[derive(Default)]
struct InFlight {
    count: Mutex<usize>,
    idle: Condvar,
}

/// Decrements the in-flight count when the job thread ends, however it ends.
struct InFlightGuard(Arc<InFlight>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let mut count = self.0.count.lock();
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.0.idle.notify_all();
        }
    }
}

impl Dispatcher {
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        Self {
            pipeline,
            in_flight: Arc::new(InFlight::default()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Start `job` in the background and return immediately.
    pub fn submit(&self, job: ProcessingJob) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        *self.in_flight.count.lock() += 1;
        let guard = InFlightGuard(Arc::clone(&self.in_flight));
        let pipeline = Arc::clone(&self.pipeline);

        debug!("job"; "#{id} submitted: {job}");
        let spawned = std::thread::Builder::new()
            .name(format!("minbundle-job-{id}"))
            .spawn(move || {
                let _guard = guard;
                run(&pipeline, &job);
            });

        // The closure (and its guard) is dropped when spawning fails.
        if let Err(e) = spawned {
            log!("error"; "failed to start job #{id}: {e}");
        }
    }

    pub fn process_bundle(&self, config: impl Into<PathBuf>) {
        self.submit(ProcessingJob::ProcessBundleFile(config.into()));
    }

    pub fn source_changed(&self, config: impl Into<PathBuf>, source: impl Into<PathBuf>) {
        self.submit(ProcessingJob::SourceFileChanged {
            config: config.into(),
            source: source.into(),
        });
    }

    pub fn minify_file(&self, source: impl Into<PathBuf>) {
        self.submit(ProcessingJob::MinifySingleFile(source.into()));
    }

    /// Block until no job is running.
    pub fn wait_idle(&self) {
        let mut count = self.in_flight.count.lock();
        while *count > 0 {
            self.in_flight.idle.wait(&mut count);
        }
    }
}

/// Job boundary: nothing escapes this function.
fn run(pipeline: &Pipeline, job: &ProcessingJob) {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| execute(pipeline, job)));

    let failure = match outcome {
        Ok(Ok(())) => return,
        Ok(Err(e)) => anyhow::Error::new(e),
        Err(payload) => anyhow::anyhow!("panicked: {}", panic_message(payload.as_ref())),
    };

    log!("error"; "{job} failed: {failure:#}");
    pipeline.host().notify_failure(&job.failure_message());
}

fn execute(pipeline: &Pipeline, job: &ProcessingJob) -> Result<(), JobError> {
    match job {
        ProcessingJob::ProcessBundleFile(config) => pipeline.process_bundle_file(config).map(drop),
        ProcessingJob::SourceFileChanged { config, source } => {
            pipeline.source_file_changed(config, source).map(drop)
        }
        ProcessingJob::MinifySingleFile(source) => pipeline.minify_file(source).map(drop),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}
