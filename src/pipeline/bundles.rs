//! Bundle jobs: concatenate inputs, write the output, then minify it.

use std::path::Path;

use super::{JobError, Pipeline};
use crate::asset::is_minified;
use crate::bundle::{Bundle, concatenate};
use crate::hooks::{BundleEvent, BundleHook, Phase};
use crate::utils::plural::plural_count;
use crate::writer::{WriteError, write_if_changed};
use crate::{debug, log};

impl Pipeline {
    /// Process every bundle declared in `definition`.
    pub fn process_bundle_file(&self, definition: &Path) -> Result<usize, JobError> {
        let bundles = self.bundles.bundles(definition)?;
        self.process_bundles(&bundles)
    }

    /// Process the bundles of `definition` that list `source` as an input.
    pub fn source_file_changed(&self, definition: &Path, source: &Path) -> Result<usize, JobError> {
        let bundles = self.bundles.bundles_consuming(definition, source)?;
        if bundles.is_empty() {
            debug!("bundle"; "no bundle consumes {}", source.display());
        }
        self.process_bundles(&bundles)
    }

    /// Bundles fail independently. Each failure is logged here and the
    /// job reports one aggregate error.
    fn process_bundles(&self, bundles: &[Bundle]) -> Result<usize, JobError> {
        let mut failed = 0;
        for bundle in bundles {
            if let Err(e) = self.process_bundle(bundle) {
                failed += 1;
                log!(
                    "error";
                    "bundle {}: {:#}",
                    bundle.output_file_name.display(),
                    anyhow::Error::new(e)
                );
            }
        }

        let total = bundles.len();
        if failed > 0 {
            return Err(JobError::Bundles { failed, total });
        }
        log!("bundle"; "processed {}", plural_count(total, "bundle"));
        Ok(total)
    }

    fn process_bundle(&self, bundle: &Bundle) -> Result<(), JobError> {
        let output = bundle.output_path();
        self.with_lease(&output, || -> Result<(), JobError> {
            let event = BundleEvent {
                phase: Phase::Before,
                bundle,
                output: &output,
                changed: false,
            };
            self.hooks.publish_bundle(BundleHook::BeforeBundle, &event)?;

            let content = concatenate(bundle)?;
            let minify = bundle.minify.enabled && bundle.kind().is_some();
            // A `.min` output is the minified artifact itself. The raw
            // concatenation stays in memory and only the writer touches it.
            let in_place = minify && is_minified(&output);
            let changed = !in_place
                && write_if_changed(&output, content.as_bytes()).map_err(|source| {
                    WriteError::Io {
                        path: output.clone(),
                        source,
                    }
                })?;
            if changed {
                log!("bundle"; "{}", output.display());
            }

            let event = BundleEvent {
                phase: Phase::After,
                changed,
                ..event
            };
            self.hooks.publish_bundle(BundleHook::AfterBundle, &event)?;

            if minify {
                let text = in_place.then_some(content.as_str());
                self.regenerate(&output, text, Some(bundle.plan()), Some(bundle))?;
            }
            Ok(())
        })
    }
}
