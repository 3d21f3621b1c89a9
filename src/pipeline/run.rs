// ABOUTME: Generic module run parameterized by state marker.
// ABOUTME: Carries the module, the release tag, and the stage records so far.

use std::path::Path;

use super::report::ModuleReport;
use super::stage::{Stage, StageRecord};
use super::staging::StagingArea;
use super::state::{Deployed, Staged};
use crate::config::LayoutConfig;
use crate::image::stage_build_context;
use crate::types::{ModuleId, ReleaseTag};

/// One module's trip through build, push and deploy.
///
/// Transitions consume the run. A failed transition yields the finished
/// [`ModuleReport`] instead of a run, so no later stage can be attempted.
#[derive(Debug)]
pub struct ModuleRun<S> {
    pub(crate) module: ModuleId,
    pub(crate) tag: ReleaseTag,
    pub(crate) records: Vec<StageRecord>,
    pub(crate) state: S,
}

impl ModuleRun<Staged> {
    /// Assemble the module's build context inside `staging`.
    ///
    /// A context that cannot be assembled is a Build failure.
    pub fn stage(
        module: ModuleId,
        tag: ReleaseTag,
        root: &Path,
        layout: &LayoutConfig,
        staging: &StagingArea,
    ) -> Result<Self, ModuleReport> {
        match stage_build_context(root, layout, staging.path(), &module) {
            Ok(context) => Ok(ModuleRun {
                module,
                tag,
                records: Vec::new(),
                state: Staged { context },
            }),
            Err(e) => {
                tracing::error!(%module, error = %e, "failed to stage build context");
                Err(ModuleReport::new(
                    module,
                    vec![StageRecord::failure(Stage::Build, e.to_string())],
                ))
            }
        }
    }
}

impl<S> ModuleRun<S> {
    pub fn state(&self) -> &S {
        &self.state
    }
}

impl ModuleRun<Deployed> {
    pub fn finish(self) -> ModuleReport {
        ModuleReport::new(self.module, self.records)
    }
}
