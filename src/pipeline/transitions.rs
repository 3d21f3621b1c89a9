// ABOUTME: State transition methods for a module run.
// ABOUTME: Each method consumes self and returns the next state or the final report.

use std::fmt::Display;
use std::path::Path;

use super::report::ModuleReport;
use super::run::ModuleRun;
use super::stage::{Stage, StageRecord};
use super::state::{Built, Deployed, Pushed, Staged, Tagged};
use crate::cluster::{ClusterOps, DeploymentResolver};
use crate::image::{ImageOps, ImagePublisher};

/// Next state on success; the module's finished report on failure.
pub type TransitionResult<T> = Result<ModuleRun<T>, ModuleReport>;

impl<S> ModuleRun<S> {
    fn advance<T>(self, state: T) -> ModuleRun<T> {
        ModuleRun {
            module: self.module,
            tag: self.tag,
            records: self.records,
            state,
        }
    }

    fn record(mut self, record: StageRecord) -> Self {
        self.records.push(record);
        self
    }

    /// Record `stage` as failed and stop here.
    fn fail(mut self, stage: Stage, reason: impl Display) -> ModuleReport {
        tracing::error!(module = %self.module, %stage, error = %reason, "stage failed");
        self.records
            .push(StageRecord::failure(stage, reason.to_string()));
        ModuleReport::new(self.module, self.records)
    }
}

// =============================================================================
// Staged -> Built
// =============================================================================

impl ModuleRun<Staged> {
    pub async fn build<I: ImageOps + ?Sized>(
        self,
        publisher: &ImagePublisher<'_, I>,
    ) -> TransitionResult<Built> {
        tracing::info!(module = %self.module, tag = %self.tag, "build stage started");

        let built = publisher
            .build_local(&self.module, &self.tag, &self.state.context)
            .await;
        match built {
            Ok((images, image_id)) => Ok(self.advance(Built { images, image_id })),
            Err(e) => Err(self.fail(Stage::Build, e)),
        }
    }
}

// =============================================================================
// Built -> Tagged
// =============================================================================

impl ModuleRun<Built> {
    /// Apply the registry names. Tagging is part of the Build stage, so
    /// the Build record is only written once both names exist.
    pub async fn tag<I: ImageOps + ?Sized>(
        self,
        publisher: &ImagePublisher<'_, I>,
    ) -> TransitionResult<Tagged> {
        let tagged = publisher.tag_release(&self.state.images).await;
        match tagged {
            Ok(()) => {
                tracing::info!(
                    module = %self.module,
                    image = %self.state.images.versioned,
                    id = self.state.image_id().short(),
                    "build stage finished"
                );
                let images = self.state.images.clone();
                Ok(self
                    .record(StageRecord::success(Stage::Build))
                    .advance(Tagged { images }))
            }
            Err(e) => Err(self.fail(Stage::Build, e)),
        }
    }
}

// =============================================================================
// Tagged -> Pushed
// =============================================================================

impl ModuleRun<Tagged> {
    pub async fn push<I: ImageOps + ?Sized>(
        self,
        publisher: &ImagePublisher<'_, I>,
    ) -> TransitionResult<Pushed> {
        tracing::info!(module = %self.module, "push stage started");

        let pushed = publisher.push(&self.state.images).await;
        match pushed {
            Ok(()) => {
                let images = self.state.images.clone();
                Ok(self
                    .record(StageRecord::success(Stage::Push))
                    .advance(Pushed { images }))
            }
            Err(e) => Err(self.fail(Stage::Push, e)),
        }
    }
}

// =============================================================================
// Pushed -> Deployed
// =============================================================================

impl ModuleRun<Pushed> {
    /// Create or update the module's deployment. A manifest, when needed,
    /// is written to `manifest_dir`.
    pub async fn deploy<C: ClusterOps + ?Sized>(
        self,
        resolver: &DeploymentResolver<'_, C>,
        manifest_dir: &Path,
    ) -> TransitionResult<Deployed> {
        tracing::info!(module = %self.module, "deploy stage started");

        let resolved = resolver
            .resolve(&self.module, &self.state.images.versioned, manifest_dir)
            .await;
        match resolved {
            Ok(action) => Ok(self
                .record(StageRecord::success_with(Stage::Deploy, action.to_string()))
                .advance(Deployed { action })),
            Err(e) => Err(self.fail(Stage::Deploy, e)),
        }
    }
}
