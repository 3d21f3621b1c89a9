// ABOUTME: Drives modules through build, push and deploy, then sends the report.
// ABOUTME: Implements the full-build and change-triggered flows over pluggable collaborators.

use std::path::{Path, PathBuf};

use super::discovery::discover_modules;
use super::error::RunError;
use super::report::{ChangeSummary, ModuleReport, RunReport};
use super::run::ModuleRun;
use super::stage::{Stage, StageRecord};
use super::staging::StagingArea;
use crate::cluster::{ClusterOps, DeploymentResolver};
use crate::config::Config;
use crate::diagnostics::{Diagnostics, Warning};
use crate::image::{ImageOps, ImagePublisher};
use crate::lint::Linter;
use crate::notify::Notifier;
use crate::output::Output;
use crate::types::{ModuleId, ReleaseTag};
use crate::vcs::{TagManager, VersionControl, changed_modules};

/// External systems the pipeline talks to.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub vcs: &'a dyn VersionControl,
    pub images: &'a dyn ImageOps,
    pub cluster: &'a dyn ClusterOps,
    /// Already-opened notification session.
    pub notifier: &'a dyn Notifier,
    /// Static analysis for the change-triggered flow; skipped when `None`.
    pub linter: Option<&'a dyn Linter>,
}

/// Result of the change-triggered flow.
#[derive(Debug)]
pub enum ChangeOutcome {
    /// Nothing under the modules directory changed. No tag, no notification.
    NoChanges,
    Released(RunReport),
}

pub struct Pipeline<'a> {
    config: &'a Config,
    root: PathBuf,
    tools: Collaborators<'a>,
    output: &'a Output,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: &'a Config,
        root: impl Into<PathBuf>,
        tools: Collaborators<'a>,
        output: &'a Output,
    ) -> Self {
        Self {
            config,
            root: root.into(),
            tools,
            output,
        }
    }

    /// Build every module and deploy it under the current release tag.
    pub async fn run_full_build(
        &self,
        diagnostics: &mut Diagnostics,
    ) -> Result<RunReport, RunError> {
        let modules_dir = self.config.layout.modules_dir(&self.root);
        let modules = discover_modules(&modules_dir)?;
        let tag = TagManager::new(self.tools.vcs).current_tag().await?;

        self.output.progress(&format!("Building all modules at {tag}"));

        let mut report = RunReport::new(tag);
        for module in modules.iter() {
            if let Some(module_report) = self.run_module(module, &tag, diagnostics).await {
                report.append(module_report);
            }
        }

        self.deliver(&report, diagnostics).await;
        Ok(report)
    }

    /// Release only the modules with uncommitted changes.
    ///
    /// Changed-file listings and lint output are gathered first, while the
    /// changes are still uncommitted. The working tree is then committed and
    /// tagged with the next release tag once, before any module is built.
    pub async fn run_changed(
        &self,
        diagnostics: &mut Diagnostics,
    ) -> Result<ChangeOutcome, RunError> {
        let linter = self.prepare_linter(diagnostics).await;

        let paths = self
            .tools
            .vcs
            .changed_paths()
            .await
            .map_err(|source| RunError::Changes { source })?;
        let modules = changed_modules(&paths, &self.config.layout.modules_dir);

        // A base-only change has nothing to deploy on its own
        let deployable: Vec<&ModuleId> = modules.iter().filter(|m| !m.is_base()).collect();
        if deployable.is_empty() {
            tracing::info!("no module changes detected");
            return Ok(ChangeOutcome::NoChanges);
        }

        let mut summaries = Vec::with_capacity(deployable.len());
        for module in deployable {
            let changes = self.summarize_changes(module, linter, diagnostics).await;
            summaries.push((module, changes));
        }

        let tag = TagManager::new(self.tools.vcs).next_tag().await?;
        self.output.progress(&format!(
            "Releasing {tag} for {} changed module(s)",
            summaries.len()
        ));

        let mut report = RunReport::new(tag);
        for (module, changes) in summaries {
            if let Some(module_report) = self.run_module(module, &tag, diagnostics).await {
                report.append(module_report.with_changes(changes));
            }
        }

        self.deliver(&report, diagnostics).await;
        Ok(ChangeOutcome::Released(report))
    }

    /// Run build, push and deploy for one module, stopping at the first
    /// failed stage. Returns `None` for `module_base`.
    ///
    /// The staging directory is reset before and removed after, whatever
    /// the outcome.
    pub async fn run_module(
        &self,
        module: &ModuleId,
        tag: &ReleaseTag,
        diagnostics: &mut Diagnostics,
    ) -> Option<ModuleReport> {
        if module.is_base() {
            tracing::debug!("module_base is packaging material, skipping");
            return None;
        }

        self.output.progress(&format!("{module}: releasing {tag}"));

        let report = match StagingArea::acquire(self.config.layout.staging_dir(&self.root)) {
            Ok(staging) => {
                let report = self.drive(module, tag, &staging).await;
                if let Err(e) = staging.release() {
                    diagnostics.warn(Warning::staging_cleanup(e.to_string()));
                }
                report
            }
            Err(e) => {
                tracing::error!(%module, error = %e, "failed to reset staging directory");
                ModuleReport::new(
                    module.clone(),
                    vec![StageRecord::failure(Stage::Build, e.to_string())],
                )
            }
        };

        self.output.module_report(&report);
        Some(report)
    }

    async fn drive(
        &self,
        module: &ModuleId,
        tag: &ReleaseTag,
        staging: &StagingArea,
    ) -> ModuleReport {
        self.release(module, tag, staging)
            .await
            .unwrap_or_else(|report| report)
    }

    /// The success path yields the finished report in `Ok`; a failed stage
    /// yields it in `Err`.
    async fn release(
        &self,
        module: &ModuleId,
        tag: &ReleaseTag,
        staging: &StagingArea,
    ) -> Result<ModuleReport, ModuleReport> {
        let publisher = ImagePublisher::new(self.tools.images, &self.config.registry);
        let resolver = DeploymentResolver::new(self.tools.cluster, &self.config.cluster);

        let run = ModuleRun::stage(
            module.clone(),
            *tag,
            &self.root,
            &self.config.layout,
            staging,
        )?;
        let run = run.build(&publisher).await?;
        let run = run.tag(&publisher).await?;
        let run = run.push(&publisher).await?;
        let run = run.deploy(&resolver, staging.path()).await?;

        tracing::info!(%module, action = %run.state().action(), "module released");
        Ok(run.finish())
    }

    async fn prepare_linter(&self, diagnostics: &mut Diagnostics) -> Option<&'a dyn Linter> {
        let linter = self.tools.linter?;
        match linter.prepare().await {
            Ok(()) => Some(linter),
            Err(e) => {
                diagnostics.warn(Warning::lint(format!("static analysis disabled: {e}")));
                None
            }
        }
    }

    async fn summarize_changes(
        &self,
        module: &ModuleId,
        linter: Option<&dyn Linter>,
        diagnostics: &mut Diagnostics,
    ) -> ChangeSummary {
        let module_path = self.config.layout.modules_dir.join(module.name());

        let changed_files = match self.tools.vcs.changed_files(&module_path).await {
            Ok(listing) => listing,
            Err(e) => {
                diagnostics.warn(Warning::changed_files(format!("{module}: {e}")));
                String::new()
            }
        };

        let lint_output = match linter {
            Some(linter) => lint_or_note(linter, &module_path, module, diagnostics).await,
            None => String::new(),
        };

        ChangeSummary {
            changed_files,
            lint_output,
        }
    }

    /// Hand the report to the notification sink. Failure is recorded, never raised.
    async fn deliver(&self, report: &RunReport, diagnostics: &mut Diagnostics) {
        let body = report.finalize();
        match self.tools.notifier.send(&body).await {
            Ok(()) => tracing::info!(modules = report.modules.len(), "report sent"),
            Err(e) => diagnostics.warn(Warning::notification(e.to_string())),
        }
    }
}

async fn lint_or_note(
    linter: &dyn Linter,
    module_path: &Path,
    module: &ModuleId,
    diagnostics: &mut Diagnostics,
) -> String {
    match linter.lint(module_path).await {
        Ok(output) => output,
        Err(e) => {
            diagnostics.warn(Warning::lint(format!("{module}: {e}")));
            format!("static analysis failed: {e}\n")
        }
    }
}
