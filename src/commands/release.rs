// ABOUTME: Release command implementation shared by `deploy` and `build`.
// ABOUTME: Opens the notification session, wires collaborators, and runs one flow.

use super::engine_connection::connect_to_engine;
use slipway::cluster::KubectlCluster;
use slipway::config::Config;
use slipway::diagnostics::Diagnostics;
use slipway::lint::{ContainerLinter, Linter};
use slipway::notify::SmtpNotifier;
use slipway::output::Output;
use slipway::pipeline::{ChangeOutcome, Collaborators, Pipeline, RunError, RunReport};
use slipway::vcs::GitCli;
use std::path::Path;

/// Which modules a release covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Modules with uncommitted changes, under the next tag.
    Changed,
    /// Every module, under the current tag.
    Full,
}

pub async fn release(
    config: Config,
    root: &Path,
    flow: Flow,
    mut output: Output,
) -> Result<(), RunError> {
    config.validate()?;
    output.start_timer();
    output.progress(&format!("slipway configuration version {}", config.version));

    // Without a working mail session a partial failure would go unreported
    output.progress(&format!(
        "  → Opening notification session with {}...",
        config.notify.smtp_host
    ));
    let password = config.notify.password.resolve()?;
    let notifier = SmtpNotifier::connect(&config.notify, password)
        .await
        .map_err(|source| RunError::Notification { source })?;

    let images = connect_to_engine(&config, &output)?;
    let cluster = KubectlCluster::new(&config.cluster);
    let vcs = GitCli::new(root);
    let linter = config
        .lint
        .as_ref()
        .map(|lint| ContainerLinter::new(&images, lint, root));

    let tools = Collaborators {
        vcs: &vcs,
        images: &images,
        cluster: &cluster,
        notifier: &notifier,
        linter: linter.as_ref().map(|l| l as &dyn Linter),
    };
    let pipeline = Pipeline::new(&config, root, tools, &output);
    let mut diag = Diagnostics::default();

    let report = match flow {
        Flow::Full => pipeline.run_full_build(&mut diag).await?,
        Flow::Changed => match pipeline.run_changed(&mut diag).await? {
            ChangeOutcome::Released(report) => report,
            ChangeOutcome::NoChanges => {
                output.success("No modules have changed, no deployment necessary");
                return Ok(());
            }
        },
    };

    for warning in diag.warnings() {
        output.warning(&warning.message);
    }

    output.success(&summary(&report));
    Ok(())
}

fn summary(report: &RunReport) -> String {
    let failed = report.failed_modules().count();
    if failed == 0 {
        format!(
            "Release {} complete: {} module(s) deployed",
            report.tag,
            report.modules.len()
        )
    } else {
        format!(
            "Release {} finished: {} of {} module(s) failed, see report",
            report.tag,
            failed,
            report.modules.len()
        )
    }
}
