// ABOUTME: Static-analysis collaborator for the change-triggered flow.
// ABOUTME: Runs a linter container over a module and returns its raw output.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::config::LintConfig;
use crate::image::{ImageError, ImageOps};
use crate::process;
use crate::types::ImageRef;

/// Errors from the static-analysis collaborator.
#[derive(Debug, thiserror::Error)]
pub enum LintError {
    #[error("failed to prepare linter image: {0}")]
    Image(#[from] ImageError),

    #[error("failed to run linter: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Runs static analysis over one module's source tree.
#[async_trait]
pub trait Linter: Send + Sync {
    /// Make the linter available (e.g. pull its image). Called once per run.
    async fn prepare(&self) -> Result<(), LintError>;

    /// Analyse `module_path` (relative to the project root). The output is
    /// returned verbatim, whatever the linter's exit status.
    async fn lint(&self, module_path: &Path) -> Result<String, LintError>;
}

/// Linter packaged as a container image, run with the project mounted at `/app`.
pub struct ContainerLinter<'a, I: ?Sized> {
    engine: &'a I,
    image: ImageRef,
    cli: String,
    root: PathBuf,
}

impl<'a, I: ImageOps + ?Sized> ContainerLinter<'a, I> {
    pub fn new(engine: &'a I, config: &LintConfig, root: impl Into<PathBuf>) -> Self {
        Self {
            engine,
            image: config.image.clone(),
            cli: config.cli.clone(),
            root: root.into(),
        }
    }
}

/// Arguments for `<cli> run` with the project mounted at `/app`.
fn run_args(root: &Path, image: &ImageRef, module_path: &Path) -> Vec<String> {
    vec![
        "run".to_string(),
        "--rm".to_string(),
        "-v".to_string(),
        format!("{}:/app", root.display()),
        image.to_string(),
        module_path.display().to_string(),
    ]
}

#[async_trait]
impl<I: ImageOps + ?Sized> Linter for ContainerLinter<'_, I> {
    async fn prepare(&self) -> Result<(), LintError> {
        if !self.engine.image_exists(&self.image).await? {
            tracing::info!(image = %self.image, "pulling linter image");
            self.engine.pull_image(&self.image).await?;
        }
        Ok(())
    }

    async fn lint(&self, module_path: &Path) -> Result<String, LintError> {
        tracing::debug!(module = %module_path.display(), "running linter");
        let output = process::run(
            &self.cli,
            run_args(&self.root, &self.image, module_path),
            Some(&self.root),
        )
        .await?;
        // Linters exit non-zero when they find issues; the report wants the text either way
        Ok(output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_args_mount_project_root() {
        let image = ImageRef::parse("cozero/linter-python3-pylint").unwrap();

        assert_eq!(
            run_args(Path::new("/srv/app"), &image, Path::new("modules/module_1")),
            vec![
                "run",
                "--rm",
                "-v",
                "/srv/app:/app",
                "cozero/linter-python3-pylint:latest",
                "modules/module_1",
            ]
        );
    }
}
