// ABOUTME: Assembles a module's build context inside the staging directory.
// ABOUTME: Base files + module_base + module code + Dockerfile with a start command.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::ImageError;
use crate::config::LayoutConfig;
use crate::types::ModuleId;

const DOCKERFILE_NAME: &str = "Dockerfile";

/// A populated build context ready to be sent to the engine.
#[derive(Debug, Clone)]
pub struct StagedContext {
    pub dir: PathBuf,
    pub dockerfile: String,
}

/// Copy everything a module's image needs into `staging_dir`.
///
/// `staging_dir` must already exist and be empty; the pipeline's staging
/// guard owns its lifecycle.
pub fn stage_build_context(
    root: &Path,
    layout: &LayoutConfig,
    staging_dir: &Path,
    module: &ModuleId,
) -> Result<StagedContext, ImageError> {
    let modules_dir = layout.modules_dir(root);

    for file in &layout.base_files {
        let source = modules_dir.join(file);
        fs::copy(&source, staging_dir.join(file))
            .map_err(|e| context_error(&source, e))?;
    }

    let base = ModuleId::base().name();
    copy_dir(&modules_dir.join(&base), &staging_dir.join(&base))?;
    copy_dir(&modules_dir.join(module.name()), &staging_dir.join(module.name()))?;

    let dockerfile = staging_dir.join(DOCKERFILE_NAME);
    let template = layout.dockerfile(root);
    fs::copy(&template, &dockerfile).map_err(|e| context_error(&template, e))?;
    append_start_command(&dockerfile, &layout.start_command_for(module.number()))?;

    Ok(StagedContext {
        dir: staging_dir.to_path_buf(),
        dockerfile: DOCKERFILE_NAME.to_string(),
    })
}

/// Append `CMD [...]` in exec form.
fn append_start_command(dockerfile: &Path, command: &[String]) -> Result<(), ImageError> {
    let exec_form =
        serde_json::to_string(command).map_err(|e| ImageError::Context(e.to_string()))?;

    let mut file = fs::OpenOptions::new()
        .append(true)
        .open(dockerfile)
        .map_err(|e| context_error(dockerfile, e))?;

    // The template may not end with a newline
    writeln!(file, "\nCMD {exec_form}").map_err(|e| context_error(dockerfile, e))
}

fn copy_dir(source: &Path, target: &Path) -> Result<(), ImageError> {
    fs::create_dir_all(target).map_err(|e| context_error(target, e))?;

    for entry in fs::read_dir(source).map_err(|e| context_error(source, e))? {
        let entry = entry.map_err(|e| context_error(source, e))?;
        let path = entry.path();
        let destination = target.join(entry.file_name());
        let file_type = entry.file_type().map_err(|e| context_error(&path, e))?;

        if file_type.is_dir() {
            copy_dir(&path, &destination)?;
        } else {
            fs::copy(&path, &destination).map_err(|e| context_error(&path, e))?;
        }
    }

    Ok(())
}

fn context_error(path: &Path, err: std::io::Error) -> ImageError {
    ImageError::Context(format!("{}: {}", path.display(), err))
}
