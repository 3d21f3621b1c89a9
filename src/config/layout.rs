// ABOUTME: Project layout settings: where modules live and how builds are staged.
// ABOUTME: Paths are relative to the project root unless absolute.

use nonempty::NonEmpty;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::deserialize::deserialize_command;

/// Placeholder in `start_command` replaced by the module's numeric id.
pub const MODULE_PLACEHOLDER: &str = "{module}";

#[derive(Debug, Clone, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_modules_dir")]
    pub modules_dir: PathBuf,

    #[serde(default = "default_staging_dir")]
    pub staging_dir: PathBuf,

    #[serde(default = "default_dockerfile")]
    pub dockerfile: PathBuf,

    /// Files copied from the modules directory into every build.
    #[serde(default = "default_base_files")]
    pub base_files: Vec<String>,

    /// Container start command appended to the Dockerfile as `CMD`.
    #[serde(
        default = "default_start_command",
        deserialize_with = "deserialize_command"
    )]
    pub start_command: NonEmpty<String>,
}

fn default_modules_dir() -> PathBuf {
    PathBuf::from("modules")
}

fn default_staging_dir() -> PathBuf {
    PathBuf::from("build")
}

fn default_dockerfile() -> PathBuf {
    PathBuf::from("docker/Dockerfile")
}

fn default_base_files() -> Vec<String> {
    vec![
        "main.py".to_string(),
        "requirements.txt".to_string(),
        "setup.py".to_string(),
    ]
}

fn default_start_command() -> NonEmpty<String> {
    NonEmpty::from((
        "python3.6".to_string(),
        vec!["main.py".to_string(), MODULE_PLACEHOLDER.to_string()],
    ))
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            modules_dir: default_modules_dir(),
            staging_dir: default_staging_dir(),
            dockerfile: default_dockerfile(),
            base_files: default_base_files(),
            start_command: default_start_command(),
        }
    }
}

impl LayoutConfig {
    pub fn modules_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.modules_dir)
    }

    pub fn staging_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.staging_dir)
    }

    pub fn dockerfile(&self, root: &Path) -> PathBuf {
        root.join(&self.dockerfile)
    }

    /// Start command with the module number substituted.
    pub fn start_command_for(&self, module_number: &str) -> Vec<String> {
        self.start_command
            .iter()
            .map(|part| part.replace(MODULE_PLACEHOLDER, module_number))
            .collect()
    }
}
