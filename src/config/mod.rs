// ABOUTME: Configuration types and parsing for slipway.yml.
// ABOUTME: Handles YAML parsing, discovery, and required-setting validation.

mod cluster;
mod deserialize;
mod env_value;
mod init;
mod layout;
mod notify;

pub use cluster::ClusterConfig;
pub use env_value::EnvValue;
pub use init::init_config;
pub use layout::{LayoutConfig, MODULE_PLACEHOLDER};
pub use notify::NotifyConfig;

use crate::error::{Error, Result};
use crate::types::ImageRef;
use deserialize::deserialize_image_ref;
use serde::Deserialize;
use std::path::Path;

pub const CONFIG_FILENAME: &str = "slipway.yml";
pub const CONFIG_FILENAME_ALT: &str = "slipway.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".slipway/config.yml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Informational config version, printed at the start of every run.
    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default)]
    pub registry: RegistryConfig,

    #[serde(default)]
    pub notify: NotifyConfig,

    #[serde(default)]
    pub layout: LayoutConfig,

    #[serde(default)]
    pub cluster: ClusterConfig,

    #[serde(default)]
    pub lint: Option<LintConfig>,

    #[serde(default)]
    pub runtime: Option<RuntimeConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistryConfig {
    /// Registry host, e.g. `gcr.io`.
    #[serde(default)]
    pub host: String,
    /// Project namespace inside the registry.
    #[serde(default)]
    pub project: String,
    /// Push credentials; omit when the engine is already authenticated.
    #[serde(default)]
    pub auth: Option<RegistryAuthConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegistryAuthConfig {
    pub username: String,
    pub password: EnvValue,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LintConfig {
    #[serde(default = "default_lint_image", deserialize_with = "deserialize_image_ref")]
    pub image: ImageRef,
    /// CLI used to run the linter container.
    #[serde(default = "default_lint_cli")]
    pub cli: String,
}

fn default_lint_cli() -> String {
    "docker".to_string()
}

fn default_lint_image() -> ImageRef {
    ImageRef::new(None, "cozero/linter-python3-pylint", "latest")
}

/// Explicit container engine socket (overrides local detection).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub socket: Option<String>,
}

fn default_version() -> String {
    "1".to_string()
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// Check that every setting a run depends on is present.
    ///
    /// Runs before any stage so a half-configured project never builds.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("registry.host", self.registry.host.as_str()),
            ("registry.project", self.registry.project.as_str()),
            ("notify.admin", self.notify.admin.as_str()),
            ("notify.sender", self.notify.sender.as_str()),
        ];

        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(Error::MissingSetting(field));
            }
        }

        if self.notify.password.resolve()?.is_empty() {
            return Err(Error::MissingSetting("notify.password"));
        }

        if self.cluster.replicas == 0 {
            return Err(Error::InvalidConfig(
                "cluster.replicas must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    pub fn template() -> Self {
        Config {
            version: default_version(),
            registry: RegistryConfig {
                host: "gcr.io".to_string(),
                project: "my-project".to_string(),
                auth: None,
            },
            notify: NotifyConfig {
                admin: "admin@example.com".to_string(),
                sender: "deploy@example.com".to_string(),
                password: EnvValue::FromEnv {
                    var: "SLIPWAY_SMTP_PASSWORD".to_string(),
                    default: None,
                },
                ..NotifyConfig::default()
            },
            layout: LayoutConfig::default(),
            cluster: ClusterConfig::default(),
            lint: None,
            runtime: None,
        }
    }
}
