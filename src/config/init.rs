// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Creates slipway.yml template files.

use std::path::Path;

use crate::error::{Error, Result};

use super::{CONFIG_FILENAME, Config};

pub fn init_config(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let yaml = generate_template_yaml(&Config::template());
    std::fs::write(&config_path, yaml)?;

    Ok(())
}

fn generate_template_yaml(config: &Config) -> String {
    format!(
        r#"version: "{}"

registry:
  host: {}
  project: {}

notify:
  admin: {}
  sender: {}
  # Read from the environment so the secret stays out of version control
  password:
    env: SLIPWAY_SMTP_PASSWORD
  smtp_host: {}
  smtp_port: {}

layout:
  modules_dir: {}
  staging_dir: {}
  dockerfile: {}

cluster:
  replicas: {}
  env_var: {}

# Uncomment to include static analysis output in change-triggered reports
# lint:
#   image: cozero/linter-python3-pylint
"#,
        config.version,
        config.registry.host,
        config.registry.project,
        config.notify.admin,
        config.notify.sender,
        config.notify.smtp_host,
        config.notify.smtp_port,
        config.layout.modules_dir.display(),
        config.layout.staging_dir.display(),
        config.layout.dockerfile.display(),
        config.cluster.replicas,
        config.cluster.env_var,
    )
}
