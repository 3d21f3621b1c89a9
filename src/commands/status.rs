// ABOUTME: Status command implementation.
// ABOUTME: Shows the current release tag and changed modules without side effects.

use slipway::config::Config;
use slipway::pipeline::RunError;
use slipway::vcs::{GitCli, TagError, TagManager, VersionControl, changed_modules};
use std::path::Path;

pub async fn status(config: Config, root: &Path) -> Result<(), RunError> {
    let vcs = GitCli::new(root);

    let tag = match TagManager::new(&vcs).current_tag().await {
        Ok(tag) => tag.to_string(),
        Err(TagError::NoTagFound) => "none".to_string(),
        Err(e) => return Err(e.into()),
    };

    let paths = vcs
        .changed_paths()
        .await
        .map_err(|source| RunError::Changes { source })?;
    let modules = changed_modules(&paths, &config.layout.modules_dir);

    println!("Config version: {}", config.version);
    println!("Registry: {}/{}", config.registry.host, config.registry.project);
    println!("Release tag: {tag}");
    if modules.is_empty() {
        println!("Changed modules: none");
    } else {
        let names: Vec<String> = modules.iter().map(|m| m.name()).collect();
        println!("Changed modules: {}", names.join(", "));
    }

    Ok(())
}
