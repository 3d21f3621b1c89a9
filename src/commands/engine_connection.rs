// ABOUTME: Shared helper for connecting to the local container engine.
// ABOUTME: Used by both release flows and by the linter.

use slipway::config::Config;
use slipway::image::{BollardImages, EngineSocket, RegistryCredentials, detect_local};
use slipway::output::Output;
use slipway::pipeline::RunError;

/// Connect to the configured engine socket, or probe the local ones.
///
/// Registry credentials are attached when `registry.auth` is configured.
pub fn connect_to_engine(config: &Config, output: &Output) -> Result<BollardImages, RunError> {
    let socket = match config.runtime.as_ref().and_then(|r| r.socket.clone()) {
        Some(path) => EngineSocket { path },
        None => {
            output.progress("  → Detecting container engine...");
            detect_local().map_err(|source| RunError::Engine { source })?
        }
    };
    output.progress(&format!("  → Using engine at {}", socket.path));

    let images = BollardImages::connect(&socket).map_err(|source| RunError::Engine { source })?;

    match &config.registry.auth {
        Some(auth) => Ok(images.with_credentials(RegistryCredentials {
            username: auth.username.clone(),
            password: auth.password.resolve()?,
            server: config.registry.host.clone(),
        })),
        None => Ok(images),
    }
}
