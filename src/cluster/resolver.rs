// ABOUTME: Create-or-update decision for a module's cluster deployment.
// ABOUTME: Presence of the deployment is the only branching signal.

use std::path::Path;

use super::{ClusterError, ClusterOps, DeploymentManifest, ResourceLookup};
use crate::config::ClusterConfig;
use crate::types::{ImageRef, ModuleId};

/// File name of the synthesized manifest inside the manifest directory.
pub const MANIFEST_FILENAME: &str = "build.yaml";

/// What the resolver did to the cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployAction {
    /// The deployment did not exist and was created from a manifest.
    Created,
    /// The deployment existed; only its container image was swapped.
    Updated,
}

impl std::fmt::Display for DeployAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeployAction::Created => write!(f, "created"),
            DeployAction::Updated => write!(f, "updated"),
        }
    }
}

/// Resolves and performs the deploy action for one module at a time.
///
/// Create-or-update makes reruns safe: a deployment created by a failed run
/// is simply updated by the next one.
pub struct DeploymentResolver<'a, C: ?Sized> {
    cluster: &'a C,
    config: &'a ClusterConfig,
}

impl<'a, C: ClusterOps + ?Sized> DeploymentResolver<'a, C> {
    pub fn new(cluster: &'a C, config: &'a ClusterConfig) -> Self {
        Self { cluster, config }
    }

    /// Point the module's deployment at `image`, creating it if absent.
    ///
    /// `manifest_dir` receives the manifest file when a create is needed.
    pub async fn resolve(
        &self,
        module: &ModuleId,
        image: &ImageRef,
        manifest_dir: &Path,
    ) -> Result<DeployAction, ClusterError> {
        let name = module.deployment_name();

        match self.cluster.get_deployment(&name).await {
            ResourceLookup::Absent => {
                tracing::info!(deployment = %name, %image, "deployment absent, creating");
                let manifest = DeploymentManifest::for_module(module, image, self.config);
                let yaml = manifest
                    .to_yaml()
                    .map_err(|e| ClusterError::Manifest(e.to_string()))?;

                let path = manifest_dir.join(MANIFEST_FILENAME);
                tokio::fs::write(&path, yaml)
                    .await
                    .map_err(|e| ClusterError::Manifest(format!("{}: {}", path.display(), e)))?;

                self.cluster.apply_manifest(&path).await?;
                Ok(DeployAction::Created)
            }
            ResourceLookup::Found(existing) => {
                tracing::info!(
                    deployment = %name,
                    replicas = ?existing.replicas,
                    %image,
                    "deployment exists, updating image"
                );
                // The container carries the deployment's name in manifests we create
                self.cluster.set_image(&name, &name, image).await?;
                Ok(DeployAction::Updated)
            }
            ResourceLookup::QueryError(reason) => Err(ClusterError::QueryFailed(reason)),
        }
    }
}
