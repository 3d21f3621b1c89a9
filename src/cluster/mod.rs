// ABOUTME: Cluster collaborator and the create-or-update deployment resolver.
// ABOUTME: Exports ClusterOps, the kubectl implementation, and manifest types.

mod error;
mod kubectl;
mod manifest;
mod resolver;

pub use error::ClusterError;
pub use kubectl::{KubectlCluster, classify_lookup};
pub use manifest::DeploymentManifest;
pub use resolver::{DeployAction, DeploymentResolver};

use crate::types::ImageRef;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;

/// Container inside an existing deployment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExistingContainer {
    pub name: String,
    #[serde(default)]
    pub image: String,
}

/// The parts of a live deployment the resolver reports on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingDeployment {
    pub name: String,
    pub replicas: Option<u32>,
    pub containers: Vec<ExistingContainer>,
}

/// Result of looking up a deployment by name.
///
/// Absence is a normal outcome, distinct from a failed query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceLookup {
    Found(ExistingDeployment),
    Absent,
    QueryError(String),
}

/// Operations the resolver needs from the cluster.
#[async_trait]
pub trait ClusterOps: Send + Sync {
    async fn get_deployment(&self, name: &str) -> ResourceLookup;

    /// Create (or converge) resources from a manifest file.
    async fn apply_manifest(&self, manifest_path: &Path) -> Result<(), ClusterError>;

    /// Swap one container's image in place, leaving every other field alone.
    async fn set_image(
        &self,
        deployment: &str,
        container: &str,
        image: &ImageRef,
    ) -> Result<(), ClusterError>;
}
