// ABOUTME: ClusterOps implementation that shells out to kubectl.
// ABOUTME: Turns kubectl's error text into a typed create-or-update signal.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;

use super::{ClusterError, ClusterOps, ExistingContainer, ExistingDeployment, ResourceLookup};
use crate::config::ClusterConfig;
use crate::process::{self, CommandOutput};
use crate::types::ImageRef;

/// Phrases kubectl prints on stderr when the named resource does not exist.
const ABSENT_MARKERS: [&str; 2] = ["No resources found", "(NotFound)"];

/// kubectl bound to an optional namespace.
#[derive(Debug, Clone)]
pub struct KubectlCluster {
    binary: String,
    namespace: Option<String>,
}

impl KubectlCluster {
    pub fn new(config: &ClusterConfig) -> Self {
        Self {
            binary: config.kubectl.clone(),
            namespace: config.namespace.clone(),
        }
    }

    async fn kubectl(&self, args: &[&str]) -> std::io::Result<CommandOutput> {
        let mut full: Vec<&str> = Vec::with_capacity(args.len() + 2);
        if let Some(namespace) = &self.namespace {
            full.extend(["--namespace", namespace.as_str()]);
        }
        full.extend_from_slice(args);
        process::run(&self.binary, full, None).await
    }
}

#[derive(Debug, Deserialize)]
struct DeploymentObject {
    metadata: ObjectMeta,
    #[serde(default)]
    spec: Option<DeploymentObjectSpec>,
}

#[derive(Debug, Deserialize)]
struct ObjectMeta {
    name: String,
}

#[derive(Debug, Deserialize)]
struct DeploymentObjectSpec {
    #[serde(default)]
    replicas: Option<u32>,
    #[serde(default)]
    template: Option<TemplateObject>,
}

#[derive(Debug, Deserialize)]
struct TemplateObject {
    #[serde(default)]
    spec: Option<PodObjectSpec>,
}

#[derive(Debug, Deserialize)]
struct PodObjectSpec {
    #[serde(default)]
    containers: Vec<ExistingContainer>,
}

/// Classify the output of `kubectl get deployment <name> -o json`.
pub fn classify_lookup(output: &CommandOutput) -> ResourceLookup {
    if !output.success() {
        if ABSENT_MARKERS
            .iter()
            .any(|marker| output.stderr.contains(marker))
        {
            return ResourceLookup::Absent;
        }
        return ResourceLookup::QueryError(output.failure_summary());
    }

    match serde_json::from_str::<DeploymentObject>(&output.stdout) {
        Ok(object) => {
            let spec = object.spec;
            let replicas = spec.as_ref().and_then(|s| s.replicas);
            let containers = spec
                .and_then(|s| s.template)
                .and_then(|t| t.spec)
                .map(|p| p.containers)
                .unwrap_or_default();
            ResourceLookup::Found(ExistingDeployment {
                name: object.metadata.name,
                replicas,
                containers,
            })
        }
        Err(e) => ResourceLookup::QueryError(format!("unreadable deployment object: {e}")),
    }
}

#[async_trait]
impl ClusterOps for KubectlCluster {
    async fn get_deployment(&self, name: &str) -> ResourceLookup {
        match self.kubectl(&["get", "deployment", name, "-o", "json"]).await {
            Ok(output) => classify_lookup(&output),
            Err(e) => ResourceLookup::QueryError(format!("failed to run kubectl: {e}")),
        }
    }

    async fn apply_manifest(&self, manifest_path: &Path) -> Result<(), ClusterError> {
        let path = manifest_path.to_string_lossy();
        let output = self.kubectl(&["apply", "-f", &path]).await?;
        if output.success() {
            Ok(())
        } else {
            Err(ClusterError::ApplyFailed {
                name: manifest_path.display().to_string(),
                reason: output.failure_summary(),
            })
        }
    }

    async fn set_image(
        &self,
        deployment: &str,
        container: &str,
        image: &ImageRef,
    ) -> Result<(), ClusterError> {
        let resource = format!("deployment/{deployment}");
        let assignment = format!("{container}={image}");
        let output = self
            .kubectl(&["set", "image", &resource, &assignment])
            .await?;
        if output.success() {
            Ok(())
        } else {
            Err(ClusterError::SetImageFailed {
                name: deployment.to_string(),
                reason: output.failure_summary(),
            })
        }
    }
}
