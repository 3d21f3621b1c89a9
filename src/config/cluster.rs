// ABOUTME: Cluster settings for the deployment resolver.
// ABOUTME: kubectl binary, namespace, and the shape of bootstrapped deployments.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ClusterConfig {
    #[serde(default = "default_kubectl")]
    pub kubectl: String,

    #[serde(default)]
    pub namespace: Option<String>,

    /// Replica count used only when a deployment is first created.
    #[serde(default = "default_replicas")]
    pub replicas: u32,

    /// Environment variable exposing the module number to the container.
    #[serde(default = "default_env_var")]
    pub env_var: String,
}

fn default_kubectl() -> String {
    "kubectl".to_string()
}

fn default_replicas() -> u32 {
    2
}

fn default_env_var() -> String {
    "MODULE_NUMBER".to_string()
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            kubectl: default_kubectl(),
            namespace: None,
            replicas: default_replicas(),
            env_var: default_env_var(),
        }
    }
}
