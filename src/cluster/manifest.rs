// ABOUTME: Deployment manifest synthesized when a module is first deployed.
// ABOUTME: Serialized to YAML and handed to `kubectl apply`.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::ClusterConfig;
use crate::types::{ImageRef, ModuleId};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentManifest {
    pub api_version: String,
    pub kind: String,
    pub metadata: Metadata,
    pub spec: DeploymentSpec,
}

#[derive(Debug, Clone, Serialize)]
pub struct Metadata {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeploymentSpec {
    pub replicas: u32,
    pub selector: Selector,
    pub template: PodTemplate,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Selector {
    pub match_labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PodTemplate {
    pub metadata: TemplateMetadata,
    pub spec: PodSpec,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateMetadata {
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PodSpec {
    pub containers: Vec<Container>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Container {
    pub name: String,
    pub image: String,
    pub env: Vec<EnvVar>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnvVar {
    pub name: String,
    pub value: String,
}

impl DeploymentManifest {
    /// Fixed-shape deployment: one container per pod, labelled and named
    /// after the module, with its number exposed as an environment variable.
    pub fn for_module(module: &ModuleId, image: &ImageRef, cluster: &ClusterConfig) -> Self {
        let name = module.deployment_name();
        let labels = BTreeMap::from([("app".to_string(), name.clone())]);

        Self {
            api_version: "apps/v1".to_string(),
            kind: "Deployment".to_string(),
            metadata: Metadata {
                name: name.clone(),
                namespace: cluster.namespace.clone(),
            },
            spec: DeploymentSpec {
                replicas: cluster.replicas,
                selector: Selector {
                    match_labels: labels.clone(),
                },
                template: PodTemplate {
                    metadata: TemplateMetadata { labels },
                    spec: PodSpec {
                        containers: vec![Container {
                            name,
                            image: image.to_string(),
                            env: vec![EnvVar {
                                name: cluster.env_var.clone(),
                                value: module.number().to_string(),
                            }],
                        }],
                    },
                },
            },
        }
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ReleaseTag;

    #[test]
    fn manifest_has_fixed_shape() {
        let module = ModuleId::parse("module_4").unwrap();
        let image = ImageRef::for_release("gcr.io", "proj", &module, &ReleaseTag::new(7));
        let manifest = DeploymentManifest::for_module(&module, &image, &ClusterConfig::default());

        let yaml: serde_yaml::Value = serde_yaml::from_str(&manifest.to_yaml().unwrap()).unwrap();
        assert_eq!(yaml["apiVersion"].as_str(), Some("apps/v1"));
        assert_eq!(yaml["kind"].as_str(), Some("Deployment"));
        assert_eq!(yaml["metadata"]["name"].as_str(), Some("module-4"));
        assert!(yaml["metadata"].get("namespace").is_none());
        assert_eq!(yaml["spec"]["replicas"].as_u64(), Some(2));
        assert_eq!(
            yaml["spec"]["selector"]["matchLabels"]["app"].as_str(),
            Some("module-4")
        );

        let containers = yaml["spec"]["template"]["spec"]["containers"]
            .as_sequence()
            .unwrap();
        assert_eq!(containers.len(), 1);
        assert_eq!(
            containers[0]["image"].as_str(),
            Some("gcr.io/proj/module_4:v7")
        );
        assert_eq!(containers[0]["env"][0]["name"].as_str(), Some("MODULE_NUMBER"));
        assert_eq!(containers[0]["env"][0]["value"].as_str(), Some("4"));
    }
}
