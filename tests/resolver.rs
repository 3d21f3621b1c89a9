// ABOUTME: Integration tests for the create-or-update deployment resolver.
// ABOUTME: Verifies operation counts against an in-memory cluster.

mod support;

use slipway::cluster::{ClusterError, DeployAction, DeploymentResolver};
use slipway::config::ClusterConfig;
use slipway::types::{ImageRef, ModuleId, ReleaseTag};
use support::FakeCluster;

fn image(module: &ModuleId, tag: u64) -> ImageRef {
    ImageRef::for_release("gcr.io", "my-project", module, &ReleaseTag::new(tag))
}

#[tokio::test]
async fn absent_deployment_gets_exactly_one_create() {
    let cluster = FakeCluster::default();
    let config = ClusterConfig::default();
    let resolver = DeploymentResolver::new(&cluster, &config);
    let manifest_dir = tempfile::tempdir().unwrap();
    let module = ModuleId::parse("module_3").unwrap();

    let action = resolver
        .resolve(&module, &image(&module, 6), manifest_dir.path())
        .await
        .unwrap();

    assert_eq!(action, DeployAction::Created);
    assert_eq!(cluster.count("apply"), 1);
    assert_eq!(cluster.count("set-image"), 0);
    assert!(manifest_dir.path().join("build.yaml").is_file());
}

#[tokio::test]
async fn present_deployment_gets_exactly_one_image_update() {
    let cluster = FakeCluster::with_deployments(&["module-3"]);
    let config = ClusterConfig::default();
    let resolver = DeploymentResolver::new(&cluster, &config);
    let manifest_dir = tempfile::tempdir().unwrap();
    let module = ModuleId::parse("module_3").unwrap();

    let action = resolver
        .resolve(&module, &image(&module, 6), manifest_dir.path())
        .await
        .unwrap();

    assert_eq!(action, DeployAction::Updated);
    assert_eq!(cluster.count("apply"), 0);
    assert_eq!(
        cluster.calls(),
        vec![
            "get module-3",
            "set-image module-3 module-3=gcr.io/my-project/module_3:v6",
        ]
    );
    assert!(!manifest_dir.path().join("build.yaml").exists());
}

#[tokio::test]
async fn rerun_with_same_image_updates_again() {
    let cluster = FakeCluster::default();
    let config = ClusterConfig::default();
    let resolver = DeploymentResolver::new(&cluster, &config);
    let manifest_dir = tempfile::tempdir().unwrap();
    let module = ModuleId::parse("module_1").unwrap();
    let target = image(&module, 2);

    let first = resolver
        .resolve(&module, &target, manifest_dir.path())
        .await
        .unwrap();
    let second = resolver
        .resolve(&module, &target, manifest_dir.path())
        .await
        .unwrap();
    let third = resolver
        .resolve(&module, &target, manifest_dir.path())
        .await
        .unwrap();

    assert_eq!(first, DeployAction::Created);
    assert_eq!(second, DeployAction::Updated);
    assert_eq!(third, DeployAction::Updated);
    assert_eq!(cluster.count("apply"), 1);
    assert_eq!(cluster.count("set-image"), 2);
}

#[tokio::test]
async fn query_error_is_not_treated_as_absent() {
    let cluster = FakeCluster {
        query_error: Some("error: You must be logged in to the server".to_string()),
        ..FakeCluster::default()
    };
    let config = ClusterConfig::default();
    let resolver = DeploymentResolver::new(&cluster, &config);
    let manifest_dir = tempfile::tempdir().unwrap();
    let module = ModuleId::parse("module_1").unwrap();

    let err = resolver
        .resolve(&module, &image(&module, 1), manifest_dir.path())
        .await
        .unwrap_err();

    assert!(matches!(err, ClusterError::QueryFailed(_)));
    assert_eq!(cluster.count("apply"), 0);
}

#[tokio::test]
async fn manifest_uses_configured_replicas() {
    let cluster = FakeCluster::default();
    let config = ClusterConfig {
        replicas: 4,
        ..ClusterConfig::default()
    };
    let resolver = DeploymentResolver::new(&cluster, &config);
    let manifest_dir = tempfile::tempdir().unwrap();
    let module = ModuleId::parse("module_2").unwrap();

    resolver
        .resolve(&module, &image(&module, 9), manifest_dir.path())
        .await
        .unwrap();

    let applied = cluster.applied.lock().clone();
    let doc: serde_yaml::Value = serde_yaml::from_str(&applied[0]).unwrap();
    assert_eq!(doc["spec"]["replicas"].as_u64(), Some(4));
    assert_eq!(
        doc["spec"]["template"]["spec"]["containers"][0]["image"].as_str(),
        Some("gcr.io/my-project/module_2:v9")
    );
}
