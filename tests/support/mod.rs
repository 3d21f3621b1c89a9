// ABOUTME: Test support utilities.
// ABOUTME: In-memory collaborators and a project fixture for pipeline tests.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use slipway::cluster::{ClusterError, ClusterOps, ExistingDeployment, ResourceLookup};
use slipway::config::{Config, EnvValue};
use slipway::image::{ImageError, ImageOps};
use slipway::lint::{LintError, Linter};
use slipway::notify::{Notifier, NotifyError};
use slipway::types::{CommitId, ImageId, ImageRef, ReleaseTag};
use slipway::vcs::{VcsError, VersionControl};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tempfile::TempDir;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env().add_directive("slipway=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

// =============================================================================
// Project fixture
// =============================================================================

/// A project tree with `module_base`, the given modules, and a Dockerfile.
pub struct Project {
    pub dir: TempDir,
    pub config: Config,
}

impl Project {
    pub fn new(modules: &[&str]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        let modules_dir = root.join("modules");
        fs::create_dir_all(modules_dir.join("module_base")).unwrap();
        fs::write(modules_dir.join("module_base/common.py"), "SHARED = 1\n").unwrap();
        for file in ["main.py", "requirements.txt", "setup.py"] {
            fs::write(modules_dir.join(file), format!("# {file}\n")).unwrap();
        }
        for module in modules {
            fs::create_dir_all(modules_dir.join(module)).unwrap();
            fs::write(modules_dir.join(module).join("app.py"), "print('hi')\n").unwrap();
        }

        fs::create_dir_all(root.join("docker")).unwrap();
        fs::write(root.join("docker/Dockerfile"), "FROM python:3.6\nCOPY . /app").unwrap();

        let mut config = Config::template();
        config.notify.password = EnvValue::Literal("secret".to_string());

        Self { dir, config }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn staging_dir(&self) -> PathBuf {
        self.config.layout.staging_dir(self.root())
    }
}

// =============================================================================
// Version control
// =============================================================================

pub struct FakeVcs {
    pub tags: Mutex<Vec<String>>,
    /// Uncommitted paths; cleared by `commit_all` as a real commit would.
    pub changed: Mutex<Vec<String>>,
    pub commits: Mutex<Vec<String>>,
}

impl FakeVcs {
    pub fn tagged(tag: &str) -> Self {
        Self {
            tags: Mutex::new(vec![tag.to_string()]),
            changed: Mutex::new(Vec::new()),
            commits: Mutex::new(Vec::new()),
        }
    }

    pub fn untagged() -> Self {
        Self {
            tags: Mutex::new(Vec::new()),
            changed: Mutex::new(Vec::new()),
            commits: Mutex::new(Vec::new()),
        }
    }

    pub fn with_changes(mut self, paths: &[&str]) -> Self {
        self.changed = Mutex::new(paths.iter().map(|p| p.to_string()).collect());
        self
    }

    pub fn created_tags(&self) -> Vec<String> {
        self.tags.lock().iter().skip(1).cloned().collect()
    }
}

#[async_trait]
impl VersionControl for FakeVcs {
    async fn latest_tag(&self) -> Result<Option<String>, VcsError> {
        Ok(self.tags.lock().last().cloned())
    }

    async fn changed_paths(&self) -> Result<Vec<String>, VcsError> {
        Ok(self.changed.lock().clone())
    }

    async fn changed_files(&self, path: &Path) -> Result<String, VcsError> {
        let prefix = path.to_string_lossy().into_owned();
        Ok(self
            .changed
            .lock()
            .iter()
            .filter(|p| p.starts_with(&prefix))
            .map(|p| format!(" M {p}"))
            .collect::<Vec<_>>()
            .join("\n"))
    }

    async fn commit_all(&self, message: &str) -> Result<CommitId, VcsError> {
        self.commits.lock().push(message.to_string());
        self.changed.lock().clear();
        Ok(CommitId::new("0123456789abcdef0123"))
    }

    async fn create_tag(&self, tag: &ReleaseTag) -> Result<(), VcsError> {
        self.tags.lock().push(tag.to_string());
        Ok(())
    }
}

// =============================================================================
// Container engine
// =============================================================================

/// Records every engine call as a short string, e.g. `push gcr.io/p/module_1:v6`.
#[derive(Default)]
pub struct FakeImages {
    pub calls: Mutex<Vec<String>>,
    /// Module names (e.g. `module_2`) whose build fails.
    pub fail_build: HashSet<String>,
    /// Full references whose push fails.
    pub fail_push: HashSet<String>,
    /// Target references whose tag fails.
    pub fail_tag: HashSet<String>,
    /// Whether the staged context held a Dockerfile when each build ran.
    pub saw_dockerfile: Mutex<Vec<bool>>,
}

impl FakeImages {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn pushes(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with("push "))
            .collect()
    }
}

#[async_trait]
impl ImageOps for FakeImages {
    async fn build_image(
        &self,
        context_dir: &Path,
        dockerfile: &str,
        tag: &ImageRef,
    ) -> Result<ImageId, ImageError> {
        self.calls.lock().push(format!("build {tag}"));
        self.saw_dockerfile
            .lock()
            .push(context_dir.join(dockerfile).is_file());

        if self.fail_build.contains(tag.name()) {
            return Err(ImageError::BuildFailed("step 3/7 failed".to_string()));
        }
        Ok(ImageId::new(format!("sha256:{}0000000000000000", tag.name())))
    }

    async fn tag_image(&self, source: &ImageRef, target: &ImageRef) -> Result<(), ImageError> {
        self.calls.lock().push(format!("tag {source} {target}"));
        if self.fail_tag.contains(&target.to_string()) {
            return Err(ImageError::TagFailed {
                source_ref: source.to_string(),
                target: target.to_string(),
                reason: "no such image".to_string(),
            });
        }
        Ok(())
    }

    async fn push_image(&self, reference: &ImageRef) -> Result<(), ImageError> {
        self.calls.lock().push(format!("push {reference}"));
        if self.fail_push.contains(&reference.to_string()) {
            return Err(ImageError::PushFailed {
                reference: reference.to_string(),
                reason: "denied: requested access to the resource is denied".to_string(),
            });
        }
        Ok(())
    }

    async fn image_exists(&self, reference: &ImageRef) -> Result<bool, ImageError> {
        self.calls.lock().push(format!("exists {reference}"));
        Ok(false)
    }

    async fn pull_image(&self, reference: &ImageRef) -> Result<(), ImageError> {
        self.calls.lock().push(format!("pull {reference}"));
        Ok(())
    }
}

// =============================================================================
// Cluster
// =============================================================================

#[derive(Default)]
pub struct FakeCluster {
    pub deployments: Mutex<HashSet<String>>,
    pub calls: Mutex<Vec<String>>,
    /// Manifests as they were on disk at apply time.
    pub applied: Mutex<Vec<String>>,
    pub query_error: Option<String>,
    pub fail_apply: bool,
}

impl FakeCluster {
    pub fn with_deployments(names: &[&str]) -> Self {
        Self {
            deployments: Mutex::new(names.iter().map(|n| n.to_string()).collect()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn count(&self, verb: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.split_whitespace().next() == Some(verb))
            .count()
    }
}

#[async_trait]
impl ClusterOps for FakeCluster {
    async fn get_deployment(&self, name: &str) -> ResourceLookup {
        self.calls.lock().push(format!("get {name}"));
        if let Some(reason) = &self.query_error {
            return ResourceLookup::QueryError(reason.clone());
        }
        if self.deployments.lock().contains(name) {
            ResourceLookup::Found(ExistingDeployment {
                name: name.to_string(),
                replicas: Some(2),
                containers: Vec::new(),
            })
        } else {
            ResourceLookup::Absent
        }
    }

    async fn apply_manifest(&self, manifest_path: &Path) -> Result<(), ClusterError> {
        self.calls
            .lock()
            .push(format!("apply {}", manifest_path.display()));
        let manifest = fs::read_to_string(manifest_path)?;

        if self.fail_apply {
            return Err(ClusterError::ApplyFailed {
                name: manifest_path.display().to_string(),
                reason: "admission webhook denied the request".to_string(),
            });
        }

        let doc: serde_yaml::Value = serde_yaml::from_str(&manifest)
            .map_err(|e| ClusterError::Manifest(e.to_string()))?;
        if let Some(name) = doc["metadata"]["name"].as_str() {
            self.deployments.lock().insert(name.to_string());
        }
        self.applied.lock().push(manifest);
        Ok(())
    }

    async fn set_image(
        &self,
        deployment: &str,
        container: &str,
        image: &ImageRef,
    ) -> Result<(), ClusterError> {
        self.calls
            .lock()
            .push(format!("set-image {deployment} {container}={image}"));
        Ok(())
    }
}

// =============================================================================
// Notification and lint
// =============================================================================

#[derive(Default)]
pub struct FakeNotifier {
    pub sent: Mutex<Vec<String>>,
    pub fail: bool,
}

impl FakeNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl Notifier for FakeNotifier {
    async fn send(&self, body: &str) -> Result<(), NotifyError> {
        if self.fail {
            return Err(NotifyError::Send {
                recipient: "admin@example.com".to_string(),
                reason: "421 service not available".to_string(),
            });
        }
        self.sent.lock().push(body.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeLinter {
    pub prepared: Mutex<usize>,
    pub linted: Mutex<Vec<PathBuf>>,
}

#[async_trait]
impl Linter for FakeLinter {
    async fn prepare(&self) -> Result<(), LintError> {
        *self.prepared.lock() += 1;
        Ok(())
    }

    async fn lint(&self, module_path: &Path) -> Result<String, LintError> {
        self.linted.lock().push(module_path.to_path_buf());
        Ok(format!(
            "************* {}\nYour code has been rated at 9.50/10\n",
            module_path.display()
        ))
    }
}
