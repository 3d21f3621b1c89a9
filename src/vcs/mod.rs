// ABOUTME: Version control collaborator: tags, working-tree changes, release commits.
// ABOUTME: Exports the VersionControl trait, the git CLI implementation, and tag management.

mod changes;
mod error;
mod git;
mod tags;

pub use changes::{changed_modules, parse_porcelain_paths, relative_to_project};
pub use error::VcsError;
pub use git::GitCli;
pub use tags::{TagError, TagManager};

use crate::types::{CommitId, ReleaseTag};
use async_trait::async_trait;
use std::path::Path;

/// Operations the pipeline needs from version control.
#[async_trait]
pub trait VersionControl: Send + Sync {
    /// Most recently created tag reachable from any ref, or `None` when the
    /// repository has no tags at all.
    async fn latest_tag(&self) -> Result<Option<String>, VcsError>;

    /// Paths with uncommitted changes, relative to the project root.
    /// Untracked directories are expanded to the files inside them.
    async fn changed_paths(&self) -> Result<Vec<String>, VcsError>;

    /// Human-readable status listing restricted to `path` (relative to the
    /// project root).
    async fn changed_files(&self, path: &Path) -> Result<String, VcsError>;

    /// Stage everything and commit it. An empty working tree is not an error;
    /// the current HEAD is returned instead.
    async fn commit_all(&self, message: &str) -> Result<CommitId, VcsError>;

    /// Create a lightweight tag at HEAD.
    async fn create_tag(&self, tag: &ReleaseTag) -> Result<(), VcsError>;
}
