// ABOUTME: VersionControl implementation that shells out to the git CLI.
// ABOUTME: Runs every command from the configured repository root.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::{VcsError, VersionControl, parse_porcelain_paths, relative_to_project};
use crate::process::{self, CommandOutput};
use crate::types::{CommitId, ReleaseTag};

/// git CLI bound to one working tree.
#[derive(Debug, Clone)]
pub struct GitCli {
    root: PathBuf,
}

impl GitCli {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    async fn git(&self, args: &[&str]) -> Result<CommandOutput, VcsError> {
        Ok(process::run("git", args, Some(&self.root)).await?)
    }

    /// Run git and require a zero exit status.
    async fn git_ok(&self, args: &[&str]) -> Result<CommandOutput, VcsError> {
        let output = self.git(args).await?;
        if output.success() {
            Ok(output)
        } else {
            Err(VcsError::CommandFailed {
                command: args.join(" "),
                reason: output.failure_summary(),
            })
        }
    }
}

#[async_trait]
impl VersionControl for GitCli {
    async fn latest_tag(&self) -> Result<Option<String>, VcsError> {
        // Newest tagged commit across all refs, then its tag name
        let tagged = self.git_ok(&["rev-list", "--tags", "--max-count=1"]).await?;
        let commit = tagged.stdout.trim();
        if commit.is_empty() {
            return Ok(None);
        }

        let described = self.git_ok(&["describe", "--tags", commit]).await?;
        let tag = described.stdout.trim();
        Ok((!tag.is_empty()).then(|| tag.to_string()))
    }

    async fn changed_paths(&self) -> Result<Vec<String>, VcsError> {
        // Porcelain paths are repository-relative even when run from a subdirectory
        let prefix = self.git_ok(&["rev-parse", "--show-prefix"]).await?;
        let output = self
            .git_ok(&["status", "--porcelain", "--untracked-files=all"])
            .await?;
        Ok(relative_to_project(
            parse_porcelain_paths(&output.stdout),
            &prefix.stdout,
        ))
    }

    async fn changed_files(&self, path: &Path) -> Result<String, VcsError> {
        let path = path.to_string_lossy();
        let output = self
            .git_ok(&["status", "--porcelain", "--untracked-files=all", "--", &path])
            .await?;
        Ok(output.stdout.trim().to_string())
    }

    async fn commit_all(&self, message: &str) -> Result<CommitId, VcsError> {
        self.git_ok(&["add", "--all"]).await?;

        let commit = self.git(&["commit", "-m", message]).await?;
        if !commit.success() {
            if commit.stdout.contains("nothing to commit") {
                tracing::info!("working tree clean, tagging current HEAD");
            } else {
                return Err(VcsError::CommandFailed {
                    command: "commit".to_string(),
                    reason: commit.failure_summary(),
                });
            }
        }

        let head = self.git_ok(&["rev-parse", "HEAD"]).await?;
        Ok(CommitId::new(head.stdout.trim()))
    }

    async fn create_tag(&self, tag: &ReleaseTag) -> Result<(), VcsError> {
        self.git_ok(&["tag", &tag.to_string()]).await?;
        Ok(())
    }
}
