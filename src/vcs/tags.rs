// ABOUTME: Release tag management on top of version control.
// ABOUTME: Reads the current tag and records the next one exactly once per run.

use super::{VcsError, VersionControl};
use crate::types::{ReleaseTag, ReleaseTagError};

/// Errors that abort a run before any module is built.
#[derive(Debug, thiserror::Error)]
pub enum TagError {
    /// The repository has no tags; an initial tag must be created by hand.
    #[error("there are no tags; create an initial tag (e.g. v0) to build the project")]
    NoTagFound,

    #[error("latest tag is not a release tag: {0}")]
    MalformedTag(#[from] ReleaseTagError),

    #[error(transparent)]
    Vcs(#[from] VcsError),
}

/// Computes and records release tags.
pub struct TagManager<'a, V: ?Sized> {
    vcs: &'a V,
}

impl<'a, V: VersionControl + ?Sized> TagManager<'a, V> {
    pub fn new(vcs: &'a V) -> Self {
        Self { vcs }
    }

    /// The most recently created tag in the repository.
    pub async fn current_tag(&self) -> Result<ReleaseTag, TagError> {
        let raw = self.vcs.latest_tag().await?.ok_or(TagError::NoTagFound)?;
        Ok(ReleaseTag::parse(&raw)?)
    }

    /// Commit pending changes and tag them as the next release.
    ///
    /// Mutates the repository (one commit, one tag); call once per run,
    /// before the first image build.
    pub async fn next_tag(&self) -> Result<ReleaseTag, TagError> {
        let current = self.current_tag().await?;
        let next = current.next()?;

        tracing::info!(%current, %next, "committing code and tagging new release");
        let commit = self.vcs.commit_all(&format!("Release {next}")).await?;
        self.vcs.create_tag(&next).await?;
        tracing::info!(tag = %next, commit = commit.short(), "release tagged");

        Ok(next)
    }
}
