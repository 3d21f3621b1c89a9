// ABOUTME: Fatal run errors with SNAFU pattern.
// ABOUTME: Anything here aborts the run; stage failures live in module reports instead.

use snafu::Snafu;
use std::path::PathBuf;

use crate::image::ImageError;
use crate::notify::NotifyError;
use crate::vcs::{TagError, VcsError};

/// Errors that abort a whole pipeline run.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RunError {
    #[snafu(display("{source}"))]
    Config { source: crate::error::Error },

    #[snafu(display("release tag unavailable: {source}"))]
    Tag { source: TagError },

    #[snafu(display("no deployable modules found in {}", dir.display()))]
    NoModules { dir: PathBuf },

    #[snafu(display("failed to list modules in {}: {source}", dir.display()))]
    ModuleListing {
        dir: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("failed to detect changed modules: {source}"))]
    Changes { source: VcsError },

    #[snafu(display("notification session unavailable: {source}"))]
    Notification { source: NotifyError },

    #[snafu(display("container engine unavailable: {source}"))]
    Engine { source: ImageError },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunErrorKind {
    /// Missing or invalid setting.
    Config,
    /// Repository has no release tag yet.
    NoTagFound,
    /// Latest tag is not of the form `v<digits>`.
    MalformedTag,
    /// Full build found nothing to build.
    NoModules,
    /// Version control command failed.
    VersionControl,
    /// Notification session could not be opened.
    Notification,
    /// Container engine could not be reached.
    Engine,
    /// Local filesystem error.
    Io,
}

impl RunError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> RunErrorKind {
        match self {
            RunError::Config { source } => match source {
                crate::error::Error::Io(_) => RunErrorKind::Io,
                _ => RunErrorKind::Config,
            },
            RunError::Tag { source } => match source {
                TagError::NoTagFound => RunErrorKind::NoTagFound,
                TagError::MalformedTag(_) => RunErrorKind::MalformedTag,
                TagError::Vcs(_) => RunErrorKind::VersionControl,
            },
            RunError::NoModules { .. } => RunErrorKind::NoModules,
            RunError::ModuleListing { .. } => RunErrorKind::Io,
            RunError::Changes { .. } => RunErrorKind::VersionControl,
            RunError::Notification { .. } => RunErrorKind::Notification,
            RunError::Engine { .. } => RunErrorKind::Engine,
        }
    }
}

impl From<crate::error::Error> for RunError {
    fn from(source: crate::error::Error) -> Self {
        RunError::Config { source }
    }
}

impl From<TagError> for RunError {
    fn from(source: TagError) -> Self {
        RunError::Tag { source }
    }
}
