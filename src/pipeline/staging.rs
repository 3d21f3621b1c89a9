// ABOUTME: Scoped ownership of the shared build-staging directory.
// ABOUTME: Reset on acquire, removed on release or drop, including failure paths.

use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
#[error("staging directory {}: {source}", path.display())]
pub struct StagingError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Exclusive handle on the staging directory for one module.
///
/// Only one exists at a time; the orchestrator processes modules
/// sequentially and drops the handle before moving on.
#[derive(Debug)]
pub struct StagingArea {
    path: PathBuf,
    released: bool,
}

impl StagingArea {
    /// Clear anything a previous module (or crashed run) left behind and
    /// create an empty directory.
    pub fn acquire(path: impl Into<PathBuf>) -> Result<Self, StagingError> {
        let path = path.into();
        remove_if_present(&path).map_err(|source| StagingError {
            path: path.clone(),
            source,
        })?;
        std::fs::create_dir_all(&path).map_err(|source| StagingError {
            path: path.clone(),
            source,
        })?;

        tracing::debug!(path = %path.display(), "staging directory reset");
        Ok(Self {
            path,
            released: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the directory, reporting failure to the caller.
    pub fn release(mut self) -> Result<(), StagingError> {
        self.released = true;
        remove_if_present(&self.path).map_err(|source| StagingError {
            path: self.path.clone(),
            source,
        })
    }
}

impl Drop for StagingArea {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = remove_if_present(&self.path) {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "failed to remove staging directory"
            );
        }
    }
}

fn remove_if_present(path: &Path) -> io::Result<()> {
    match std::fs::remove_dir_all(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_clears_leftovers() {
        let root = tempfile::tempdir().unwrap();
        let path = root.path().join("build");
        std::fs::create_dir_all(path.join("module_9")).unwrap();
        std::fs::write(path.join("stale.txt"), "old").unwrap();

        let staging = StagingArea::acquire(&path).unwrap();

        assert!(path.is_dir());
        assert_eq!(std::fs::read_dir(staging.path()).unwrap().count(), 0);
    }

    #[test]
    fn release_removes_directory() {
        let root = tempfile::tempdir().unwrap();
        let path = root.path().join("build");

        let staging = StagingArea::acquire(&path).unwrap();
        std::fs::write(path.join("Dockerfile"), "FROM scratch").unwrap();
        staging.release().unwrap();

        assert!(!path.exists());
    }

    #[test]
    fn drop_removes_directory() {
        let root = tempfile::tempdir().unwrap();
        let path = root.path().join("build");

        {
            let _staging = StagingArea::acquire(&path).unwrap();
            std::fs::write(path.join("build.yaml"), "kind: Deployment").unwrap();
        }

        assert!(!path.exists());
    }
}
