// ABOUTME: Error types for cluster operations.
// ABOUTME: Covers lookup, manifest, apply, and image update failures.

/// Errors from the cluster collaborator and resolver.
#[derive(Debug, thiserror::Error)]
pub enum ClusterError {
    #[error("failed to run kubectl: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("deployment lookup failed: {0}")]
    QueryFailed(String),

    #[error("failed to write manifest: {0}")]
    Manifest(String),

    #[error("failed to create deployment {name}: {reason}")]
    ApplyFailed { name: String, reason: String },

    #[error("failed to update image for {name}: {reason}")]
    SetImageFailed { name: String, reason: String },
}
