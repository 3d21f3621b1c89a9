// ABOUTME: Error types for image operations.
// ABOUTME: Covers context staging, build, tag, push, and pull failures.

/// Errors from image operations.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("failed to stage build context: {0}")]
    Context(String),

    #[error("image build failed: {0}")]
    BuildFailed(String),

    #[error("failed to tag {source_ref} as {target}: {reason}")]
    TagFailed {
        source_ref: String,
        target: String,
        reason: String,
    },

    #[error("failed to push {reference}: {reason}")]
    PushFailed { reference: String, reason: String },

    #[error("pull failed: {0}")]
    PullFailed(String),

    #[error("no container engine found (checked Podman and Docker sockets)")]
    NoEngineFound,

    #[error("engine connection failed: {0}")]
    Connection(String),

    #[error("engine error: {0}")]
    Runtime(String),
}
