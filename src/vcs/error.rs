// ABOUTME: Error types for version control operations.
// ABOUTME: Separates spawn failures from commands that ran and failed.

/// Errors from the version control collaborator.
#[derive(Debug, thiserror::Error)]
pub enum VcsError {
    #[error("failed to run git: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("`git {command}` failed: {reason}")]
    CommandFailed { command: String, reason: String },
}
