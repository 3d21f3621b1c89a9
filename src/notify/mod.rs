// ABOUTME: Notification collaborator for the end-of-run report.
// ABOUTME: Exports the Notifier trait and the SMTP implementation.

mod smtp;

pub use smtp::SmtpNotifier;

use async_trait::async_trait;

/// Errors from the notification channel.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("invalid mail address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("failed to set up SMTP transport for {host}: {reason}")]
    Transport { host: String, reason: String },

    #[error("SMTP login failed for {user} on {host}: {reason}")]
    Authentication {
        user: String,
        host: String,
        reason: String,
    },

    #[error("failed to build message: {0}")]
    Message(String),

    #[error("failed to send notification to {recipient}: {reason}")]
    Send { recipient: String, reason: String },

    #[error("notification session already used")]
    SessionClosed,
}

/// Delivers the plain-text run report to the operator.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, body: &str) -> Result<(), NotifyError>;
}
