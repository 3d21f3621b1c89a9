// ABOUTME: Diagnostics accumulator for non-fatal warnings during a release run.
// ABOUTME: Collects warnings that shouldn't fail the run but should be shown to users.

/// Collects non-fatal warnings during a pipeline run.
#[derive(Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!(kind = ?warning.kind, "{}", warning.message);
        self.warnings.push(warning);
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Check if any warnings were collected.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn of_kind(&self, kind: WarningKind) -> impl Iterator<Item = &Warning> {
        self.warnings.iter().filter(move |w| w.kind == kind)
    }
}

/// A non-fatal warning collected during a run.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// Create a staging cleanup warning.
    pub fn staging_cleanup(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::StagingCleanup,
            message: message.into(),
        }
    }

    /// Create a report delivery warning.
    pub fn notification(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::Notification,
            message: message.into(),
        }
    }

    pub fn changed_files(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::ChangedFiles,
            message: message.into(),
        }
    }

    pub fn lint(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::Lint,
            message: message.into(),
        }
    }
}

/// Categories of warnings that can occur during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// Failed to remove the staging directory (next module resets it anyway).
    StagingCleanup,
    /// Report could not be delivered.
    Notification,
    /// Changed-file listing for a module could not be read.
    ChangedFiles,
    /// Static analysis could not run.
    Lint,
}
