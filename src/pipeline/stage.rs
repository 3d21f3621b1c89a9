// ABOUTME: Stage names, outcomes, and the per-stage records kept in module reports.
// ABOUTME: Renders the operator-facing status line for each attempted stage.

use serde::Serialize;
use std::fmt;

use crate::types::ModuleId;

/// One of the ordered steps a module passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Build,
    Push,
    Deploy,
}

impl Stage {
    fn description(&self) -> &'static str {
        match self {
            Stage::Build => "Docker container image build",
            Stage::Push => "Docker container image push to registry",
            Stage::Deploy => "Docker container deployment to cluster",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Build => write!(f, "build"),
            Stage::Push => write!(f, "push"),
            Stage::Deploy => write!(f, "deploy"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StageOutcome {
    Success,
    Failure,
}

/// Outcome of one attempted stage. Stages never reached have no record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageRecord {
    pub stage: Stage,
    pub outcome: StageOutcome,
    /// Failure reason, or a short note on success (e.g. "created").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl StageRecord {
    pub fn success(stage: Stage) -> Self {
        Self {
            stage,
            outcome: StageOutcome::Success,
            detail: None,
        }
    }

    pub fn success_with(stage: Stage, detail: impl Into<String>) -> Self {
        Self {
            stage,
            outcome: StageOutcome::Success,
            detail: Some(detail.into()),
        }
    }

    pub fn failure(stage: Stage, reason: impl Into<String>) -> Self {
        Self {
            stage,
            outcome: StageOutcome::Failure,
            detail: Some(reason.into()),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.outcome == StageOutcome::Failure
    }

    /// `* (module_1) Docker container image build SUCCESSFUL.`
    pub fn status_line(&self, module: &ModuleId) -> String {
        match self.outcome {
            StageOutcome::Success => {
                format!("* ({}) {} SUCCESSFUL.", module, self.stage.description())
            }
            StageOutcome::Failure => {
                let mut line = format!("* ({}) {} FAILED!", module, self.stage.description());
                if let Some(reason) = &self.detail {
                    line.push_str(&format!("\n    {reason}"));
                }
                line
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_line() {
        let module = ModuleId::parse("module_1").unwrap();
        assert_eq!(
            StageRecord::success(Stage::Build).status_line(&module),
            "* (module_1) Docker container image build SUCCESSFUL."
        );
    }

    #[test]
    fn failure_line_carries_reason() {
        let module = ModuleId::parse("module_2").unwrap();
        let line = StageRecord::failure(Stage::Push, "denied").status_line(&module);
        assert_eq!(
            line,
            "* (module_2) Docker container image push to registry FAILED!\n    denied"
        );
    }
}
