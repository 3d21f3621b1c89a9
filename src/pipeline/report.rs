// ABOUTME: Per-module and per-run reports handed to the notification sink.
// ABOUTME: Modules appear in processing order; nothing selected is omitted.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::stage::{Stage, StageRecord};
use crate::types::{ModuleId, ReleaseTag};

const RULE_WIDTH: usize = 100;

/// Changed-file listing and static-analysis output for one module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangeSummary {
    pub changed_files: String,
    pub lint_output: String,
}

impl ChangeSummary {
    fn render(&self, module: &ModuleId, out: &mut String) {
        let rule = "=".repeat(RULE_WIDTH);
        out.push_str(&format!("\n{module}\n{rule}\n"));
        out.push_str("Changed files:\n");
        out.push_str(&"-".repeat("Changed files:".len()));
        out.push('\n');
        out.push_str(&self.changed_files);
        out.push_str(&format!("\n{rule}\n"));
        out.push_str(&self.lint_output);
    }
}

/// Stage outcomes of one module, in the order they were attempted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleReport {
    #[serde(serialize_with = "serialize_display")]
    pub module: ModuleId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changes: Option<ChangeSummary>,
    pub stages: Vec<StageRecord>,
}

fn serialize_display<S: serde::Serializer>(
    value: &ModuleId,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

impl ModuleReport {
    pub fn new(module: ModuleId, stages: Vec<StageRecord>) -> Self {
        Self {
            module,
            changes: None,
            stages,
        }
    }

    pub fn with_changes(mut self, changes: ChangeSummary) -> Self {
        self.changes = Some(changes);
        self
    }

    /// True when every attempted stage succeeded through Deploy.
    pub fn succeeded(&self) -> bool {
        self.stages.iter().all(|r| !r.is_failure())
            && self.stages.last().map(|r| r.stage) == Some(Stage::Deploy)
    }

    /// The stage that stopped this module, if any.
    pub fn failed_stage(&self) -> Option<Stage> {
        self.stages.iter().find(|r| r.is_failure()).map(|r| r.stage)
    }

    pub fn status_lines(&self) -> Vec<String> {
        self.stages
            .iter()
            .map(|record| record.status_line(&self.module))
            .collect()
    }

    fn render(&self, out: &mut String) {
        if let Some(changes) = &self.changes {
            changes.render(&self.module, out);
        }
        out.push('\n');
        for line in self.status_lines() {
            out.push_str(&line);
            out.push('\n');
        }
    }
}

/// Everything one pipeline run produced; exists only for that run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub host: String,
    #[serde(serialize_with = "serialize_tag")]
    pub tag: ReleaseTag,
    pub modules: Vec<ModuleReport>,
}

fn serialize_tag<S: serde::Serializer>(
    value: &ReleaseTag,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

impl RunReport {
    pub fn new(tag: ReleaseTag) -> Self {
        Self {
            started_at: Utc::now(),
            host: gethostname::gethostname().to_string_lossy().into_owned(),
            tag,
            modules: Vec::new(),
        }
    }

    pub fn append(&mut self, report: ModuleReport) -> &mut Self {
        self.modules.push(report);
        self
    }

    pub fn failed_modules(&self) -> impl Iterator<Item = &ModuleReport> {
        self.modules.iter().filter(|m| m.failed_stage().is_some())
    }

    /// Plain-text body for the notification sink.
    pub fn finalize(&self) -> String {
        let mut out = format!(
            "Release {} started {} on {}\n",
            self.tag,
            self.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
            self.host
        );

        let failed = self.failed_modules().count();
        out.push_str(&format!(
            "{} module(s) processed, {} failed\n",
            self.modules.len(),
            failed
        ));

        for module in &self.modules {
            module.render(&mut out);
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(name: &str) -> ModuleId {
        ModuleId::parse(name).unwrap()
    }

    #[test]
    fn modules_render_in_append_order() {
        let mut run = RunReport::new(ReleaseTag::new(6));
        run.append(ModuleReport::new(
            module("module_2"),
            vec![StageRecord::success(Stage::Build)],
        ))
        .append(ModuleReport::new(
            module("module_1"),
            vec![StageRecord::failure(Stage::Build, "boom")],
        ));

        let text = run.finalize();
        let second = text.find("(module_2)").unwrap();
        let first = text.find("(module_1)").unwrap();
        assert!(second < first);
        assert!(text.contains("Release v6"));
        assert!(text.contains("2 module(s) processed, 1 failed"));
    }

    #[test]
    fn change_summary_precedes_stage_lines() {
        let report = ModuleReport::new(module("module_1"), vec![StageRecord::success(Stage::Build)])
            .with_changes(ChangeSummary {
                changed_files: " M modules/module_1/app.py".to_string(),
                lint_output: "Your code has been rated at 10.00/10\n".to_string(),
            });

        let mut text = String::new();
        report.render(&mut text);

        let files = text.find("Changed files:").unwrap();
        let lint = text.find("rated at").unwrap();
        let status = text.find("* (module_1)").unwrap();
        assert!(files < lint && lint < status);
    }

    #[test]
    fn success_requires_deploy() {
        let built_only = ModuleReport::new(
            module("module_1"),
            vec![StageRecord::success(Stage::Build)],
        );
        assert!(!built_only.succeeded());

        let full = ModuleReport::new(
            module("module_1"),
            vec![
                StageRecord::success(Stage::Build),
                StageRecord::success(Stage::Push),
                StageRecord::success(Stage::Deploy),
            ],
        );
        assert!(full.succeeded());
        assert_eq!(full.failed_stage(), None);
    }
}
