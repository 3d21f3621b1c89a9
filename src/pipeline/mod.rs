// ABOUTME: Release pipeline: per-module typestate run, staging, reports and flows.
// ABOUTME: Exports the orchestrator entry points and the report types.

mod discovery;
mod error;
mod orchestrator;
mod report;
mod run;
mod stage;
mod staging;
mod state;
mod transitions;

pub use discovery::discover_modules;
pub use error::{RunError, RunErrorKind};
pub use orchestrator::{ChangeOutcome, Collaborators, Pipeline};
pub use report::{ChangeSummary, ModuleReport, RunReport};
pub use run::ModuleRun;
pub use stage::{Stage, StageOutcome, StageRecord};
pub use staging::{StagingArea, StagingError};
pub use state::{Built, Deployed, Pushed, Staged, Tagged};
pub use transitions::TransitionResult;
