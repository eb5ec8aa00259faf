//! Analysis core: pure state machine for health polling, job lifecycle and tab selection.
mod effect;
mod health;
mod job;
mod msg;
mod state;
mod tab;
mod update;
mod view_model;

pub use effect::Effect;
pub use health::{HealthBadge, HealthLevel, HealthStatus, ProbeSeq};
pub use job::{AnalysisPayload, JobError, JobErrorKind, JobGeneration, JobPhase, SelectedFile};
pub use msg::{HealthReport, Msg};
pub use state::AppState;
pub use tab::Tab;
pub use update::update;
pub use view_model::{AppViewModel, HealthView, JobView};
