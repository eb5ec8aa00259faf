//! Analysis engine: health probing, analysis uploads and the polling schedule.
mod config;
mod engine;
mod health;
mod schedule;
mod submit;
mod types;

pub use config::{ConfigError, EngineConfig, BASE_URL_VAR, DEFAULT_BASE_URL};
pub use engine::{EngineError, EngineHandle};
pub use health::{HealthProber, ReqwestHealthProber};
pub use schedule::HealthSchedule;
pub use submit::{ChannelProgressSink, ProgressSink, ReqwestSubmitter, Submitter};
pub use types::{
    EngineEvent, FailureKind, HealthReport, JobFailure, JobGeneration, ProbeError, ProbeSeq,
};
