use std::collections::BTreeMap;

use crate::{AnalysisPayload, HealthLevel, JobError, JobPhase, Tab};

/// Read-only snapshot handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub active_tab: Tab,
    pub tabs: Vec<Tab>,
    pub health: HealthView,
    pub job: JobView,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HealthView {
    pub level: HealthLevel,
    pub label: &'static str,
    pub color: Option<&'static str>,
    pub tooltip: String,
    /// The indicator animates while the level is `Checking`.
    pub pulsing: bool,
    pub components: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct JobView {
    pub phase: JobPhase,
    pub selected_files: Vec<String>,
    pub loading: bool,
    /// Only present while a job is in flight.
    pub progress: Option<u8>,
    pub result: Option<AnalysisPayload>,
    pub error: Option<JobError>,
    pub can_submit: bool,
}
