use std::collections::BTreeMap;

use crate::{AnalysisPayload, JobError, JobGeneration, ProbeSeq, SelectedFile, Tab};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User clicked a navigation tab.
    TabSelected(Tab),
    /// The view hosting the health indicator became active.
    HealthViewActivated,
    /// The view hosting the health indicator was torn down.
    HealthViewDeactivated,
    /// Periodic schedule fired.
    HealthTick,
    /// User clicked the status indicator.
    HealthRefreshClicked,
    /// A probe finished. `report` is `None` for any failure.
    HealthProbed {
        seq: ProbeSeq,
        report: Option<HealthReport>,
    },
    /// User picked files; replaces the current selection.
    FilesSelected(Vec<SelectedFile>),
    /// User asked to analyse the selected files.
    SubmitClicked,
    /// Upload/processing progress for a job, in percent.
    JobProgress {
        generation: JobGeneration,
        percent: u8,
    },
    /// Terminal outcome of a job.
    JobDone {
        generation: JobGeneration,
        outcome: Result<AnalysisPayload, JobError>,
    },
    /// User dismissed the last result or error.
    ResultCleared,
}

/// Parsed body of a successful health response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthReport {
    pub status: String,
    pub components: BTreeMap<String, String>,
}
