use crate::{JobGeneration, ProbeSeq, SelectedFile};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start the repeating health schedule; its ticks arrive as `Msg::HealthTick`.
    StartHealthSchedule,
    /// Cancel the repeating health schedule.
    CancelHealthSchedule,
    /// Issue one bounded-time request to the health endpoint.
    ProbeHealth { seq: ProbeSeq },
    /// Upload the files and wait for the analysis result.
    SubmitJob {
        generation: JobGeneration,
        files: Vec<SelectedFile>,
    },
}
