use crate::health::{HealthStatus, ProbeSeq};
use crate::job::{AnalysisPayload, JobError, JobGeneration, JobPhase, SelectedFile};
use crate::view_model::{AppViewModel, HealthView, JobView};
use crate::{HealthBadge, HealthLevel, Tab};

/// Authoritative state of the shell. Mutated only by [`crate::update`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    active_tab: Tab,
    health: HealthState,
    job: JobState,
    dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
struct HealthState {
    status: HealthStatus,
    polling: bool,
    /// Most recently issued probe; only its response is applied.
    latest_seq: ProbeSeq,
}

#[derive(Debug, Clone, PartialEq, Default)]
struct JobState {
    phase: JobPhase,
    selected_files: Vec<SelectedFile>,
    loading: bool,
    progress: u8,
    result: Option<AnalysisPayload>,
    error: Option<JobError>,
    generation: JobGeneration,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn health(&self) -> &HealthStatus {
        &self.health.status
    }

    pub fn is_polling(&self) -> bool {
        self.health.polling
    }

    pub fn latest_probe_seq(&self) -> ProbeSeq {
        self.health.latest_seq
    }

    pub fn job_phase(&self) -> JobPhase {
        self.job.phase
    }

    pub fn selected_files(&self) -> &[SelectedFile] {
        &self.job.selected_files
    }

    pub fn is_loading(&self) -> bool {
        self.job.loading
    }

    pub fn progress(&self) -> u8 {
        self.job.progress
    }

    pub fn result(&self) -> Option<&AnalysisPayload> {
        self.job.result.as_ref()
    }

    pub fn job_error(&self) -> Option<&JobError> {
        self.job.error.as_ref()
    }

    pub fn job_generation(&self) -> JobGeneration {
        self.job.generation
    }

    pub fn view(&self) -> AppViewModel {
        let status = &self.health.status;
        let badge = HealthBadge::for_level(status.level);
        AppViewModel {
            active_tab: self.active_tab,
            tabs: Tab::ALL.to_vec(),
            health: HealthView {
                level: status.level,
                label: badge.label,
                color: badge.color,
                tooltip: status.tooltip(),
                pulsing: status.level == HealthLevel::Checking,
                components: status.components.clone(),
            },
            job: JobView {
                phase: self.job.phase,
                selected_files: self
                    .job
                    .selected_files
                    .iter()
                    .map(SelectedFile::display_name)
                    .collect(),
                loading: self.job.loading,
                progress: self.job.loading.then_some(self.job.progress),
                result: self.job.result.clone(),
                error: self.job.error.clone(),
                can_submit: self.can_submit(),
            },
            dirty: self.dirty,
        }
    }

    /// Returns whether the state changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Files are selected and no job is in flight.
    pub fn can_submit(&self) -> bool {
        !self.job.loading && !self.job.selected_files.is_empty()
    }

    pub(crate) fn select_tab(&mut self, tab: Tab) -> bool {
        if self.active_tab == tab {
            return false;
        }
        self.active_tab = tab;
        self.mark_dirty();
        true
    }

    /// Returns `false` when polling was already active.
    pub(crate) fn start_polling(&mut self) -> bool {
        if self.health.polling {
            return false;
        }
        self.health.polling = true;
        true
    }

    /// Returns `false` when polling was not active.
    pub(crate) fn stop_polling(&mut self) -> bool {
        std::mem::take(&mut self.health.polling)
    }

    pub(crate) fn issue_probe(&mut self) -> ProbeSeq {
        self.health.latest_seq += 1;
        self.health.latest_seq
    }

    /// Applies a probe outcome if it belongs to the latest issued probe.
    pub(crate) fn apply_probe(&mut self, seq: ProbeSeq, status: HealthStatus) -> bool {
        if seq != self.health.latest_seq {
            return false;
        }
        if self.health.status != status {
            self.health.status = status;
            self.mark_dirty();
        }
        true
    }

    pub(crate) fn select_files(&mut self, files: Vec<SelectedFile>) {
        self.job.selected_files = files;
        if !self.job.loading {
            self.job.phase = if self.job.selected_files.is_empty() {
                JobPhase::Idle
            } else {
                JobPhase::FilesSelected
            };
        }
        self.mark_dirty();
    }

    /// Starts a new job. Caller checks [`AppState::can_submit`] first.
    pub(crate) fn begin_job(&mut self) -> JobGeneration {
        self.job.result = None;
        self.job.error = None;
        self.job.progress = 0;
        self.job.generation += 1;
        self.job.loading = true;
        self.job.phase = JobPhase::Submitting;
        self.mark_dirty();
        self.job.generation
    }

    fn is_current_job(&self, generation: JobGeneration) -> bool {
        self.job.loading && self.job.generation == generation
    }

    pub(crate) fn apply_progress(&mut self, generation: JobGeneration, percent: u8) {
        if !self.is_current_job(generation) {
            return;
        }
        let percent = percent.min(100);
        if percent > self.job.progress {
            self.job.progress = percent;
            self.mark_dirty();
        }
    }

    pub(crate) fn apply_done(
        &mut self,
        generation: JobGeneration,
        outcome: Result<AnalysisPayload, JobError>,
    ) {
        if !self.is_current_job(generation) {
            return;
        }
        // Outcome first, then release the loading flag.
        match outcome {
            Ok(payload) => {
                self.job.result = Some(payload);
                self.job.error = None;
                self.job.progress = 100;
                self.job.phase = JobPhase::Succeeded;
            }
            Err(error) => {
                self.job.result = None;
                self.job.error = Some(error);
                self.job.phase = JobPhase::Failed;
            }
        }
        self.job.loading = false;
        self.mark_dirty();
    }

    pub(crate) fn clear_result(&mut self) {
        if self.job.loading || (self.job.result.is_none() && self.job.error.is_none()) {
            return;
        }
        self.job.result = None;
        self.job.error = None;
        self.job.phase = if self.job.selected_files.is_empty() {
            JobPhase::Idle
        } else {
            JobPhase::FilesSelected
        };
        self.mark_dirty();
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
