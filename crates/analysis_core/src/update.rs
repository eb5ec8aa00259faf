use crate::{AppState, Effect, HealthStatus, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::TabSelected(tab) => {
            // Health polling and in-flight jobs are session-wide, not tab-scoped.
            state.select_tab(tab);
            Vec::new()
        }
        Msg::HealthViewActivated => {
            if state.start_polling() {
                let seq = state.issue_probe();
                vec![Effect::ProbeHealth { seq }, Effect::StartHealthSchedule]
            } else {
                Vec::new()
            }
        }
        Msg::HealthViewDeactivated => {
            if state.stop_polling() {
                vec![Effect::CancelHealthSchedule]
            } else {
                Vec::new()
            }
        }
        Msg::HealthTick => {
            // A tick already queued when the view went away must not probe.
            if state.is_polling() {
                let seq = state.issue_probe();
                vec![Effect::ProbeHealth { seq }]
            } else {
                Vec::new()
            }
        }
        Msg::HealthRefreshClicked => {
            // The indicator only takes clicks while its view is active.
            if state.is_polling() {
                let seq = state.issue_probe();
                vec![Effect::ProbeHealth { seq }]
            } else {
                Vec::new()
            }
        }
        Msg::HealthProbed { seq, report } => {
            let status = match report {
                Some(report) => HealthStatus::from_report(&report.status, report.components),
                None => HealthStatus::offline(),
            };
            state.apply_probe(seq, status);
            Vec::new()
        }
        Msg::FilesSelected(files) => {
            state.select_files(files);
            Vec::new()
        }
        Msg::SubmitClicked => {
            if state.can_submit() {
                let files = state.selected_files().to_vec();
                let generation = state.begin_job();
                vec![Effect::SubmitJob { generation, files }]
            } else {
                Vec::new()
            }
        }
        Msg::JobProgress {
            generation,
            percent,
        } => {
            state.apply_progress(generation, percent);
            Vec::new()
        }
        Msg::JobDone {
            generation,
            outcome,
        } => {
            state.apply_done(generation, outcome);
            Vec::new()
        }
        Msg::ResultCleared => {
            state.clear_result();
            Vec::new()
        }
    };

    (state, effects)
}
