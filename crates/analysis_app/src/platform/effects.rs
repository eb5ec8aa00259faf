use analysis_core::{AnalysisPayload, Effect, HealthReport, JobError, JobErrorKind, Msg};
use analysis_engine::{EngineEvent, EngineHandle, FailureKind, JobFailure};
use engine_logging::{engine_debug, engine_info};

/// Hands core effects to the engine and turns engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartHealthSchedule => {
                    engine_info!("Starting health schedule");
                    self.engine.start_schedule();
                }
                Effect::CancelHealthSchedule => {
                    engine_info!("Cancelling health schedule");
                    self.engine.stop_schedule();
                }
                Effect::ProbeHealth { seq } => {
                    engine_debug!("ProbeHealth seq={}", seq);
                    self.engine.probe(seq);
                }
                Effect::SubmitJob { generation, files } => {
                    let paths = files.into_iter().map(|file| file.path).collect();
                    self.engine.submit(generation, paths);
                }
            }
        }
    }

    /// Drains pending engine events as core messages.
    pub fn drain(&self) -> Vec<Msg> {
        std::iter::from_fn(|| self.engine.try_recv())
            .map(map_event)
            .collect()
    }
}

pub(crate) fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::HealthTick => Msg::HealthTick,
        EngineEvent::HealthProbed { seq, result } => Msg::HealthProbed {
            seq,
            // Every failure reads as offline; the engine already logged why.
            report: result.ok().map(|report| HealthReport {
                status: report.status,
                components: report.components,
            }),
        },
        EngineEvent::JobProgress {
            generation,
            percent,
        } => Msg::JobProgress {
            generation,
            percent,
        },
        EngineEvent::JobCompleted { generation, result } => Msg::JobDone {
            generation,
            outcome: result.map(AnalysisPayload).map_err(map_failure),
        },
    }
}

fn map_failure(failure: JobFailure) -> JobError {
    let kind = match failure.kind {
        FailureKind::HttpStatus(code) if (400..500).contains(&code) => JobErrorKind::Rejected,
        FailureKind::HttpStatus(code) if code >= 500 => JobErrorKind::Processing,
        FailureKind::HttpStatus(_) | FailureKind::Network | FailureKind::InvalidUrl => {
            JobErrorKind::Transport
        }
        FailureKind::Timeout => JobErrorKind::Timeout,
        FailureKind::Malformed => JobErrorKind::Malformed,
        FailureKind::Io => JobErrorKind::Io,
    };
    JobError::new(kind, failure.message)
}
