use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;

use engine_logging::{engine_info, engine_warn};
use thiserror::Error;

use crate::submit::{ChannelProgressSink, ProgressSink, ReqwestSubmitter, Submitter};
use crate::{
    EngineConfig, EngineEvent, HealthProber, HealthSchedule, JobGeneration, ProbeSeq,
    ReqwestHealthProber,
};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to build http client: {0}")]
    Client(String),
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

enum EngineCommand {
    Probe { seq: ProbeSeq },
    Submit {
        generation: JobGeneration,
        files: Vec<PathBuf>,
    },
    StartSchedule,
    StopSchedule,
}

/// Runs probes, uploads and the health schedule on a background tokio runtime.
///
/// Results come back as [`EngineEvent`]s through [`EngineHandle::try_recv`].
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let prober: Arc<dyn HealthProber> = Arc::new(
            ReqwestHealthProber::new(&config).map_err(|err| EngineError::Client(err.message))?,
        );
        let submitter: Arc<dyn Submitter> = Arc::new(
            ReqwestSubmitter::new(&config).map_err(|err| EngineError::Client(err.message))?,
        );
        Self::with_backends(config, prober, submitter)
    }

    /// Builds a handle over custom probe and upload backends.
    pub fn with_backends(
        config: EngineConfig,
        prober: Arc<dyn HealthProber>,
        submitter: Arc<dyn Submitter>,
    ) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;

        thread::spawn(move || {
            let sink: Arc<dyn ProgressSink> = Arc::new(ChannelProgressSink::new(event_tx));
            let mut schedule: Option<HealthSchedule> = None;
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Probe { seq } => {
                        let prober = prober.clone();
                        let sink = sink.clone();
                        runtime.spawn(async move {
                            let result = prober.probe().await;
                            if let Err(err) = &result {
                                engine_warn!("Health probe seq={} failed: {}", seq, err);
                            }
                            sink.emit(EngineEvent::HealthProbed { seq, result });
                        });
                    }
                    EngineCommand::Submit { generation, files } => {
                        let submitter = submitter.clone();
                        let sink = sink.clone();
                        runtime.spawn(async move {
                            let result = submitter.submit(generation, &files, sink.clone()).await;
                            if let Err(err) = &result {
                                engine_warn!("Job generation={} failed: {}", generation, err);
                            }
                            sink.emit(EngineEvent::JobCompleted { generation, result });
                        });
                    }
                    EngineCommand::StartSchedule => {
                        if schedule.is_none() {
                            schedule = Some(HealthSchedule::start(
                                runtime.handle(),
                                config.poll_interval,
                                sink.clone(),
                            ));
                        }
                    }
                    EngineCommand::StopSchedule => {
                        if let Some(active) = schedule.take() {
                            active.stop();
                        }
                    }
                }
            }
            engine_info!("Engine command loop finished");
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn probe(&self, seq: ProbeSeq) {
        let _ = self.cmd_tx.send(EngineCommand::Probe { seq });
    }

    pub fn submit(&self, generation: JobGeneration, files: Vec<PathBuf>) {
        engine_info!(
            "Submitting job generation={} files={}",
            generation,
            files.len()
        );
        let _ = self.cmd_tx.send(EngineCommand::Submit { generation, files });
    }

    pub fn start_schedule(&self) {
        let _ = self.cmd_tx.send(EngineCommand::StartSchedule);
    }

    pub fn stop_schedule(&self) {
        let _ = self.cmd_tx.send(EngineCommand::StopSchedule);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: std::time::Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}
