use std::sync::Arc;
use std::time::Duration;

use engine_logging::engine_info;
use tokio::runtime::Handle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{EngineEvent, ProgressSink};

/// Repeating health-check timer.
///
/// Emits [`EngineEvent::HealthTick`] every `period`, starting one period after
/// [`HealthSchedule::start`]; the immediate probe on activation is issued by
/// the caller. Stopping or dropping the schedule cancels the timer task.
pub struct HealthSchedule {
    cancel: CancellationToken,
}

impl HealthSchedule {
    pub fn start(runtime: &Handle, period: Duration, sink: Arc<dyn ProgressSink>) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        engine_info!("Health schedule started period={:?}", period);
        runtime.spawn(async move {
            let mut ticks = interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = ticks.tick() => sink.emit(EngineEvent::HealthTick),
                }
            }
        });
        Self { cancel }
    }

    pub fn stop(self) {
        // Drop does the work.
    }

    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled()
    }
}

impl Drop for HealthSchedule {
    fn drop(&mut self) {
        if !self.cancel.is_cancelled() {
            engine_info!("Health schedule cancelled");
            self.cancel.cancel();
        }
    }
}
