//! Pipeline plus scheduling, as one start/stop unit.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use thumbmouse_errors::MouseError;
use thumbmouse_source::SampleSource;
use tracing::{error, info};

use crate::consumer::{ConsumerConfig, ConsumerHandle};
use crate::permit::report_permit;
use crate::pipeline::ReportPipeline;
use crate::polling::PollingMode;
use crate::ports::HidTransport;
use crate::scheduler::{ReportScheduler, SchedulerState};
use crate::timing::ReportTiming;

/// How report cycles are triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScheduleMode {
    /// One cycle per timer permit
    #[default]
    Timer,
    /// Free-running accumulate-then-average loop
    Polling(PollingMode),
}

#[derive(Debug)]
enum Control {
    Timer(ReportScheduler),
    Polling {
        mode: PollingMode,
        active: Arc<AtomicBool>,
    },
}

/// A consumer thread and whatever drives it.
///
/// Created stopped. `start` and `stop` follow the [`ReportScheduler`]
/// contract in both modes: starting while running and stopping while
/// stopped are errors that leave the state unchanged.
#[derive(Debug)]
pub struct ReportService {
    // Dropped before `consumer`, so the permit giver goes first.
    control: Control,
    consumer: ConsumerHandle,
}

impl ReportService {
    /// Spawn the consumer for `pipeline`. `timing` only applies to
    /// [`ScheduleMode::Timer`].
    ///
    /// # Errors
    ///
    /// An invalid polling mode, or a thread that cannot be spawned.
    pub fn spawn<S, T>(
        pipeline: ReportPipeline<S, T>,
        mode: ScheduleMode,
        timing: ReportTiming,
        config: ConsumerConfig,
    ) -> Result<Self, MouseError>
    where
        S: SampleSource + Send + 'static,
        T: HidTransport + 'static,
    {
        let (control, consumer) = match mode {
            ScheduleMode::Timer => {
                let (giver, taker) = report_permit(Arc::clone(pipeline.counters()));
                let consumer = ConsumerHandle::spawn_permit_driven(pipeline, taker, config)?;
                (Control::Timer(ReportScheduler::new(timing, giver)), consumer)
            }
            ScheduleMode::Polling(polling) => {
                polling.validate()?;
                let active = Arc::new(AtomicBool::new(false));
                let consumer = ConsumerHandle::spawn_polling(
                    pipeline,
                    polling,
                    Arc::clone(&active),
                    config,
                )?;
                (
                    Control::Polling {
                        mode: polling,
                        active,
                    },
                    consumer,
                )
            }
        };
        Ok(Self { control, consumer })
    }

    /// Configured mode.
    pub fn mode(&self) -> ScheduleMode {
        match &self.control {
            Control::Timer(_) => ScheduleMode::Timer,
            Control::Polling { mode, .. } => ScheduleMode::Polling(*mode),
        }
    }

    /// Current state.
    pub fn state(&self) -> SchedulerState {
        match &self.control {
            Control::Timer(scheduler) => scheduler.state(),
            Control::Polling { active, .. } => {
                if active.load(Ordering::Acquire) {
                    SchedulerState::Running
                } else {
                    SchedulerState::Stopped
                }
            }
        }
    }

    /// Whether reports are being produced.
    pub fn is_running(&self) -> bool {
        self.state() == SchedulerState::Running
    }

    /// Whether the consumer loop has ended, for example after the
    /// transport detached.
    pub fn consumer_finished(&self) -> bool {
        self.consumer.is_finished()
    }

    /// Stopped to Running.
    ///
    /// # Errors
    ///
    /// [`MouseError::AlreadyRunning`] if running.
    pub fn start(&mut self) -> Result<(), MouseError> {
        match &mut self.control {
            Control::Timer(scheduler) => scheduler.start(),
            Control::Polling { active, .. } => {
                if active
                    .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                    .is_err()
                {
                    let err = MouseError::AlreadyRunning;
                    error!(code = err.code().code(), "start requested while polling");
                    return Err(err);
                }
                info!("polling consumer started");
                Ok(())
            }
        }
    }

    /// Running to Stopped. An in-flight cycle completes.
    ///
    /// # Errors
    ///
    /// [`MouseError::NotRunning`] if stopped.
    pub fn stop(&mut self) -> Result<(), MouseError> {
        match &mut self.control {
            Control::Timer(scheduler) => scheduler.stop(),
            Control::Polling { active, .. } => {
                if active
                    .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
                    .is_err()
                {
                    let err = MouseError::NotRunning;
                    error!(code = err.code().code(), "stop requested while not polling");
                    return Err(err);
                }
                info!("polling consumer stopped");
                Ok(())
            }
        }
    }

    /// Stop if running, then end the consumer and wait for it.
    ///
    /// # Errors
    ///
    /// The error that ended the consumer, if any.
    pub fn shutdown(mut self) -> Result<(), MouseError> {
        if self.is_running() {
            self.stop()?;
        }
        let Self { control, consumer } = self;
        drop(control);
        consumer.shutdown_and_join()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_mode_json() -> Result<(), serde_json::Error> {
        let timer = serde_json::to_string(&ScheduleMode::Timer)?;
        assert_eq!(timer, r#"{"kind":"timer"}"#);

        let polling: ScheduleMode = serde_json::from_str(
            r#"{"kind":"polling","poll_delay":1,"flush_period":8}"#,
        )?;
        assert_eq!(
            polling,
            ScheduleMode::Polling(PollingMode {
                poll_delay: Duration::from_millis(1),
                flush_period: Duration::from_millis(8),
            })
        );
        Ok(())
    }
}
