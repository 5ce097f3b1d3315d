//! Stopped/Running state machine over the report timer.

use std::fmt;

use thumbmouse_errors::MouseError;
use tracing::{error, info};

use crate::permit::PermitGiver;
use crate::timer::PeriodicTimer;
use crate::timing::ReportTiming;

/// Scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchedulerState {
    /// No permits are produced.
    Stopped,
    /// The timer is producing permits.
    Running,
}

impl fmt::Display for SchedulerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulerState::Stopped => write!(f, "stopped"),
            SchedulerState::Running => write!(f, "running"),
        }
    }
}

/// Starts and stops the periodic report timer.
///
/// The interval is fixed at construction; every restart uses it again.
/// Starting while running and stopping while stopped are caller errors
/// and leave the state untouched.
#[derive(Debug)]
pub struct ReportScheduler {
    timing: ReportTiming,
    giver: PermitGiver,
    timer: Option<PeriodicTimer>,
}

impl ReportScheduler {
    /// A stopped scheduler.
    pub fn new(timing: ReportTiming, giver: PermitGiver) -> Self {
        Self {
            timing,
            giver,
            timer: None,
        }
    }

    /// Report interval.
    pub fn timing(&self) -> ReportTiming {
        self.timing
    }

    /// Current state.
    pub fn state(&self) -> SchedulerState {
        if self.timer.is_some() {
            SchedulerState::Running
        } else {
            SchedulerState::Stopped
        }
    }

    /// Whether permits are being produced.
    pub fn is_running(&self) -> bool {
        self.state() == SchedulerState::Running
    }

    /// Stopped to Running.
    ///
    /// # Errors
    ///
    /// [`MouseError::AlreadyRunning`] if running. [`MouseError::BadInstance`]
    /// if the timer thread cannot be spawned.
    pub fn start(&mut self) -> Result<(), MouseError> {
        if self.timer.is_some() {
            let err = MouseError::AlreadyRunning;
            error!(code = err.code().code(), "start requested while running");
            return Err(err);
        }
        self.timer = Some(PeriodicTimer::spawn(self.timing, self.giver.clone())?);
        info!(interval_us = self.timing.interval_us(), "report scheduler started");
        Ok(())
    }

    /// Running to Stopped.
    ///
    /// A permit given before the stop stays available to the consumer, so
    /// an in-flight report still completes.
    ///
    /// # Errors
    ///
    /// [`MouseError::NotRunning`] if stopped.
    pub fn stop(&mut self) -> Result<(), MouseError> {
        let Some(mut timer) = self.timer.take() else {
            let err = MouseError::NotRunning;
            error!(code = err.code().code(), "stop requested while stopped");
            return Err(err);
        };
        timer.stop();
        info!("report scheduler stopped");
        Ok(())
    }
}
