//! Periodic permit timer.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use thumbmouse_errors::MouseError;
use tracing::{debug, error};

use crate::permit::PermitGiver;
use crate::timing::ReportTiming;

const TIMER_THREAD_NAME: &str = "thumbmouse-timer";

/// Timer thread giving one permit per interval.
///
/// Deadlines are absolute (`next += interval`), so the firing rate does not
/// drift with sleep overshoot. If the thread falls more than one interval
/// behind it resynchronizes to now instead of bursting. The thread does
/// nothing but sleep and [`PermitGiver::give`].
#[derive(Debug)]
pub struct PeriodicTimer {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl PeriodicTimer {
    /// Spawn the timer thread. The first permit is given one interval from
    /// now.
    ///
    /// # Errors
    ///
    /// Returns [`MouseError::BadInstance`] if the thread cannot be spawned.
    pub fn spawn(timing: ReportTiming, giver: PermitGiver) -> Result<Self, MouseError> {
        let running = Arc::new(AtomicBool::new(true));
        let thread_running = Arc::clone(&running);
        let handle = thread::Builder::new()
            .name(TIMER_THREAD_NAME.to_string())
            .spawn(move || Self::run(timing, &giver, &thread_running))
            .map_err(|e| MouseError::bad_instance(format!("failed to spawn timer thread: {e}")))?;

        debug!(interval_us = timing.interval_us(), "report timer started");
        Ok(Self {
            running,
            handle: Some(handle),
        })
    }

    fn run(timing: ReportTiming, giver: &PermitGiver, running: &AtomicBool) {
        let period = timing.interval();
        let mut next = Instant::now() + period;

        while running.load(Ordering::Acquire) {
            let now = Instant::now();
            if let Some(remaining) = next.checked_duration_since(now)
                && !remaining.is_zero()
            {
                thread::park_timeout(remaining);
                continue;
            }

            giver.give();
            next += period;
            if now.saturating_duration_since(next) > period {
                next = now + period;
            }
        }
    }

    /// Whether the thread has not been told to stop.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Stop the thread and wait for it. No permit is given after this
    /// returns.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            handle.thread().unpark();
            if handle.join().is_err() {
                error!("report timer thread panicked");
            }
            debug!("report timer stopped");
        }
    }
}

impl Drop for PeriodicTimer {
    fn drop(&mut self) {
        self.stop();
    }
}
