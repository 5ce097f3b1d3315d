//! Consumer thread.
//!
//! The consumer owns the [`ReportPipeline`] and is the only context that
//! samples, maps, shapes or emits. It blocks on the report permit in
//! `wait_slice` steps so a shutdown request is noticed promptly, and it
//! applies [`CycleError::action`] to every failed cycle.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use thumbmouse_atomic::PipelineCounters;
use thumbmouse_errors::MouseError;
use thumbmouse_source::SampleSource;
use tracing::{debug, error, info, warn};

use crate::error::{CycleError, FaultAction};
use crate::permit::{PermitTaker, PermitWait};
use crate::pipeline::ReportPipeline;
use crate::polling::{PollingMode, SampleAccumulator};
use crate::ports::HidTransport;

/// Pause after a bus error before the next cycle.
pub const DEFAULT_BUS_BACKOFF: Duration = Duration::from_millis(1000);

const CONSUMER_THREAD_NAME: &str = "thumbmouse-consumer";

/// Consumer loop tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsumerConfig {
    /// Sleep after a bus error
    pub bus_backoff: Duration,
    /// Longest single block before the shutdown flag is rechecked
    pub wait_slice: Duration,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            bus_backoff: DEFAULT_BUS_BACKOFF,
            wait_slice: Duration::from_millis(50),
        }
    }
}

/// Running consumer thread.
///
/// Dropping the handle requests shutdown and joins.
#[derive(Debug)]
pub struct ConsumerHandle {
    shutdown: Arc<AtomicBool>,
    handle: Option<JoinHandle<Result<(), MouseError>>>,
}

impl ConsumerHandle {
    /// Run one cycle per permit taken from `taker`.
    ///
    /// The loop ends on shutdown, when every permit giver is gone, or on a
    /// fault whose action is [`FaultAction::Stop`].
    ///
    /// # Errors
    ///
    /// [`MouseError::BadInstance`] if the thread cannot be spawned.
    pub fn spawn_permit_driven<S, T>(
        pipeline: ReportPipeline<S, T>,
        taker: PermitTaker,
        config: ConsumerConfig,
    ) -> Result<Self, MouseError>
    where
        S: SampleSource + Send + 'static,
        T: HidTransport + 'static,
    {
        Self::spawn(move |shutdown| run_permit_driven(pipeline, &taker, config, shutdown))
    }

    /// Free-run in polling mode while `active` is set.
    ///
    /// While `active` is clear nothing is sampled and the accumulator is
    /// empty.
    ///
    /// # Errors
    ///
    /// [`MouseError::BadInstance`] if the thread cannot be spawned.
    pub fn spawn_polling<S, T>(
        pipeline: ReportPipeline<S, T>,
        mode: PollingMode,
        active: Arc<AtomicBool>,
        config: ConsumerConfig,
    ) -> Result<Self, MouseError>
    where
        S: SampleSource + Send + 'static,
        T: HidTransport + 'static,
    {
        Self::spawn(move |shutdown| run_polling(pipeline, mode, &active, config, shutdown))
    }

    fn spawn<F>(body: F) -> Result<Self, MouseError>
    where
        F: FnOnce(&AtomicBool) -> Result<(), MouseError> + Send + 'static,
    {
        let shutdown = Arc::new(AtomicBool::new(false));
        let thread_shutdown = Arc::clone(&shutdown);
        let handle = thread::Builder::new()
            .name(CONSUMER_THREAD_NAME.to_string())
            .spawn(move || body(&thread_shutdown))
            .map_err(|e| {
                MouseError::bad_instance(format!("failed to spawn consumer thread: {e}"))
            })?;
        Ok(Self {
            shutdown,
            handle: Some(handle),
        })
    }

    /// Whether the loop has ended on its own.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Ask the loop to end and wait for it.
    ///
    /// # Errors
    ///
    /// The error that ended the loop, or [`MouseError::BadInstance`] if the
    /// thread panicked.
    pub fn shutdown_and_join(mut self) -> Result<(), MouseError> {
        self.join()
    }

    fn join(&mut self) -> Result<(), MouseError> {
        self.shutdown.store(true, Ordering::Release);
        match self.handle.take() {
            Some(handle) => handle
                .join()
                .map_err(|_panic| MouseError::bad_instance("consumer thread panicked"))?,
            None => Ok(()),
        }
    }
}

impl Drop for ConsumerHandle {
    fn drop(&mut self) {
        if let Err(e) = self.join() {
            warn!(error = %e, "consumer ended with error");
        }
    }
}

fn run_permit_driven<S, T>(
    mut pipeline: ReportPipeline<S, T>,
    taker: &PermitTaker,
    config: ConsumerConfig,
    shutdown: &AtomicBool,
) -> Result<(), MouseError>
where
    S: SampleSource,
    T: HidTransport,
{
    info!("consumer waiting for report permits");
    while !shutdown.load(Ordering::Acquire) {
        match taker.wait(config.wait_slice) {
            PermitWait::Granted => {}
            PermitWait::TimedOut => continue,
            PermitWait::Closed => {
                debug!("permit givers gone, consumer exiting");
                return Ok(());
            }
        }
        if let Err(e) = pipeline.run_cycle() {
            apply_fault(e, pipeline.counters(), &config, shutdown)?;
        }
    }
    debug!("consumer shut down");
    Ok(())
}

fn run_polling<S, T>(
    mut pipeline: ReportPipeline<S, T>,
    mode: PollingMode,
    active: &AtomicBool,
    config: ConsumerConfig,
    shutdown: &AtomicBool,
) -> Result<(), MouseError>
where
    S: SampleSource,
    T: HidTransport,
{
    info!(
        poll_delay_ms = mode.poll_delay.as_millis(),
        flush_period_ms = mode.flush_period.as_millis(),
        "consumer polling"
    );
    let mut acc = SampleAccumulator::new();
    let mut next_flush = Instant::now() + mode.flush_period;

    while !shutdown.load(Ordering::Acquire) {
        if !active.load(Ordering::Acquire) {
            acc.reset();
            thread::sleep(config.wait_slice);
            next_flush = Instant::now() + mode.flush_period;
            continue;
        }

        match pipeline.sample() {
            Ok(raw) => acc.push(raw),
            Err(e) => {
                acc.reset();
                apply_fault(e, pipeline.counters(), &config, shutdown)?;
                next_flush = Instant::now() + mode.flush_period;
                continue;
            }
        }

        let now = Instant::now();
        if now >= next_flush {
            next_flush = now + mode.flush_period;
            if let Some(mean) = acc.take_mean()
                && let Err(e) = pipeline.run_with_sample(mean)
            {
                apply_fault(e, pipeline.counters(), &config, shutdown)?;
            }
        }

        thread::sleep(mode.poll_delay);
    }
    debug!("polling consumer shut down");
    Ok(())
}

fn apply_fault(
    err: CycleError,
    counters: &PipelineCounters,
    config: &ConsumerConfig,
    shutdown: &AtomicBool,
) -> Result<(), MouseError> {
    let code = err.code().code();
    match err.action() {
        FaultAction::Continue => {
            counters.inc_skipped_cycle();
            warn!(code, error = %err, "report skipped");
            Ok(())
        }
        FaultAction::Backoff => {
            counters.inc_skipped_cycle();
            error!(
                code,
                error = %err,
                backoff_ms = config.bus_backoff.as_millis(),
                "cycle skipped, backing off"
            );
            sleep_unless_shutdown(config.bus_backoff, config.wait_slice, shutdown);
            Ok(())
        }
        FaultAction::Stop => {
            error!(code, error = %err, "consumer stopping");
            Err(err.into())
        }
    }
}

fn sleep_unless_shutdown(total: Duration, slice: Duration, shutdown: &AtomicBool) {
    let deadline = Instant::now() + total;
    while !shutdown.load(Ordering::Acquire) {
        let Some(remaining) = deadline.checked_duration_since(Instant::now()) else {
            return;
        };
        if remaining.is_zero() {
            return;
        }
        thread::sleep(remaining.min(slice));
    }
}
