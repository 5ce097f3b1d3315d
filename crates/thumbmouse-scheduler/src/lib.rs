//! Report scheduling for thumbmouse.
//!
//! A periodic timer hands out report permits; a single consumer thread waits
//! for them and runs one sample, map, shape and emit cycle per permit.
//!
//! - **[`ReportTiming`]**: report interval derived from a frequency
//! - **[`permit`]**: depth-one permit slot. A fire that finds the slot full is
//!   coalesced, never queued
//! - **[`PeriodicTimer`]**: named thread sleeping to absolute deadlines, whose
//!   only action is giving a permit
//! - **[`ReportScheduler`]**: Stopped/Running state machine over the timer
//! - **[`ReportPipeline`]**: the cycle itself, with its collaborators injected
//! - **[`consumer`]**: permit-driven and free-running polling loops, applying
//!   the fault policy
//! - **[`ReportService`]**: wires a pipeline to either loop
//!
//! # Fault policy
//!
//! | Fault | Action |
//! |---|---|
//! | Bus error | skip the cycle, back off, continue |
//! | Degenerate calibration | saturated value used, counted, continue |
//! | Transport rejected a report | skip, continue |
//! | Transport detached | consumer loop ends with the error |
//! | Start while running, stop while stopped | error returned, state unchanged |
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use thumbmouse_atomic::PipelineCounters;
//! use thumbmouse_scheduler::{ReportScheduler, ReportTiming, permit};
//!
//! let counters = Arc::new(PipelineCounters::new());
//! let (giver, taker) = permit::report_permit(Arc::clone(&counters));
//! let mut scheduler = ReportScheduler::new(ReportTiming::from_frequency_hz(60)?, giver);
//!
//! scheduler.start()?;
//! assert!(scheduler.start().is_err());
//! assert!(taker.wait(std::time::Duration::from_secs(1)).is_granted());
//! scheduler.stop()?;
//! # Ok::<(), thumbmouse_errors::MouseError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]
#![deny(unused_must_use)]

pub mod consumer;
pub mod error;
pub mod permit;
pub mod pipeline;
pub mod polling;
pub mod ports;
pub mod prelude;
pub mod scheduler;
pub mod service;
pub mod timer;
pub mod timing;

pub use consumer::{ConsumerConfig, ConsumerHandle, DEFAULT_BUS_BACKOFF};
pub use error::{CycleError, FaultAction};
pub use permit::{PermitGiver, PermitTaker, PermitWait};
pub use pipeline::{CycleReport, LogIntervals, ReportPipeline};
pub use polling::{PollingMode, SampleAccumulator};
pub use ports::{Delivery, GatedTransport, HidTransport, TransportGate};
pub use scheduler::{ReportScheduler, SchedulerState};
pub use service::{ReportService, ScheduleMode};
pub use timer::PeriodicTimer;
pub use timing::{DEFAULT_REPORT_FREQUENCY_HZ, ReportTiming};
