//! Common imports for wiring a report service.

pub use crate::consumer::{ConsumerConfig, ConsumerHandle};
pub use crate::error::{CycleError, FaultAction};
pub use crate::permit::{PermitGiver, PermitTaker, PermitWait, report_permit};
pub use crate::pipeline::{CycleReport, ReportPipeline};
pub use crate::polling::PollingMode;
pub use crate::ports::{Delivery, GatedTransport, HidTransport, TransportGate};
pub use crate::scheduler::{ReportScheduler, SchedulerState};
pub use crate::service::{ReportService, ScheduleMode};
pub use crate::timing::ReportTiming;
