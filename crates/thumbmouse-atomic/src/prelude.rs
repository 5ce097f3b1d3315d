//! Prelude for thumbmouse-atomic.

pub use crate::counters::{CounterSnapshot, PipelineCounters};
