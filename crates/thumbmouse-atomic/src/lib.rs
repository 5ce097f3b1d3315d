//! # thumbmouse-atomic
//!
//! Lock-free counters for the report pipeline.
//!
//! The timer context, the consumer task and the input-edge handler each bump
//! counters here without taking a lock. Readers take a [`CounterSnapshot`]
//! from any thread.
//!
//! ```rust
//! use thumbmouse_atomic::PipelineCounters;
//!
//! let counters = PipelineCounters::new();
//!
//! // Timer context
//! counters.inc_permit_given();
//! counters.inc_permit_coalesced();
//!
//! // Consumer context
//! counters.inc_cycle();
//! counters.inc_report_emitted();
//!
//! let snapshot = counters.snapshot();
//! assert_eq!(snapshot.permits_given, 1);
//! assert_eq!(snapshot.reports_emitted, 1);
//! ```

#![no_std]
#![deny(
    unsafe_op_in_unsafe_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    missing_debug_implementations
)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod counters;
pub mod prelude;

pub use counters::{CounterSnapshot, PipelineCounters};
