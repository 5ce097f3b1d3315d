//! thumbmoused: runs the thumbmouse report pipeline as a process.
//!
//! No hardware is touched. The joystick and trackball are simulated behind
//! the same collaborator traits real devices implement, and reports move a
//! virtual cursor that is logged through `tracing`.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod daemon;
pub mod input;
pub mod sim;

pub use config::{CalibrationChoice, DaemonConfig, SimulationConfig};
pub use daemon::{Daemon, ModeKind, RunOptions, RunSummary, SourceKind};
