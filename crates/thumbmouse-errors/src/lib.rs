//! Error taxonomy for the thumbmouse report pipeline.
//!
//! Every fault the pipeline can observe falls into one of a small number of
//! classes, each with a fixed numeric code:
//!
//! - [`ErrorCode::BadInstance`]: a collaborator handle is unusable. Fatal for
//!   the calling context.
//! - [`ErrorCode::BusError`]: an I2C transaction failed. The current cycle is
//!   skipped and retried after a backoff.
//! - [`ErrorCode::ConfigurationFault`]: a degenerate calibration was hit. The
//!   mapper returns a saturated bound and the cycle continues.
//! - [`ErrorCode::AlreadyRunning`] / [`ErrorCode::NotRunning`]: programmer
//!   errors on the scheduler lifecycle. Reported, never state-changing.
//!
//! # Modules
//!
//! - [`common`]: the top-level [`MouseError`] plus category and severity
//! - [`code`]: the fixed [`ErrorCode`] table
//! - [`bus`]: [`BusError`] and its fault kinds
//! - [`validation`]: configuration validation errors
//!
//! # Example
//!
//! ```
//! use thumbmouse_errors::prelude::*;
//!
//! fn check_frequency(hz: u32) -> Result<u32> {
//!     if hz == 0 {
//!         return Err(ValidationError::zero("report_frequency_hz").into());
//!     }
//!     Ok(hz)
//! }
//!
//! assert!(check_frequency(60).is_ok());
//! assert_eq!(
//!     check_frequency(0).map_err(|e| e.code()),
//!     Err(ErrorCode::ConfigurationFault)
//! );
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod bus;
pub mod code;
pub mod common;
pub mod prelude;
pub mod validation;

pub use bus::{BusError, BusFaultKind};
pub use code::ErrorCode;
pub use common::{ErrorCategory, ErrorSeverity, MouseError, TransportError};
pub use validation::ValidationError;

/// A specialized `Result` type for thumbmouse operations.
pub type Result<T> = std::result::Result<T, MouseError>;
