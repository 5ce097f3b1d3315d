//! Axis calibration and normalization.
//!
//! Converts raw sensor units into a fixed symmetric output range using a
//! per-axis `{min, center, max, deadzone, sign}` calibration.
//!
//! The mapping is two straight segments meeting at `center`. The deadzone
//! does not create a flat plateau: it moves the lower segment's upper end to
//! `center - deadzone / 2`, which narrows the input span feeding that
//! segment. Inputs outside `[min, max]` saturate at the output bounds.
//!
//! ```
//! use thumbmouse_calibration::{AxisCalibration, OutputRange, SegmentScale, map_axis};
//!
//! let cal = AxisCalibration::new(20, 412, 800, 10, -1);
//! let range = OutputRange::default();
//!
//! assert_eq!(map_axis(412, &cal, &range, SegmentScale::UpperBound).value, 0);
//! assert_eq!(map_axis(20, &cal, &range, SegmentScale::UpperBound).value, 100);
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod capture;
pub mod map;
pub mod mapper;
pub mod types;

pub use capture::CalibrationCapture;
pub use map::{AxisOutput, DegenerateSegment, Segment, map_axis, map_segment};
pub use mapper::{AxisMapper, MappedSample};
pub use types::*;

use thiserror::Error;
use thumbmouse_errors::ValidationError;

/// Calibration failure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalibrationError {
    /// The capture has not seen enough samples.
    #[error("Calibration not complete: {0}")]
    NotComplete(&'static str),

    /// The captured or configured values are inconsistent.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Result of a calibration operation.
pub type CalibrationResult<T> = Result<T, CalibrationError>;
