//! Raw sample to normalized coordinate.

use thumbmouse_errors::ValidationError;
use thumbmouse_source::RawSample;
use tracing::warn;

use crate::map::{Segment, map_axis};
use crate::types::{DeviceCalibration, NormalizedCoord, OutputRange, SegmentScale};

/// One mapped sample plus any segment faults hit along the way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MappedSample {
    /// Normalized coordinate
    pub coord: NormalizedCoord,
    /// Degenerate segment hit on X
    pub x_fault: Option<Segment>,
    /// Degenerate segment hit on Y
    pub y_fault: Option<Segment>,
}

impl MappedSample {
    /// Number of axes that hit a degenerate segment.
    pub fn fault_count(&self) -> u64 {
        u64::from(self.x_fault.is_some()) + u64::from(self.y_fault.is_some())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Calibrated {
        calibration: DeviceCalibration,
        scale: SegmentScale,
    },
    Relative,
}

/// Maps raw samples into the normalized output range.
///
/// Absolute sources (joysticks) go through a [`DeviceCalibration`].
/// Relative sources (trackballs) already report signed deltas; those are
/// only clamped into the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisMapper {
    mode: Mode,
    range: OutputRange,
}

impl AxisMapper {
    /// Calibrated mapper. The calibration is used as given.
    pub fn new(calibration: DeviceCalibration, range: OutputRange, scale: SegmentScale) -> Self {
        Self {
            mode: Mode::Calibrated { calibration, scale },
            range,
        }
    }

    /// Calibrated mapper, rejecting calibrations with a degenerate segment.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint of the calibration or range.
    pub fn validated(
        calibration: DeviceCalibration,
        range: OutputRange,
        scale: SegmentScale,
    ) -> Result<Self, ValidationError> {
        range.validate()?;
        calibration.validate()?;
        Ok(Self::new(calibration, range, scale))
    }

    /// Mapper for sources reporting signed deltas.
    pub fn relative(range: OutputRange) -> Self {
        Self {
            mode: Mode::Relative,
            range,
        }
    }

    /// Output range.
    pub fn range(&self) -> OutputRange {
        self.range
    }

    /// Calibration in use, if this is a calibrated mapper.
    pub fn calibration(&self) -> Option<&DeviceCalibration> {
        match &self.mode {
            Mode::Calibrated { calibration, .. } => Some(calibration),
            Mode::Relative => None,
        }
    }

    /// Map one raw sample.
    pub fn map(&self, raw: RawSample) -> MappedSample {
        match self.mode {
            Mode::Calibrated { calibration, scale } => {
                let x = map_axis(raw.x, &calibration.x, &self.range, scale);
                let y = map_axis(raw.y, &calibration.y, &self.range, scale);
                if let Some(segment) = x.fault {
                    warn!(axis = "x", ?segment, raw = raw.x, "degenerate calibration segment");
                }
                if let Some(segment) = y.fault {
                    warn!(axis = "y", ?segment, raw = raw.y, "degenerate calibration segment");
                }
                MappedSample {
                    coord: NormalizedCoord::new(x.value, y.value),
                    x_fault: x.fault,
                    y_fault: y.fault,
                }
            }
            Mode::Relative => MappedSample {
                coord: NormalizedCoord::new(self.range.clamp(raw.x), self.range.clamp(raw.y)),
                x_fault: None,
                y_fault: None,
            },
        }
    }
}
