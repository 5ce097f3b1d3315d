//! Calibration type definitions

use core::fmt;

use serde::{Deserialize, Serialize};
use thumbmouse_errors::ValidationError;

/// Axis direction.
///
/// Serialized as `1` or `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum Sign {
    /// Keep the mapped value
    #[default]
    Positive,
    /// Negate the mapped value
    Negative,
}

impl Sign {
    /// Apply this sign to a mapped value.
    pub fn apply(self, value: i32) -> i32 {
        match self {
            Sign::Positive => value,
            Sign::Negative => value.saturating_neg(),
        }
    }
}

impl TryFrom<i8> for Sign {
    type Error = ValidationError;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Sign::Positive),
            -1 => Ok(Sign::Negative),
            other => Err(ValidationError::out_of_range("sign", other, -1, 1)),
        }
    }
}

impl From<Sign> for i8 {
    fn from(sign: Sign) -> Self {
        match sign {
            Sign::Positive => 1,
            Sign::Negative => -1,
        }
    }
}

/// Per-axis calibration.
///
/// Raw units are whatever the sample source produces. Immutable once the
/// mapper is built.
///
/// # Examples
///
/// ```
/// use thumbmouse_calibration::{AxisCalibration, Sign};
///
/// let cal = AxisCalibration::new(20, 412, 800, 10, -1);
/// assert_eq!(cal.sign, Sign::Negative);
/// assert_eq!(cal.lower_segment_end(), 407);
/// assert!(cal.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisCalibration {
    /// Raw value at full deflection in the negative direction
    pub min: i32,
    /// Raw value at rest
    pub center: i32,
    /// Raw value at full deflection in the positive direction
    pub max: i32,
    /// Deadzone width around center, in raw units
    pub deadzone: i32,
    /// Direction applied after mapping
    pub sign: Sign,
}

impl AxisCalibration {
    /// Build a calibration from plain numbers.
    ///
    /// Any `sign` below zero is [`Sign::Negative`].
    pub const fn new(min: i32, center: i32, max: i32, deadzone: i32, sign: i8) -> Self {
        Self {
            min,
            center,
            max,
            deadzone,
            sign: if sign < 0 {
                Sign::Negative
            } else {
                Sign::Positive
            },
        }
    }

    /// Upper end of the lower segment: `center - deadzone / 2`.
    ///
    /// Also the lower end of the upper segment.
    pub fn lower_segment_end(&self) -> i32 {
        self.center.saturating_sub(self.deadzone / 2)
    }

    /// Check `min < center < max`, a non-negative deadzone, and that the
    /// deadzone leaves the lower segment some width.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.min >= self.center {
            return Err(ValidationError::unordered(
                "min",
                format!("min {} must be below center {}", self.min, self.center),
            ));
        }
        if self.center >= self.max {
            return Err(ValidationError::unordered(
                "max",
                format!("center {} must be below max {}", self.center, self.max),
            ));
        }
        if self.deadzone < 0 {
            return Err(ValidationError::out_of_range(
                "deadzone",
                self.deadzone,
                0,
                i32::MAX,
            ));
        }
        if self.lower_segment_end() <= self.min {
            return Err(ValidationError::constraint(format!(
                "deadzone {} leaves no input span between min {} and center {}",
                self.deadzone, self.min, self.center
            )));
        }
        Ok(())
    }
}

/// Output range of the normalized axis space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRange {
    /// Full negative deflection
    pub min: i32,
    /// Rest position
    pub center: i32,
    /// Full positive deflection
    pub max: i32,
}

impl Default for OutputRange {
    fn default() -> Self {
        Self {
            min: -100,
            center: 0,
            max: 100,
        }
    }
}

impl OutputRange {
    /// Build a range.
    pub const fn new(min: i32, center: i32, max: i32) -> Self {
        Self { min, center, max }
    }

    /// Clamp a value into the range.
    pub fn clamp(&self, value: i32) -> i32 {
        value.clamp(self.min, self.max)
    }

    /// Check `min < center < max`.
    ///
    /// # Errors
    ///
    /// Returns the violated ordering.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.min >= self.center || self.center >= self.max {
            return Err(ValidationError::unordered(
                "output_range",
                format!(
                    "expected min < center < max, got {} / {} / {}",
                    self.min, self.center, self.max
                ),
            ));
        }
        Ok(())
    }
}

/// Divisor used by the linear segment formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentScale {
    /// `(raw - in_min) * (out_max - out_min) / in_max + out_min`.
    ///
    /// Divides by the segment's upper input bound rather than its width.
    /// This is the arithmetic existing joystick calibrations were tuned
    /// against.
    #[default]
    UpperBound,
    /// `(raw - in_min) * (out_max - out_min) / (in_max - in_min) + out_min`.
    ///
    /// True linear interpolation across the segment.
    SegmentWidth,
}

/// One normalized two-axis value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct NormalizedCoord {
    /// Horizontal axis
    pub x: i32,
    /// Vertical axis
    pub y: i32,
}

impl NormalizedCoord {
    /// Create a coordinate.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for NormalizedCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:+04}, {:+04})", self.x, self.y)
    }
}

/// Calibration of both axes of one device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceCalibration {
    /// Horizontal axis
    pub x: AxisCalibration,
    /// Vertical axis
    pub y: AxisCalibration,
}

impl DeviceCalibration {
    /// Thumb joystick salvaged from a gamepad, 13-bit ADC.
    pub const fn gamepad() -> Self {
        Self {
            x: AxisCalibration::new(20, 412, 800, 10, -1),
            y: AxisCalibration::new(20, 400, 800, 5, 1),
        }
    }

    /// Adafruit analog thumb joystick breakout, 13-bit ADC.
    pub const fn adafruit() -> Self {
        Self {
            x: AxisCalibration::new(50, 875, 1600, 50, -1),
            y: AxisCalibration::new(50, 870, 1600, 50, -1),
        }
    }

    /// Validate both axes.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.x.validate()?;
        self.y.validate()
    }
}

/// Named calibration presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalibrationPreset {
    /// [`DeviceCalibration::gamepad`]
    Gamepad,
    /// [`DeviceCalibration::adafruit`]
    Adafruit,
}

impl CalibrationPreset {
    /// The preset's calibration.
    pub const fn calibration(self) -> DeviceCalibration {
        match self {
            CalibrationPreset::Gamepad => DeviceCalibration::gamepad(),
            CalibrationPreset::Adafruit => DeviceCalibration::adafruit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        assert!(DeviceCalibration::gamepad().validate().is_ok());
        assert!(DeviceCalibration::adafruit().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unordered() {
        let cal = AxisCalibration::new(500, 412, 800, 10, 1);
        assert!(matches!(
            cal.validate(),
            Err(ValidationError::Unordered { .. })
        ));

        let cal = AxisCalibration::new(20, 900, 800, 10, 1);
        assert!(matches!(
            cal.validate(),
            Err(ValidationError::Unordered { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_swallowing_deadzone() {
        let cal = AxisCalibration::new(400, 412, 800, 40, 1);
        assert!(matches!(
            cal.validate(),
            Err(ValidationError::ConstraintViolation(_))
        ));
    }

    #[test]
    fn test_validate_rejects_negative_deadzone() {
        let cal = AxisCalibration::new(20, 412, 800, -2, 1);
        assert!(matches!(
            cal.validate(),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_sign_conversion() {
        assert_eq!(Sign::try_from(1_i8), Ok(Sign::Positive));
        assert_eq!(Sign::try_from(-1_i8), Ok(Sign::Negative));
        assert!(Sign::try_from(0_i8).is_err());
        assert_eq!(i8::from(Sign::Negative), -1);
    }

    #[test]
    fn test_output_range_validate() {
        assert!(OutputRange::default().validate().is_ok());
        assert!(OutputRange::new(0, 0, 100).validate().is_err());
    }

    #[test]
    fn test_normalized_display() {
        assert_eq!(NormalizedCoord::new(-5, 42).to_string(), "(-005, +042)");
    }
}
