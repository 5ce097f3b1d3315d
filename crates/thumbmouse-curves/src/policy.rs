//! Shaping policies.

use serde::{Deserialize, Serialize};
use thumbmouse_errors::ValidationError;

use crate::profile::ShapingProfile;

/// Divisor of the deadzone-linear policy.
pub const DEFAULT_DIVISOR: i32 = 3;

/// How a normalized value becomes a motion delta.
///
/// # Example
///
/// ```
/// use thumbmouse_curves::{ShapingPolicy, ShapingProfile};
///
/// let policy = ShapingPolicy::deadzone_linear(15, 30);
/// let profile = ShapingProfile::linear("unit", 1.0);
/// assert_eq!(policy.shape(50, 0, &profile), 11);
/// assert_eq!(policy.shape(-10, 0, &profile), 0);
/// assert_eq!(policy.shape(100, 0, &profile), 28);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapingPolicy {
    /// `sign(v) * min(max_speed, (|v| - deadzone) / divisor)`, zero inside
    /// the deadzone.
    DeadzoneLinear {
        /// Half-width of the stationary band around center
        deadzone: i32,
        /// Integer divisor applied past the deadzone
        #[serde(default = "default_divisor")]
        divisor: i32,
        /// Largest delta produced
        max_speed: i32,
    },
    /// `sign(v) * min(max_magnitude, cubic*|v|^3 + quadratic*|v|^2 + linear*|v|)`
    /// with coefficients from the active profile.
    Polynomial {
        /// Largest delta produced
        max_magnitude: i32,
    },
}

fn default_divisor() -> i32 {
    DEFAULT_DIVISOR
}

impl Default for ShapingPolicy {
    fn default() -> Self {
        Self::deadzone_linear(15, 30)
    }
}

impl ShapingPolicy {
    /// Deadzone-linear policy with the default divisor.
    pub const fn deadzone_linear(deadzone: i32, max_speed: i32) -> Self {
        Self::DeadzoneLinear {
            deadzone,
            divisor: DEFAULT_DIVISOR,
            max_speed,
        }
    }

    /// Polynomial policy.
    pub const fn polynomial(max_magnitude: i32) -> Self {
        Self::Polynomial { max_magnitude }
    }

    /// Cap on the magnitude of any delta this policy produces.
    pub fn max_magnitude(&self) -> i32 {
        match *self {
            Self::DeadzoneLinear { max_speed, .. } => max_speed,
            Self::Polynomial { max_magnitude } => max_magnitude,
        }
    }

    /// Check the policy's parameters.
    ///
    /// # Errors
    ///
    /// Negative deadzone, non-positive divisor or negative cap.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match *self {
            Self::DeadzoneLinear {
                deadzone,
                divisor,
                max_speed,
            } => {
                if deadzone < 0 {
                    return Err(ValidationError::out_of_range("deadzone", deadzone, 0, i32::MAX));
                }
                if divisor <= 0 {
                    return Err(ValidationError::zero("divisor"));
                }
                if max_speed < 0 {
                    return Err(ValidationError::out_of_range("max_speed", max_speed, 0, i32::MAX));
                }
            }
            Self::Polynomial { max_magnitude } => {
                if max_magnitude < 0 {
                    return Err(ValidationError::out_of_range(
                        "max_magnitude",
                        max_magnitude,
                        0,
                        i32::MAX,
                    ));
                }
            }
        }
        Ok(())
    }

    /// Shape `value`, measured against `center`.
    ///
    /// `profile` only matters to [`ShapingPolicy::Polynomial`].
    pub fn shape(&self, value: i32, center: i32, profile: &ShapingProfile) -> i32 {
        let offset = i64::from(value) - i64::from(center);
        if offset == 0 {
            return 0;
        }
        let magnitude = offset.unsigned_abs();

        let shaped = match *self {
            Self::DeadzoneLinear {
                deadzone,
                divisor,
                max_speed,
            } => {
                let deadzone = u64::from(deadzone.max(0).unsigned_abs());
                if magnitude < deadzone {
                    return 0;
                }
                let divisor = u64::from(divisor.max(1).unsigned_abs());
                let cap = u64::from(max_speed.max(0).unsigned_abs());
                ((magnitude - deadzone) / divisor).min(cap)
            }
            Self::Polynomial { max_magnitude } => {
                let cap = max_magnitude.max(0).unsigned_abs();
                u64::from(profile.evaluate(magnitude, cap))
            }
        };

        let shaped = i64::try_from(shaped).unwrap_or(i64::MAX);
        let signed = if offset < 0 { -shaped } else { shaped };
        i32::try_from(signed).unwrap_or(if offset < 0 { i32::MIN + 1 } else { i32::MAX })
    }
}
