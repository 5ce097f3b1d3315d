//! The sample contract shared by every device family.

use serde::{Deserialize, Serialize};
use thumbmouse_errors::{BusError, ErrorCode, MouseError};

/// One raw two-axis reading in sensor-native units.
///
/// ADC codes for the joystick, signed motion counts for the trackball.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RawSample {
    /// Horizontal axis
    pub x: i32,
    /// Vertical axis
    pub y: i32,
}

impl RawSample {
    /// Create a sample.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The all-zero sample.
    pub const ZERO: Self = Self { x: 0, y: 0 };
}

/// Failure to produce a sample.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    /// The I2C transaction failed. Recoverable.
    #[error(transparent)]
    Bus(#[from] BusError),

    /// The device handle can no longer be used.
    #[error("sample source unavailable: {0}")]
    Unavailable(String),
}

impl SourceError {
    /// Fixed code for this failure.
    pub fn code(&self) -> ErrorCode {
        match self {
            SourceError::Bus(_) => ErrorCode::BusError,
            SourceError::Unavailable(_) => ErrorCode::BadInstance,
        }
    }
}

impl From<SourceError> for MouseError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::Bus(bus) => MouseError::Bus(bus),
            SourceError::Unavailable(msg) => MouseError::BadInstance(msg),
        }
    }
}

/// A device that produces one raw sample per call.
///
/// Called only from the consumer context, never from the timer.
pub trait SampleSource {
    /// Take a fresh sample.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Bus`] when the underlying bus transaction fails.
    fn sample(&mut self) -> Result<RawSample, SourceError>;
}

impl<S: SampleSource + ?Sized> SampleSource for &mut S {
    fn sample(&mut self) -> Result<RawSample, SourceError> {
        (**self).sample()
    }
}

impl<S: SampleSource + ?Sized> SampleSource for Box<S> {
    fn sample(&mut self) -> Result<RawSample, SourceError> {
        (**self).sample()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thumbmouse_errors::BusFaultKind;

    #[test]
    fn test_bus_error_converts_to_mouse_error() {
        let err = SourceError::from(BusError::new(BusFaultKind::Nack).at_register(0x04));
        assert_eq!(err.code(), ErrorCode::BusError);
        let mouse: MouseError = err.into();
        assert_eq!(mouse.code(), ErrorCode::BusError);
    }

    #[test]
    fn test_unavailable_is_bad_instance() {
        let err = SourceError::Unavailable("i2c bus released".into());
        assert_eq!(MouseError::from(err).code(), ErrorCode::BadInstance);
    }
}
