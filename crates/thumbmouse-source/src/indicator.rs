//! Feedback indicator boundary.
//!
//! A shaping-profile change is confirmed to the user by recolouring an LED.
//! The trackball carries one; other builds may log or ignore the colour.

use serde::{Deserialize, Serialize};

/// RGBW colour written to the feedback LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct IndicatorColor {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// White channel
    pub w: u8,
}

impl IndicatorColor {
    /// Create a colour from its four channels.
    pub const fn new(r: u8, g: u8, b: u8, w: u8) -> Self {
        Self { r, g, b, w }
    }

    /// All channels off.
    pub const OFF: Self = Self::new(0, 0, 0, 0);

    /// Channels in register order.
    pub const fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.w]
    }
}

/// Anything that can show an [`IndicatorColor`].
pub trait IndicatorSink: Send {
    /// Show `color`.
    ///
    /// # Errors
    ///
    /// Returns the collaborator's failure. Callers log it and carry on.
    fn set_color(&mut self, color: IndicatorColor) -> thumbmouse_errors::Result<()>;
}

/// Sink that discards every colour.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoIndicator;

impl IndicatorSink for NoIndicator {
    fn set_color(&mut self, _color: IndicatorColor) -> thumbmouse_errors::Result<()> {
        Ok(())
    }
}
