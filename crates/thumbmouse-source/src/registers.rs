//! Trackball register map.
//!
//! The device exposes a flat 8-bit register space. Motion counters reset to
//! zero each time they are read.

/// Trackball registers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Register {
    /// Red LED brightness (0x00). LED registers are contiguous R, G, B, W.
    LedRed = 0x00,
    /// Green LED brightness (0x01)
    LedGreen = 0x01,
    /// Blue LED brightness (0x02)
    LedBlue = 0x02,
    /// White LED brightness (0x03)
    LedWhite = 0x03,

    // Motion block: LEFT, RIGHT, UP, DOWN, SWITCH read as one burst
    /// Leftward motion counter (0x04)
    Left = 0x04,
    /// Rightward motion counter (0x05)
    Right = 0x05,
    /// Upward motion counter (0x06)
    Up = 0x06,
    /// Downward motion counter (0x07)
    Down = 0x07,
    /// Switch state and change count (0x08)
    Switch = 0x08,

    /// User flash area (0xD0)
    UserFlash = 0xD0,
    /// Flash page select (0xF0)
    FlashPage = 0xF0,

    /// Interrupt control and status (0xF9)
    Interrupt = 0xF9,
    /// Chip identifier, low byte (0xFA)
    ChipIdLow = 0xFA,
    /// Chip identifier, high byte (0xFB)
    ChipIdHigh = 0xFB,
    /// Firmware version (0xFC)
    Version = 0xFC,
    /// Configured I2C address (0xFD)
    I2cAddress = 0xFD,
    /// Control: sleep, reset, flash access (0xFE)
    Control = 0xFE,
}

impl Register {
    /// Register address on the wire.
    pub const fn addr(self) -> u8 {
        self as u8
    }
}

/// Bit in [`Register::Switch`] set while the ball is pressed.
pub const SWITCH_STATE: u8 = 0b1000_0000;

/// Bit in [`Register::Interrupt`] set when motion is pending.
pub const INT_TRIGGERED: u8 = 0b0000_0001;
/// Bit in [`Register::Interrupt`] enabling the interrupt output pin.
pub const INT_OUT_EN: u8 = 0b0000_0010;

/// Bit in [`Register::Control`] putting the device to sleep.
pub const CTRL_SLEEP: u8 = 0b0000_0001;
/// Bit in [`Register::Control`] triggering a soft reset.
pub const CTRL_RESET: u8 = 0b0000_0010;
/// Bit in [`Register::Control`] starting a flash read.
pub const CTRL_FREAD: u8 = 0b0000_0100;
/// Bit in [`Register::Control`] starting a flash write.
pub const CTRL_FWRITE: u8 = 0b0000_1000;

/// Length of the LEFT..=SWITCH burst.
pub const MOTION_BLOCK_LEN: usize = (Register::Switch as usize) - (Register::Left as usize) + 1;
