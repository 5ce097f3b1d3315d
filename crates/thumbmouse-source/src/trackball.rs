//! I2C trackball driver.
//!
//! The driver owns its bus handle, so a `Trackball` that exists is a
//! trackball that was constructed successfully. There is no separate
//! validity check on each call.

use core::fmt;
use core::time::Duration;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{self, ErrorKind, I2c};
use thumbmouse_errors::{BusError, BusFaultKind};
use tracing::{debug, trace};

use crate::indicator::IndicatorColor;
use crate::registers::{self, MOTION_BLOCK_LEN, Register};
use crate::sample::{RawSample, SampleSource, SourceError};

/// Factory I2C address of the trackball.
pub const DEFAULT_ADDRESS: u8 = 0x0A;

/// Transaction timeout bus collaborators should configure.
///
/// The driver itself never changes it.
pub const DEFAULT_BUS_TIMEOUT: Duration = Duration::from_millis(1000);

/// Settling time after a soft reset.
const RESET_DELAY_MS: u32 = 100;

/// One motion read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrackballReading {
    /// Signed motion since the previous read
    pub delta: RawSample,
    /// Whether the ball is pressed
    pub switch_pressed: bool,
}

/// Error during driver initialization. Hands the bus back.
pub struct InitError<I> {
    /// The bus handle passed to [`Trackball::init`]
    pub i2c: I,
    /// What went wrong
    pub error: BusError,
}

impl<I> fmt::Debug for InitError<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.error, f)
    }
}

impl<I> fmt::Display for InitError<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "trackball init failed: {}", self.error)
    }
}

/// Classify an `embedded-hal` I2C error.
pub fn classify<E: i2c::Error>(err: &E) -> BusFaultKind {
    match err.kind() {
        ErrorKind::NoAcknowledge(_) => BusFaultKind::Nack,
        ErrorKind::ArbitrationLoss => BusFaultKind::ArbitrationLoss,
        ErrorKind::Bus => BusFaultKind::Bus,
        ErrorKind::Overrun => BusFaultKind::Overrun,
        _ => BusFaultKind::Other,
    }
}

/// Resolve two opposing motion counters into one signed delta.
///
/// The larger counter wins; a tie goes to the positive direction. Both zero
/// yields zero.
pub fn resolve_axis(negative: u8, positive: u8) -> i32 {
    if negative == 0 && positive == 0 {
        return 0;
    }
    if negative > positive {
        -i32::from(negative)
    } else {
        i32::from(positive)
    }
}

/// Trackball driver.
pub struct Trackball<I>
where
    I: I2c,
{
    i2c: I,
    address: u8,
}

impl<I> fmt::Debug for Trackball<I>
where
    I: I2c,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trackball")
            .field("address", &format_args!("{:#04x}", self.address))
            .finish_non_exhaustive()
    }
}

impl<I> Trackball<I>
where
    I: I2c,
{
    /// Wrap a bus handle without touching the device.
    pub fn new(i2c: I, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Wrap a bus handle and soft-reset the device.
    ///
    /// # Errors
    ///
    /// Returns the bus handle together with the failure when the reset
    /// write is not acknowledged.
    pub fn init(i2c: I, address: u8, delay: &mut impl DelayNs) -> Result<Self, InitError<I>> {
        let mut trackball = Self::new(i2c, address);
        match trackball.reset(delay) {
            Ok(()) => Ok(trackball),
            Err(error) => Err(InitError {
                i2c: trackball.i2c,
                error,
            }),
        }
    }

    /// Returns the underlying I2C peripheral, consuming this driver.
    pub fn release(self) -> I {
        self.i2c
    }

    /// Device address in use.
    pub fn address(&self) -> u8 {
        self.address
    }

    fn read(&mut self, reg: Register, response: &mut [u8]) -> Result<(), BusError> {
        self.i2c
            .write_read(self.address, &[reg.addr()], response)
            .map_err(|e| BusError::new(classify(&e)).at_register(reg.addr()))
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), BusError> {
        self.i2c.write(self.address, bytes).map_err(|e| {
            let err = BusError::new(classify(&e));
            match bytes.first() {
                Some(&reg) => err.at_register(reg),
                None => err,
            }
        })
    }

    fn read_register(&mut self, reg: Register) -> Result<u8, BusError> {
        let mut buf = [0u8; 1];
        self.read(reg, &mut buf)?;
        let [value] = buf;
        Ok(value)
    }

    fn write_register(&mut self, reg: Register, value: u8) -> Result<(), BusError> {
        self.write(&[reg.addr(), value])
    }

    /// Soft-reset the device and wait for it to come back.
    ///
    /// # Errors
    ///
    /// Returns the bus failure of the control write.
    pub fn reset(&mut self, delay: &mut impl DelayNs) -> Result<(), BusError> {
        self.write_register(Register::Control, registers::CTRL_RESET)?;
        delay.delay_ms(RESET_DELAY_MS);
        debug!(address = self.address, "trackball reset");
        Ok(())
    }

    /// Enable or disable the interrupt output.
    ///
    /// Clears any pending trigger in the same write.
    ///
    /// # Errors
    ///
    /// Returns the bus failure of either transaction.
    pub fn set_interrupt(&mut self, enabled: bool) -> Result<(), BusError> {
        let current = self.read_register(Register::Interrupt)?;
        let mut value = current & !(registers::INT_TRIGGERED | registers::INT_OUT_EN);
        if enabled {
            value |= registers::INT_OUT_EN;
        }
        self.write_register(Register::Interrupt, value)
    }

    /// Whether the device has motion pending.
    ///
    /// # Errors
    ///
    /// Returns the bus failure of the status read.
    pub fn interrupt_pending(&mut self) -> Result<bool, BusError> {
        Ok(self.read_register(Register::Interrupt)? & registers::INT_TRIGGERED != 0)
    }

    /// Read and clear the motion counters.
    ///
    /// # Errors
    ///
    /// Returns the bus failure of the burst read.
    pub fn read_motion(&mut self) -> Result<TrackballReading, BusError> {
        let mut block = [0u8; MOTION_BLOCK_LEN];
        self.read(Register::Left, &mut block)?;
        let [left, right, up, down, switch] = block;
        trace!(left, right, up, down, switch, "trackball motion block");

        Ok(TrackballReading {
            delta: RawSample::new(resolve_axis(left, right), resolve_axis(up, down)),
            switch_pressed: switch & registers::SWITCH_STATE != 0,
        })
    }

    /// Write all four LED channels.
    ///
    /// # Errors
    ///
    /// Returns the bus failure of the LED write.
    pub fn set_color(&mut self, color: IndicatorColor) -> Result<(), BusError> {
        let [r, g, b, w] = color.to_bytes();
        self.write(&[Register::LedRed.addr(), r, g, b, w])
    }

    /// Read the 16-bit chip identifier.
    ///
    /// # Errors
    ///
    /// Returns the bus failure of either byte read.
    pub fn chip_id(&mut self) -> Result<u16, BusError> {
        let low = self.read_register(Register::ChipIdLow)?;
        let high = self.read_register(Register::ChipIdHigh)?;
        Ok(u16::from_le_bytes([low, high]))
    }

    /// Read the firmware version.
    ///
    /// # Errors
    ///
    /// Returns the bus failure of the version read.
    pub fn version(&mut self) -> Result<u8, BusError> {
        self.read_register(Register::Version)
    }
}

impl<I> SampleSource for Trackball<I>
where
    I: I2c,
{
    fn sample(&mut self) -> Result<RawSample, SourceError> {
        Ok(self.read_motion()?.delta)
    }
}
