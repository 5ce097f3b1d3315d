//! Simulated collaborators for running without hardware.
//!
//! - [`SimJoystick`]: an [`AnalogInput`] sweeping the X axis across its
//!   calibrated span while Y wobbles around rest
//! - [`SimTrackballBus`]: an `embedded-hal` I2C bus with a trackball behind
//!   it that rolls right and occasionally up
//! - [`LoggingTransport`]: an [`HidTransport`] that integrates reports into a
//!   virtual cursor
//! - [`ThreadDelay`]: a blocking `DelayNs`

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{self, ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
use parking_lot::Mutex;
use thumbmouse_calibration::{AxisCalibration, DeviceCalibration};
use thumbmouse_errors::TransportError;
use thumbmouse_scheduler::{Delivery, HidTransport};
use thumbmouse_source::registers::{self, Register};
use thumbmouse_source::{AdcChannel, AnalogInput};
use tracing::{debug, trace};

/// Triangle wave between `lo` and `hi` with `period` ticks per cycle.
fn triangle(tick: u64, lo: i32, hi: i32, period: u64) -> i32 {
    let half = (period / 2).max(1);
    let phase = tick % half.saturating_mul(2);
    let rising = phase < half;
    let step = if rising { phase } else { half.saturating_mul(2) - phase };
    let span = i64::from(hi) - i64::from(lo);
    let offset = span.saturating_mul(i64::try_from(step).unwrap_or(0)) / i64::try_from(half).unwrap_or(1);
    i32::try_from(i64::from(lo).saturating_add(offset)).unwrap_or(lo)
}

fn to_adc_code(value: i32) -> u16 {
    u16::try_from(value.max(0)).unwrap_or(u16::MAX)
}

/// Simulated analog thumb joystick.
#[derive(Debug, Clone)]
pub struct SimJoystick {
    x: AxisCalibration,
    y: AxisCalibration,
    ticks_x: u64,
    ticks_y: u64,
    period: u64,
}

impl SimJoystick {
    /// Joystick sweeping X once every `period` readings of that axis.
    pub fn new(calibration: DeviceCalibration, period: u64) -> Self {
        Self {
            x: calibration.x,
            y: calibration.y,
            ticks_x: 0,
            ticks_y: 0,
            period,
        }
    }
}

impl AnalogInput for SimJoystick {
    fn read_raw(&mut self, channel: AdcChannel) -> u16 {
        match channel {
            AdcChannel::X => {
                self.ticks_x = self.ticks_x.wrapping_add(1);
                to_adc_code(triangle(self.ticks_x, self.x.min, self.x.max, self.period))
            }
            AdcChannel::Y => {
                self.ticks_y = self.ticks_y.wrapping_add(1);
                let wobble = self.y.deadzone.max(2);
                to_adc_code(triangle(
                    self.ticks_y,
                    self.y.center.saturating_sub(wobble),
                    self.y.center.saturating_add(wobble),
                    16,
                ))
            }
        }
    }
}

/// Failure of the simulated bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("simulated bus fault: {0:?}")]
pub struct SimBusError(pub ErrorKind);

impl i2c::Error for SimBusError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

#[derive(Debug)]
struct TrackballState {
    registers: Vec<u8>,
    pointer: u8,
    transactions: u32,
    motion_reads: u32,
}

/// I2C bus with a simulated trackball on it.
///
/// Every burst read of the motion block finds three counts of rightward
/// motion, one count upward on every fourth read, and the switch pressed for
/// one read in every `switch_every`.
#[derive(Debug, Clone)]
pub struct SimTrackballBus {
    address: u8,
    fault_every: Option<u32>,
    switch_every: Option<u32>,
    state: Arc<Mutex<TrackballState>>,
}

impl SimTrackballBus {
    /// A trackball answering at `address`.
    pub fn new(address: u8) -> Self {
        Self {
            address,
            fault_every: None,
            switch_every: None,
            state: Arc::new(Mutex::new(TrackballState {
                registers: vec![0; 256],
                pointer: 0,
                transactions: 0,
                motion_reads: 0,
            })),
        }
    }

    /// Fail one transaction in every `n`.
    #[must_use]
    pub fn with_fault_every(mut self, n: Option<u32>) -> Self {
        self.fault_every = n.filter(|&n| n > 0);
        self
    }

    /// Press the switch on one motion read in every `n`.
    #[must_use]
    pub fn with_switch_every(mut self, n: Option<u32>) -> Self {
        self.switch_every = n.filter(|&n| n > 0);
        self
    }

    /// Current LED colour as written by the driver.
    pub fn led(&self) -> [u8; 4] {
        let state = self.state.lock();
        let mut rgbw = [0u8; 4];
        for (slot, reg) in rgbw.iter_mut().zip(Register::LedRed.addr()..) {
            *slot = state.registers.get(usize::from(reg)).copied().unwrap_or(0);
        }
        rgbw
    }

    fn roll(&self, state: &mut TrackballState) {
        state.motion_reads = state.motion_reads.wrapping_add(1);
        let n = state.motion_reads;
        let up = if n % 4 == 0 { 1 } else { 0 };
        let pressed = self.switch_every.is_some_and(|every| n % every == 0);
        let block = [
            (Register::Left, 0),
            (Register::Right, 3),
            (Register::Up, up),
            (Register::Down, 0),
            (
                Register::Switch,
                if pressed { registers::SWITCH_STATE } else { 0 },
            ),
        ];
        for (reg, value) in block {
            if let Some(slot) = state.registers.get_mut(usize::from(reg.addr())) {
                *slot = value;
            }
        }
    }
}

impl ErrorType for SimTrackballBus {
    type Error = SimBusError;
}

impl I2c for SimTrackballBus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if address != self.address {
            return Err(SimBusError(ErrorKind::NoAcknowledge(
                NoAcknowledgeSource::Address,
            )));
        }
        let mut state = self.state.lock();
        state.transactions = state.transactions.wrapping_add(1);
        if let Some(every) = self.fault_every
            && state.transactions % every == 0
        {
            trace!(transaction = state.transactions, "simulated bus fault");
            return Err(SimBusError(ErrorKind::NoAcknowledge(
                NoAcknowledgeSource::Data,
            )));
        }

        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => {
                    let Some((&reg, data)) = bytes.split_first() else {
                        continue;
                    };
                    state.pointer = reg;
                    for &byte in data {
                        let idx = usize::from(state.pointer);
                        if let Some(slot) = state.registers.get_mut(idx) {
                            *slot = byte;
                        }
                        state.pointer = state.pointer.wrapping_add(1);
                    }
                }
                Operation::Read(buf) => {
                    if state.pointer == Register::Left.addr() {
                        self.roll(&mut state);
                    }
                    for slot in buf.iter_mut() {
                        let idx = usize::from(state.pointer);
                        *slot = state.registers.get(idx).copied().unwrap_or(0);
                        state.pointer = state.pointer.wrapping_add(1);
                    }
                }
            }
        }
        Ok(())
    }
}

/// `DelayNs` that blocks the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadDelay;

impl DelayNs for ThreadDelay {
    fn delay_ns(&mut self, ns: u32) {
        thread::sleep(Duration::from_nanos(u64::from(ns)));
    }
}

/// Cursor position integrated from every report.
#[derive(Debug, Clone, Default)]
pub struct CursorHandle {
    position: Arc<Mutex<(i64, i64)>>,
}

impl CursorHandle {
    /// Position after every report so far.
    pub fn position(&self) -> (i64, i64) {
        *self.position.lock()
    }
}

/// HID transport that moves a virtual cursor and logs at `debug`.
#[derive(Debug, Default)]
pub struct LoggingTransport {
    cursor: CursorHandle,
}

impl LoggingTransport {
    /// Transport at the origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read side of the cursor, usable after the transport is moved away.
    pub fn cursor(&self) -> CursorHandle {
        self.cursor.clone()
    }
}

impl HidTransport for LoggingTransport {
    fn emit_relative_motion(&mut self, dx: i8, dy: i8) -> Result<Delivery, TransportError> {
        let mut position = self.cursor.position.lock();
        position.0 = position.0.saturating_add(i64::from(dx));
        position.1 = position.1.saturating_add(i64::from(dy));
        debug!(dx, dy, x = position.0, y = position.1, "HID report");
        Ok(Delivery::Sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thumbmouse_source::{DEFAULT_ADDRESS, IndicatorColor, Trackball};

    #[test]
    fn test_triangle_spans_range() {
        let values: Vec<i32> = (0..=10).map(|t| triangle(t, 0, 100, 10)).collect();
        assert_eq!(values.first(), Some(&0));
        assert_eq!(values.get(5), Some(&100));
        assert_eq!(values.get(10), Some(&0));
        assert!(values.iter().all(|v| (0..=100).contains(v)));
    }

    #[test]
    fn test_joystick_stays_in_calibrated_span() {
        let cal = DeviceCalibration::gamepad();
        let mut joystick = SimJoystick::new(cal, 40);
        for _ in 0..200 {
            let x = i32::from(joystick.read_raw(AdcChannel::X));
            let y = i32::from(joystick.read_raw(AdcChannel::Y));
            assert!((cal.x.min..=cal.x.max).contains(&x), "x {x}");
            assert!((cal.y.min..=cal.y.max).contains(&y), "y {y}");
        }
    }

    #[test]
    fn test_trackball_rolls_right() -> Result<(), thumbmouse_errors::BusError> {
        let mut trackball = Trackball::new(SimTrackballBus::new(DEFAULT_ADDRESS), DEFAULT_ADDRESS);
        let reading = trackball.read_motion()?;
        assert_eq!((reading.delta.x, reading.delta.y), (3, 0));
        Ok(())
    }

    #[test]
    fn test_trackball_switch_and_led() -> Result<(), thumbmouse_errors::BusError> {
        let bus = SimTrackballBus::new(DEFAULT_ADDRESS).with_switch_every(Some(2));
        let mut trackball = Trackball::new(bus.clone(), DEFAULT_ADDRESS);
        assert!(!trackball.read_motion()?.switch_pressed);
        assert!(trackball.read_motion()?.switch_pressed);

        trackball.set_color(IndicatorColor::new(1, 2, 3, 4))?;
        assert_eq!(bus.led(), [1, 2, 3, 4]);
        Ok(())
    }

    #[test]
    fn test_fault_every() {
        let bus = SimTrackballBus::new(DEFAULT_ADDRESS).with_fault_every(Some(2));
        let mut trackball = Trackball::new(bus, DEFAULT_ADDRESS);
        assert!(trackball.read_motion().is_ok());
        assert!(trackball.read_motion().is_err());
        assert!(trackball.read_motion().is_ok());
    }

    #[test]
    fn test_logging_transport_moves_cursor() -> Result<(), TransportError> {
        let mut transport = LoggingTransport::new();
        let cursor = transport.cursor();
        transport.emit_relative_motion(3, -1)?;
        transport.emit_relative_motion(3, -1)?;
        assert_eq!(cursor.position(), (6, -2));
        Ok(())
    }
}
