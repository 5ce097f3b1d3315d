//! One physical trackball reached from two contexts.
//!
//! The consumer samples motion while the mode handler recolours the LEDs.
//! Both go through the same bus handle, so the driver sits behind a
//! `parking_lot::Mutex`. The lock is held for one transaction at a time.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::i2c::I2c;
use parking_lot::Mutex;
use thumbmouse_errors::MouseError;

use crate::indicator::{IndicatorColor, IndicatorSink};
use crate::sample::{RawSample, SampleSource, SourceError};
use crate::trackball::{Trackball, TrackballReading};

/// Cloneable handle to a shared [`Trackball`].
///
/// Sampling through this handle also latches the switch bit, which the
/// input-edge handler polls with [`SharedTrackball::switch_pressed`].
pub struct SharedTrackball<I>
where
    I: I2c,
{
    device: Arc<Mutex<Trackball<I>>>,
    switch: Arc<AtomicBool>,
}

impl<I> Clone for SharedTrackball<I>
where
    I: I2c,
{
    fn clone(&self) -> Self {
        Self {
            device: Arc::clone(&self.device),
            switch: Arc::clone(&self.switch),
        }
    }
}

impl<I> std::fmt::Debug for SharedTrackball<I>
where
    I: I2c,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedTrackball")
            .field("switch_pressed", &self.switch_pressed())
            .finish_non_exhaustive()
    }
}

impl<I> SharedTrackball<I>
where
    I: I2c,
{
    /// Share an initialized driver.
    pub fn new(trackball: Trackball<I>) -> Self {
        Self {
            device: Arc::new(Mutex::new(trackball)),
            switch: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Read motion and latch the switch state.
    ///
    /// # Errors
    ///
    /// Returns the bus failure of the burst read.
    pub fn read_motion(&self) -> Result<TrackballReading, SourceError> {
        let reading = self.device.lock().read_motion()?;
        self.switch.store(reading.switch_pressed, Ordering::Release);
        Ok(reading)
    }

    /// Switch state seen by the most recent motion read.
    pub fn switch_pressed(&self) -> bool {
        self.switch.load(Ordering::Acquire)
    }

    /// Run `f` with exclusive access to the driver.
    pub fn with_device<R>(&self, f: impl FnOnce(&mut Trackball<I>) -> R) -> R {
        f(&mut self.device.lock())
    }
}

impl<I> SampleSource for SharedTrackball<I>
where
    I: I2c,
{
    fn sample(&mut self) -> Result<RawSample, SourceError> {
        Ok(self.read_motion()?.delta)
    }
}

impl<I> IndicatorSink for SharedTrackball<I>
where
    I: I2c + Send,
{
    fn set_color(&mut self, color: IndicatorColor) -> thumbmouse_errors::Result<()> {
        self.device.lock().set_color(color).map_err(MouseError::from)
    }
}
