//! # thumbmouse-source
//!
//! Raw two-axis sample acquisition.
//!
//! Two device families sit behind one [`SampleSource`] contract:
//!
//! - [`OversampledAdc`]: an analog thumb joystick read through an
//!   [`AnalogInput`] collaborator, averaged over `N` readings per axis.
//!   Never fails.
//! - [`Trackball`]: an I2C trackball reporting left/right/up/down motion
//!   counters. Fails with a [`BusError`](thumbmouse_errors::BusError) when a
//!   transaction fails.
//!
//! The [`indicator`] module carries the feedback boundary (`set_color`) that
//! the trackball's LEDs implement.

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod adc;
pub mod indicator;
pub mod registers;
pub mod sample;
pub mod shared;
pub mod trackball;

pub use adc::{AdcChannel, AnalogInput, OversampledAdc};
pub use indicator::{IndicatorColor, IndicatorSink, NoIndicator};
pub use sample::{RawSample, SampleSource, SourceError};
pub use shared::SharedTrackball;
pub use trackball::{DEFAULT_ADDRESS, DEFAULT_BUS_TIMEOUT, InitError, Trackball, TrackballReading};
