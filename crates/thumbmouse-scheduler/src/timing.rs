//! Report interval.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thumbmouse_errors::ValidationError;

/// Report frequency used when none is configured.
pub const DEFAULT_REPORT_FREQUENCY_HZ: u32 = 60;

/// Interval between report permits, in microseconds.
///
/// Fixed for the lifetime of a [`ReportScheduler`](crate::ReportScheduler).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportTiming {
    interval_us: u64,
}

impl ReportTiming {
    /// `1_000_000 / hz` microseconds.
    ///
    /// # Errors
    ///
    /// `hz == 0`, or a frequency above 1 MHz.
    pub fn from_frequency_hz(hz: u32) -> Result<Self, ValidationError> {
        if hz == 0 {
            return Err(ValidationError::zero("report_frequency_hz"));
        }
        if hz > 1_000_000 {
            return Err(ValidationError::out_of_range(
                "report_frequency_hz",
                hz,
                1,
                1_000_000,
            ));
        }
        Ok(Self {
            interval_us: 1_000_000 / u64::from(hz),
        })
    }

    /// Explicit interval.
    ///
    /// # Errors
    ///
    /// A zero interval.
    pub fn from_interval_us(interval_us: u64) -> Result<Self, ValidationError> {
        if interval_us == 0 {
            return Err(ValidationError::zero("interval_us"));
        }
        Ok(Self { interval_us })
    }

    /// Interval in microseconds.
    pub fn interval_us(&self) -> u64 {
        self.interval_us
    }

    /// Interval as a [`Duration`].
    pub fn interval(&self) -> Duration {
        Duration::from_micros(self.interval_us)
    }
}

impl Default for ReportTiming {
    fn default() -> Self {
        Self {
            interval_us: 1_000_000 / u64::from(DEFAULT_REPORT_FREQUENCY_HZ),
        }
    }
}
