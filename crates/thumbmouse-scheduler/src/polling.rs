//! Free-running accumulate-then-average mode.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thumbmouse_errors::ValidationError;
use thumbmouse_source::RawSample;

/// Pacing of the continuous polling mode.
///
/// The consumer samples every `poll_delay` and flushes the running average
/// through the pipeline every `flush_period`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollingMode {
    /// Sleep between two samples
    #[serde(with = "millis")]
    pub poll_delay: Duration,
    /// Time between two emitted reports
    #[serde(with = "millis")]
    pub flush_period: Duration,
}

impl Default for PollingMode {
    fn default() -> Self {
        Self {
            poll_delay: Duration::from_millis(2),
            flush_period: Duration::from_millis(10),
        }
    }
}

impl PollingMode {
    /// Check both periods are non-zero and a flush spans at least one poll.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.poll_delay.is_zero() {
            return Err(ValidationError::zero("poll_delay"));
        }
        if self.flush_period.is_zero() {
            return Err(ValidationError::zero("flush_period"));
        }
        if self.flush_period < self.poll_delay {
            return Err(ValidationError::unordered(
                "flush_period",
                format!(
                    "flush period {:?} is shorter than poll delay {:?}",
                    self.flush_period, self.poll_delay
                ),
            ));
        }
        Ok(())
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

/// Running sum of raw samples between two flushes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SampleAccumulator {
    sum_x: i64,
    sum_y: i64,
    count: u32,
}

impl SampleAccumulator {
    /// Empty accumulator.
    pub const fn new() -> Self {
        Self {
            sum_x: 0,
            sum_y: 0,
            count: 0,
        }
    }

    /// Add one sample.
    pub fn push(&mut self, sample: RawSample) {
        self.sum_x = self.sum_x.saturating_add(i64::from(sample.x));
        self.sum_y = self.sum_y.saturating_add(i64::from(sample.y));
        self.count = self.count.saturating_add(1);
    }

    /// Samples since the last reset.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Truncating mean, or `None` when empty.
    pub fn mean(&self) -> Option<RawSample> {
        if self.count == 0 {
            return None;
        }
        let n = i64::from(self.count);
        let x = i32::try_from(self.sum_x / n).ok()?;
        let y = i32::try_from(self.sum_y / n).ok()?;
        Some(RawSample::new(x, y))
    }

    /// Mean, then reset.
    pub fn take_mean(&mut self) -> Option<RawSample> {
        let mean = self.mean();
        self.reset();
        mean
    }

    /// Forget every sample.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
