//! Calibration capture from live samples.
//!
//! The user sweeps the stick through its full travel, then lets it rest.
//! Sweep samples give `min`/`max`, rest samples give `center` (their mean)
//! and a lower bound on the deadzone (their spread).

use thumbmouse_source::RawSample;

use crate::types::{AxisCalibration, DeviceCalibration};
use crate::{CalibrationError, CalibrationResult};

#[derive(Debug, Clone, Copy)]
struct Extent {
    min: i32,
    max: i32,
}

impl Extent {
    fn new(value: i32) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    fn include(&mut self, value: i32) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    fn spread(&self) -> i32 {
        self.max.saturating_sub(self.min)
    }
}

#[derive(Debug, Clone, Copy)]
struct RestStats {
    sum_x: i64,
    sum_y: i64,
    count: i64,
    x: Extent,
    y: Extent,
}

/// Accumulates sweep and rest samples for both axes.
#[derive(Debug, Clone, Default)]
pub struct CalibrationCapture {
    sweep: Option<(Extent, Extent)>,
    rest: Option<RestStats>,
}

impl CalibrationCapture {
    /// Empty capture.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a sample taken while the stick moves through its travel.
    pub fn record_sweep(&mut self, sample: RawSample) {
        match &mut self.sweep {
            Some((x, y)) => {
                x.include(sample.x);
                y.include(sample.y);
            }
            None => self.sweep = Some((Extent::new(sample.x), Extent::new(sample.y))),
        }
    }

    /// Record a sample taken with the stick released.
    pub fn record_rest(&mut self, sample: RawSample) {
        match &mut self.rest {
            Some(rest) => {
                rest.sum_x += i64::from(sample.x);
                rest.sum_y += i64::from(sample.y);
                rest.count += 1;
                rest.x.include(sample.x);
                rest.y.include(sample.y);
            }
            None => {
                self.rest = Some(RestStats {
                    sum_x: i64::from(sample.x),
                    sum_y: i64::from(sample.y),
                    count: 1,
                    x: Extent::new(sample.x),
                    y: Extent::new(sample.y),
                });
            }
        }
    }

    /// Drop everything recorded so far.
    pub fn reset(&mut self) {
        self.sweep = None;
        self.rest = None;
    }

    /// Build a calibration.
    ///
    /// Signs come from `template`. Each deadzone is the larger of the
    /// template's and the spread seen at rest.
    ///
    /// # Errors
    ///
    /// [`CalibrationError::NotComplete`] when either phase has no samples,
    /// [`CalibrationError::Invalid`] when the result fails validation.
    pub fn finish(&self, template: &DeviceCalibration) -> CalibrationResult<DeviceCalibration> {
        let (sweep_x, sweep_y) = self
            .sweep
            .ok_or(CalibrationError::NotComplete("no sweep samples"))?;
        let rest = self
            .rest
            .ok_or(CalibrationError::NotComplete("no rest samples"))?;

        let axis = |sweep: Extent, rest_extent: Extent, sum: i64, tmpl: &AxisCalibration| {
            let center = i32::try_from(sum / rest.count).unwrap_or(tmpl.center);
            AxisCalibration {
                min: sweep.min.min(rest_extent.min),
                center,
                max: sweep.max.max(rest_extent.max),
                deadzone: tmpl.deadzone.max(rest_extent.spread()),
                sign: tmpl.sign,
            }
        };

        let calibration = DeviceCalibration {
            x: axis(sweep_x, rest.x, rest.sum_x, &template.x),
            y: axis(sweep_y, rest.y, rest.sum_y, &template.y),
        };
        calibration.validate()?;
        Ok(calibration)
    }
}
