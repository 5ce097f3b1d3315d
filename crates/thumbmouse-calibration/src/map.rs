//! Two-segment saturating axis map.

use thiserror::Error;

use crate::types::{AxisCalibration, OutputRange, SegmentScale};

/// Which half of the axis a raw value fell into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    /// `raw < center`: `[min, center - deadzone / 2]`
    Lower,
    /// `raw >= center`: `[center - deadzone / 2, max]`
    Upper,
}

/// A segment with no usable input span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("degenerate segment: input span [{in_min}, {in_max}] has no width")]
pub struct DegenerateSegment {
    /// Lower input bound
    pub in_min: i32,
    /// Upper input bound
    pub in_max: i32,
}

/// Map `raw` linearly from `[in_min, in_max]` onto `[out_min, out_max]`.
///
/// Inputs outside the span saturate at the nearest output bound. The result
/// never leaves the output span.
///
/// # Errors
///
/// Returns [`DegenerateSegment`] when `in_max <= in_min`, or when the
/// selected divisor is zero.
pub fn map_segment(
    raw: i32,
    in_min: i32,
    in_max: i32,
    out_min: i32,
    out_max: i32,
    scale: SegmentScale,
) -> Result<i32, DegenerateSegment> {
    let degenerate = DegenerateSegment { in_min, in_max };
    if in_max <= in_min {
        return Err(degenerate);
    }
    let divisor = match scale {
        SegmentScale::UpperBound => i64::from(in_max),
        SegmentScale::SegmentWidth => i64::from(in_max) - i64::from(in_min),
    };
    if divisor == 0 {
        return Err(degenerate);
    }

    if raw < in_min {
        return Ok(out_min);
    }
    if raw > in_max {
        return Ok(out_max);
    }

    let offset = i64::from(raw) - i64::from(in_min);
    let span = i64::from(out_max) - i64::from(out_min);
    let scaled = offset * span / divisor + i64::from(out_min);

    let lo = i64::from(out_min.min(out_max));
    let hi = i64::from(out_min.max(out_max));
    Ok(i32::try_from(scaled.clamp(lo, hi)).unwrap_or(out_min))
}

/// Result of mapping one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisOutput {
    /// Normalized value, sign applied
    pub value: i32,
    /// Segment that turned out degenerate, if any
    pub fault: Option<Segment>,
}

impl AxisOutput {
    /// Whether the mapping hit a degenerate segment.
    pub fn is_fault(&self) -> bool {
        self.fault.is_some()
    }
}

/// Map one raw axis reading into the normalized range.
///
/// Values below `center` use the lower segment, the rest the upper segment.
/// The calibration's sign is applied afterwards and the result clamped to
/// `range`. A degenerate segment yields `range.min` with the fault flagged;
/// no sign is applied to that value.
pub fn map_axis(
    raw: i32,
    cal: &AxisCalibration,
    range: &OutputRange,
    scale: SegmentScale,
) -> AxisOutput {
    let split = cal.lower_segment_end();
    let (segment, mapped) = if raw < cal.center {
        (
            Segment::Lower,
            map_segment(raw, cal.min, split, range.min, range.center, scale),
        )
    } else {
        (
            Segment::Upper,
            map_segment(raw, split, cal.max, range.center, range.max, scale),
        )
    };

    match mapped {
        Ok(value) => AxisOutput {
            value: range.clamp(cal.sign.apply(value)),
            fault: None,
        },
        Err(_) => AxisOutput {
            value: range.min,
            fault: Some(segment),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UB: SegmentScale = SegmentScale::UpperBound;
    const SW: SegmentScale = SegmentScale::SegmentWidth;

    #[test]
    fn test_segment_saturates() {
        assert_eq!(map_segment(-5, 0, 100, -100, 0, UB), Ok(-100));
        assert_eq!(map_segment(500, 0, 100, -100, 0, UB), Ok(0));
    }

    #[test]
    fn test_upper_bound_divides_by_in_max() {
        // (600 - 407) * 100 / 800 = 24
        assert_eq!(map_segment(600, 407, 800, 0, 100, UB), Ok(24));
        // (600 - 407) * 100 / 393 = 49
        assert_eq!(map_segment(600, 407, 800, 0, 100, SW), Ok(49));
    }

    #[test]
    fn test_segment_width_reaches_out_max() {
        assert_eq!(map_segment(800, 407, 800, 0, 100, SW), Ok(100));
    }

    #[test]
    fn test_zero_width_is_degenerate() {
        assert_eq!(
            map_segment(10, 10, 10, -100, 0, UB),
            Err(DegenerateSegment { in_min: 10, in_max: 10 })
        );
        assert!(map_segment(10, 10, 10, -100, 0, SW).is_err());
    }

    #[test]
    fn test_zero_upper_bound_is_degenerate() {
        assert!(map_segment(-3, -10, 0, -100, 0, UB).is_err());
        assert_eq!(map_segment(-5, -10, 0, -100, 0, SW), Ok(-50));
    }

    #[test]
    fn test_gamepad_x_center_and_min() {
        let cal = AxisCalibration::new(20, 412, 800, 10, -1);
        let range = OutputRange::default();
        assert_eq!(map_axis(412, &cal, &range, UB), AxisOutput { value: 0, fault: None });
        assert_eq!(map_axis(20, &cal, &range, UB).value, 100);
        assert_eq!(map_axis(0, &cal, &range, UB).value, 100);
        assert_eq!(map_axis(5000, &cal, &range, UB).value, -100);
    }

    #[test]
    fn test_lower_segment_end_plateau() {
        // raw in [center - dz/2, center) sits above the lower segment and
        // saturates at out_center.
        let cal = AxisCalibration::new(20, 412, 800, 10, 1);
        let range = OutputRange::default();
        assert_eq!(map_axis(409, &cal, &range, UB).value, 0);
        assert_eq!(map_axis(408, &cal, &range, UB).value, 0);
        // (407 - 20) * 100 / 407 = 95
        assert_eq!(map_axis(407, &cal, &range, UB).value, -5);
    }

    #[test]
    fn test_degenerate_axis_returns_out_min() {
        let cal = AxisCalibration::new(400, 412, 800, 40, -1);
        let range = OutputRange::default();
        let out = map_axis(100, &cal, &range, UB);
        assert_eq!(out.value, -100);
        assert_eq!(out.fault, Some(Segment::Lower));
        assert!(out.is_fault());
    }
}
