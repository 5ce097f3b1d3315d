//! Oversampled analog joystick source.
//!
//! Each axis is read `N` times in a row, summed in an `i32` and
//! integer-divided by `N`. No floating point.

use crate::sample::{RawSample, SampleSource, SourceError};

/// Analog channel wired to one joystick axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdcChannel {
    /// Horizontal axis
    X,
    /// Vertical axis
    Y,
}

/// ADC collaborator: one raw conversion per call.
pub trait AnalogInput {
    /// Read one raw conversion from `channel`.
    fn read_raw(&mut self, channel: AdcChannel) -> u16;
}

impl<A: AnalogInput + ?Sized> AnalogInput for &mut A {
    fn read_raw(&mut self, channel: AdcChannel) -> u16 {
        (**self).read_raw(channel)
    }
}

impl<A: AnalogInput + ?Sized> AnalogInput for Box<A> {
    fn read_raw(&mut self, channel: AdcChannel) -> u16 {
        (**self).read_raw(channel)
    }
}

/// Joystick source averaging `N` consecutive readings per axis.
///
/// `N` must be between 1 and 32768 so the `i32` sum cannot overflow. Both
/// bounds are checked at compile time:
///
/// ```compile_fail
/// # use thumbmouse_source::{AdcChannel, AnalogInput, OversampledAdc};
/// # struct Flat;
/// # impl AnalogInput for Flat {
/// #     fn read_raw(&mut self, _: AdcChannel) -> u16 { 0 }
/// # }
/// let adc = OversampledAdc::<_, 0>::new(Flat);
/// ```
///
/// ```
/// # use thumbmouse_source::{AdcChannel, AnalogInput, OversampledAdc, SampleSource};
/// struct Constant(u16);
/// impl AnalogInput for Constant {
///     fn read_raw(&mut self, _: AdcChannel) -> u16 {
///         self.0
///     }
/// }
///
/// let mut adc = OversampledAdc::<_, 10>::new(Constant(500));
/// let sample = adc.sample()?;
/// assert_eq!((sample.x, sample.y), (500, 500));
/// # Ok::<(), thumbmouse_source::SourceError>(())
/// ```
#[derive(Debug)]
pub struct OversampledAdc<A, const N: usize> {
    input: A,
}

impl<A: AnalogInput, const N: usize> OversampledAdc<A, N> {
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        reason = "N is bounded by the assertion above the cast"
    )]
    const DIVISOR: i32 = {
        assert!(N >= 1, "oversampling count must be at least 1");
        assert!(N <= 32_768, "oversampling count overflows the i32 accumulator");
        N as i32
    };

    /// Wrap an ADC collaborator.
    pub fn new(input: A) -> Self {
        let _ = Self::DIVISOR;
        Self { input }
    }

    /// Number of readings averaged per axis.
    pub const fn oversampling(&self) -> usize {
        N
    }

    /// Average `N` readings of one axis.
    pub fn read_axis(&mut self, channel: AdcChannel) -> i32 {
        let mut sum: i32 = 0;
        for _ in 0..N {
            sum = sum.saturating_add(i32::from(self.input.read_raw(channel)));
        }
        sum / Self::DIVISOR
    }

    /// Return the wrapped collaborator.
    pub fn release(self) -> A {
        self.input
    }
}

impl<A: AnalogInput, const N: usize> SampleSource for OversampledAdc<A, N> {
    fn sample(&mut self) -> Result<RawSample, SourceError> {
        let x = self.read_axis(AdcChannel::X);
        let y = self.read_axis(AdcChannel::Y);
        Ok(RawSample::new(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sequence {
        x: Vec<u16>,
        y: Vec<u16>,
        pos_x: usize,
        pos_y: usize,
    }

    impl AnalogInput for Sequence {
        fn read_raw(&mut self, channel: AdcChannel) -> u16 {
            let (values, pos) = match channel {
                AdcChannel::X => (&self.x, &mut self.pos_x),
                AdcChannel::Y => (&self.y, &mut self.pos_y),
            };
            let value = values.get(*pos % values.len()).copied().unwrap_or(0);
            *pos += 1;
            value
        }
    }

    #[test]
    fn test_constant_stream_returns_constant() -> Result<(), SourceError> {
        let input = Sequence {
            x: vec![500],
            y: vec![500],
            pos_x: 0,
            pos_y: 0,
        };
        let mut adc = OversampledAdc::<_, 10>::new(input);
        assert_eq!(adc.sample()?, RawSample::new(500, 500));
        Ok(())
    }

    #[test]
    fn test_mean_truncates_toward_zero() -> Result<(), SourceError> {
        let input = Sequence {
            x: vec![400, 401, 401, 401],
            y: vec![0, 0, 0, 3],
            pos_x: 0,
            pos_y: 0,
        };
        let mut adc = OversampledAdc::<_, 4>::new(input);
        assert_eq!(adc.sample()?, RawSample::new(400, 0));
        Ok(())
    }

    #[test]
    fn test_single_sample_passthrough() -> Result<(), SourceError> {
        let input = Sequence {
            x: vec![8191],
            y: vec![0],
            pos_x: 0,
            pos_y: 0,
        };
        let mut adc = OversampledAdc::<_, 1>::new(input);
        assert_eq!(adc.oversampling(), 1);
        assert_eq!(adc.sample()?, RawSample::new(8191, 0));
        Ok(())
    }
}
