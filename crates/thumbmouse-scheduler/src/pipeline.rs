//! One report cycle: sample, map, shape, clamp, emit.

use std::sync::Arc;
use std::time::Instant;

use thumbmouse_atomic::PipelineCounters;
use thumbmouse_calibration::{AxisMapper, NormalizedCoord};
use thumbmouse_curves::{MotionDelta, MotionShaper};
use thumbmouse_source::{RawSample, SampleSource, SourceError};
use tracing::debug;

use crate::error::CycleError;
use crate::ports::{Delivery, HidTransport};

/// How often the cycle logs at `debug`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogIntervals {
    /// Raw and mapped coordinates every this many cycles
    pub sample_every: u64,
    /// Emitted report every this many cycles
    pub emit_every: u64,
}

impl Default for LogIntervals {
    fn default() -> Self {
        Self {
            sample_every: 80,
            emit_every: 20,
        }
    }
}

/// Everything one successful cycle produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    /// Sample fed to the mapper
    pub raw: RawSample,
    /// Mapped coordinate
    pub coord: NormalizedCoord,
    /// Shaped delta before the `i8` clamp
    pub delta: MotionDelta,
    /// Report handed to the transport
    pub report: (i8, i8),
}

/// Source, mapper, shaper and transport of one device.
///
/// Owned by the consumer; never shared, never re-entered.
#[derive(Debug)]
pub struct ReportPipeline<S, T> {
    source: S,
    mapper: AxisMapper,
    shaper: MotionShaper,
    transport: T,
    counters: Arc<PipelineCounters>,
    log: LogIntervals,
    cycle: u64,
}

impl<S, T> ReportPipeline<S, T>
where
    S: SampleSource,
    T: HidTransport,
{
    /// Assemble a pipeline.
    pub fn new(
        source: S,
        mapper: AxisMapper,
        shaper: MotionShaper,
        transport: T,
        counters: Arc<PipelineCounters>,
    ) -> Self {
        Self {
            source,
            mapper,
            shaper,
            transport,
            counters,
            log: LogIntervals::default(),
            cycle: 0,
        }
    }

    /// Override the debug log cadence.
    #[must_use]
    pub fn with_log_intervals(mut self, log: LogIntervals) -> Self {
        self.log = log;
        self
    }

    /// Counters this pipeline records into.
    pub fn counters(&self) -> &Arc<PipelineCounters> {
        &self.counters
    }

    /// The transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Take one raw sample without emitting.
    ///
    /// # Errors
    ///
    /// The source's failure. Bus errors are counted.
    pub fn sample(&mut self) -> Result<RawSample, CycleError> {
        self.source.sample().map_err(|e| {
            if matches!(e, SourceError::Bus(_)) {
                self.counters.inc_bus_error();
            }
            CycleError::from(e)
        })
    }

    /// Run one full cycle on a fresh sample.
    ///
    /// # Errors
    ///
    /// Sampling or transport failure. Nothing is emitted after a sampling
    /// failure.
    pub fn run_cycle(&mut self) -> Result<CycleReport, CycleError> {
        let started = Instant::now();
        self.begin_cycle();
        let result = self.sample().and_then(|raw| self.emit(raw));
        self.finish_cycle(started);
        result
    }

    /// Run one cycle on a sample taken elsewhere, such as a polling average.
    ///
    /// # Errors
    ///
    /// Transport failure.
    pub fn run_with_sample(&mut self, raw: RawSample) -> Result<CycleReport, CycleError> {
        let started = Instant::now();
        self.begin_cycle();
        let result = self.emit(raw);
        self.finish_cycle(started);
        result
    }

    fn begin_cycle(&mut self) {
        self.cycle = self.cycle.wrapping_add(1);
        self.counters.inc_cycle();
    }

    fn finish_cycle(&self, started: Instant) {
        let micros = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        self.counters.record_cycle_duration_us(micros);
    }

    fn emit(&mut self, raw: RawSample) -> Result<CycleReport, CycleError> {
        let mapped = self.mapper.map(raw);
        for _ in 0..mapped.fault_count() {
            self.counters.inc_config_fault();
        }

        if self.log.sample_every > 0 && self.cycle % self.log.sample_every == 0 {
            debug!(
                raw_x = raw.x,
                raw_y = raw.y,
                coord = %mapped.coord,
                "sampled"
            );
        }

        let delta = self.shaper.shape_coord(mapped.coord);
        let (dx, dy) = delta.to_report();

        match self.transport.emit_relative_motion(dx, dy) {
            Ok(Delivery::Sent) => self.counters.inc_report_emitted(),
            Ok(Delivery::Dropped) => self.counters.inc_report_dropped(),
            Err(e) => {
                self.counters.inc_transport_error();
                return Err(e.into());
            }
        }

        if self.log.emit_every > 0 && self.cycle % self.log.emit_every == 0 {
            debug!(dx, dy, profile = %self.shaper.active_profile().name, "report emitted");
        }

        Ok(CycleReport {
            raw,
            coord: mapped.coord,
            delta,
            report: (dx, dy),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thumbmouse_calibration::{DeviceCalibration, OutputRange, SegmentScale};
    use thumbmouse_curves::ShapingPolicy;
    use thumbmouse_errors::{BusError, BusFaultKind, TransportError};

    struct Fixed(Result<RawSample, SourceError>);

    impl SampleSource for Fixed {
        fn sample(&mut self) -> Result<RawSample, SourceError> {
            self.0.clone()
        }
    }

    #[derive(Default)]
    struct Sink {
        reports: Vec<(i8, i8)>,
        refuse: Option<TransportError>,
    }

    impl HidTransport for Sink {
        fn emit_relative_motion(&mut self, dx: i8, dy: i8) -> Result<Delivery, TransportError> {
            if let Some(err) = self.refuse.clone() {
                return Err(err);
            }
            self.reports.push((dx, dy));
            Ok(Delivery::Sent)
        }
    }

    fn joystick(source: Fixed, sink: Sink) -> ReportPipeline<Fixed, Sink> {
        ReportPipeline::new(
            source,
            AxisMapper::new(
                DeviceCalibration::gamepad(),
                OutputRange::default(),
                SegmentScale::UpperBound,
            ),
            MotionShaper::fixed(ShapingPolicy::deadzone_linear(15, 30), 0),
            sink,
            Arc::new(PipelineCounters::new()),
        )
    }

    #[test]
    fn test_rest_emits_zero_report() -> Result<(), CycleError> {
        let mut pipeline = joystick(Fixed(Ok(RawSample::new(412, 400))), Sink::default());
        let report = pipeline.run_cycle()?;
        assert_eq!(report.coord, NormalizedCoord::new(0, 0));
        assert_eq!(report.report, (0, 0));
        assert_eq!(pipeline.transport().reports, [(0, 0)]);
        assert_eq!(pipeline.counters().reports_emitted(), 1);
        Ok(())
    }

    #[test]
    fn test_full_deflection() -> Result<(), CycleError> {
        let mut pipeline = joystick(Fixed(Ok(RawSample::new(20, 800))), Sink::default());
        let report = pipeline.run_cycle()?;
        // X: +100 -> (100 - 15) / 3 = 28. Y: raw 800 -> 50 -> (50 - 15) / 3 = 11.
        assert_eq!(report.coord, NormalizedCoord::new(100, 50));
        assert_eq!(report.report, (28, 11));
        Ok(())
    }

    #[test]
    fn test_elided_report_counted_as_dropped() -> Result<(), CycleError> {
        let mut pipeline = ReportPipeline::new(
            Fixed(Ok(RawSample::new(412, 400))),
            AxisMapper::new(
                DeviceCalibration::gamepad(),
                OutputRange::default(),
                SegmentScale::UpperBound,
            ),
            MotionShaper::fixed(ShapingPolicy::deadzone_linear(15, 30), 0),
            crate::ports::GatedTransport::new(Sink::default()),
            Arc::new(PipelineCounters::new()),
        );
        let report = pipeline.run_cycle()?;
        assert_eq!(report.report, (0, 0));
        let snap = pipeline.counters().snapshot();
        assert_eq!(snap.reports_emitted, 0);
        assert_eq!(snap.reports_dropped, 1);
        Ok(())
    }

    #[test]
    fn test_bus_error_skips_emit() {
        let bus = SourceError::from(BusError::new(BusFaultKind::Nack));
        let mut pipeline = joystick(Fixed(Err(bus)), Sink::default());
        assert!(matches!(pipeline.run_cycle(), Err(CycleError::Source(_))));
        assert!(pipeline.transport().reports.is_empty());
        let snap = pipeline.counters().snapshot();
        assert_eq!(snap.bus_errors, 1);
        assert_eq!(snap.cycles, 1);
        assert_eq!(snap.reports_emitted, 0);
    }

    #[test]
    fn test_transport_error_counted() {
        let sink = Sink {
            refuse: Some(TransportError::rejected("stall")),
            ..Sink::default()
        };
        let mut pipeline = joystick(Fixed(Ok(RawSample::new(412, 400))), sink);
        assert!(matches!(pipeline.run_cycle(), Err(CycleError::Transport(_))));
        assert_eq!(pipeline.counters().snapshot().transport_errors, 1);
    }
}
