//! Report cycles against real sources and the shared test doubles, without
//! threads.

use std::sync::Arc;

use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};
use thumbmouse_atomic::PipelineCounters;
use thumbmouse_calibration::{
    AxisCalibration, AxisMapper, DeviceCalibration, NormalizedCoord, OutputRange, SegmentScale,
};
use thumbmouse_curves::{MotionDelta, MotionShaper, ProfileSelector, ProfileSet, ShapingPolicy};
use thumbmouse_errors::ErrorCode;
use thumbmouse_scheduler::prelude::*;
use thumbmouse_scheduler::{FaultAction, LogIntervals};
use thumbmouse_source::{DEFAULT_ADDRESS, OversampledAdc, RawSample, Trackball};
use thumbmouse_test_helpers::prelude::*;

fn joystick_mapper() -> AxisMapper {
    AxisMapper::new(
        DeviceCalibration::gamepad(),
        OutputRange::default(),
        SegmentScale::UpperBound,
    )
}

fn default_shaper() -> MotionShaper {
    MotionShaper::fixed(ShapingPolicy::deadzone_linear(15, 30), 0)
}

#[test]
fn test_reports_follow_sample_order() -> Result<(), CycleError> {
    let source = ScriptedSource::new([
        Ok(RawSample::new(20, 400)),
        Ok(RawSample::new(412, 400)),
        Ok(RawSample::new(800, 400)),
    ]);
    let transport = MockTransport::new();
    let mut pipeline = ReportPipeline::new(
        source,
        joystick_mapper(),
        default_shaper(),
        transport.clone(),
        Arc::new(PipelineCounters::new()),
    )
    .with_log_intervals(LogIntervals {
        sample_every: 1,
        emit_every: 1,
    });

    for _ in 0..3 {
        pipeline.run_cycle()?;
    }

    assert_eq!(transport.reports(), [(28, 0), (0, 0), (-11, 0)]);
    let snap = pipeline.counters().snapshot();
    assert_eq!(snap.cycles, 3);
    assert_eq!(snap.reports_emitted, 3);
    Ok(())
}

#[test]
fn test_cycle_report_contents() -> Result<(), CycleError> {
    let mut pipeline = ReportPipeline::new(
        ScriptedSource::new([]),
        joystick_mapper(),
        default_shaper(),
        MockTransport::new(),
        Arc::new(PipelineCounters::new()),
    );

    let report = pipeline.run_with_sample(RawSample::new(800, 20))?;
    assert_eq!(report.raw, RawSample::new(800, 20));
    assert_eq!(report.coord, NormalizedCoord::new(-49, -100));
    assert_eq!(report.delta, MotionDelta::new(-11, -28));
    assert_eq!(report.report, (-11, -28));
    Ok(())
}

#[test]
fn test_oversampled_joystick() -> Result<(), CycleError> {
    let adc = OversampledAdc::<_, 4>::new(ScriptedAnalog::new(vec![10, 30], vec![400]));
    let transport = MockTransport::new();
    let mut pipeline = ReportPipeline::new(
        adc,
        joystick_mapper(),
        default_shaper(),
        transport.clone(),
        Arc::new(PipelineCounters::new()),
    );

    let report = pipeline.run_cycle()?;
    assert_eq!(report.raw, RawSample::new(20, 400));
    assert_eq!(transport.reports(), [(28, 0)]);
    Ok(())
}

#[test]
fn test_trackball_motion_is_consumed_once() -> Result<(), CycleError> {
    let bus = FakeI2c::new(DEFAULT_ADDRESS);
    bus.push_motion(0, 9, 4, 0, false);
    let transport = MockTransport::new();
    let mut pipeline = ReportPipeline::new(
        Trackball::new(bus.clone(), DEFAULT_ADDRESS),
        AxisMapper::relative(OutputRange::default()),
        MotionShaper::fixed(ShapingPolicy::deadzone_linear(0, 30), 0),
        transport.clone(),
        Arc::new(PipelineCounters::new()),
    );

    let first = pipeline.run_cycle()?;
    assert_eq!(first.raw, RawSample::new(9, -4));
    let second = pipeline.run_cycle()?;
    assert_eq!(second.raw, RawSample::ZERO);

    assert_eq!(transport.reports(), [(3, -1), (0, 0)]);
    Ok(())
}

#[test]
fn test_trackball_bus_error_asks_for_backoff() {
    let bus = FakeI2c::new(DEFAULT_ADDRESS);
    bus.fail_next(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data));
    let transport = MockTransport::new();
    let mut pipeline = ReportPipeline::new(
        Trackball::new(bus, DEFAULT_ADDRESS),
        AxisMapper::relative(OutputRange::default()),
        default_shaper(),
        transport.clone(),
        Arc::new(PipelineCounters::new()),
    );

    let err = must_err(pipeline.run_cycle());
    assert_eq!(err.action(), FaultAction::Backoff);
    assert_eq!(err.code(), ErrorCode::BusError);
    assert_eq!(transport.report_count(), 0);
    assert_eq!(pipeline.counters().snapshot().bus_errors, 1);

    // The next cycle goes through.
    assert!(pipeline.run_cycle().is_ok());
    assert_eq!(transport.report_count(), 1);
}

#[test]
fn test_degenerate_segment_saturates_and_counts() -> Result<(), CycleError> {
    let calibration = DeviceCalibration {
        x: AxisCalibration::new(100, 100, 800, 0, 1),
        y: DeviceCalibration::gamepad().y,
    };
    let transport = MockTransport::new();
    let mut pipeline = ReportPipeline::new(
        ScriptedSource::constant(RawSample::new(50, 400)),
        AxisMapper::new(calibration, OutputRange::default(), SegmentScale::UpperBound),
        default_shaper(),
        transport.clone(),
        Arc::new(PipelineCounters::new()),
    );

    let report = pipeline.run_cycle()?;
    assert_eq!(report.coord, NormalizedCoord::new(-100, 0));
    assert_eq!(transport.reports(), [(-28, 0)]);
    assert_eq!(pipeline.counters().snapshot().config_faults, 1);
    Ok(())
}

#[test]
fn test_profile_switch_applies_to_next_cycle() -> Result<(), CycleError> {
    let profiles = Arc::new(ProfileSet::builtin());
    let selector = ProfileSelector::for_profiles(&profiles);
    let shaper = MotionShaper::new(ShapingPolicy::polynomial(127), 0, profiles, selector.clone());
    let transport = MockTransport::new();
    let mut pipeline = ReportPipeline::new(
        ScriptedSource::constant(RawSample::new(10, 0)),
        AxisMapper::relative(OutputRange::default()),
        shaper,
        transport.clone(),
        Arc::new(PipelineCounters::new()),
    );

    let slow = pipeline.run_cycle()?.report.0;
    selector.advance();
    let normal = pipeline.run_cycle()?.report.0;

    assert!(normal > slow, "slow {slow}, normal {normal}");
    assert_eq!(transport.report_count(), 2);
    Ok(())
}
