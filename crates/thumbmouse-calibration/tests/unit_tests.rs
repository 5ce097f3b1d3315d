//! Mapping scenarios for the shipped joystick calibrations.

use thumbmouse_calibration::{
    AxisCalibration, AxisMapper, CalibrationPreset, DeviceCalibration, NormalizedCoord,
    OutputRange, SegmentScale, map_axis,
};
use thumbmouse_source::RawSample;

const UB: SegmentScale = SegmentScale::UpperBound;

fn gamepad_x() -> AxisCalibration {
    AxisCalibration::new(20, 412, 800, 10, -1)
}

#[test]
fn test_center_maps_to_out_center() {
    let out = map_axis(412, &gamepad_x(), &OutputRange::default(), UB);
    assert_eq!(out.value, 0);
    assert!(!out.is_fault());
}

#[test]
fn test_min_maps_to_out_min_then_sign() {
    let out = map_axis(20, &gamepad_x(), &OutputRange::default(), UB);
    assert_eq!(out.value, 100);
}

#[test]
fn test_saturates_beyond_calibration() {
    let range = OutputRange::default();
    assert_eq!(map_axis(-4000, &gamepad_x(), &range, UB).value, 100);
    assert_eq!(map_axis(8191, &gamepad_x(), &range, UB).value, -100);
}

#[test]
fn test_gamepad_x_sweep() {
    let range = OutputRange::default();
    let table: Vec<String> = [0, 20, 200, 412, 600, 800, 1000]
        .into_iter()
        .map(|raw| {
            let value = map_axis(raw, &gamepad_x(), &range, UB).value;
            format!("{raw} -> {value:+04}")
        })
        .collect();
    insta::assert_snapshot!(table.join("\n"), @r"
    0 -> +100
    20 -> +100
    200 -> +056
    412 -> +000
    600 -> -024
    800 -> -049
    1000 -> -100
    ");
}

#[test]
fn test_segment_width_reaches_bounds_inside_calibration() {
    let range = OutputRange::default();
    let cal = AxisCalibration::new(20, 412, 800, 10, 1);
    assert_eq!(map_axis(800, &cal, &range, SegmentScale::SegmentWidth).value, 100);
    assert_eq!(map_axis(800, &cal, &range, UB).value, 49);
}

#[test]
fn test_adafruit_rest_is_origin() {
    let mapper = AxisMapper::new(
        CalibrationPreset::Adafruit.calibration(),
        OutputRange::default(),
        UB,
    );
    // Upper segment starts 25 below center: (25 * 100) / 1600 = 1
    let out = mapper.map(RawSample::new(875, 870));
    assert_eq!(out.coord, NormalizedCoord::new(-1, -1));
}

#[test]
fn test_gamepad_mapper_full_deflection() {
    let mapper = AxisMapper::new(DeviceCalibration::gamepad(), OutputRange::default(), UB);
    let out = mapper.map(RawSample::new(20, 20));
    assert_eq!(out.coord, NormalizedCoord::new(100, -100));
}

#[test]
fn test_custom_output_range() {
    let range = OutputRange::new(-127, 0, 127);
    let cal = AxisCalibration::new(0, 500, 1000, 0, 1);
    assert_eq!(map_axis(0, &cal, &range, SegmentScale::SegmentWidth).value, -127);
    assert_eq!(map_axis(1000, &cal, &range, SegmentScale::SegmentWidth).value, 127);
    assert_eq!(map_axis(500, &cal, &range, SegmentScale::SegmentWidth).value, 0);
}
