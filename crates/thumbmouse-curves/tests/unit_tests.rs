//! Shaping scenarios and profile cycling against the shared test doubles.

use std::sync::Arc;

use thumbmouse_atomic::PipelineCounters;
use thumbmouse_calibration::NormalizedCoord;
use thumbmouse_curves::prelude::*;
use thumbmouse_source::IndicatorColor;
use thumbmouse_test_helpers::prelude::*;

#[test]
fn test_joystick_scenario() {
    let shaper = MotionShaper::fixed(ShapingPolicy::deadzone_linear(15, 30), 0);
    let delta = shaper.shape_coord(NormalizedCoord::new(50, 0));
    assert_eq!(delta, MotionDelta::new(11, 0));
}

#[test]
fn test_joystick_full_deflection_caps_at_max_speed() {
    let shaper = MotionShaper::fixed(ShapingPolicy::deadzone_linear(0, 30), 0);
    let delta = shaper.shape_coord(NormalizedCoord::new(100, -100));
    assert_eq!(delta, MotionDelta::new(30, -30));
}

#[test]
fn test_builtin_profiles_accelerate() {
    let profiles = Arc::new(ProfileSet::builtin());
    let selector = ProfileSelector::for_profiles(&profiles);
    let shaper = MotionShaper::new(ShapingPolicy::polynomial(127), 0, profiles, selector.clone());

    let mut speeds = Vec::new();
    for _ in 0..3 {
        speeds.push(shaper.shape(10));
        selector.advance();
    }
    // Roughly 10, 30 and 65 before truncation.
    assert_eq!(speeds.len(), 3);
    assert!(speeds.windows(2).all(|w| matches!(w, [a, b] if a < b)), "{speeds:?}");
    assert!(speeds.iter().all(|&s| (9..=65).contains(&s)), "{speeds:?}");
}

#[test]
fn test_cycler_with_recording_indicator() {
    let profiles = Arc::new(ProfileSet::builtin());
    let selector = ProfileSelector::for_profiles(&profiles);
    let indicator = RecordingIndicator::new();
    let counters = Arc::new(PipelineCounters::new());
    let mut cycler = ModeCycler::new(selector.clone(), profiles, Box::new(indicator.clone()))
        .with_counters(Arc::clone(&counters));

    cycler.refresh();
    for _ in 0..4 {
        cycler.on_press();
    }

    assert_eq!(selector.current(), 1);
    assert_eq!(counters.snapshot().profile_switches, 4);
    assert_eq!(
        indicator.colors(),
        [
            IndicatorColor::new(0, 0, 64, 0),
            IndicatorColor::new(0, 64, 0, 0),
            IndicatorColor::new(64, 0, 0, 0),
            IndicatorColor::new(0, 0, 64, 0),
            IndicatorColor::new(0, 64, 0, 0),
        ]
    );
}

#[test]
fn test_cycler_survives_indicator_failure() {
    let profiles = Arc::new(ProfileSet::builtin());
    let selector = ProfileSelector::for_profiles(&profiles);
    let indicator = RecordingIndicator::new();
    indicator.set_failing(true);
    let mut cycler = ModeCycler::new(selector.clone(), profiles, Box::new(indicator.clone()));

    cycler.on_press();
    indicator.set_failing(false);
    cycler.on_press();

    assert_eq!(selector.current(), 2);
    assert_eq!(indicator.colors(), [IndicatorColor::new(64, 0, 0, 0)]);
}

#[test]
fn test_policy_json() {
    let json = must(serde_json::to_string(&ShapingPolicy::deadzone_linear(15, 30)));
    insta::assert_snapshot!(json, @r#"{"kind":"deadzone_linear","deadzone":15,"divisor":3,"max_speed":30}"#);

    let policy: ShapingPolicy =
        must(serde_json::from_str(r#"{"kind":"deadzone_linear","deadzone":10,"max_speed":20}"#));
    assert_eq!(policy, ShapingPolicy::deadzone_linear(10, 20));
}

#[test]
fn test_profile_set_json() {
    let set: ProfileSet = must(serde_json::from_str(
        r#"[{"name":"only","cubic":0.0,"quadratic":0.0,"linear":1.5}]"#,
    ));
    assert_eq!(set.len(), 1);
    assert!(set.at(0).color.is_none());

    assert!(serde_json::from_str::<ProfileSet>("[]").is_err());
}
