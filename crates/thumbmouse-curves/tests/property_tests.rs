//! Property tests for both shaping policies.

use proptest::prelude::*;
use quickcheck_macros::quickcheck;
use thumbmouse_curves::{MotionDelta, ShapingPolicy, ShapingProfile};

fn policy_strategy() -> impl Strategy<Value = ShapingPolicy> {
    prop_oneof![
        (0i32..100, 1i32..10, 0i32..200).prop_map(|(deadzone, divisor, max_speed)| {
            ShapingPolicy::DeadzoneLinear {
                deadzone,
                divisor,
                max_speed,
            }
        }),
        (0i32..200).prop_map(ShapingPolicy::polynomial),
    ]
}

fn profile_strategy() -> impl Strategy<Value = ShapingProfile> {
    (0.0f32..1.0, 0.0f32..2.0, 0.0f32..5.0)
        .prop_map(|(c, q, l)| ShapingProfile::new("generated", c, q, l, None))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn prop_center_is_stationary(
        policy in policy_strategy(),
        profile in profile_strategy(),
        center in -1000i32..1000,
    ) {
        prop_assert_eq!(policy.shape(center, center, &profile), 0);
    }

    #[test]
    fn prop_odd_symmetric(
        policy in policy_strategy(),
        profile in profile_strategy(),
        value in -100_000i32..100_000,
    ) {
        prop_assert_eq!(policy.shape(-value, 0, &profile), -policy.shape(value, 0, &profile));
    }

    #[test]
    fn prop_bounded(
        policy in policy_strategy(),
        profile in profile_strategy(),
        value in any::<i32>(),
    ) {
        let out = policy.shape(value, 0, &profile);
        prop_assert!(out.unsigned_abs() <= policy.max_magnitude().unsigned_abs());
    }

    #[test]
    fn prop_deadzone_band_is_flat(
        deadzone in 1i32..100,
        max_speed in 1i32..100,
        frac in 0.0f64..1.0,
    ) {
        let policy = ShapingPolicy::deadzone_linear(deadzone, max_speed);
        let inside = (f64::from(deadzone - 1) * frac) as i32;
        let profile = ShapingProfile::linear("unused", 1.0);
        prop_assert_eq!(policy.shape(inside, 0, &profile), 0);
        prop_assert_eq!(policy.shape(-inside, 0, &profile), 0);
    }
}

#[quickcheck]
fn prop_report_within_i8(x: i32, y: i32) -> bool {
    let (dx, dy) = MotionDelta::new(x, y).to_report();
    i32::from(dx) == x.clamp(-128, 127) && i32::from(dy) == y.clamp(-128, 127)
}
