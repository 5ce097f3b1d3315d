//! Normalized coordinate to motion delta.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thumbmouse_calibration::NormalizedCoord;

use crate::policy::ShapingPolicy;
use crate::profile::{ProfileSet, ShapingProfile};
use crate::selector::ProfileSelector;

/// Per-report relative motion, already bounded by the shaping policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MotionDelta {
    /// Horizontal motion
    pub x: i32,
    /// Vertical motion
    pub y: i32,
}

impl MotionDelta {
    /// No motion.
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Create a delta.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Whether both axes are zero.
    pub fn is_zero(&self) -> bool {
        self.x == 0 && self.y == 0
    }

    /// Clamp both axes into the HID report's signed 8-bit range.
    pub fn to_report(self) -> (i8, i8) {
        (clamp_i8(self.x), clamp_i8(self.y))
    }
}

fn clamp_i8(value: i32) -> i8 {
    i8::try_from(value.clamp(i32::from(i8::MIN), i32::from(i8::MAX))).unwrap_or_default()
}

/// Applies a [`ShapingPolicy`] with the currently selected profile.
#[derive(Debug, Clone)]
pub struct MotionShaper {
    policy: ShapingPolicy,
    center: i32,
    profiles: Arc<ProfileSet>,
    selector: ProfileSelector,
}

impl MotionShaper {
    /// Shaper reading the active profile through `selector`.
    pub fn new(
        policy: ShapingPolicy,
        center: i32,
        profiles: Arc<ProfileSet>,
        selector: ProfileSelector,
    ) -> Self {
        Self {
            policy,
            center,
            profiles,
            selector,
        }
    }

    /// Shaper with the built-in profiles and a private selector parked on
    /// the first one.
    pub fn fixed(policy: ShapingPolicy, center: i32) -> Self {
        let profiles = Arc::new(ProfileSet::builtin());
        let selector = ProfileSelector::for_profiles(&profiles);
        Self::new(policy, center, profiles, selector)
    }

    /// Policy in use.
    pub fn policy(&self) -> &ShapingPolicy {
        &self.policy
    }

    /// Profile the next sample is shaped with.
    pub fn active_profile(&self) -> &ShapingProfile {
        self.profiles.at(self.selector.current())
    }

    /// Shape one axis value.
    pub fn shape(&self, value: i32) -> i32 {
        self.policy.shape(value, self.center, self.active_profile())
    }

    /// Shape both axes with the same profile.
    pub fn shape_coord(&self, coord: NormalizedCoord) -> MotionDelta {
        let profile = self.active_profile();
        MotionDelta {
            x: self.policy.shape(coord.x, self.center, profile),
            y: self.policy.shape(coord.y, self.center, profile),
        }
    }
}
