//! Shaping profiles and the fixed set they are cycled through.

use serde::{Deserialize, Serialize};
use thumbmouse_errors::ValidationError;
use thumbmouse_source::IndicatorColor;

/// Named polynomial coefficients, plus the colour shown when selected.
///
/// The coefficients are empirically tuned and carry no units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapingProfile {
    /// Display name
    pub name: String,
    /// Coefficient of `|v|^3`
    pub cubic: f32,
    /// Coefficient of `|v|^2`
    pub quadratic: f32,
    /// Coefficient of `|v|`
    pub linear: f32,
    /// Feedback colour, if the device has an indicator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<IndicatorColor>,
}

impl ShapingProfile {
    /// Create a profile.
    pub fn new(
        name: impl Into<String>,
        cubic: f32,
        quadratic: f32,
        linear: f32,
        color: Option<IndicatorColor>,
    ) -> Self {
        Self {
            name: name.into(),
            cubic,
            quadratic,
            linear,
            color,
        }
    }

    /// Profile with only a linear term.
    pub fn linear(name: impl Into<String>, linear: f32) -> Self {
        Self::new(name, 0.0, 0.0, linear, None)
    }

    /// Attach a feedback colour.
    #[must_use]
    pub fn with_color(mut self, color: IndicatorColor) -> Self {
        self.color = Some(color);
        self
    }

    /// Coefficients must be finite and non-negative.
    ///
    /// # Errors
    ///
    /// Names the first offending coefficient.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("cubic", self.cubic),
            ("quadratic", self.quadratic),
            ("linear", self.linear),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ValidationError::out_of_range(field, value, 0.0, f32::MAX));
            }
        }
        Ok(())
    }

    /// `min(cap, cubic*m^3 + quadratic*m^2 + linear*m)`, truncated.
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "value is finite and within (0, cap) at the cast"
    )]
    pub fn evaluate(&self, magnitude: u64, cap: u32) -> u32 {
        if magnitude == 0 {
            return 0;
        }
        let m = f64::from(u32::try_from(magnitude).unwrap_or(u32::MAX));
        let value = f64::from(self.cubic) * m * m * m
            + f64::from(self.quadratic) * m * m
            + f64::from(self.linear) * m;

        if value.is_nan() || value <= 0.0 {
            return 0;
        }
        if value >= f64::from(cap) {
            return cap;
        }
        value as u32
    }
}

/// Non-empty, ordered list of profiles.
///
/// Serialized as a plain JSON array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ShapingProfile>", into = "Vec<ShapingProfile>")]
pub struct ProfileSet {
    first: ShapingProfile,
    rest: Vec<ShapingProfile>,
}

impl ProfileSet {
    /// Build a set from `profiles`, validating each.
    ///
    /// # Errors
    ///
    /// Empty list, or a profile with bad coefficients.
    pub fn new(profiles: Vec<ShapingProfile>) -> Result<Self, ValidationError> {
        let mut iter = profiles.into_iter();
        let first = iter
            .next()
            .ok_or_else(|| ValidationError::empty("profiles"))?;
        let rest: Vec<_> = iter.collect();
        first.validate()?;
        for profile in &rest {
            profile.validate()?;
        }
        Ok(Self { first, rest })
    }

    /// Slow, normal and fast, coloured blue, green and red.
    pub fn builtin() -> Self {
        Self {
            first: ShapingProfile::new("slow", 0.0, 0.05, 0.5, None)
                .with_color(IndicatorColor::new(0, 0, 64, 0)),
            rest: vec![
                ShapingProfile::new("normal", 0.01, 0.1, 1.0, None)
                    .with_color(IndicatorColor::new(0, 64, 0, 0)),
                ShapingProfile::new("fast", 0.02, 0.25, 2.0, None)
                    .with_color(IndicatorColor::new(64, 0, 0, 0)),
            ],
        }
    }

    /// Number of profiles, at least one.
    pub fn len(&self) -> usize {
        self.rest.len() + 1
    }

    /// Always false.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Profile at `index`, wrapping around the end of the list.
    pub fn at(&self, index: usize) -> &ShapingProfile {
        match index % self.len() {
            0 => &self.first,
            i => self.rest.get(i - 1).unwrap_or(&self.first),
        }
    }

    /// Index of the profile named `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.iter().position(|p| p.name == name)
    }

    /// Profiles in order.
    pub fn iter(&self) -> impl Iterator<Item = &ShapingProfile> {
        std::iter::once(&self.first).chain(self.rest.iter())
    }
}

impl Default for ProfileSet {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TryFrom<Vec<ShapingProfile>> for ProfileSet {
    type Error = ValidationError;

    fn try_from(profiles: Vec<ShapingProfile>) -> Result<Self, Self::Error> {
        Self::new(profiles)
    }
}

impl From<ProfileSet> for Vec<ShapingProfile> {
    fn from(set: ProfileSet) -> Self {
        let mut profiles = Vec::with_capacity(set.len());
        profiles.push(set.first);
        profiles.extend(set.rest);
        profiles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_order() {
        let set = ProfileSet::builtin();
        let names: Vec<_> = set.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["slow", "normal", "fast"]);
        assert_eq!(set.len(), 3);
        assert!(set.iter().all(|p| p.validate().is_ok()));
    }

    #[test]
    fn test_at_wraps() {
        let set = ProfileSet::builtin();
        assert_eq!(set.at(0).name, "slow");
        assert_eq!(set.at(2).name, "fast");
        assert_eq!(set.at(3).name, "slow");
        assert_eq!(set.at(7).name, "normal");
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(
            ProfileSet::new(Vec::new()),
            Err(ValidationError::empty("profiles"))
        );
    }

    #[test]
    fn test_negative_coefficient_rejected() {
        let profile = ShapingProfile::new("bad", -1.0, 0.0, 0.0, None);
        assert!(profile.validate().is_err());
        assert!(ProfileSet::new(vec![profile]).is_err());
    }

    #[test]
    fn test_evaluate_truncates_and_caps() {
        let profile = ShapingProfile::new("p", 0.0, 0.5, 0.5, None);
        // 0.5 * 9 + 0.5 * 3 = 6
        assert_eq!(profile.evaluate(3, 100), 6);
        // 0.5 * 4 + 0.5 * 2 = 3
        assert_eq!(profile.evaluate(2, 100), 3);
        assert_eq!(profile.evaluate(1000, 100), 100);
        assert_eq!(profile.evaluate(0, 100), 0);
    }

    #[test]
    fn test_position() {
        let set = ProfileSet::builtin();
        assert_eq!(set.position("fast"), Some(2));
        assert_eq!(set.position("turbo"), None);
    }
}
