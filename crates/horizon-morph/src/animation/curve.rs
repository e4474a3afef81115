//! Timing curves for animation tracks.

use serde::{Deserialize, Serialize};

use super::easing::Easing;
use super::spring::Spring;
use crate::error::MorphResult;

/// How a track maps elapsed time to interpolation progress.
///
/// Serialized with a `kind` tag:
///
/// ```toml
/// positioning_curve = { kind = "spring", damping_ratio = 0.6, initial_velocity = 0.0 }
/// resizing_curve = { kind = "ease", easing = "ease_in_out" }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimingCurve {
    /// Damped spring, normalized to the track duration.
    Spring(Spring),
    /// Monotonic easing curve.
    Ease {
        #[serde(default)]
        easing: Easing,
    },
}

impl TimingCurve {
    /// The default curve of the position track.
    pub fn default_positioning() -> Self {
        TimingCurve::Spring(Spring::default())
    }

    /// The default curve of the size track.
    pub fn default_resizing() -> Self {
        TimingCurve::Ease {
            easing: Easing::EaseInOut,
        }
    }

    /// Shorthand for an easing curve.
    pub fn ease(easing: Easing) -> Self {
        TimingCurve::Ease { easing }
    }

    /// Interpolation progress for linear time progress `t` in `[0, 1]`.
    #[inline]
    pub fn value(&self, t: f32) -> f32 {
        match self {
            TimingCurve::Spring(spring) => spring.progress(t),
            TimingCurve::Ease { easing } => easing.apply(t),
        }
    }

    /// Check the curve parameters.
    pub fn validate(&self) -> MorphResult<()> {
        match self {
            TimingCurve::Spring(spring) => spring.validate(),
            TimingCurve::Ease { .. } => Ok(()),
        }
    }
}

impl From<Easing> for TimingCurve {
    fn from(easing: Easing) -> Self {
        TimingCurve::ease(easing)
    }
}

impl From<Spring> for TimingCurve {
    fn from(spring: Spring) -> Self {
        TimingCurve::Spring(spring)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(
            TimingCurve::default_positioning(),
            TimingCurve::Spring(Spring::new(0.6, 0.0))
        );
        assert_eq!(
            TimingCurve::default_resizing(),
            TimingCurve::ease(Easing::EaseInOut)
        );
    }

    #[test]
    fn test_value_dispatch() {
        let linear = TimingCurve::from(Easing::Linear);
        assert_eq!(linear.value(0.25), 0.25);

        let spring = TimingCurve::from(Spring::critically_damped());
        assert_eq!(spring.value(1.0), 1.0);
        assert!(spring.value(0.5) > 0.5);
    }

    #[test]
    fn test_validate_spring_parameters() {
        assert!(TimingCurve::ease(Easing::EaseIn).validate().is_ok());
        assert!(TimingCurve::from(Spring::new(2.0, 0.0)).validate().is_err());
    }
}
