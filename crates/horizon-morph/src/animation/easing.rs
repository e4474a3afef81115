//! Easing curves.
//!
//! An easing maps linear progress in `[0, 1]` to eased progress in `[0, 1]`.
//! Every curve here is monotonic and pins both endpoints, so an eased track
//! never overshoots its target.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

/// Available easing curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Constant rate.
    Linear,
    /// Quadratic, starts slow.
    EaseIn,
    /// Quadratic, ends slow.
    EaseOut,
    /// Quadratic, slow at both ends.
    #[default]
    EaseInOut,
    /// Cubic, starts slow.
    EaseInCubic,
    /// Cubic, ends slow.
    EaseOutCubic,
    /// Cubic, slow at both ends.
    EaseInOutCubic,
    /// Sinusoidal, slow at both ends.
    EaseInOutSine,
}

impl Easing {
    /// Map linear progress to eased progress. Input is clamped to `[0, 1]`.
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::EaseInCubic => t * t * t,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::EaseInOutSine => -((PI * t).cos() - 1.0) / 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 8] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::EaseInCubic,
        Easing::EaseOutCubic,
        Easing::EaseInOutCubic,
        Easing::EaseInOutSine,
    ];

    #[test]
    fn test_endpoints_are_pinned() {
        for easing in ALL {
            assert!(easing.apply(0.0).abs() < 1e-6, "{easing:?} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6, "{easing:?} at 1");
        }
    }

    #[test]
    fn test_monotonic() {
        for easing in ALL {
            let mut previous = easing.apply(0.0);
            for step in 1..=100 {
                let value = easing.apply(step as f32 / 100.0);
                assert!(value + 1e-6 >= previous, "{easing:?} decreased at step {step}");
                previous = value;
            }
        }
    }

    #[test]
    fn test_ease_in_out_is_symmetric() {
        assert_eq!(Easing::EaseInOut.apply(0.5), 0.5);
        let a = Easing::EaseInOut.apply(0.25);
        let b = Easing::EaseInOut.apply(0.75);
        assert!((a + b - 1.0).abs() < 1e-6);
        assert!(a < 0.25);
    }

    #[test]
    fn test_input_is_clamped() {
        assert_eq!(Easing::Linear.apply(-0.5), 0.0);
        assert_eq!(Easing::Linear.apply(1.5), 1.0);
    }

    #[test]
    fn test_default_is_ease_in_out() {
        assert_eq!(Easing::default(), Easing::EaseInOut);
    }
}
