//! Transition timing configuration.
//!
//! Configuration can be built in code or loaded from TOML:
//!
//! ```toml
//! positioning_duration = 0.4
//! resizing_duration = 0.2
//! positioning_curve = { kind = "spring", damping_ratio = 0.6, initial_velocity = 0.0 }
//! resizing_curve = { kind = "ease", easing = "ease_in_out" }
//! ```
//!
//! Missing keys take their default values.

use std::path::Path;
use std::time::Duration;

use horizon_morph_core::logging::targets;
use serde::{Deserialize, Serialize};

use crate::animation::TimingCurve;
use crate::error::{MorphError, MorphResult};

/// Durations and curves of the two tracks of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    /// Position track duration, in seconds.
    pub positioning_duration: f32,
    /// Size track duration, in seconds.
    pub resizing_duration: f32,
    /// Position track curve.
    pub positioning_curve: TimingCurve,
    /// Size track curve.
    pub resizing_curve: TimingCurve,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            positioning_duration: 0.4,
            resizing_duration: 0.2,
            positioning_curve: TimingCurve::default_positioning(),
            resizing_curve: TimingCurve::default_resizing(),
        }
    }
}

impl TransitionConfig {
    /// Default curves with the given durations, in seconds.
    pub fn with_durations(positioning: f32, resizing: f32) -> Self {
        Self {
            positioning_duration: positioning,
            resizing_duration: resizing,
            ..Default::default()
        }
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> MorphResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> MorphResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(
            target: targets::CONFIG,
            path = %path.display(),
            ?config,
            "loaded transition configuration"
        );
        Ok(config)
    }

    /// Check that durations are finite and non-negative and curves settle.
    pub fn validate(&self) -> MorphResult<()> {
        for (name, seconds) in [
            ("positioning_duration", self.positioning_duration),
            ("resizing_duration", self.resizing_duration),
        ] {
            if !seconds.is_finite() || seconds < 0.0 {
                return Err(MorphError::InvalidConfig(format!(
                    "{name} must be a finite, non-negative number of seconds, got {seconds}"
                )));
            }
        }
        self.positioning_curve.validate()?;
        self.resizing_curve.validate()
    }

    /// Position track duration.
    pub fn positioning(&self) -> Duration {
        seconds_to_duration(self.positioning_duration)
    }

    /// Size track duration.
    pub fn resizing(&self) -> Duration {
        seconds_to_duration(self.resizing_duration)
    }

    /// Duration of the whole transition.
    pub fn total_duration(&self) -> Duration {
        self.positioning().max(self.resizing())
    }
}

/// Convert seconds to a duration, rounded to the microsecond.
///
/// Negative and non-finite values become zero.
pub(crate) fn seconds_to_duration(seconds: f32) -> Duration {
    if !seconds.is_finite() || seconds <= 0.0 {
        return Duration::ZERO;
    }
    Duration::from_micros((f64::from(seconds) * 1_000_000.0).round() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{Easing, Spring};

    #[test]
    fn test_defaults() {
        let config = TransitionConfig::default();
        assert_eq!(config.positioning(), Duration::from_millis(400));
        assert_eq!(config.resizing(), Duration::from_millis(200));
        assert_eq!(config.total_duration(), Duration::from_millis(400));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml_str() {
        let config = TransitionConfig::from_toml_str(
            r#"
            positioning_duration = 1.0
            resizing_duration = 0.5
            positioning_curve = { kind = "spring", damping_ratio = 0.8, initial_velocity = 1.5 }
            resizing_curve = { kind = "ease", easing = "ease_out_cubic" }
            "#,
        )
        .unwrap();
        assert_eq!(config.positioning(), Duration::from_secs(1));
        assert_eq!(config.resizing(), Duration::from_millis(500));
        assert_eq!(config.positioning_curve, TimingCurve::Spring(Spring::new(0.8, 1.5)));
        assert_eq!(config.resizing_curve, TimingCurve::ease(Easing::EaseOutCubic));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = TransitionConfig::from_toml_str("resizing_duration = 0.3").unwrap();
        assert_eq!(config.positioning(), Duration::from_millis(400));
        assert_eq!(config.resizing(), Duration::from_millis(300));
        assert_eq!(config.positioning_curve, TimingCurve::default_positioning());

        let config = TransitionConfig::from_toml_str(
            r#"positioning_curve = { kind = "spring" }"#,
        )
        .unwrap();
        assert_eq!(config.positioning_curve, TimingCurve::Spring(Spring::default()));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            TransitionConfig::from_toml_str("positioning_duration = -1.0"),
            Err(MorphError::InvalidConfig(_))
        ));
        assert!(matches!(
            TransitionConfig::from_toml_str(
                r#"positioning_curve = { kind = "spring", damping_ratio = 1.5 }"#
            ),
            Err(MorphError::InvalidConfig(_))
        ));
        assert!(
            TransitionConfig::with_durations(f32::NAN, 0.2)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            TransitionConfig::from_toml_str("positioning_duration = \"fast\""),
            Err(MorphError::ConfigParse(_))
        ));
        assert!(matches!(
            TransitionConfig::from_toml_str(r#"resizing_curve = { kind = "bounce" }"#),
            Err(MorphError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            TransitionConfig::load("/nonexistent/horizon-morph/transition.toml"),
            Err(MorphError::Io(_))
        ));
    }

    #[test]
    fn test_seconds_to_duration() {
        assert_eq!(seconds_to_duration(0.4), Duration::from_millis(400));
        assert_eq!(seconds_to_duration(-3.0), Duration::ZERO);
        assert_eq!(seconds_to_duration(f32::INFINITY), Duration::ZERO);
    }
}
