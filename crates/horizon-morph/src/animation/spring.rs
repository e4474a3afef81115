//! Damped spring timing.
//!
//! A spring track follows the analytic solution of the damped harmonic
//! oscillator
//!
//! ```text
//! x''(τ) + 2ζω x'(τ) + ω² x(τ) = ω²,   x(0) = 0,   x'(0) = v₀
//! ```
//!
//! over normalized time `τ ∈ [0, 1]`, where `τ = 1` is the track's configured
//! duration. The natural frequency `ω` is chosen so that the spring has settled
//! to within 1% of its target by the end of the duration, at which point the
//! progress snaps to exactly `1.0`.

use serde::{Deserialize, Serialize};

use crate::error::{MorphError, MorphResult};

/// `ω` for a critically damped spring to settle within 1% at `τ = 1`.
///
/// Solves `e^(-ω)(1 + ω) = 0.01`.
const CRITICALLY_DAMPED_SETTLE_FACTOR: f32 = 6.6;

/// `ζω` for an underdamped envelope to decay to 1% at `τ = 1` (`ln 100`).
const UNDERDAMPED_ENVELOPE_FACTOR: f32 = 4.6;

/// Ratios at or above this are treated as critically damped.
const CRITICAL_THRESHOLD: f32 = 0.999;

/// Spring parameters for a timing curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Spring {
    /// Damping ratio in `(0, 1]`. `1.0` is critically damped, lower values
    /// overshoot and oscillate before settling.
    pub damping_ratio: f32,
    /// Initial velocity in total distance per duration. Positive values move
    /// toward the target.
    pub initial_velocity: f32,
}

impl Default for Spring {
    fn default() -> Self {
        Self {
            damping_ratio: 0.6,
            initial_velocity: 0.0,
        }
    }
}

impl Spring {
    /// Create spring parameters.
    pub fn new(damping_ratio: f32, initial_velocity: f32) -> Self {
        Self {
            damping_ratio,
            initial_velocity,
        }
    }

    /// A critically damped spring at rest.
    pub fn critically_damped() -> Self {
        Self::new(1.0, 0.0)
    }

    /// Check that the parameters describe a spring that settles.
    pub fn validate(&self) -> MorphResult<()> {
        if !(self.damping_ratio > 0.0 && self.damping_ratio <= 1.0) {
            return Err(MorphError::InvalidConfig(format!(
                "damping ratio must be in (0, 1], got {}",
                self.damping_ratio
            )));
        }
        if !self.initial_velocity.is_finite() {
            return Err(MorphError::InvalidConfig(format!(
                "initial velocity must be finite, got {}",
                self.initial_velocity
            )));
        }
        Ok(())
    }

    /// Spring displacement toward the target at normalized time `tau`.
    ///
    /// Returns `0.0` at `tau <= 0` and exactly `1.0` at `tau >= 1`. Values in
    /// between may exceed `1.0` when the spring is underdamped.
    pub fn progress(&self, tau: f32) -> f32 {
        if tau <= 0.0 {
            return 0.0;
        }
        if tau >= 1.0 {
            return 1.0;
        }

        let zeta = self.damping_ratio.clamp(f32::EPSILON, 1.0);
        let v0 = self.initial_velocity;

        if zeta >= CRITICAL_THRESHOLD {
            let omega = CRITICALLY_DAMPED_SETTLE_FACTOR;
            let decay = (-omega * tau).exp();
            1.0 - decay * (1.0 + (omega - v0) * tau)
        } else {
            let omega = UNDERDAMPED_ENVELOPE_FACTOR / zeta;
            let omega_d = omega * (1.0 - zeta * zeta).sqrt();
            let decay = (-zeta * omega * tau).exp();
            let sin_coefficient = (zeta * omega - v0) / omega_d;
            1.0 - decay * ((omega_d * tau).cos() + sin_coefficient * (omega_d * tau).sin())
        }
    }
}
