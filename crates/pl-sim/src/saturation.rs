//! Hard clamps applied to the physical states after every integration step.
//!
//! The linear model is only meaningful inside a bounded envelope. Clamping keeps the
//! state finite and inside that envelope whatever the gains. The integral state is
//! never clamped; it is only reset to zero if it stops being finite.

use crate::error::{SimError, SimResult};
use pl_controls::{AugVector, state};
use pl_core::{Real, clamp_finite};
use pl_plant::PlantParameters;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Drive current rating of the motor.
const MAX_CURRENT_A: Real = 25.0;

/// Closed interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Real,
    pub max: Real,
}

impl Bounds {
    pub const fn new(min: Real, max: Real) -> Self {
        Self { min, max }
    }

    pub const fn symmetric(limit: Real) -> Self {
        Self {
            min: -limit,
            max: limit,
        }
    }

    /// NaN maps to `min`.
    pub fn clamp(&self, v: Real) -> Real {
        clamp_finite(v, self.min, self.max)
    }

    pub fn contains(&self, v: Real) -> bool {
        v >= self.min && v <= self.max
    }

    fn validate(&self, what: &'static str) -> SimResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(SimError::InvalidArg { what });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SaturationLimits {
    pub current_a: Bounds,
    pub velocity_rad_s: Bounds,
    pub position_rad: Bounds,
    pub pressure_bar: Bounds,
}

impl Default for SaturationLimits {
    fn default() -> Self {
        Self::documented(&PlantParameters::documented())
    }
}

impl SaturationLimits {
    /// Rated current, no-load speed, one valve revolution either way of the motor
    /// shaft, and `[0, max]` process pressure.
    pub fn documented(params: &PlantParameters) -> Self {
        Self {
            current_a: Bounds::symmetric(MAX_CURRENT_A),
            velocity_rad_s: Bounds::symmetric(params.no_load_speed()),
            position_rad: Bounds::symmetric(params.gear_ratio * TAU),
            pressure_bar: Bounds::new(0.0, params.pressure_max_bar),
        }
    }

    pub fn validate(&self) -> SimResult<()> {
        self.current_a.validate("current limits must be finite and ordered")?;
        self.velocity_rad_s
            .validate("velocity limits must be finite and ordered")?;
        self.position_rad
            .validate("position limits must be finite and ordered")?;
        self.pressure_bar
            .validate("pressure limits must be finite and ordered")?;
        Ok(())
    }

    pub fn apply(&self, x: &mut AugVector) {
        x[state::CURRENT] = self.current_a.clamp(x[state::CURRENT]);
        x[state::VELOCITY] = self.velocity_rad_s.clamp(x[state::VELOCITY]);
        x[state::POSITION] = self.position_rad.clamp(x[state::POSITION]);
        x[state::PRESSURE] = self.pressure_bar.clamp(x[state::PRESSURE]);
        if !x[state::INTEGRAL].is_finite() {
            x[state::INTEGRAL] = 0.0;
        }
    }

    pub fn contains(&self, x: &AugVector) -> bool {
        self.current_a.contains(x[state::CURRENT])
            && self.velocity_rad_s.contains(x[state::VELOCITY])
            && self.position_rad.contains(x[state::POSITION])
            && self.pressure_bar.contains(x[state::PRESSURE])
            && x[state::INTEGRAL].is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_limits() {
        let l = SaturationLimits::default();
        assert_eq!(l.current_a, Bounds::new(-25.0, 25.0));
        assert!((l.velocity_rad_s.max - 45.0).abs() < 1e-12);
        assert!((l.position_rad.max - 80.0 * std::f64::consts::PI).abs() < 1e-9);
        assert_eq!(l.pressure_bar, Bounds::new(0.0, 700.0));
        assert!(l.validate().is_ok());
    }

    #[test]
    fn integral_is_untouched() {
        let l = SaturationLimits::default();
        let mut x = AugVector::new(1e6, -1e6, 1e6, -1e6, 1e9);
        l.apply(&mut x);
        assert_eq!(x, AugVector::new(25.0, -45.0, l.position_rad.max, 0.0, 1e9));
    }

    #[test]
    fn nan_is_pulled_to_lower_bound() {
        let l = SaturationLimits::default();
        let mut x = AugVector::repeat(f64::NAN);
        l.apply(&mut x);
        assert_eq!(x[state::PRESSURE], 0.0);
        assert_eq!(x[state::CURRENT], -25.0);
        assert_eq!(x[state::INTEGRAL], 0.0);
        assert!(l.contains(&x));
    }

    #[test]
    fn infinite_integral_is_reset() {
        let l = SaturationLimits::default();
        let mut x = AugVector::new(0.0, 0.0, 0.0, 500.0, f64::INFINITY);
        assert!(!l.contains(&x));
        l.apply(&mut x);
        assert_eq!(x[state::INTEGRAL], 0.0);
        assert_eq!(x[state::PRESSURE], 500.0);
    }

    #[test]
    fn inverted_bounds_rejected() {
        let l = SaturationLimits {
            pressure_bar: Bounds::new(700.0, 0.0),
            ..SaturationLimits::default()
        };
        assert!(l.validate().is_err());
    }
}
