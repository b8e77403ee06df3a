//! Controller gains.

use crate::error::{ControlError, ControlResult};
use pl_core::Real;
use serde::{Deserialize, Serialize};

/// Parallel-form PID gains. Any finite real value is accepted; sign and magnitude
/// are judged by the augmenter and the stability analysis, not here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerGains {
    /// Proportional gain.
    pub kp: Real,
    /// Integral gain.
    pub ki: Real,
    /// Derivative gain.
    pub kd: Real,
}

impl Default for ControllerGains {
    fn default() -> Self {
        Self::documented()
    }
}

impl ControllerGains {
    /// Create a gain set, rejecting NaN and infinities.
    pub fn new(kp: Real, ki: Real, kd: Real) -> ControlResult<Self> {
        let gains = Self { kp, ki, kd };
        gains.validate()?;
        Ok(gains)
    }

    /// The design gains for the documented plant.
    pub fn documented() -> Self {
        Self {
            kp: 115.2,
            ki: 34.56,
            kd: 49.92,
        }
    }

    pub fn validate(&self) -> ControlResult<()> {
        for (what, value) in [("kp", self.kp), ("ki", self.ki), ("kd", self.kd)] {
            if !value.is_finite() {
                return Err(ControlError::NonFinite { what, value });
            }
        }
        Ok(())
    }

    /// Same gains expressed against a measurement scaled by `factor`
    /// (e.g. transducer volts instead of bar).
    pub fn scaled(&self, factor: Real) -> Self {
        Self {
            kp: self.kp * factor,
            ki: self.ki * factor,
            kd: self.kd * factor,
        }
    }

    /// Convenience accessor in (Kp, Ki, Kd) order.
    pub fn as_tuple(&self) -> (Real, Real, Real) {
        (self.kp, self.ki, self.kd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_gains() {
        assert_eq!(
            ControllerGains::documented().as_tuple(),
            (115.2, 34.56, 49.92)
        );
    }

    #[test]
    fn non_finite_gain_rejected() {
        assert!(matches!(
            ControllerGains::new(1.0, f64::NAN, 0.0),
            Err(ControlError::NonFinite { what: "ki", .. })
        ));
        assert!(ControllerGains::new(1.0, 0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn negative_gains_are_allowed() {
        assert!(ControllerGains::new(-1.0, -0.5, -0.1).is_ok());
    }

    #[test]
    fn scaling_multiplies_all_terms() {
        let g = ControllerGains::documented().scaled(0.01);
        assert!((g.kp - 1.152).abs() < 1e-12);
        assert!((g.ki - 0.3456).abs() < 1e-12);
        assert!((g.kd - 0.4992).abs() < 1e-12);
    }
}
