//! Linear time-invariant model of the open-loop plant.

use crate::error::PlantResult;
use crate::parameters::PlantParameters;
use nalgebra::{RowSVector, SMatrix, SVector};
use pl_core::{Real, ensure_finite};

/// Number of physical states: current, speed, motor angle, pressure.
pub const PLANT_ORDER: usize = 4;

pub type PlantMatrix = SMatrix<Real, PLANT_ORDER, PLANT_ORDER>;
pub type InputVector = SVector<Real, PLANT_ORDER>;
pub type OutputRow = RowSVector<Real, PLANT_ORDER>;
pub type PlantState = SVector<Real, PLANT_ORDER>;

/// Positions of the physical states in the state vector.
pub mod state {
    /// Armature current (A).
    pub const CURRENT: usize = 0;
    /// Motor angular velocity (rad/s).
    pub const VELOCITY: usize = 1;
    /// Motor angular position (rad).
    pub const POSITION: usize = 2;
    /// Process pressure (bar).
    pub const PRESSURE: usize = 3;
}

/// ẋ = A·x + B·u, y = C·x + D·u with u the armature voltage and y the pressure in bar.
///
/// Immutable once built. Rebuild from parameters instead of editing in place.
#[derive(Debug, Clone, PartialEq)]
pub struct LtiModel {
    a: PlantMatrix,
    b: InputVector,
    c: OutputRow,
    d: Real,
    sensor_gain: Real,
}

impl LtiModel {
    /// Wrap explicit matrices. Every entry must be finite.
    pub fn new(
        a: PlantMatrix,
        b: InputVector,
        c: OutputRow,
        d: Real,
        sensor_gain: Real,
    ) -> PlantResult<Self> {
        for v in a.iter().chain(b.iter()).chain(c.iter()) {
            ensure_finite(*v, "state-space entry")?;
        }
        ensure_finite(d, "feedthrough")?;
        ensure_finite(sensor_gain, "sensor_gain")?;
        Ok(Self {
            a,
            b,
            c,
            d,
            sensor_gain,
        })
    }

    pub fn a(&self) -> &PlantMatrix {
        &self.a
    }

    pub fn b(&self) -> &InputVector {
        &self.b
    }

    pub fn c(&self) -> &OutputRow {
        &self.c
    }

    pub fn d(&self) -> Real {
        self.d
    }

    /// State derivative for a given input voltage.
    pub fn derivative(&self, x: &PlantState, u: Real) -> PlantState {
        self.a * x + self.b * u
    }

    /// Measured output y = C·x + D·u.
    pub fn output(&self, x: &PlantState, u: Real) -> Real {
        (self.c * x)[0] + self.d * u
    }

    /// Transducer voltage for the current pressure state.
    pub fn sensor_voltage(&self, x: &PlantState) -> Real {
        self.sensor_gain * x[state::PRESSURE]
    }
}

/// Assemble (A, B, C, D) from physical constants.
///
/// ```text
/// A = [ -R/L     -Ke/L   0              0
///       Kt/J      0      0              0
///       0         1      0              0
///       0         0      Kpr/(N·τp)    -1/τp ]
/// B = [1/L, 0, 0, 0]ᵀ    C = [0, 0, 0, 1]    D = 0
/// ```
///
/// Fails with [`crate::ConfigurationError`] instead of dividing by a zero
/// inductance, time constant, gear ratio or inertia.
pub fn build(params: &PlantParameters) -> PlantResult<LtiModel> {
    params.validate()?;

    let r = params.resistance_ohm;
    let l = params.inductance_h;
    let kt = params.torque_constant_nm_per_a;
    let ke = params.back_emf_v_s_per_rad;
    let j = params.total_inertia();
    let n = params.gear_ratio;
    let tau = params.pressure_time_constant_s;
    let kpr = params.pressure_gain_bar_per_rad;

    let mut a = PlantMatrix::zeros();
    a[(state::CURRENT, state::CURRENT)] = -r / l;
    a[(state::CURRENT, state::VELOCITY)] = -ke / l;
    a[(state::VELOCITY, state::CURRENT)] = kt / j;
    a[(state::POSITION, state::VELOCITY)] = 1.0;
    a[(state::PRESSURE, state::POSITION)] = kpr / (n * tau);
    a[(state::PRESSURE, state::PRESSURE)] = -1.0 / tau;

    let mut b = InputVector::zeros();
    b[state::CURRENT] = 1.0 / l;

    let mut c = OutputRow::zeros();
    c[state::PRESSURE] = 1.0;

    LtiModel::new(a, b, c, 0.0, params.sensor_gain_v_per_bar)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_matrices() {
        let p = PlantParameters::documented();
        let m = build(&p).unwrap();

        assert!((m.a()[(0, 0)] + 240.0).abs() < 1e-9);
        assert!((m.a()[(0, 1)] + 160.0).abs() < 1e-9);
        assert!((m.a()[(1, 0)] - 0.8 / p.total_inertia()).abs() < 1e-12);
        assert_eq!(m.a()[(2, 1)], 1.0);
        assert!((m.a()[(3, 2)] - 7.5).abs() < 1e-12);
        assert!((m.a()[(3, 3)] + 2.0).abs() < 1e-12);
        assert_eq!(m.b()[0], 200.0);
        assert_eq!(m.c()[3], 1.0);
        assert_eq!(m.d(), 0.0);
    }

    #[test]
    fn input_only_drives_current() {
        let m = build(&PlantParameters::documented()).unwrap();
        let dx = m.derivative(&PlantState::zeros(), 1.0);
        assert_eq!(dx, PlantState::new(200.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn sensor_voltage_uses_transducer_gain() {
        let m = build(&PlantParameters::documented()).unwrap();
        let x = PlantState::new(0.0, 0.0, 0.0, 500.0);
        assert!((m.sensor_voltage(&x) - 5.0).abs() < 1e-12);
        assert_eq!(m.output(&x, 0.0), 500.0);
    }
}
