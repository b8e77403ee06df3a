//! Fixed-step explicit integrators.

use crate::error::{SimError, SimResult};
use crate::model::TransientModel;
use pl_controls::AugMatrix;
use pl_core::Real;

/// Trait for time integrators.
pub trait Integrator {
    /// Largest `h·‖A‖∞` the method is run at on a linear system.
    const STABILITY_LIMIT: Real;

    /// Advance state by one time step using the transient model.
    fn step<M: TransientModel>(
        &self,
        model: &mut M,
        t: Real,
        x: &M::State,
        dt: Real,
    ) -> SimResult<M::State>;
}

/// Classical RK4 (Runge-Kutta 4th order) integrator.
#[derive(Clone, Copy, Debug)]
pub struct RK4;

impl Integrator for RK4 {
    const STABILITY_LIMIT: Real = 2.5;

    fn step<M: TransientModel>(
        &self,
        model: &mut M,
        t: Real,
        x: &M::State,
        dt: Real,
    ) -> SimResult<M::State> {
        let k1 = model.rhs(t, x)?;

        let x2 = model.add(x, &model.scale(&k1, 0.5 * dt));
        let k2 = model.rhs(t + 0.5 * dt, &x2)?;

        let x3 = model.add(x, &model.scale(&k2, 0.5 * dt));
        let k3 = model.rhs(t + 0.5 * dt, &x3)?;

        let x4 = model.add(x, &model.scale(&k3, dt));
        let k4 = model.rhs(t + dt, &x4)?;

        // x_new = x + (dt/6) * (k1 + 2*k2 + 2*k3 + k4)
        let k_sum = model.add(
            &model.add(&k1, &model.scale(&k2, 2.0)),
            &model.add(&model.scale(&k3, 2.0), &k4),
        );

        Ok(model.add(x, &model.scale(&k_sum, dt / 6.0)))
    }
}

/// Forward Euler (explicit, 1st order).
/// Calls rhs() once per step instead of 4 times (RK4).
#[derive(Clone, Copy, Debug)]
pub struct ForwardEuler;

impl Integrator for ForwardEuler {
    const STABILITY_LIMIT: Real = 1.0;

    fn step<M: TransientModel>(
        &self,
        model: &mut M,
        t: Real,
        x: &M::State,
        dt: Real,
    ) -> SimResult<M::State> {
        let xdot = model.rhs(t, x)?;
        Ok(model.add(x, &model.scale(&xdot, dt)))
    }
}

/// Most sub-steps one engine step may take before the loop is considered too stiff.
pub const MAX_SUBSTEPS: usize = 10_000;

/// Number of equal sub-steps needed so that `h·‖A‖∞ <= limit` over an interval `dt`.
///
/// Fails when more than [`MAX_SUBSTEPS`] would be needed.
pub fn substeps_for(a: &AugMatrix, dt: Real, limit: Real) -> SimResult<usize> {
    let norm = a
        .row_iter()
        .map(|row| row.iter().map(|v| v.abs()).sum::<Real>())
        .fold(0.0, Real::max);
    let n = (norm * dt / limit).ceil();
    if !n.is_finite() || n > MAX_SUBSTEPS as Real {
        return Err(SimError::InvalidArg {
            what: "closed loop too stiff for the explicit integrator",
        });
    }
    Ok((n as usize).max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// ẋ = -x, exact solution e^{-t}.
    struct Decay;

    impl TransientModel for Decay {
        type State = f64;

        fn rhs(&mut self, _t: f64, x: &f64) -> SimResult<f64> {
            Ok(-x)
        }

        fn add(&self, a: &f64, b: &f64) -> f64 {
            a + b
        }

        fn scale(&self, a: &f64, scale: f64) -> f64 {
            a * scale
        }
    }

    fn integrate<I: Integrator>(integrator: I, dt: f64, steps: usize) -> f64 {
        let mut model = Decay;
        let mut x = 1.0;
        for k in 0..steps {
            x = integrator.step(&mut model, k as f64 * dt, &x, dt).unwrap();
        }
        x
    }

    #[test]
    fn rk4_is_fourth_order_accurate() {
        let x = integrate(RK4, 0.01, 100);
        assert!((x - (-1.0f64).exp()).abs() < 1e-10);
    }

    #[test]
    fn euler_is_first_order_accurate() {
        let x = integrate(ForwardEuler, 0.001, 1000);
        assert!((x - (-1.0f64).exp()).abs() < 1e-3);
    }

    #[test]
    fn substep_count() {
        let a = AugMatrix::identity() * -250.0;
        assert_eq!(substeps_for(&a, 0.01, 2.5).unwrap(), 1);
        assert_eq!(substeps_for(&a, 0.01, 1.0).unwrap(), 3);
        assert_eq!(substeps_for(&AugMatrix::zeros(), 0.01, 2.5).unwrap(), 1);
    }

    #[test]
    fn substep_count_is_capped() {
        let stiff = AugMatrix::identity() * -1e9;
        assert!(matches!(
            substeps_for(&stiff, 0.01, RK4::STABILITY_LIMIT),
            Err(SimError::InvalidArg { .. })
        ));
        let overflowed = AugMatrix::identity() * Real::INFINITY;
        assert!(substeps_for(&overflowed, 0.01, RK4::STABILITY_LIMIT).is_err());

        let at_cap = AugMatrix::identity() * -(MAX_SUBSTEPS as Real * 100.0);
        assert_eq!(substeps_for(&at_cap, 0.01, 1.0).unwrap(), MAX_SUBSTEPS);
    }
}
