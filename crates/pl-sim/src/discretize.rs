//! Exact zero-order-hold discretization of the closed loop.

use crate::error::{SimError, SimResult};
use nalgebra::SMatrix;
use pl_controls::{AUGMENTED_ORDER, AugMatrix, AugVector, AugmentedSystem};
use pl_core::Real;

const BLOCK: usize = AUGMENTED_ORDER + 1;

/// Largest `‖[A_cl B_ref]·Δt‖∞` handed to the matrix exponential.
pub const MAX_EXPONENT_NORM: Real = 1e12;

/// `x[k+1] = Φ·x[k] + Γ·r[k]`, exact when the reference is constant over the step.
#[derive(Debug, Clone, PartialEq)]
pub struct Discretization {
    phi: AugMatrix,
    gamma: AugVector,
    dt: Real,
}

impl Discretization {
    /// Φ and Γ from one matrix exponential:
    ///
    /// ```text
    /// exp([A_cl  B_ref] · Δt) = [Φ  Γ]
    ///     [0     0    ]         [0  1]
    /// ```
    ///
    /// Fails when the scaled block is too large for the exponential or the result
    /// overflows, so no step ever runs with a non-finite Φ or Γ.
    pub fn new(system: &AugmentedSystem, dt: Real) -> SimResult<Self> {
        let mut block = SMatrix::<Real, BLOCK, BLOCK>::zeros();
        block
            .fixed_view_mut::<AUGMENTED_ORDER, AUGMENTED_ORDER>(0, 0)
            .copy_from(&(system.a_cl() * dt));
        block
            .fixed_view_mut::<AUGMENTED_ORDER, 1>(0, AUGMENTED_ORDER)
            .copy_from(&(system.b_ref() * dt));

        let norm = block
            .row_iter()
            .map(|row| row.iter().map(|v| v.abs()).sum::<Real>())
            .fold(0.0, Real::max);
        if !(norm.is_finite() && norm <= MAX_EXPONENT_NORM) {
            return Err(SimError::InvalidArg {
                what: "closed loop too large to discretize",
            });
        }

        let e = block.exp();
        let d = Self {
            phi: e
                .fixed_view::<AUGMENTED_ORDER, AUGMENTED_ORDER>(0, 0)
                .into_owned(),
            gamma: e
                .fixed_view::<AUGMENTED_ORDER, 1>(0, AUGMENTED_ORDER)
                .into_owned(),
            dt,
        };
        if !d.is_finite() {
            return Err(SimError::InvalidArg {
                what: "discretized closed loop overflows",
            });
        }
        Ok(d)
    }

    pub fn phi(&self) -> &AugMatrix {
        &self.phi
    }

    pub fn gamma(&self) -> &AugVector {
        &self.gamma
    }

    pub fn dt(&self) -> Real {
        self.dt
    }

    fn is_finite(&self) -> bool {
        self.phi.iter().chain(self.gamma.iter()).all(|v| v.is_finite())
    }

    pub fn advance(&self, x: &AugVector, reference: Real) -> AugVector {
        self.phi * x + self.gamma * reference
    }
}
