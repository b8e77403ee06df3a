//! TransientModel trait and the closed-loop model it is used with.

use crate::error::SimResult;
use pl_controls::{AugVector, AugmentedSystem};
use pl_core::Real;

/// Trait for transient (dynamic) system models.
///
/// A TransientModel must implement:
/// - State type (Clone, for snapshots)
/// - RHS computation: x_dot = f(t, x)
/// - Scalar field arithmetic for integration: add states, scale by scalar
pub trait TransientModel {
    /// State type (must be Clone).
    type State: Clone;

    /// Compute state derivative dxdt = f(t, x).
    fn rhs(&mut self, t: Real, x: &Self::State) -> SimResult<Self::State>;

    /// Add two states element-wise: result = a + b.
    fn add(&self, a: &Self::State, b: &Self::State) -> Self::State;

    /// Scale a state by a scalar: result = scale * a.
    fn scale(&self, a: &Self::State, scale: Real) -> Self::State;
}

/// ẋ = A_cl·x + B_ref·r with the reference held constant over the step.
#[derive(Debug, Clone, Copy)]
pub struct ClosedLoopModel<'a> {
    pub system: &'a AugmentedSystem,
    pub reference: Real,
}

impl<'a> ClosedLoopModel<'a> {
    pub fn new(system: &'a AugmentedSystem, reference: Real) -> Self {
        Self { system, reference }
    }
}

impl TransientModel for ClosedLoopModel<'_> {
    type State = AugVector;

    fn rhs(&mut self, _t: Real, x: &AugVector) -> SimResult<AugVector> {
        Ok(self.system.derivative(x, self.reference))
    }

    fn add(&self, a: &AugVector, b: &AugVector) -> AugVector {
        a + b
    }

    fn scale(&self, a: &AugVector, scale: Real) -> AugVector {
        a * scale
    }
}
