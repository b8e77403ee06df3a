//! Closed-loop augmentation of the plant with a PID controller.

use crate::error::{ControlError, ControlResult};
use crate::gains::ControllerGains;
use nalgebra::{RowSVector, SMatrix, SVector};
use pl_core::Real;
use pl_plant::{LtiModel, OutputRow, PLANT_ORDER};
use std::fmt;

/// Plant states plus one integral-of-error state.
pub const AUGMENTED_ORDER: usize = PLANT_ORDER + 1;

pub type AugMatrix = SMatrix<Real, AUGMENTED_ORDER, AUGMENTED_ORDER>;
pub type AugVector = SVector<Real, AUGMENTED_ORDER>;
pub type AugRow = RowSVector<Real, AUGMENTED_ORDER>;

/// Positions in the augmented state vector.
pub mod state {
    pub use pl_plant::state::*;

    /// Integral of the tracking error (bar·s).
    pub const INTEGRAL: usize = pl_plant::PLANT_ORDER;
}

/// Non-fatal diagnosis of a gain set. The loop is still built and can be run;
/// saturation keeps the state bounded, but the response is not meaningful.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StabilityWarning {
    /// `1 + Kd·C·B <= 0`: the derivative loop reverses sign or is undefined.
    DegenerateLoop { denom: Real },
    /// A closed-loop pole has a non-negative real part.
    UnstablePole { real_part: Real },
}

impl fmt::Display for StabilityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StabilityWarning::DegenerateLoop { denom } => {
                write!(f, "degenerate algebraic loop: 1 + Kd*C*B = {denom}")
            }
            StabilityWarning::UnstablePole { real_part } => {
                write!(f, "closed-loop pole with real part {real_part} >= 0")
            }
        }
    }
}

/// ẋ = A_cl·x + B_ref·r, y = C_cl·x over the augmented state `[i, ω, θm, P, ∫e]`.
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentedSystem {
    a_cl: AugMatrix,
    b_ref: AugVector,
    c_cl: AugRow,
}

impl AugmentedSystem {
    pub fn a_cl(&self) -> &AugMatrix {
        &self.a_cl
    }

    pub fn b_ref(&self) -> &AugVector {
        &self.b_ref
    }

    pub fn c_cl(&self) -> &AugRow {
        &self.c_cl
    }

    pub fn derivative(&self, x: &AugVector, reference: Real) -> AugVector {
        self.a_cl * x + self.b_ref * reference
    }

    pub fn output(&self, x: &AugVector) -> Real {
        (self.c_cl * x)[0]
    }
}

/// Result of [`augment`]: the system plus the intermediate loop terms.
#[derive(Debug, Clone, PartialEq)]
pub struct Augmentation {
    pub system: AugmentedSystem,
    /// Instantaneous output sensitivity to input, C·B.
    pub cb: Real,
    /// 1 + Kd·C·B.
    pub denom: Real,
    /// State feedback row −(Kp·C + Kd·C·A)/denom.
    pub k_state: OutputRow,
    /// Ki/denom.
    pub k_int: Real,
    /// Kp/denom.
    pub k_ref: Real,
    pub warning: Option<StabilityWarning>,
}

/// Fold a PID controller into the plant.
///
/// With `ė = −C·(A·x + B·u)` substituted into the PID law, the implicit equation in
/// `u` solves to
///
/// ```text
/// u = K_state·x + K_int·z + K_ref·r
/// K_state = −(Kp·C + Kd·C·A) / (1 + Kd·C·B)
/// K_int   =  Ki / (1 + Kd·C·B)
/// K_ref   =  Kp / (1 + Kd·C·B)
/// ```
///
/// which gives
///
/// ```text
/// A_cl = [ A + B·K_state   B·K_int ]    B_ref = [ B·K_ref ]    C_cl = [ C  0 ]
///        [ −C              0       ]            [ 1       ]
/// ```
///
/// Pure and deterministic: the same inputs give bit-identical matrices.
///
/// `1 + Kd·C·B` decides how the gain set is treated. A negative value is reported
/// through [`Augmentation::warning`] and the matrices are still returned. Exactly
/// zero leaves every feedback term undefined and is refused with
/// [`ControlError::SingularLoop`] instead of a warning; the engine then keeps its
/// previous gains.
pub fn augment(model: &LtiModel, gains: &ControllerGains) -> ControlResult<Augmentation> {
    gains.validate()?;

    let a = model.a();
    let b = model.b();
    let c = model.c();

    let cb = (c * b)[0];
    let denom = 1.0 + gains.kd * cb;
    if denom == 0.0 {
        return Err(ControlError::SingularLoop { kd: gains.kd, cb });
    }
    let warning = (denom < 0.0).then_some(StabilityWarning::DegenerateLoop { denom });

    let k_state: OutputRow = -(c * gains.kp + (c * a) * gains.kd) / denom;
    let k_int = gains.ki / denom;
    let k_ref = gains.kp / denom;

    let n = PLANT_ORDER;
    let mut a_cl = AugMatrix::zeros();
    a_cl.fixed_view_mut::<PLANT_ORDER, PLANT_ORDER>(0, 0)
        .copy_from(&(a + b * k_state));
    a_cl.fixed_view_mut::<PLANT_ORDER, 1>(0, n).copy_from(&(b * k_int));
    a_cl.fixed_view_mut::<1, PLANT_ORDER>(n, 0).copy_from(&(-c));
    a_cl[(n, n)] = 0.0;

    let mut b_ref = AugVector::zeros();
    b_ref
        .fixed_view_mut::<PLANT_ORDER, 1>(0, 0)
        .copy_from(&(b * k_ref));
    b_ref[n] = 1.0;

    let mut c_cl = AugRow::zeros();
    c_cl.fixed_view_mut::<1, PLANT_ORDER>(0, 0).copy_from(c);

    Ok(Augmentation {
        system: AugmentedSystem { a_cl, b_ref, c_cl },
        cb,
        denom,
        k_state,
        k_int,
        k_ref,
        warning,
    })
}
