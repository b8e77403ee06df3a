//! PID closed-loop augmentation for the valve pressure plant.
//!
//! A PID law with a derivative term, `u = Kp·e + Ki·∫e + Kd·ė` with `e = r − C·x`,
//! references itself through `ė = −C·(A·x + B·u)`. This crate solves that loop in
//! closed form and folds the controller into a single linear system with one extra
//! integral-of-error state, so the simulator only ever integrates
//! `ẋ = A_cl·x + B_ref·r`.
//!
//! # Architecture
//!
//! - [`ControllerGains`]: the tunable (Kp, Ki, Kd) triple
//! - [`augment`]: pure, deterministic construction of an [`AugmentedSystem`]
//! - [`analysis`]: poles, stability assessment and step-response metrics computed
//!   from the public matrices, kept outside the simulator

pub mod analysis;
pub mod augment;
pub mod error;
pub mod gains;

pub use analysis::{StepMetrics, assess_stability, closed_loop_poles, spectral_abscissa};
pub use augment::{
    AUGMENTED_ORDER, AugMatrix, AugRow, AugVector, Augmentation, AugmentedSystem,
    StabilityWarning, augment, state,
};
pub use error::{ControlError, ControlResult};
pub use gains::ControllerGains;
