//! Open-loop plant for the valve pressure loop.
//!
//! The plant chains a DC motor, a reduction gearbox driving a rotary valve, and a
//! first-order pressure process:
//!
//! ```text
//! voltage -> [armature i] -> [shaft ω] -> [motor angle θm] -> [pressure P]
//! ```
//!
//! [`PlantParameters`] holds the documented physical constants as an immutable value,
//! and [`build`] turns them into an [`LtiModel`] (A, B, C, D). Nothing here keeps
//! global state; building twice from the same parameters gives identical matrices.

pub mod error;
pub mod model;
pub mod parameters;

pub use error::{ConfigurationError, PlantResult};
pub use model::{
    InputVector, LtiModel, OutputRow, PLANT_ORDER, PlantMatrix, PlantState, build, state,
};
pub use parameters::PlantParameters;
