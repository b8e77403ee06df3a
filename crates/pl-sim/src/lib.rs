//! Real-time simulation of the augmented pressure loop.
//!
//! Provides:
//! - `TransientModel` and fixed-step explicit integrators (RK4, forward Euler)
//! - Exact zero-order-hold discretization of the closed loop
//! - Per-step saturation of the physical states
//! - Floating-accumulator output cadence
//! - The stepping [`Engine`] with step-boundary gain updates

pub mod cadence;
pub mod discretize;
pub mod engine;
pub mod error;
pub mod integrator;
pub mod model;
pub mod saturation;

pub use cadence::OutputCadence;
pub use discretize::{Discretization, MAX_EXPONENT_NORM};
pub use engine::{Engine, EngineOptions, EngineState, IntegratorType, Sample};
pub use error::{SimError, SimResult};
pub use integrator::{ForwardEuler, Integrator, MAX_SUBSTEPS, RK4, substeps_for};
pub use model::{ClosedLoopModel, TransientModel};
pub use saturation::{Bounds, SaturationLimits};
