//! Error types for controller operations.

use thiserror::Error;

/// Result type for control operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors that can occur while building or tuning the closed loop.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// Gain is NaN or infinite.
    #[error("Non-finite gain {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    /// `1 + Kd·C·B` is exactly zero, so the derivative loop has no solution.
    #[error("Algebraic loop is singular (1 + Kd*C*B = 0, Kd={kd}, C*B={cb})")]
    SingularLoop { kd: f64, cb: f64 },
}
