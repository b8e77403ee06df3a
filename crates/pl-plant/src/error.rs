//! Error types for plant construction.

use pl_core::CoreError;
use thiserror::Error;

/// Result type for plant operations.
pub type PlantResult<T> = Result<T, ConfigurationError>;

/// Invalid physical parameters. Always fatal: a model is never built from them.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigurationError {
    /// A parameter that appears as a divisor is zero.
    #[error("Parameter {what} must be non-zero")]
    ZeroParameter { what: &'static str },

    /// A parameter that must be positive is negative.
    #[error("Parameter {what} must be positive, got {value}")]
    NonPositive { what: &'static str, value: f64 },

    /// NaN or infinite parameter.
    #[error("Parameter {what} is not finite: {value}")]
    NonFinite { what: &'static str, value: f64 },

    /// Parameter outside its admissible interval.
    #[error("Parameter {what}={value} outside [{min}, {max}]")]
    OutOfRange {
        what: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

impl From<CoreError> for ConfigurationError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::NonFinite { what, value } => ConfigurationError::NonFinite { what, value },
            CoreError::Zero { what } => ConfigurationError::ZeroParameter { what },
            CoreError::NonPositive { what, value } => {
                ConfigurationError::NonPositive { what, value }
            }
        }
    }
}
