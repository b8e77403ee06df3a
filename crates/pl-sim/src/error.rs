//! Error types for simulation operations.

use thiserror::Error;

/// Errors encountered while building or stepping the engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Configuration error: {0}")]
    Configuration(#[from] pl_plant::ConfigurationError),

    #[error("Control error: {0}")]
    Control(#[from] pl_controls::ControlError),
}

pub type SimResult<T> = Result<T, SimError>;
