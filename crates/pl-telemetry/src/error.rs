//! Error types for the telemetry link.

use thiserror::Error;

pub type TelemetryResult<T> = Result<T, TelemetryError>;

#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Command record is not a JSON object")]
    NotAnObject,

    #[error("Simulation error: {0}")]
    Sim(#[from] pl_sim::SimError),
}
