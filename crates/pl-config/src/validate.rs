//! Configuration validation.

use crate::schema::RunConfig;
use pl_plant::{ConfigurationError, build};
use pl_sim::SimError;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Plant: {0}")]
    Plant(#[from] ConfigurationError),

    #[error("Engine: {0}")]
    Engine(#[from] SimError),
}

pub fn validate_config(config: &RunConfig) -> Result<(), ValidationError> {
    build(&config.plant)?;

    if let Err(e) = config.controller.validate() {
        return Err(ValidationError::InvalidValue {
            field: "controller".to_string(),
            value: format!("{:?}", config.controller.as_tuple()),
            reason: e.to_string(),
        });
    }

    if let Some(d) = config.engine.duration_s {
        if !(d.is_finite() && d > 0.0) {
            return Err(ValidationError::InvalidValue {
                field: "engine.duration_s".to_string(),
                value: d.to_string(),
                reason: "must be positive".to_string(),
            });
        }
    }

    config.engine_options().validate()?;
    Ok(())
}
