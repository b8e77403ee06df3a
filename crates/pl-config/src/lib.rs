//! pl-config: run configuration files.
//!
//! A run is described by plant parameters, controller gains and engine settings.
//! Every section is optional; anything left out takes the documented value.

pub mod schema;
pub mod validate;

pub use schema::{EngineConfig, PacingMode, RunConfig};
pub use validate::{ValidationError, validate_config};

use std::path::Path;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unsupported config format: {path} (expected .yaml, .yml or .json)")]
    UnsupportedFormat { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Load by file extension.
pub fn load(path: &Path) -> ConfigResult<RunConfig> {
    match extension(path).as_deref() {
        Some("yaml" | "yml") => load_yaml(path),
        Some("json") => load_json(path),
        _ => Err(ConfigError::UnsupportedFormat {
            path: path.display().to_string(),
        }),
    }
}

pub fn load_yaml(path: &Path) -> ConfigResult<RunConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: RunConfig = serde_yaml::from_str(&content)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn load_json(path: &Path) -> ConfigResult<RunConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: RunConfig = serde_json::from_str(&content)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn save_yaml(path: &Path, config: &RunConfig) -> ConfigResult<()> {
    validate_config(config)?;
    let content = serde_yaml::to_string(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}
