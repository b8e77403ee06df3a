//! Configuration schema.

use pl_controls::ControllerGains;
use pl_plant::PlantParameters;
use pl_sim::{EngineOptions, IntegratorType, SaturationLimits};
use pl_telemetry::{Pacing, SessionOptions};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub plant: PlantParameters,
    pub controller: ControllerGains,
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PacingMode {
    RealTime,
    #[default]
    Yield,
    Free,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub dt_s: f64,
    pub output_interval_s: f64,
    /// Defaults to the plant's nominal setpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setpoint_bar: Option<f64>,
    pub integrator: IntegratorType,
    pub pacing: PacingMode,
    pub yield_micros: u64,
    /// Simulated seconds; unset runs until stopped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_s: Option<f64>,
    pub start_idle: bool,
    /// Defaults to the limits derived from the plant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limits: Option<SaturationLimits>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dt_s: 0.01,
            output_interval_s: 0.1,
            setpoint_bar: None,
            integrator: IntegratorType::default(),
            pacing: PacingMode::default(),
            yield_micros: 1000,
            duration_s: None,
            start_idle: false,
            limits: None,
        }
    }
}

impl RunConfig {
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            dt: self.engine.dt_s,
            output_interval: self.engine.output_interval_s,
            setpoint: self.engine.setpoint_bar.unwrap_or(self.plant.setpoint_bar),
            integrator: self.engine.integrator,
            limits: self
                .engine
                .limits
                .unwrap_or_else(|| SaturationLimits::documented(&self.plant)),
        }
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            pacing: match self.engine.pacing {
                PacingMode::RealTime => Pacing::RealTime,
                PacingMode::Yield => Pacing::Yield {
                    micros: self.engine.yield_micros,
                },
                PacingMode::Free => Pacing::Free,
            },
            duration: self.engine.duration_s,
            start_idle: self.engine.start_idle,
        }
    }
}
