//! The stepping engine: gain updates, integration, saturation and cadence in a fixed
//! order, one step at a time.

use crate::cadence::OutputCadence;
use crate::discretize::Discretization;
use crate::error::{SimError, SimResult};
use crate::integrator::{ForwardEuler, Integrator, RK4, substeps_for};
use crate::model::ClosedLoopModel;
use crate::saturation::SaturationLimits;
use pl_controls::{
    AugVector, Augmentation, AugmentedSystem, ControllerGains, StabilityWarning,
    assess_stability, augment, state,
};
use pl_core::{Real, output_shaft_degrees};
use pl_plant::{LtiModel, PlantParameters, build};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// How the closed loop is advanced over one step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegratorType {
    /// Zero-order-hold discretization (default, exact for a held reference).
    #[default]
    Exact,
    /// 4th-order Runge-Kutta, sub-stepped to stay inside its stability region.
    Rk4,
    /// Forward Euler, sub-stepped likewise.
    ForwardEuler,
}

/// Lifecycle of an [`Engine`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Running,
    /// Terminal.
    Stopped,
}

/// Options for an engine run.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineOptions {
    /// Fixed integration step (seconds)
    pub dt: Real,
    /// Simulated time between telemetry samples (seconds)
    pub output_interval: Real,
    /// Initial pressure reference (bar)
    pub setpoint: Real,
    pub integrator: IntegratorType,
    pub limits: SaturationLimits,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self::documented(&PlantParameters::documented())
    }
}

impl EngineOptions {
    /// 10 ms steps, 100 ms output, the plant's nominal setpoint and its saturation limits.
    pub fn documented(params: &PlantParameters) -> Self {
        Self {
            dt: 0.01,
            output_interval: 0.1,
            setpoint: params.setpoint_bar,
            integrator: IntegratorType::default(),
            limits: SaturationLimits::documented(params),
        }
    }

    pub fn validate(&self) -> SimResult<()> {
        if !(self.dt > 0.0 && self.dt.is_finite()) {
            return Err(SimError::InvalidArg {
                what: "dt must be positive",
            });
        }
        if !self.setpoint.is_finite() {
            return Err(SimError::InvalidArg {
                what: "setpoint must be finite",
            });
        }
        OutputCadence::new(self.output_interval, self.dt)?;
        self.limits.validate()
    }
}

/// One telemetry sample in engineering units, before any display clamping.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    /// Simulated time (seconds)
    pub timestamp: Real,
    pub pressure: Real,
    /// Output shaft angle (degrees)
    pub valve_angle: Real,
    pub motor_current: Real,
    pub setpoint: Real,
}

/// Everything derived from one gain set. Replaced as a whole, never field by field.
#[derive(Clone, Debug)]
struct ActiveLoop {
    gains: ControllerGains,
    augmentation: Augmentation,
    stepper: Stepper,
    warning: Option<StabilityWarning>,
}

#[derive(Clone, Debug)]
enum Stepper {
    Exact(Discretization),
    Rk4 { substeps: usize },
    ForwardEuler { substeps: usize },
}

impl ActiveLoop {
    fn build(
        model: &LtiModel,
        gains: ControllerGains,
        dt: Real,
        integrator: IntegratorType,
    ) -> SimResult<Self> {
        let augmentation = augment(model, &gains)?;
        let system = &augmentation.system;
        if !system.a_cl().iter().chain(system.b_ref().iter()).all(|v| v.is_finite()) {
            return Err(SimError::InvalidArg {
                what: "closed-loop matrices overflow for these gains",
            });
        }
        let stepper = match integrator {
            IntegratorType::Exact => Stepper::Exact(Discretization::new(system, dt)?),
            IntegratorType::Rk4 => Stepper::Rk4 {
                substeps: substeps_for(system.a_cl(), dt, RK4::STABILITY_LIMIT)?,
            },
            IntegratorType::ForwardEuler => Stepper::ForwardEuler {
                substeps: substeps_for(system.a_cl(), dt, ForwardEuler::STABILITY_LIMIT)?,
            },
        };
        // Eigenvalues only once the matrices are known to be usable.
        let warning = assess_stability(&augmentation);
        Ok(Self {
            gains,
            augmentation,
            stepper,
            warning,
        })
    }

    fn advance(&self, t: Real, x: &AugVector, reference: Real, dt: Real) -> SimResult<AugVector> {
        match &self.stepper {
            Stepper::Exact(d) => Ok(d.advance(x, reference)),
            Stepper::Rk4 { substeps } => self.explicit(RK4, *substeps, t, x, reference, dt),
            Stepper::ForwardEuler { substeps } => {
                self.explicit(ForwardEuler, *substeps, t, x, reference, dt)
            }
        }
    }

    fn explicit<I: Integrator>(
        &self,
        integrator: I,
        substeps: usize,
        t: Real,
        x: &AugVector,
        reference: Real,
        dt: Real,
    ) -> SimResult<AugVector> {
        let mut model = ClosedLoopModel::new(&self.augmentation.system, reference);
        let h = dt / substeps as Real;
        let mut x = *x;
        for k in 0..substeps {
            x = integrator.step(&mut model, t + k as Real * h, &x, h)?;
        }
        Ok(x)
    }

    fn log_warning(&self) {
        if let Some(w) = &self.warning {
            let (kp, ki, kd) = self.gains.as_tuple();
            warn!(kp, ki, kd, "{w}; results for this gain set are not meaningful");
        }
    }
}

/// Fixed-step simulator of the PID-regulated pressure loop.
///
/// Every call to [`Engine::step`] runs the same cycle: apply a pending gain update,
/// integrate over one step, clamp the physical states, advance time, and report a
/// sample if the output interval has elapsed.
#[derive(Clone, Debug)]
pub struct Engine {
    model: LtiModel,
    gear_ratio: Real,
    options: EngineOptions,
    active: ActiveLoop,
    pending: Option<ControllerGains>,
    setpoint: Real,
    x: AugVector,
    t: Real,
    steps: u64,
    cadence: OutputCadence,
    last_sample: Option<Sample>,
    state: EngineState,
}

impl Engine {
    /// Build the plant and the initial closed loop. Fails before any stepping if the
    /// parameters, options or gains cannot produce a system.
    pub fn new(
        params: &PlantParameters,
        gains: ControllerGains,
        options: EngineOptions,
    ) -> SimResult<Self> {
        options.validate()?;
        let model = build(params)?;
        let active = ActiveLoop::build(&model, gains, options.dt, options.integrator)?;
        active.log_warning();
        let cadence = OutputCadence::new(options.output_interval, options.dt)?;

        Ok(Self {
            model,
            gear_ratio: params.gear_ratio,
            setpoint: options.setpoint,
            options,
            active,
            pending: None,
            x: AugVector::zeros(),
            t: 0.0,
            steps: 0,
            cadence,
            last_sample: None,
            state: EngineState::Idle,
        })
    }

    pub fn start(&mut self) -> SimResult<()> {
        match self.state {
            EngineState::Idle => {
                info!(
                    dt = self.options.dt,
                    output_interval = self.options.output_interval,
                    setpoint = self.setpoint,
                    integrator = ?self.options.integrator,
                    "engine started"
                );
                self.state = EngineState::Running;
                Ok(())
            }
            EngineState::Running => Ok(()),
            EngineState::Stopped => Err(SimError::InvalidArg {
                what: "engine is stopped",
            }),
        }
    }

    pub fn stop(&mut self) {
        if self.state != EngineState::Stopped {
            info!(t = self.t, steps = self.steps, "engine stopped");
            self.state = EngineState::Stopped;
        }
    }

    /// Queue a gain set for the next step boundary. A later request replaces an
    /// earlier one that has not been applied yet.
    pub fn request_gains(&mut self, gains: ControllerGains) {
        self.pending = Some(gains);
    }

    pub fn set_setpoint(&mut self, setpoint: Real) -> SimResult<()> {
        if !setpoint.is_finite() {
            return Err(SimError::InvalidArg {
                what: "setpoint must be finite",
            });
        }
        debug!(setpoint, "setpoint changed");
        self.setpoint = setpoint;
        Ok(())
    }

    /// Clear the integral-of-error state. The plant states are kept.
    pub fn reset_controller(&mut self) {
        debug!(integral = self.x[state::INTEGRAL], "controller reset");
        self.x[state::INTEGRAL] = 0.0;
    }

    /// Run one step cycle. Returns the telemetry sample when one is due.
    pub fn step(&mut self) -> SimResult<Option<Sample>> {
        if self.state != EngineState::Running {
            return Err(SimError::InvalidArg {
                what: "engine is not running",
            });
        }

        if let Some(gains) = self.pending.take() {
            self.apply_gains(gains);
        }

        let dt = self.options.dt;
        let mut x = self.active.advance(self.t, &self.x, self.setpoint, dt)?;
        self.options.limits.apply(&mut x);
        self.x = x;

        self.t += dt;
        self.steps += 1;

        if self.cadence.tick() {
            let sample = self.sample();
            self.last_sample = Some(sample);
            Ok(Some(sample))
        } else {
            Ok(None)
        }
    }

    fn apply_gains(&mut self, gains: ControllerGains) {
        match ActiveLoop::build(&self.model, gains, self.options.dt, self.options.integrator) {
            Ok(active) => {
                let (kp, ki, kd) = gains.as_tuple();
                info!(kp, ki, kd, t = self.t, "gains updated");
                active.log_warning();
                self.active = active;
            }
            Err(e) => {
                let (kp, ki, kd) = self.active.gains.as_tuple();
                warn!(error = %e, kp, ki, kd, "gain update rejected; keeping current gains");
            }
        }
    }

    /// Current state in telemetry form.
    pub fn sample(&self) -> Sample {
        Sample {
            timestamp: self.t,
            pressure: self.x[state::PRESSURE],
            valve_angle: output_shaft_degrees(self.x[state::POSITION], self.gear_ratio),
            motor_current: self.x[state::CURRENT],
            setpoint: self.setpoint,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn time(&self) -> Real {
        self.t
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Augmented state `[i, ω, θm, P, ∫e]`.
    pub fn x(&self) -> &AugVector {
        &self.x
    }

    pub fn setpoint(&self) -> Real {
        self.setpoint
    }

    pub fn gains(&self) -> ControllerGains {
        self.active.gains
    }

    pub fn pending_gains(&self) -> Option<ControllerGains> {
        self.pending
    }

    pub fn system(&self) -> &AugmentedSystem {
        &self.active.augmentation.system
    }

    pub fn augmentation(&self) -> &Augmentation {
        &self.active.augmentation
    }

    pub fn warning(&self) -> Option<StabilityWarning> {
        self.active.warning
    }

    pub fn model(&self) -> &LtiModel {
        &self.model
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn last_sample(&self) -> Option<Sample> {
        self.last_sample
    }
}
