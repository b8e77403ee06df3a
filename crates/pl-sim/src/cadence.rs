//! Output cadence driven by accumulated simulated time.

use crate::error::{SimError, SimResult};
use pl_core::Real;

/// Decides which integration steps emit a telemetry sample.
///
/// Elapsed time is accumulated in floating point and the interval is subtracted on
/// each emission, so the remainder carries over and the cadence does not drift when
/// the interval is not an exact multiple of the step. Half a step of slack absorbs
/// rounding in the accumulator.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputCadence {
    interval: Real,
    dt: Real,
    elapsed: Real,
}

impl OutputCadence {
    pub fn new(interval: Real, dt: Real) -> SimResult<Self> {
        if !(dt > 0.0 && dt.is_finite()) {
            return Err(SimError::InvalidArg {
                what: "dt must be positive",
            });
        }
        if !(interval.is_finite() && interval >= dt) {
            return Err(SimError::InvalidArg {
                what: "output interval must be at least one step",
            });
        }
        Ok(Self {
            interval,
            dt,
            elapsed: 0.0,
        })
    }

    pub fn interval(&self) -> Real {
        self.interval
    }

    /// Record one completed step. Returns `true` when a sample is due.
    pub fn tick(&mut self) -> bool {
        self.elapsed += self.dt;
        if self.elapsed + 0.5 * self.dt >= self.interval {
            self.elapsed -= self.interval;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }
}
