//! Offline analysis of a closed loop: poles, stability and step-response metrics.
//!
//! Nothing in here is needed to run the loop. The engine calls
//! [`assess_stability`] once per gain change so it can log a diagnosis.

use crate::augment::{Augmentation, AugmentedSystem, StabilityWarning};
use nalgebra::Complex;
use pl_core::{Real, Tolerances, nearly_equal};

/// Eigenvalues of A_cl.
pub fn closed_loop_poles(system: &AugmentedSystem) -> Vec<Complex<Real>> {
    system.a_cl().complex_eigenvalues().iter().copied().collect()
}

/// Largest real part over all closed-loop poles. Negative means asymptotically stable.
pub fn spectral_abscissa(system: &AugmentedSystem) -> Real {
    closed_loop_poles(system)
        .iter()
        .map(|p| p.re)
        .fold(Real::NEG_INFINITY, Real::max)
}

/// First problem found with an augmented loop, if any.
///
/// A degenerate derivative loop takes precedence over pole placement since the
/// poles of such a loop say little about the physical response.
pub fn assess_stability(aug: &Augmentation) -> Option<StabilityWarning> {
    if let Some(w) = aug.warning {
        return Some(w);
    }
    let real_part = spectral_abscissa(&aug.system);
    // Pure integrator poles sit on the axis numerically; anything past -1e-9 counts.
    if !real_part.is_finite() || real_part >= -1e-9 {
        return Some(StabilityWarning::UnstablePole { real_part });
    }
    None
}

/// Step-response figures extracted from sampled `(time, output)` pairs.
///
/// Percentages are relative to the step size `setpoint − y(0)`, so a response that
/// starts from zero and one that starts mid-range are judged alike.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepMetrics {
    /// Peak excursion past the setpoint, in percent of the step
    pub overshoot_pct: Real,
    /// Time from 10% to 90% of the step (seconds), if both were crossed
    pub rise_time: Option<Real>,
    /// Time after which the output stays within ±2% of the step (seconds)
    pub settling_time: Option<Real>,
    /// Setpoint minus the last sample
    pub steady_state_error: Real,
}

impl StepMetrics {
    const SETTLING_BAND: Real = 0.02;

    /// Returns `None` for an empty response or a zero-size step.
    pub fn from_response(samples: &[(Real, Real)], setpoint: Real) -> Option<Self> {
        let &(t0, y0) = samples.first()?;
        let &(_, y_last) = samples.last()?;
        let step = setpoint - y0;
        if !step.is_finite() || nearly_equal(setpoint, y0, Tolerances::default()) {
            return None;
        }

        // Normalized progress: 0 at the start, 1 at the setpoint.
        let progress: Vec<(Real, Real)> = samples
            .iter()
            .map(|&(t, y)| (t, (y - y0) / step))
            .collect();

        let peak = progress
            .iter()
            .map(|&(_, p)| p)
            .fold(Real::NEG_INFINITY, Real::max);
        let overshoot_pct = ((peak - 1.0) * 100.0).max(0.0);

        let rise_time = match (
            time_to_fraction(&progress, 0.1),
            time_to_fraction(&progress, 0.9),
        ) {
            (Some(t10), Some(t90)) => Some(t90 - t10),
            _ => None,
        };

        Some(Self {
            overshoot_pct,
            rise_time,
            settling_time: settling_time(&progress, t0, Self::SETTLING_BAND),
            steady_state_error: setpoint - y_last,
        })
    }
}

/// First time normalized progress reaches `fraction`, interpolated between samples.
fn time_to_fraction(progress: &[(Real, Real)], fraction: Real) -> Option<Real> {
    let i = progress.iter().position(|&(_, p)| p >= fraction)?;
    let (t, p) = progress[i];
    if i == 0 {
        return Some(t);
    }
    let (t_prev, p_prev) = progress[i - 1];
    let dp = p - p_prev;
    if dp.abs() > 1e-12 {
        Some(t_prev + (fraction - p_prev) / dp * (t - t_prev))
    } else {
        Some(t)
    }
}

/// First sample time after the last excursion outside `1 ± band`.
fn settling_time(progress: &[(Real, Real)], t0: Real, band: Real) -> Option<Real> {
    match progress.iter().rposition(|&(_, p)| (p - 1.0).abs() > band) {
        None => Some(t0),
        Some(i) => progress.get(i + 1).map(|&(t, _)| t),
    }
}
