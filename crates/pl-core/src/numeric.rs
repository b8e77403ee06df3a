use crate::{CoreError, CoreResult};

/// Floating point type used throughout the loop.
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> CoreResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Finite and strictly positive. Used for divisors such as inductance and time constants.
pub fn ensure_positive(v: Real, what: &'static str) -> CoreResult<Real> {
    let v = ensure_finite(v, what)?;
    if v == 0.0 {
        return Err(CoreError::Zero { what });
    }
    if v < 0.0 {
        return Err(CoreError::NonPositive { what, value: v });
    }
    Ok(v)
}

/// Finite and not negative.
pub fn ensure_non_negative(v: Real, what: &'static str) -> CoreResult<Real> {
    let v = ensure_finite(v, what)?;
    if v < 0.0 {
        return Err(CoreError::NonPositive { what, value: v });
    }
    Ok(v)
}

/// Clamp into `[lo, hi]`. NaN maps to `lo` so a bad sample can never escape the band.
#[inline]
pub fn clamp_finite(v: Real, lo: Real, hi: Real) -> Real {
    if v.is_nan() { lo } else { v.clamp(lo, hi) }
}
