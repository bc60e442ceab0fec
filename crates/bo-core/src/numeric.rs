//! Scalar checks shared by the simulator crates.

use crate::{BoError, BoResult};

pub fn ensure_finite(v: f64, what: &'static str) -> BoResult<f64> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(BoError::NonFinite { what, value: v })
    }
}

/// Finite and strictly positive (step sizes, times, cell sizes).
pub fn ensure_positive(v: f64, what: &'static str) -> BoResult<f64> {
    if ensure_finite(v, what)? > 0.0 {
        Ok(v)
    } else {
        Err(BoError::OutOfRange { what, value: v })
    }
}

/// Finite and `>= 0` (pressures, permeabilities).
pub fn ensure_non_negative(v: f64, what: &'static str) -> BoResult<f64> {
    if ensure_finite(v, what)? >= 0.0 {
        Ok(v)
    } else {
        Err(BoError::OutOfRange { what, value: v })
    }
}

/// Ratio `num / den` that treats an empty denominator as "nothing to divide".
///
/// Returns `None` when `den` is zero or non-finite.
pub fn checked_ratio(num: f64, den: f64) -> Option<f64> {
    if den == 0.0 || !den.is_finite() {
        None
    } else {
        Some(num / den)
    }
}
