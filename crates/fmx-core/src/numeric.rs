//! Float helpers for clocks and event indicators.

use crate::FmuError;

/// Reject NaN and infinities handed in by the host.
pub fn ensure_finite(value: f64, what: &'static str) -> Result<f64, FmuError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(FmuError::NonFinite { what, value })
    }
}

/// Whether two clock readings denote the same instant.
///
/// Readings within a millionth of `step` are equal, so host-side time
/// accumulated in a different order still matches the model clock.
pub fn same_instant(a: f64, b: f64, step: f64) -> bool {
    (a - b).abs() <= step * 1e-6
}

/// True when an event indicator changed sign between two evaluations.
///
/// Zero counts as the non-negative side, so a value landing exactly on
/// zero from below is a crossing and leaving zero upwards is not.
pub fn sign_changed(before: f64, after: f64) -> bool {
    (before < 0.0) != (after < 0.0)
}

/// True when any indicator in two equally long snapshots changed sign.
pub fn any_sign_changed(before: &[f64], after: &[f64]) -> bool {
    before
        .iter()
        .zip(after)
        .any(|(&b, &a)| sign_changed(b, a))
}
