//! Estimated one-rep-max (e1RM) from a working set.
//!
//! `e1RM = round(w * (1 + (reps + (10 - rpe)) / 30))`, where the RPE term
//! counts reps left in reserve as if they had been performed. A single rep at
//! RPE 10 *is* a max and returns the weight unchanged.

/// RPE assumed when a set carries none (or carries zero).
pub const DEFAULT_RPE: f64 = 10.0;

/// Top of the RPE scale (a true max effort).
pub const MAX_RPE: f64 = 10.0;

/// Divisor in the reps-in-reserve formula.
const REP_DIVISOR: f64 = 30.0;

/// Resolve the RPE used by the formula.
///
/// Absent, zero, or non-finite values fall back to [`DEFAULT_RPE`], so an
/// unrated set is treated as a max effort.
pub fn effective_rpe(rpe: Option<f64>) -> f64 {
    match rpe {
        Some(value) if value.is_finite() && value != 0.0 => value,
        _ => DEFAULT_RPE,
    }
}

/// Return `(weight, reps)` when both are present, finite and positive.
///
/// Anything else is excluded from e1RM and max aggregation.
pub fn valid_effort(weight: Option<f64>, reps: Option<f64>) -> Option<(f64, f64)> {
    match (weight, reps) {
        (Some(w), Some(r)) if w.is_finite() && r.is_finite() && w > 0.0 && r > 0.0 => {
            Some((w, r))
        }
        _ => None,
    }
}

/// Estimate a one-rep max from a lifted weight, completed reps and RPE.
pub fn estimate_one_rep_max(weight: f64, reps: f64, rpe: Option<f64>) -> f64 {
    let rpe = effective_rpe(rpe);
    if reps == 1.0 && rpe == MAX_RPE {
        return weight;
    }
    (weight * (1.0 + (reps + (MAX_RPE - rpe)) / REP_DIVISOR)).round()
}

/// Estimate from raw set inputs, returning `None` when the set is not valid
/// for aggregation.
pub fn estimate_from_inputs(
    weight: Option<f64>,
    reps: Option<f64>,
    rpe: Option<f64>,
) -> Option<f64> {
    valid_effort(weight, reps).map(|(w, r)| estimate_one_rep_max(w, r, rpe))
}
