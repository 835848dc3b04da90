//! Empirical distribution summaries over a weekly-change sample.
//!
//! Pure functions; callers pass either the volatility-filtered set or the
//! full return series. Both operations refuse empty input instead of
//! letting a 0/0 or NaN escape.

use crate::error::AnalysisError;

/// One row of the symmetric-percentile bounds table.
///
/// `central_pct` is the central coverage (90 down to 10); the bounds are
/// rounded to two decimals at construction, which is display precision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundsRow {
    pub central_pct: u32,
    pub lower: f64,
    pub upper: f64,
}

/// Rounds to two decimal places.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Empirical quantile with linear interpolation between order statistics.
///
/// rank = p × (n − 1); the result interpolates between the floor and
/// ceiling ranked values. Input must be sorted ascending and non-empty.
fn quantile(sorted: &[f64], p: f64) -> f64 {
    if p <= 0.0 {
        return sorted[0];
    }
    if p >= 1.0 {
        return sorted[sorted.len() - 1];
    }

    let rank = p * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let w = rank - lo as f64;
        sorted[lo] * (1.0 - w) + sorted[hi] * w
    }
}

/// Symmetric-percentile bounds table: for each step s in {5, 10, ..., 45}
/// percent, the (s, 1−s) quantile pair labeled with its central coverage
/// round((1 − 2s/100) × 100). Nine rows, widest interval first.
pub fn bounds_table(values: &[f64]) -> Result<Vec<BoundsRow>, AnalysisError> {
    if values.is_empty() {
        return Err(AnalysisError::EmptyDistribution);
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mut rows = Vec::with_capacity(9);
    for step in (5..50).step_by(5) {
        let p = step as f64 / 100.0;
        rows.push(BoundsRow {
            central_pct: ((1.0 - 2.0 * p) * 100.0).round() as u32,
            lower: round2(quantile(&sorted, p)),
            upper: round2(quantile(&sorted, 1.0 - p)),
        });
    }
    Ok(rows)
}

/// Percentage of values falling inside `[lower, upper]`, inclusive.
///
/// `lower > upper` is a valid degenerate query and yields 0 (no value can
/// satisfy both ends); an empty sample is an error.
pub fn containment_percent(
    lower: f64,
    upper: f64,
    values: &[f64],
) -> Result<f64, AnalysisError> {
    if values.is_empty() {
        return Err(AnalysisError::EmptyDistribution);
    }
    let inside = values.iter().filter(|v| **v >= lower && **v <= upper).count();
    Ok(inside as f64 / values.len() as f64 * 100.0)
}
