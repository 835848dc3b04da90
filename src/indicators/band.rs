use crate::common::rolling::sample_std;
use crate::error::AnalysisError;

/// Symmetric volatility band around the current level.
///
/// Invariant: `upper - lower == 2 × num_std_devs × std(volatility)` for
/// `num_std_devs ≥ 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolatilityBand {
    pub lower: f64,
    pub upper: f64,
}

impl VolatilityBand {
    /// Inclusive on both ends.
    pub fn contains(&self, v: f64) -> bool {
        v >= self.lower && v <= self.upper
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Most recent non-absent volatility value.
pub fn latest_volatility(volatility: &[Option<f64>]) -> Option<f64> {
    volatility.iter().rev().flatten().next().copied()
}

/// Builds the band `[current - k·std, current + k·std]`.
///
/// `current` is the most recent non-absent volatility value; `std` is the
/// sample standard deviation over all non-absent values (absent warm-up
/// entries are excluded, never zero-filled). A series with no usable value
/// fails with `InsufficientData`; a single usable value collapses the band
/// to a point, matching `num_std_devs = 0`.
pub fn band_around_current(
    volatility: &[Option<f64>],
    num_std_devs: f64,
) -> Result<VolatilityBand, AnalysisError> {
    if !(num_std_devs >= 0.0) {
        return Err(AnalysisError::InvalidParameter(format!(
            "num_std_devs must be >= 0, got {num_std_devs}"
        )));
    }

    let current = latest_volatility(volatility).ok_or(AnalysisError::InsufficientData {
        required: 1,
        actual: 0,
    })?;

    let observed: Vec<f64> = volatility.iter().flatten().copied().collect();
    let std = sample_std(&observed).unwrap_or(0.0);

    Ok(VolatilityBand {
        lower: current - num_std_devs * std,
        upper: current + num_std_devs * std,
    })
}

/// Restricts the return series to the indices whose volatility falls
/// inside the band.
///
/// An index is selected iff its volatility is non-absent and inside the
/// band (inclusive); order is preserved. Absent returns at selected
/// indices cannot occur in practice (volatility needs more warm-up than
/// returns) but are skipped rather than invented.
pub fn filter_returns(
    returns: &[Option<f64>],
    volatility: &[Option<f64>],
    band: &VolatilityBand,
) -> Vec<f64> {
    returns
        .iter()
        .zip(volatility)
        .filter_map(|(r, v)| match (r, v) {
            (Some(r), Some(v)) if band.contains(*v) => Some(*r),
            _ => None,
        })
        .collect()
}
