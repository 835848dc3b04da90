//! Per-request analysis state.
//!
//! One `AnalysisSession` owns every series derived from a fetched price
//! history. There is no process-wide state: re-running with different
//! parameters rebuilds the band and filter from the retained series
//! without refetching.

use crate::error::AnalysisError;
use crate::indicators::band::{self, VolatilityBand};
use crate::indicators::returns::weekly_changes;
use crate::indicators::vol::{DEFAULT_WINDOW, VolatilityEstimator};
use crate::models::PriceSeries;
use crate::stats::{self, BoundsRow};

/// Minimum price points for one volatility estimate (window + 1).
const MIN_POINTS: usize = DEFAULT_WINDOW + 1;

/// Containment of a percent range, conditioned and unconditioned, plus
/// the dollar levels the percent bounds map to at the current price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainmentComparison {
    pub lower: f64,
    pub upper: f64,
    /// Share of all weekly changes inside the range.
    pub unconditional_pct: f64,
    /// Share of weekly changes inside the range, restricted to weeks whose
    /// volatility was near the current level.
    pub conditioned_pct: f64,
    pub dollar_lower: f64,
    pub dollar_upper: f64,
}

/// All series derived from one fetched price history.
#[derive(Debug, Clone)]
pub struct AnalysisSession {
    prices: PriceSeries,
    returns: Vec<Option<f64>>,
    volatility: Vec<Option<f64>>,
    band: VolatilityBand,
    filtered: Vec<f64>,
    num_std_devs: f64,
    current_price: f64,
    current_volatility: f64,
}

impl AnalysisSession {
    /// Derives returns, volatility, band and filtered set from a price
    /// history.
    ///
    /// Fails with `InsufficientData` below four price points (no
    /// volatility estimate exists) and with `InvalidParameter` for a
    /// negative band multiplier.
    pub fn build(prices: PriceSeries, num_std_devs: f64) -> Result<Self, AnalysisError> {
        if prices.len() < MIN_POINTS {
            return Err(AnalysisError::InsufficientData {
                required: MIN_POINTS,
                actual: prices.len(),
            });
        }

        let returns = weekly_changes(prices.points());
        let volatility = VolatilityEstimator::default().estimate(prices.points());
        let band = band::band_around_current(&volatility, num_std_devs)?;
        let filtered = band::filter_returns(&returns, &volatility, &band);

        let current_volatility =
            band::latest_volatility(&volatility).ok_or(AnalysisError::InsufficientData {
                required: MIN_POINTS,
                actual: prices.len(),
            })?;
        let current_price = prices.last_close().ok_or(AnalysisError::NoData {
            ticker: prices.ticker().to_string(),
        })?;

        Ok(Self {
            prices,
            returns,
            volatility,
            band,
            filtered,
            num_std_devs,
            current_price,
            current_volatility,
        })
    }

    /// Same price history, new band multiplier. No refetch.
    pub fn with_num_std_devs(&self, num_std_devs: f64) -> Result<Self, AnalysisError> {
        let band = band::band_around_current(&self.volatility, num_std_devs)?;
        let filtered = band::filter_returns(&self.returns, &self.volatility, &band);
        Ok(Self {
            prices: self.prices.clone(),
            returns: self.returns.clone(),
            volatility: self.volatility.clone(),
            band,
            filtered,
            num_std_devs,
            current_price: self.current_price,
            current_volatility: self.current_volatility,
        })
    }

    pub fn ticker(&self) -> &str {
        self.prices.ticker()
    }

    pub fn prices(&self) -> &PriceSeries {
        &self.prices
    }

    pub fn band(&self) -> &VolatilityBand {
        &self.band
    }

    pub fn num_std_devs(&self) -> f64 {
        self.num_std_devs
    }

    /// Most recent unadjusted close.
    pub fn current_price(&self) -> f64 {
        self.current_price
    }

    /// Most recent non-absent annualized volatility.
    pub fn current_volatility(&self) -> f64 {
        self.current_volatility
    }

    /// Weekly changes whose volatility fell inside the band.
    pub fn filtered_returns(&self) -> &[f64] {
        &self.filtered
    }

    /// All defined weekly changes, unconditioned.
    pub fn all_returns(&self) -> Vec<f64> {
        self.returns.iter().flatten().copied().collect()
    }

    /// Symmetric-percentile bounds table over the filtered set.
    pub fn bounds_table(&self) -> Result<Vec<BoundsRow>, AnalysisError> {
        stats::bounds_table(&self.filtered)
    }

    /// Containment of `[lower, upper]` percent against both the filtered
    /// set and the full return series, with dollar conversion at the
    /// current price.
    pub fn containment(&self, lower: f64, upper: f64) -> Result<ContainmentComparison, AnalysisError> {
        let unconditional_pct = stats::containment_percent(lower, upper, &self.all_returns())?;
        let conditioned_pct = stats::containment_percent(lower, upper, &self.filtered)?;

        Ok(ContainmentComparison {
            lower,
            upper,
            unconditional_pct,
            conditioned_pct,
            dollar_lower: self.current_price * (1.0 + lower / 100.0),
            dollar_upper: self.current_price * (1.0 + upper / 100.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PricePoint;
    use chrono::NaiveDate;

    fn price_series(closes: &[f64]) -> PriceSeries {
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PricePoint {
                date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap() + chrono::Days::new(7 * i as u64),
                adj_close: c,
                close: c,
            })
            .collect();
        PriceSeries::new("TEST", points)
    }

    const SCENARIO: [f64; 8] = [100.0, 102.0, 101.0, 105.0, 103.0, 108.0, 107.0, 110.0];

    #[test]
    fn build_rejects_short_history() {
        let err = AnalysisSession::build(price_series(&[100.0, 101.0, 102.0]), 1.0).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::InsufficientData {
                required: 4,
                actual: 3
            }
        ));
    }

    #[test]
    fn scenario_series_derives_expected_shapes() {
        let session = AnalysisSession::build(price_series(&SCENARIO), 1.0).unwrap();

        assert_eq!(session.all_returns().len(), 7);
        assert_eq!(session.current_price(), 110.0);
        assert!(session.current_volatility() >= 0.0);

        let rows = session.bounds_table().unwrap();
        let labels: Vec<u32> = rows.iter().map(|r| r.central_pct).collect();
        assert_eq!(labels, vec![90, 80, 70, 60, 50, 40, 30, 20, 10]);
    }

    #[test]
    fn pipeline_is_bit_identical_across_runs() {
        let a = AnalysisSession::build(price_series(&SCENARIO), 1.0).unwrap();
        let b = AnalysisSession::build(price_series(&SCENARIO), 1.0).unwrap();

        assert_eq!(a.bounds_table().unwrap(), b.bounds_table().unwrap());
        assert_eq!(
            a.containment(-2.0, 2.0).unwrap(),
            b.containment(-2.0, 2.0).unwrap()
        );
        assert_eq!(a.band(), b.band());
        assert_eq!(a.filtered_returns(), b.filtered_returns());
    }

    #[test]
    fn containment_compares_filtered_against_full() {
        let session = AnalysisSession::build(price_series(&SCENARIO), 1.0).unwrap();
        let c = session.containment(-2.0, 2.0).unwrap();

        assert!(c.unconditional_pct >= 0.0 && c.unconditional_pct <= 100.0);
        assert!(c.conditioned_pct >= 0.0 && c.conditioned_pct <= 100.0);
        // Dollar levels derive from the current price.
        assert!((c.dollar_lower - 110.0 * 0.98).abs() < 1e-9);
        assert!((c.dollar_upper - 110.0 * 1.02).abs() < 1e-9);
    }

    #[test]
    fn reparameterizing_keeps_the_price_history() {
        let session = AnalysisSession::build(price_series(&SCENARIO), 1.0).unwrap();
        let narrow = session.with_num_std_devs(0.0).unwrap();

        assert_eq!(narrow.num_std_devs(), 0.0);
        assert_eq!(narrow.band().lower, narrow.band().upper);
        assert!(narrow.filtered_returns().len() <= session.filtered_returns().len());
        // The zero-width band still contains the current-volatility week.
        assert!(!narrow.filtered_returns().is_empty());
    }

    #[test]
    fn wider_band_never_shrinks_the_filtered_set() {
        let session = AnalysisSession::build(price_series(&SCENARIO), 0.5).unwrap();
        let wider = session.with_num_std_devs(2.0).unwrap();
        assert!(wider.filtered_returns().len() >= session.filtered_returns().len());
    }
}
