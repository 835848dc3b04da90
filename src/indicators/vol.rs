use crate::common::rolling::RollingWindow;
use crate::models::PricePoint;

/// Annualization factor for weekly sampling.
pub const WEEKS_PER_YEAR: f64 = 52.0;

/// Trailing log-return window for the rolling standard deviation.
pub const DEFAULT_WINDOW: usize = 3;

/// Computes rolling annualized volatility from weekly adjusted closes.
///
/// Log-returns are the input: ln(adj_close[i] / adj_close[i-1]), defined
/// from index 1. The estimate at index i is the sample standard deviation
/// of the trailing `window` log-returns (current one included) scaled by
/// √52. Positions with fewer than `window` available log-returns are
/// `None`, so the first `window` entries of the output are always absent.
pub struct VolatilityEstimator {
    window: usize,
}

impl VolatilityEstimator {
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    /// One output entry per input point, aligned by index.
    ///
    /// Deterministic; fewer than `window + 1` price points yields an
    /// all-absent series.
    pub fn estimate(&self, prices: &[PricePoint]) -> Vec<Option<f64>> {
        let mut out = vec![None; prices.len()];
        let mut window = RollingWindow::new(self.window);

        for i in 1..prices.len() {
            let log_return = (prices[i].adj_close / prices[i - 1].adj_close).ln();
            window.push(log_return);

            if window.is_full() {
                if let Some(std) = window.sample_std() {
                    out[i] = Some(std * WEEKS_PER_YEAR.sqrt());
                }
            }
        }

        out
    }
}

impl Default for VolatilityEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}
