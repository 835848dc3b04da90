use crate::models::PricePoint;

/// Percent weekly change series, aligned by index with the price series.
///
/// weekly_change[i] = (adj_close[i] / adj_close[i-1] - 1) × 100 for i ≥ 1.
/// Index 0 has no prior observation and is `None`; absent entries never
/// enter downstream statistics.
pub fn weekly_changes(prices: &[PricePoint]) -> Vec<Option<f64>> {
    let mut out = vec![None; prices.len()];
    for i in 1..prices.len() {
        out[i] = Some((prices[i].adj_close / prices[i - 1].adj_close - 1.0) * 100.0);
    }
    out
}
