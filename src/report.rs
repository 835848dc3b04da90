//! Plain-text rendering of analysis results.
//!
//! The core exposes numbers; everything user-facing about them lives
//! here. Numeric formatting is fixed at two decimals, matching the
//! rounding the bounds table applies.

use crate::session::{AnalysisSession, ContainmentComparison};
use crate::stats::BoundsRow;

/// One-paragraph summary of the session state after a fetch.
pub fn render_summary(session: &AnalysisSession) -> String {
    let band = session.band();
    let mut out = format!(
        "📈 {} — current price {:.2}, annualized volatility {:.2}%\n",
        session.ticker(),
        session.current_price(),
        session.current_volatility() * 100.0,
    );
    out.push_str(&format!(
        "Volatility band ({}σ): {:.2}% to {:.2}% — {} of {} weeks inside\n",
        session.num_std_devs(),
        band.lower * 100.0,
        band.upper * 100.0,
        session.filtered_returns().len(),
        session.all_returns().len(),
    ));
    out
}

/// The nine-row symmetric-percentile table.
///
/// Widest coverage first; bounds are percent weekly changes.
pub fn render_bounds_table(rows: &[BoundsRow]) -> String {
    let mut out = String::from("📊 Weekly-change bounds at current volatility\n```\n");
    out.push_str(&format!(
        "{:>9}  {:>10}  {:>10}\n",
        "Coverage", "Lower %", "Upper %"
    ));

    for row in rows {
        out.push_str(&format!(
            "{:>8}%  {:>10.2}  {:>10.2}\n",
            row.central_pct, row.lower, row.upper
        ));
    }

    out.push_str("```");
    out
}

/// Containment comparison in the shape of the result table the analysis
/// reports: unconditional vs volatility-conditioned, percent and dollar
/// ranges.
pub fn render_containment(c: &ContainmentComparison) -> String {
    let mut out = String::from("🎯 Weekly changes within custom bounds\n```\n");
    out.push_str(&format!(
        "{:<34} {:>10.2} to {:.2}\n",
        "Range (%)", c.lower, c.upper
    ));
    out.push_str(&format!(
        "{:<34} {:>10.2} to {:.2}\n",
        "Range ($)", c.dollar_lower, c.dollar_upper
    ));
    out.push_str(&format!(
        "{:<34} {:>13.2}%\n",
        "Within range (all weeks)", c.unconditional_pct
    ));
    out.push_str(&format!(
        "{:<34} {:>13.2}%\n",
        "Within range (current volatility)", c.conditioned_pct
    ));
    out.push_str("```");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_table_lists_every_row() {
        let rows: Vec<BoundsRow> = (1..=9)
            .map(|i| BoundsRow {
                central_pct: i * 10,
                lower: -(i as f64),
                upper: i as f64,
            })
            .collect();
        let text = render_bounds_table(&rows);

        for i in 1..=9 {
            assert!(text.contains(&format!("{}%", i * 10)));
        }
        assert!(text.contains("-9.00"));
        assert!(text.contains("9.00"));
    }

    #[test]
    fn containment_shows_both_percentages_and_dollar_range() {
        let c = ContainmentComparison {
            lower: -2.0,
            upper: 2.0,
            unconditional_pct: 64.21,
            conditioned_pct: 71.05,
            dollar_lower: 180.23,
            dollar_upper: 187.59,
        };
        let text = render_containment(&c);

        assert!(text.contains("-2.00 to 2.00"));
        assert!(text.contains("180.23 to 187.59"));
        assert!(text.contains("64.21%"));
        assert!(text.contains("71.05%"));
    }
}
