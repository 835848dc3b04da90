//! Weekly price history fetch.
//!
//! Resolves a ticker and date range to a `PriceSeries` via the Yahoo
//! Finance v8 chart endpoint, requesting one observation per week. The
//! HTTP layer is the only suspension point in an analysis run; the core
//! imposes no timeout or retry policy of its own.

use chrono::{DateTime, NaiveDate, NaiveTime};
use tracing::info;

use crate::error::AnalysisError;
use crate::models::{ChartResponse, PricePoint, PriceSeries};

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

pub struct PriceSeriesProvider {
    client: reqwest::Client,
    base_url: String,
}

impl PriceSeriesProvider {
    pub fn new(base_url: impl Into<String>) -> Result<Self, AnalysisError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("volatility_analyzer/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Tickers are free-form user input; the provider wants them uppercase.
    pub fn normalize_ticker(raw: &str) -> String {
        raw.trim().to_uppercase()
    }

    /// Fetches the weekly-sampled history for `[start, end]`.
    pub async fn fetch_weekly(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, AnalysisError> {
        let symbol = Self::normalize_ticker(ticker);
        let period1 = start.and_time(NaiveTime::MIN).and_utc().timestamp();
        let period2 = end.and_time(NaiveTime::MIN).and_utc().timestamp();

        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", "1wk".to_string()),
                ("events", "div,split".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let payload: ChartResponse = response.json().await?;
        let series = series_from_chart(&symbol, payload)?;

        info!(
            "✅ Fetched {} weekly observations for {} ({} → {})",
            series.len(),
            symbol,
            start,
            end
        );
        Ok(series)
    }
}

/// Converts a chart payload into a clean `PriceSeries`.
///
/// Weeks with a null or non-positive close are dropped (the venue reports
/// gaps as null; a zero price would put NaN into the log-return math);
/// missing adjusted closes fall back to the raw close. The result is
/// sorted ascending with duplicate dates removed.
pub fn series_from_chart(
    ticker: &str,
    payload: ChartResponse,
) -> Result<PriceSeries, AnalysisError> {
    // Unknown symbols and empty ranges come back as an in-band error
    // object rather than an HTTP failure.
    if let Some(err) = payload.chart.error {
        tracing::warn!("provider error for {}: {} ({})", ticker, err.description, err.code);
        return Err(AnalysisError::NoData {
            ticker: ticker.to_string(),
        });
    }

    let result = payload
        .chart
        .result
        .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
        .ok_or_else(|| AnalysisError::NoData {
            ticker: ticker.to_string(),
        })?;

    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|q| q.close)
        .unwrap_or_default();
    let adj_closes = result
        .indicators
        .adjclose
        .and_then(|blocks| blocks.into_iter().next())
        .map(|a| a.adjclose)
        .unwrap_or_default();

    let mut points = Vec::with_capacity(result.timestamp.len());
    for (i, ts) in result.timestamp.iter().enumerate() {
        let close = closes.get(i).copied().flatten();
        let adj_close = adj_closes.get(i).copied().flatten().or(close);
        if let (Some(close), Some(adj_close)) = (close, adj_close) {
            if close <= 0.0 || adj_close <= 0.0 {
                continue;
            }
            let date = DateTime::from_timestamp(*ts, 0)
                .ok_or_else(|| AnalysisError::Decode(format!("timestamp {ts} out of range")))?
                .date_naive();
            points.push(PricePoint {
                date,
                adj_close,
                close,
            });
        }
    }

    points.sort_by_key(|p| p.date);
    points.dedup_by_key(|p| p.date);

    if points.is_empty() {
        return Err(AnalysisError::NoData {
            ticker: ticker.to_string(),
        });
    }
    Ok(PriceSeries::new(ticker, points))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> ChartResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn normalization_uppercases_and_trims() {
        assert_eq!(PriceSeriesProvider::normalize_ticker(" aapl "), "AAPL");
        assert_eq!(PriceSeriesProvider::normalize_ticker("Brk-b"), "BRK-B");
    }

    #[test]
    fn payload_with_prices_becomes_a_series() {
        // Two Mondays a week apart: 2024-01-01 and 2024-01-08.
        let payload = decode(
            r#"{"chart":{"result":[{"timestamp":[1704067200,1704672000],
                "indicators":{"quote":[{"close":[100.0,102.0]}],
                              "adjclose":[{"adjclose":[99.0,101.0]}]}}],
                "error":null}}"#,
        );
        let series = series_from_chart("AAPL", payload).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.ticker(), "AAPL");
        let p = series.points();
        assert_eq!(p[0].date.to_string(), "2024-01-01");
        assert_eq!(p[0].adj_close, 99.0);
        assert_eq!(p[0].close, 100.0);
        assert!(p[0].date < p[1].date);
    }

    #[test]
    fn null_weeks_are_dropped() {
        let payload = decode(
            r#"{"chart":{"result":[{"timestamp":[1704067200,1704672000,1705276800],
                "indicators":{"quote":[{"close":[100.0,null,104.0]}],
                              "adjclose":[{"adjclose":[100.0,null,104.0]}]}}],
                "error":null}}"#,
        );
        let series = series_from_chart("MSFT", payload).unwrap();
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn non_positive_prices_are_dropped() {
        let payload = decode(
            r#"{"chart":{"result":[{"timestamp":[1704067200,1704672000],
                "indicators":{"quote":[{"close":[0.0,104.0]}],
                              "adjclose":[{"adjclose":[0.0,104.0]}]}}],
                "error":null}}"#,
        );
        let series = series_from_chart("PENNY", payload).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.points()[0].close, 104.0);
    }

    #[test]
    fn missing_adjclose_falls_back_to_close() {
        let payload = decode(
            r#"{"chart":{"result":[{"timestamp":[1704067200],
                "indicators":{"quote":[{"close":[100.0]}]}}],
                "error":null}}"#,
        );
        let series = series_from_chart("XYZ", payload).unwrap();
        assert_eq!(series.points()[0].adj_close, 100.0);
    }

    #[test]
    fn empty_result_is_no_data() {
        let payload = decode(r#"{"chart":{"result":[],"error":null}}"#);
        assert!(matches!(
            series_from_chart("NOPE", payload),
            Err(AnalysisError::NoData { .. })
        ));

        let payload = decode(r#"{"chart":{"result":null,"error":null}}"#);
        assert!(matches!(
            series_from_chart("NOPE", payload),
            Err(AnalysisError::NoData { .. })
        ));
    }

    #[test]
    fn all_null_prices_is_no_data() {
        let payload = decode(
            r#"{"chart":{"result":[{"timestamp":[1704067200],
                "indicators":{"quote":[{"close":[null]}],
                              "adjclose":[{"adjclose":[null]}]}}],
                "error":null}}"#,
        );
        assert!(matches!(
            series_from_chart("GME", payload),
            Err(AnalysisError::NoData { .. })
        ));
    }

    #[test]
    fn inband_api_error_is_no_data() {
        let payload = decode(
            r#"{"chart":{"result":null,
                "error":{"code":"Not Found","description":"No data found"}}}"#,
        );
        let err = series_from_chart("??", payload).unwrap_err();
        assert!(matches!(err, AnalysisError::NoData { .. }));
    }
}
