//! Price history data model and provider wire format.
//!
//! The provider speaks the Yahoo Finance v8 chart API; the structs below
//! mirror the JSON payload shape and are deserialized with serde. The
//! cleaned-up form handed to the analytics is `PriceSeries`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One weekly price observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    /// Split- and dividend-adjusted close; input to all return statistics.
    pub adj_close: f64,
    /// Raw close, used only for dollar-level conversion of percent bounds.
    pub close: f64,
}

/// Ordered weekly price history for one ticker.
///
/// Ascending by date, one observation per week, no duplicate dates.
/// Immutable once fetched; every derived series is recomputed from it.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    ticker: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(ticker: impl Into<String>, points: Vec<PricePoint>) -> Self {
        Self {
            ticker: ticker.into(),
            points,
        }
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Most recent unadjusted close.
    pub fn last_close(&self) -> Option<f64> {
        self.points.last().map(|p| p.close)
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }
}

// --- Chart API payload ---
//
// Abridged response shape:
// {"chart":{"result":[{"timestamp":[...],
//                      "indicators":{"quote":[{"close":[...]}],
//                                    "adjclose":[{"adjclose":[...]}]}}],
//           "error":null}}
// Price arrays are index-aligned with "timestamp" and use null for weeks
// the venue reports no data, hence Vec<Option<f64>>.

#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Debug, Deserialize)]
pub struct Chart {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartError>,
}

/// Error object the API returns in-band (e.g. unknown symbol).
#[derive(Debug, Deserialize)]
pub struct ChartError {
    pub code: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct ChartResult {
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: Indicators,
}

#[derive(Debug, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<QuoteBlock>,
    /// Absent for symbols without adjusted-close history.
    pub adjclose: Option<Vec<AdjCloseBlock>>,
}

#[derive(Debug, Deserialize)]
pub struct QuoteBlock {
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
pub struct AdjCloseBlock {
    #[serde(default)]
    pub adjclose: Vec<Option<f64>>,
}
