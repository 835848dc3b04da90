// src/lib.rs

pub mod common;
pub mod config;
pub mod error;
pub mod indicators;
pub mod models;
pub mod provider;
pub mod report;
pub mod session;
pub mod stats;

use chrono::NaiveDate;
use tracing::info;

use crate::error::AnalysisError;
use crate::provider::PriceSeriesProvider;
use crate::session::AnalysisSession;

/// Parameters for one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Volatility band half-width in standard deviations (≥ 0).
    pub num_std_devs: f64,
}

/// Fetches the weekly price history and derives the session state every
/// query runs against.
///
/// The fetch is the only suspension point; everything downstream of it is
/// synchronous and deterministic, so callers re-query the returned session
/// with different parameters without going back to the provider.
pub async fn run_analysis(
    provider: &PriceSeriesProvider,
    request: &AnalysisRequest,
) -> Result<AnalysisSession, AnalysisError> {
    let prices = provider
        .fetch_weekly(&request.ticker, request.start, request.end)
        .await?;

    let session = AnalysisSession::build(prices, request.num_std_devs)?;

    info!(
        "📊 {} ready: {} weekly points, band {:.2}%–{:.2}%, {} in-band weeks",
        session.ticker(),
        session.prices().len(),
        session.band().lower * 100.0,
        session.band().upper * 100.0,
        session.filtered_returns().len(),
    );
    Ok(session)
}
