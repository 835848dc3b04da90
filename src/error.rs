use thiserror::Error;

/// Errors surfaced by the analysis pipeline.
///
/// All variants are terminal for the current request: the caller reports
/// them and does not retry. The bounds table and the containment query are
/// separate calls, so one may fail while the other succeeds.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The provider returned no usable observations for the ticker/range.
    #[error("no price data returned for {ticker}")]
    NoData { ticker: String },

    /// Not enough history to derive the requested statistic.
    #[error("insufficient data: need {required} observations, have {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// A statistic was requested over zero eligible values.
    #[error("statistic requested over an empty distribution")]
    EmptyDistribution,

    /// Transport-level failure while talking to the price provider.
    #[error("provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered, but the payload was not usable.
    #[error("malformed provider response: {0}")]
    Decode(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}
