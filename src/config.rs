use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::AnalysisError;
use crate::provider::DEFAULT_BASE_URL;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Analyzer defaults, overridable per run from the command line.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Ticker used when none is given on the command line.
    pub default_ticker: String,

    /// History start when no --start is given.
    pub start_date: NaiveDate,

    /// Volatility band half-width in standard deviations.
    pub num_std_devs: f64,

    pub provider: ProviderConfig,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            default_ticker: "AAPL".to_string(),
            start_date: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            num_std_devs: 1.0,
            provider: ProviderConfig::default(),
        }
    }
}

impl AnalyzerConfig {
    /// Loads 'config.yaml' from the current working directory; a missing
    /// file falls back to the built-in defaults.
    pub fn load() -> Result<Self, AnalysisError> {
        Self::load_from(Path::new("config.yaml"))
    }

    pub fn load_from(path: &Path) -> Result<Self, AnalysisError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let yaml = fs::read_to_string(path).map_err(|e| {
            AnalysisError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::parse(&yaml)
    }

    fn parse(yaml: &str) -> Result<Self, AnalysisError> {
        let config: AnalyzerConfig = serde_yaml::from_str(yaml)
            .map_err(|e| AnalysisError::Config(format!("failed to parse config: {e}")))?;

        if config.num_std_devs < 0.0 {
            return Err(AnalysisError::Config(
                "num_std_devs must be >= 0".to_string(),
            ));
        }
        if config.default_ticker.trim().is_empty() {
            return Err(AnalysisError::Config(
                "default_ticker must not be empty".to_string(),
            ));
        }
        Ok(config)
    }
}
