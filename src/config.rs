//! Analysis settings
//!
//! Every key is optional. A missing key takes its default, so an empty file is a valid config.
//!
//! ```toml
//! history_days = 365
//! horizon = 14
//! selection = "aic"
//! confidence = "P99"
//! seed = 42
//! ```
use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    baseline::DEFAULT_WINDOW,
    error::{Error, Result},
    forecast::DEFAULT_HORIZON,
    score::Selection,
    statistics::Confidence,
};

/// Settings for one analysis pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Days of synthetic history to generate.
    #[serde(default = "default_history_days")]
    pub history_days: usize,

    /// Days to predict past the end of the history.
    #[serde(default = "default_horizon")]
    pub horizon: usize,

    /// Trailing window of the moving-average baseline.
    #[serde(default = "default_moving_average_window")]
    pub moving_average_window: usize,

    /// Relative change beyond which the trend is bullish or bearish.
    #[serde(default = "default_trend_threshold")]
    pub trend_threshold: f64,

    /// Volatility above which risk is at least medium.
    #[serde(default = "default_risk_medium")]
    pub risk_medium: f64,

    /// Volatility above which risk is high.
    #[serde(default = "default_risk_high")]
    pub risk_high: f64,

    /// Confidence level of the prediction bands.
    #[serde(default)]
    pub confidence: Confidence,

    /// How the forecasting model is chosen.
    #[serde(default)]
    pub selection: Selection,

    /// Fixed seed for the synthetic series. Unset means a new series every run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_history_days() -> usize {
    180
}
fn default_horizon() -> usize {
    DEFAULT_HORIZON
}
fn default_moving_average_window() -> usize {
    DEFAULT_WINDOW
}
fn default_trend_threshold() -> f64 {
    0.05
}
fn default_risk_medium() -> f64 {
    0.015
}
fn default_risk_high() -> f64 {
    0.03
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            history_days: default_history_days(),
            horizon: default_horizon(),
            moving_average_window: default_moving_average_window(),
            trend_threshold: default_trend_threshold(),
            risk_medium: default_risk_medium(),
            risk_high: default_risk_high(),
            confidence: Confidence::default(),
            selection: Selection::default(),
            seed: None,
        }
    }
}

impl AnalysisConfig {
    /// Reads a TOML config file and validates it.
    ///
    /// # Errors
    /// - [`Error::Io`] if the file cannot be read.
    /// - [`Error::Config`] if it is not valid TOML for this struct.
    /// - [`Error::InvalidConfig`] if a value is out of range.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: AnalysisConfig = toml::from_str(&content)?;
        config.validate()?;
        log::debug!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Checks that every value is usable.
    ///
    /// # Errors
    /// [`Error::InvalidConfig`] naming the first offending key.
    pub fn validate(&self) -> Result<()> {
        if self.history_days == 0 {
            return Err(Error::InvalidConfig("history_days must be at least 1".into()));
        }
        if self.moving_average_window == 0 {
            return Err(Error::InvalidConfig(
                "moving_average_window must be at least 1".into(),
            ));
        }
        if !(self.trend_threshold.is_finite() && self.trend_threshold >= 0.0) {
            return Err(Error::InvalidConfig(
                "trend_threshold must be a non-negative number".into(),
            ));
        }
        if !(self.risk_medium.is_finite() && self.risk_high.is_finite())
            || self.risk_medium < 0.0
            || self.risk_medium > self.risk_high
        {
            return Err(Error::InvalidConfig(
                "risk thresholds must satisfy 0 <= risk_medium <= risk_high".into(),
            ));
        }
        let z = self.confidence.z_score();
        if !(z.is_finite() && z >= 0.0) {
            return Err(Error::InvalidConfig(
                "confidence z-score must be a non-negative number".into(),
            ));
        }
        Ok(())
    }
}
