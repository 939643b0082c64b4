//! End-to-end analysis of one price series
//!
//! [`analyze`] fits both regression models, chooses one, forecasts with it, and labels the outlook:
//! 1. Fit [`crate::LinearFit`] and [`crate::QuadraticFit`] against the day index.
//! 2. Score both in-sample and keep the better one according to [`Selection`].
//! 3. Predict the configured horizon with the chosen model.
//! 4. Classify the [`Trend`] from the predicted change and the [`RiskLevel`] from volatility.
//! 5. Tabulate both models next to the moving-average baseline.
//!
//! [`run`] does the same for a freshly generated synthetic series.
use serde::{Deserialize, Serialize};

use crate::{
    baseline,
    config::AnalysisConfig,
    error::Result,
    fit::{Model, ModelKind, Predictor},
    forecast::{self, PredictionPoint},
    score::Selection,
    series::{Observation, SeriesExt},
    statistics::{self, ModelMetrics},
    synthetic::SeriesGenerator,
};

/// Direction of the predicted price movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    /// Predicted to rise by more than the threshold.
    Bullish,

    /// Predicted to fall by more than the threshold.
    Bearish,

    /// Predicted to stay within the threshold.
    Neutral,
}

impl Trend {
    /// Classifies a relative change, e.g. `0.08` for +8%.
    ///
    /// The threshold itself counts as neutral.
    #[must_use]
    pub fn classify(change: f64, threshold: f64) -> Self {
        if change > threshold {
            Trend::Bullish
        } else if change < -threshold {
            Trend::Bearish
        } else {
            Trend::Neutral
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trend::Bullish => write!(f, "bullish"),
            Trend::Bearish => write!(f, "bearish"),
            Trend::Neutral => write!(f, "neutral"),
        }
    }
}

/// How erratic the historical prices are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Volatility at or below the medium threshold.
    Low,

    /// Volatility above the medium threshold.
    Medium,

    /// Volatility above the high threshold.
    High,
}

impl RiskLevel {
    /// Classifies a volatility, see [`statistics::volatility`].
    #[must_use]
    pub fn classify(volatility: f64, medium: f64, high: f64) -> Self {
        if volatility > high {
            RiskLevel::High
        } else if volatility > medium {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
        }
    }
}

/// Everything produced for one symbol by a single analysis pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionBundle {
    /// Ticker symbol.
    pub symbol: String,

    /// The input series.
    pub historical: Vec<Observation>,

    /// Forward predictions of the chosen model.
    pub predictions: Vec<PredictionPoint>,

    /// In-sample metrics of the chosen model.
    pub metrics: ModelMetrics,

    /// The chosen model.
    pub model: Model,

    /// Predicted direction.
    pub trend: Trend,

    /// Historical volatility class.
    pub risk_level: RiskLevel,
}

impl PredictionBundle {
    /// Last observed price.
    #[must_use]
    pub fn current_price(&self) -> Option<f64> {
        self.historical.latest().map(|o| o.price)
    }

    /// The furthest prediction.
    #[must_use]
    pub fn final_prediction(&self) -> Option<&PredictionPoint> {
        self.predictions.last()
    }

    /// Absolute change from the current price to the furthest prediction.
    #[must_use]
    pub fn price_change(&self) -> Option<f64> {
        Some(self.final_prediction()?.predicted_price - self.current_price()?)
    }

    /// Relative change from the current price to the furthest prediction, e.g. `0.05` for +5%.
    ///
    /// `None` when there are no predictions or the current price is zero.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn relative_change(&self) -> Option<f64> {
        let current = self.current_price()?;
        if current == 0.0 {
            return None;
        }
        Some(self.price_change()? / current)
    }
}

/// One row of the model comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelComparison {
    /// Display name.
    pub name: String,

    /// The regression kind, or `None` for the moving-average baseline.
    pub kind: Option<ModelKind>,

    /// In-sample metrics.
    pub metrics: ModelMetrics,
}

impl ModelComparison {
    /// The row with the highest R². The earliest row wins a tie.
    #[must_use]
    pub fn best(rows: &[ModelComparison]) -> Option<&ModelComparison> {
        rows.iter().reduce(|best, row| {
            if row.metrics.r_squared > best.metrics.r_squared {
                row
            } else {
                best
            }
        })
    }
}

/// Result of [`analyze`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// The chosen model's forecast and labels.
    pub bundle: PredictionBundle,

    /// Every model compared, regression models first.
    pub comparison: Vec<ModelComparison>,
}

/// A fitted model alongside its in-sample fit.
struct Candidate {
    model: Model,
    fitted: Vec<f64>,
    metrics: ModelMetrics,
}

impl Candidate {
    fn fit(kind: ModelKind, xs: &[f64], ys: &[f64]) -> Result<Self> {
        let model = kind.fit(xs, ys)?;
        let fitted = model.fitted(xs);
        let metrics = statistics::calculate_metrics(ys, &fitted)?;
        Ok(Self {
            model,
            fitted,
            metrics,
        })
    }

    fn score(&self, selection: Selection, ys: &[f64]) -> f64 {
        selection.score(ys, &self.fitted, self.model.parameter_count())
    }

    fn comparison(&self) -> ModelComparison {
        let kind = self.model.kind();
        ModelComparison {
            name: kind.name().to_string(),
            kind: Some(kind),
            metrics: self.metrics,
        }
    }
}

/// Analyzes an existing series.
///
/// The linear model is only chosen when it scores strictly better than the quadratic one.
///
/// # Errors
/// - [`crate::error::Error::InvalidConfig`] if `config` does not validate.
/// - [`crate::error::Error::NoData`] if the series is empty.
/// - [`crate::error::Error::Degenerate`] if the series has a single observation.
///
/// # Example
/// ```rust
/// # use chrono::{Days, NaiveDate};
/// # use stockfit::{analysis::{analyze, Trend}, AnalysisConfig, Observation};
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let series: Vec<_> = (0..60u32)
///     .map(|i| Observation::new(start + Days::new(i.into()), 100.0 + f64::from(i)))
///     .collect();
///
/// let analysis = analyze("DEMO", &series, &AnalysisConfig::default()).unwrap();
/// assert_eq!(analysis.bundle.predictions.len(), 30);
/// assert_eq!(analysis.bundle.trend, Trend::Bullish);
/// ```
pub fn analyze(symbol: &str, series: &[Observation], config: &AnalysisConfig) -> Result<Analysis> {
    config.validate()?;

    let xs = series.indices();
    let ys = series.prices();

    let linear = Candidate::fit(ModelKind::Linear, &xs, &ys)?;
    let quadratic = Candidate::fit(ModelKind::Quadratic, &xs, &ys)?;

    let linear_score = linear.score(config.selection, &ys);
    let quadratic_score = quadratic.score(config.selection, &ys);
    let chosen = if linear_score < quadratic_score {
        &linear
    } else {
        &quadratic
    };
    log::debug!(
        "{symbol}: {} chosen by {} (linear {linear_score:.4}, quadratic {quadratic_score:.4})",
        chosen.model.kind(),
        config.selection,
    );

    let predictions = forecast::generate_predictions_with(
        series,
        &chosen.model,
        config.horizon,
        config.confidence,
    )?;

    let mut bundle = PredictionBundle {
        symbol: symbol.to_string(),
        historical: series.to_vec(),
        predictions,
        metrics: chosen.metrics,
        model: chosen.model,
        trend: Trend::Neutral,
        risk_level: RiskLevel::classify(
            statistics::volatility(ys.iter().copied()),
            config.risk_medium,
            config.risk_high,
        ),
    };
    if let Some(change) = bundle.relative_change() {
        bundle.trend = Trend::classify(change, config.trend_threshold);
    }

    let baseline = baseline::moving_average_fitted(series, config.moving_average_window)?;
    let comparison = vec![
        linear.comparison(),
        quadratic.comparison(),
        ModelComparison {
            name: "Moving Average".to_string(),
            kind: None,
            metrics: statistics::calculate_metrics(&ys, &baseline)?,
        },
    ];

    log::debug!(
        "{symbol}: trend {}, risk {}, R² {:.4}",
        bundle.trend,
        bundle.risk_level,
        bundle.metrics.r_squared
    );
    Ok(Analysis { bundle, comparison })
}

/// Generates a synthetic series for `symbol` and analyzes it.
///
/// # Errors
/// See [`analyze`] and [`SeriesGenerator::generate`].
pub fn run(symbol: &str, config: &AnalysisConfig) -> Result<Analysis> {
    config.validate()?;
    let series = SeriesGenerator::new(config.seed).generate(symbol, config.history_days)?;
    analyze(symbol, &series, config)
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use chrono::{Days, NaiveDate};

    use super::*;
    use crate::{assert_close, error::Error};

    fn series(prices: impl IntoIterator<Item = f64>) -> Vec<Observation> {
        let start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        prices
            .into_iter()
            .enumerate()
            .map(|(i, p)| Observation::new(start + Days::new(i as u64), p))
            .collect()
    }

    #[test]
    fn trend_thresholds() {
        assert_eq!(Trend::classify(0.06, 0.05), Trend::Bullish);
        assert_eq!(Trend::classify(-0.06, 0.05), Trend::Bearish);
        assert_eq!(Trend::classify(0.05, 0.05), Trend::Neutral);
        assert_eq!(Trend::classify(-0.05, 0.05), Trend::Neutral);
        assert_eq!(Trend::classify(0.0, 0.05), Trend::Neutral);
    }

    #[test]
    fn risk_thresholds() {
        assert_eq!(RiskLevel::classify(0.031, 0.015, 0.03), RiskLevel::High);
        assert_eq!(RiskLevel::classify(0.03, 0.015, 0.03), RiskLevel::Medium);
        assert_eq!(RiskLevel::classify(0.016, 0.015, 0.03), RiskLevel::Medium);
        assert_eq!(RiskLevel::classify(0.015, 0.015, 0.03), RiskLevel::Low);
        assert!(RiskLevel::High > RiskLevel::Low);
    }

    #[test]
    fn exact_tie_prefers_quadratic() {
        // Small integer sums keep both fits exact, so R² ties at exactly 1
        let s = series([10.0, 11.0, 12.0]);
        let analysis = analyze("LINE", &s, &AnalysisConfig::default()).unwrap();

        assert_eq!(analysis.bundle.model.kind(), ModelKind::Quadratic);
        assert_eq!(analysis.comparison[0].metrics.r_squared, 1.0);
        assert_eq!(analysis.comparison[1].metrics.r_squared, 1.0);
        assert_close!(analysis.bundle.predictions[0].predicted_price, 13.0);
    }

    #[test]
    fn curved_series_uses_quadratic() {
        let s = series((0..60).map(|i| 200.0 - 0.01 * f64::from(i * i)));
        let analysis = analyze("CURVE", &s, &AnalysisConfig::default()).unwrap();

        assert_eq!(analysis.bundle.model.kind(), ModelKind::Quadratic);
        assert!(analysis.comparison[1].metrics.r_squared > analysis.comparison[0].metrics.r_squared);
        assert_eq!(analysis.bundle.trend, Trend::Bearish);
        assert_eq!(analysis.bundle.risk_level, RiskLevel::Low);
    }

    #[test]
    fn information_criteria_can_choose_linear() {
        // Alternating noise around a line: the quadratic term buys almost nothing
        let s = series((0..100).map(|i| {
            let noise = if i % 2 == 0 { 3.0 } else { -3.0 };
            100.0 + 0.1 * f64::from(i) + noise
        }));
        let config = AnalysisConfig {
            selection: Selection::Bic,
            ..AnalysisConfig::default()
        };
        let analysis = analyze("NOISY", &s, &config).unwrap();
        assert_eq!(analysis.bundle.model.kind(), ModelKind::Linear);
        assert_eq!(analysis.bundle.risk_level, RiskLevel::High);
    }

    #[test]
    fn flat_series_is_neutral() {
        let s = series(std::iter::repeat(25.0).take(30));
        let analysis = analyze("FLAT", &s, &AnalysisConfig::default()).unwrap();

        assert_eq!(analysis.bundle.trend, Trend::Neutral);
        assert_eq!(analysis.bundle.risk_level, RiskLevel::Low);
        assert_eq!(analysis.bundle.metrics.r_squared, 1.0);
        for row in &analysis.comparison {
            assert_eq!(row.metrics.accuracy, 100.0);
        }
    }

    #[test]
    fn comparison_rows() {
        let s = series((0..50).map(|i| 10.0 + f64::from(i % 7)));
        let analysis = analyze("ROWS", &s, &AnalysisConfig::default()).unwrap();

        let names: Vec<_> = analysis.comparison.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            ["Linear Regression", "Polynomial Regression", "Moving Average"]
        );
        assert_eq!(analysis.comparison[2].kind, None);
        for row in &analysis.comparison {
            assert!((0.0..=1.0).contains(&row.metrics.r_squared));
        }
    }

    #[test]
    fn best_row() {
        let row = |name: &str, r_squared| ModelComparison {
            name: name.to_string(),
            kind: None,
            metrics: ModelMetrics {
                r_squared,
                mse: 0.0,
                mae: 0.0,
                accuracy: 0.0,
            },
        };
        let rows = [row("a", 0.5), row("b", 0.9), row("c", 0.9)];
        assert_eq!(ModelComparison::best(&rows).unwrap().name, "b");
        assert!(ModelComparison::best(&[]).is_none());
    }

    #[test]
    fn bundle_changes() {
        let s = series([100.0, 102.0, 104.0, 106.0]);
        let analysis = analyze("UP", &s, &AnalysisConfig::default()).unwrap();
        let bundle = &analysis.bundle;

        assert_eq!(bundle.current_price(), Some(106.0));
        // 30 more steps of +2
        assert_close!(bundle.final_prediction().unwrap().predicted_price, 166.0, tol = 1e-6);
        assert_close!(bundle.price_change().unwrap(), 60.0, tol = 1e-6);
        assert_close!(bundle.relative_change().unwrap(), 60.0 / 106.0, tol = 1e-6);
        assert_eq!(bundle.trend, Trend::Bullish);
    }

    #[test]
    fn zero_horizon_is_neutral() {
        let s = series([100.0, 150.0, 300.0]);
        let config = AnalysisConfig {
            horizon: 0,
            ..AnalysisConfig::default()
        };
        let analysis = analyze("NONE", &s, &config).unwrap();
        assert!(analysis.bundle.predictions.is_empty());
        assert_eq!(analysis.bundle.trend, Trend::Neutral);
    }

    #[test]
    fn errors() {
        let config = AnalysisConfig::default();
        assert!(matches!(analyze("X", &[], &config), Err(Error::NoData)));
        assert!(matches!(
            analyze("X", &series([10.0]), &config),
            Err(Error::Degenerate { n: 1 })
        ));

        let invalid = AnalysisConfig {
            moving_average_window: 0,
            ..AnalysisConfig::default()
        };
        assert!(matches!(
            analyze("X", &series([1.0, 2.0]), &invalid),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn seeded_run_is_reproducible() {
        let config = AnalysisConfig {
            history_days: 90,
            horizon: 10,
            seed: Some(1234),
            ..AnalysisConfig::default()
        };
        let a = run("AAPL", &config).unwrap();
        let b = run("AAPL", &config).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.bundle.historical.len(), 90);
        assert_eq!(a.bundle.predictions.len(), 10);
        assert_eq!(a.bundle.symbol, "AAPL");
        assert!(a.bundle.predictions.iter().all(|p| p.predicted_price >= 0.0));
    }
}
