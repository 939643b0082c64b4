//! # Stockfit
//! ## Trend lines for prices that never existed
//!
//! Stockfit generates a synthetic daily price history, fits a straight line and a parabola to it,
//! and extrapolates the better of the two into the future with a confidence band around every point.
//!
//! It is a small, honest toolbox rather than a trading system:
//! - Closed-form least squares, no iterative solvers
//! - Goodness-of-fit metrics to tell you how much (or how little) to trust a fit
//! - A moving-average baseline to keep the regression models humble
//! - Test macros for asserting on floating point results
//!
//! The simplest use-case is a full analysis of a generated series:
//! ```rust
//! use stockfit::{analysis, AnalysisConfig};
//!
//! let config = AnalysisConfig { seed: Some(42), ..AnalysisConfig::default() };
//! let analysis = analysis::run("AAPL", &config).unwrap();
//!
//! println!("{}", stockfit::display::summary(&analysis.bundle));
//! println!("{}", stockfit::display::comparison_table(&analysis.comparison));
//! ```
//!
//! Or fit and forecast your own series piece by piece:
//! ```rust
//! use chrono::{Days, NaiveDate};
//! use stockfit::{forecast, statistics, LinearFit, Observation, Predictor, SeriesExt};
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let series: Vec<Observation> = [100.0, 101.5, 101.0, 103.0, 104.5]
//!     .iter()
//!     .enumerate()
//!     .map(|(i, p)| Observation::new(start + Days::new(i as u64), *p))
//!     .collect();
//!
//! let fit = LinearFit::fit(&series.indices(), &series.prices()).unwrap();
//! let metrics = statistics::calculate_metrics(&series.prices(), &fit.fitted(&series.indices())).unwrap();
//! let predictions = forecast::generate_predictions(&series, &fit, 7).unwrap();
//!
//! assert_eq!(predictions.len(), 7);
//! assert!(metrics.r_squared > 0.8);
//! ```
//!
//! # Core Concepts
//! - An [`Observation`] is one day of price history. Its position in the series is its `x` value.
//! - A [`Predictor`] turns an `x` into a predicted price:
//!     - [`LinearFit`] is `y = mx + b`.
//!     - [`QuadraticFit`] is `y = c0 + c1·x + c2·x²`, solved through the 3×3 normal equations.
//!         - A singular system gives zero coefficients instead of an error; see [`QuadraticFit::is_degenerate`].
//!     - [`baseline::MovingAverage`] is a flat line at the mean of the last few prices.
//! - [`statistics::ModelMetrics`] describe an in-sample fit: R², MSE, MAE and accuracy.
//! - [`forecast::PredictionPoint`]s extend a model past the history, with a constant-width band.
//!     - The band assumes normal residuals with constant variance. Treat it as a rough guide.
//! - [`analysis::analyze`] chooses between the models with a [`score::Selection`] criterion.
//!     - Higher R² is the default. [`score::Aic`] and [`score::Bic`] penalize the extra parameter.
//!
//! # Testing utilities
//!
//! This crate includes assertion macros for floating point results. See [`test`].
//!
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::cast_precision_loss)] // Day indices are far below 2^52
#![allow(clippy::similar_names)]
#![cfg_attr(docsrs, feature(doc_cfg))]


#[cfg(feature = "plotting")]
#[cfg_attr(docsrs, doc(cfg(feature = "plotting")))]
pub mod plot;

pub mod analysis;
pub mod baseline;
pub mod config;
pub mod display;
pub mod error;
pub mod forecast;
pub mod score;
pub mod series;
pub mod statistics;
pub mod synthetic;

mod fit;

pub use analysis::{Analysis, ModelComparison, PredictionBundle, RiskLevel, Trend};
pub use config::AnalysisConfig;
pub use fit::*;
pub use forecast::PredictionPoint;
pub use series::{Observation, SeriesExt};
