//! Functions and tools for evaluating model fits and building confidence intervals
//!
//! This module provides the goodness-of-fit metrics used to compare the regression models
//! against each other and against the moving-average baseline.
//!
//! # Model Fit / Regression Diagnostics
//! - [`r_squared`]: Proportion of variance explained by the model. Higher is better (0 to 1).
//! - [`accuracy`]: Percentage of predictions within a relative tolerance of the actual value.
//! - [`calculate_metrics`]: All of the above bundled into a [`ModelMetrics`] record.
//!
//! # Error Metrics
//! - [`mean_absolute_error`]: Average absolute difference between observed and predicted values. Lower is better.
//! - [`mean_squared_error`]: Average squared difference between observed and predicted values. Lower is better.
//! - [`root_mean_squared_error`]: Square root of MSE, giving error in same units as observed values. Lower is better.
//!
//! # Descriptive Statistics
//! - [`mean`]: Arithmetic mean of a dataset.
//! - [`volatility`]: Root mean square of day-over-day relative changes.
//!
//! # Confidence Intervals
//! - [`Confidence`]: Enum for common confidence levels (90%, 95%, 98%, 99%).
//! - [`ConfidenceInterval`]: A lower and upper bound around a point prediction.
//!
//! # Examples
//!
//! ```rust
//! use stockfit::statistics::{calculate_metrics, r_squared};
//!
//! let y = vec![1.0, 2.0, 3.0];
//! let y_fit = vec![1.1, 1.9, 3.05];
//!
//! let r2 = r_squared(y.iter().copied(), y_fit.iter().copied());
//! println!("R² = {r2}");
//!
//! let metrics = calculate_metrics(&y, &y_fit).unwrap();
//! println!("MAE = {}", metrics.mae);
//! ```
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Relative error under which a prediction counts as accurate (5%).
pub const ACCURACY_TOLERANCE: f64 = 0.05;

/// Goodness-of-fit metrics for one (actual, predicted) pair of series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelMetrics {
    /// Coefficient of determination, clamped to `0..=1`.
    pub r_squared: f64,

    /// Mean squared error.
    pub mse: f64,

    /// Mean absolute error.
    pub mae: f64,

    /// Percentage (0 to 100) of points within [`ACCURACY_TOLERANCE`] of the actual value.
    pub accuracy: f64,
}

/// Computes every metric in [`ModelMetrics`] in a single pass.
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// SSE = Σ (a_i - p_i)²
/// SST = Σ (a_i - mean(a))²
/// R²  = max(0, 1 - SSE / SST)
/// MSE = SSE / n
/// MAE = Σ |a_i - p_i| / n
/// ```
/// See [`r_squared`] and [`accuracy`] for how the zero-division cases are resolved.
/// </div>
///
/// # Errors
/// - [`Error::LengthMismatch`] if the slices differ in length.
/// - [`Error::NoData`] if they are empty.
///
/// # Example
/// ```rust
/// # use stockfit::statistics::calculate_metrics;
/// let metrics = calculate_metrics(&[1.0, 2.0, 3.0, 4.0, 5.0], &[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
/// assert_eq!(metrics.mse, 0.0);
/// assert_eq!(metrics.r_squared, 1.0);
/// assert_eq!(metrics.accuracy, 100.0);
/// ```
pub fn calculate_metrics(actual: &[f64], predicted: &[f64]) -> Result<ModelMetrics> {
    Error::check_paired(actual.len(), predicted.len())?;

    let sums = ErrorSums::new(actual.iter().copied(), predicted.iter().copied());
    Ok(ModelMetrics {
        r_squared: sums.r_squared(),
        mse: sums.sse / sums.n,
        mae: sums.sae / sums.n,
        accuracy: accuracy(
            actual.iter().copied(),
            predicted.iter().copied(),
            ACCURACY_TOLERANCE,
        ),
    })
}

/// Calculate the R-squared value for a set of data.
///
/// R-squared is a number between 0 and 1 that tells you how well the model explains the data:
/// - `0` means the model is no better than predicting the mean.
/// - `1` means the model explains all the variation.
///
/// Fits worse than the mean would give a negative value; those are clamped to `0`.
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// R² = max(0, 1 - (SS_res / SS_tot))
/// where
///   SS_res = Σ (y_i - y_fit_i)²
///   SS_tot = Σ (y_i - y_mean)²
/// ```
///
/// When `SS_tot = 0` (constant `y`), the ratio is undefined. The result is then `1` if the model
/// reproduces the data exactly (`SS_res = 0`), and `0` otherwise.
/// </div>
///
/// # Returns
/// The proportion of variance explained by the model, or `NaN` if there is no data.
///
/// # Example
/// ```rust
/// # use stockfit::statistics::r_squared;
/// let y = vec![1.0, 2.0, 3.0];
/// let y_fit = vec![1.1, 1.9, 3.05];
/// let r2 = r_squared(y.into_iter(), y_fit.into_iter());
/// assert!(r2 > 0.9);
/// ```
pub fn r_squared(y: impl Iterator<Item = f64>, y_fit: impl Iterator<Item = f64>) -> f64 {
    let sums = ErrorSums::new(y, y_fit);
    if sums.n == 0.0 {
        return f64::NAN;
    }
    sums.r_squared()
}

/// Computes the arithmetic mean of a sequence of values.
///
/// # Returns
/// The arithmetic mean of all elements in `data`.
/// - Returns `NaN` if the iterator yields no elements.
///
/// # Examples
/// ```rust
/// let values = vec![1.0, 2.0, 3.0];
/// let m = stockfit::statistics::mean(values.into_iter());
/// assert_eq!(m, 2.0);
/// ```
pub fn mean(data: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0.0;
    for value in data {
        sum += value;
        count += 1.0;
    }
    sum / count
}

/// Returns `y_i - y_fit_i` for each pair of values.
pub fn residuals(y: impl Iterator<Item = f64>, y_fit: impl Iterator<Item = f64>) -> Vec<f64> {
    y.zip(y_fit).map(|(y, y_fit)| y - y_fit).collect()
}

/// Computes the mean absolute error (MAE) between two sets of values.
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// MAE = (Σ |y_i - y_fit_i|) / N
/// ```
/// </div>
///
/// # Example
/// ```rust
/// # use stockfit::statistics::mean_absolute_error;
/// let mae = mean_absolute_error([1.0, 2.0, 3.0].into_iter(), [2.0, 2.0, 1.0].into_iter());
/// assert_eq!(mae, 1.0);
/// ```
pub fn mean_absolute_error(y: impl Iterator<Item = f64>, y_fit: impl Iterator<Item = f64>) -> f64 {
    let sums = ErrorSums::new(y, y_fit);
    sums.sae / sums.n
}

/// Computes the mean squared error (MSE) between two sets of values.
///
/// This is the population form (divides by `N`, not `N - k`).
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// MSE = (Σ (y_i - y_fit_i)²) / N
/// ```
/// </div>
pub fn mean_squared_error(y: impl Iterator<Item = f64>, y_fit: impl Iterator<Item = f64>) -> f64 {
    let sums = ErrorSums::new(y, y_fit);
    sums.sse / sums.n
}

/// Computes the root mean squared error (RMSE), the square root of [`mean_squared_error`].
///
/// This is the standard error used to size the forecast confidence intervals.
pub fn root_mean_squared_error(
    y: impl Iterator<Item = f64>,
    y_fit: impl Iterator<Item = f64>,
) -> f64 {
    mean_squared_error(y, y_fit).sqrt()
}

/// Percentage of predictions whose relative error is within `tolerance`.
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// accurate_i = |y_i - y_fit_i| / |y_i| <= tolerance
/// accuracy   = 100 * count(accurate) / N
/// ```
///
/// Relative error is undefined when `y_i = 0`; such a point only counts as accurate if
/// the prediction is exactly `0` as well.
/// </div>
///
/// # Returns
/// A percentage between 0 and 100, or `NaN` if there is no data.
///
/// # Example
/// ```rust
/// # use stockfit::statistics::accuracy;
/// let y = vec![100.0, 100.0, 100.0, 100.0];
/// let y_fit = vec![104.0, 96.0, 110.0, 100.0];
/// assert_eq!(accuracy(y.into_iter(), y_fit.into_iter(), 0.05), 75.0);
/// ```
#[allow(clippy::float_cmp)]
pub fn accuracy(
    y: impl Iterator<Item = f64>,
    y_fit: impl Iterator<Item = f64>,
    tolerance: f64,
) -> f64 {
    let mut accurate = 0.0;
    let mut n = 0.0;
    for (y, y_fit) in y.zip(y_fit) {
        n += 1.0;
        let within = if y == 0.0 {
            y_fit == 0.0
        } else {
            (y - y_fit).abs() / y.abs() <= tolerance
        };
        if within {
            accurate += 1.0;
        }
    }
    accurate / n * 100.0
}

/// Root mean square of day-over-day relative price changes.
///
/// Used to rate how risky a series is.
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// r_i = (p_i - p_{i-1}) / p_{i-1}
/// volatility = sqrt( Σ r_i² / M )
/// ```
/// `M` is the number of pairs used. Pairs with a zero previous price are skipped.
/// If no pair is usable the result is `0`.
/// </div>
///
/// # Example
/// ```rust
/// # use stockfit::statistics::volatility;
/// // +10%, then -10%
/// let v = volatility([100.0, 110.0, 99.0].into_iter());
/// assert!((v - 0.1).abs() < 1e-12);
/// ```
#[allow(clippy::float_cmp)]
pub fn volatility(prices: impl Iterator<Item = f64>) -> f64 {
    let mut previous: Option<f64> = None;
    let mut sum_sq = 0.0;
    let mut count = 0.0;
    for price in prices {
        if let Some(prev) = previous {
            if prev != 0.0 {
                let change = (price - prev) / prev;
                sum_sq += change * change;
                count += 1.0;
            }
        }
        previous = Some(price);
    }

    if count == 0.0 {
        return 0.0;
    }
    (sum_sq / count).sqrt()
}

/// Internal single-pass accumulator
///
/// Holds SSE, SST, the sum of absolute errors, and the count.
struct ErrorSums {
    sse: f64,
    sst: f64,
    sae: f64,
    n: f64,
}
impl ErrorSums {
    fn new(y: impl Iterator<Item = f64>, y_fit: impl Iterator<Item = f64>) -> Self {
        let pairs: Vec<(f64, f64)> = y.zip(y_fit).collect();
        let y_mean = mean(pairs.iter().map(|(y, _)| *y));

        let mut sums = Self {
            sse: 0.0,
            sst: 0.0,
            sae: 0.0,
            n: 0.0,
        };
        for (y, y_fit) in pairs {
            let residual = y - y_fit;
            sums.sse += residual * residual;
            sums.sae += residual.abs();
            sums.sst += (y - y_mean) * (y - y_mean);
            sums.n += 1.0;
        }
        sums
    }

    #[allow(clippy::float_cmp)]
    fn r_squared(&self) -> f64 {
        if self.sst == 0.0 {
            return if self.sse == 0.0 { 1.0 } else { 0.0 };
        }
        (1.0 - self.sse / self.sst).max(0.0)
    }
}

/// Standard Z-score confidence levels for forecasts.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Confidence {
    /// 90% confidence level
    P90,

    /// 95% confidence level
    #[default]
    P95,

    /// 98% confidence level
    P98,

    /// 99% confidence level
    P99,

    /// Custom confidence level, given directly as a z-score
    Custom(f64),
}

impl Confidence {
    /// Returns the Z-score associated with the confidence level.
    ///
    /// Assumes normally distributed residuals.
    #[must_use]
    pub fn z_score(self) -> f64 {
        match self {
            Confidence::P90 => 1.645,
            Confidence::P95 => 1.960,
            Confidence::P98 => 2.326,
            Confidence::P99 => 2.576,
            Confidence::Custom(z) => z,
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::P90 => write!(f, "90%"),
            Confidence::P95 => write!(f, "95%"),
            Confidence::P98 => write!(f, "98%"),
            Confidence::P99 => write!(f, "99%"),
            Confidence::Custom(z) => write!(f, "{z}σ"),
        }
    }
}

/// A predicted range around a point forecast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    /// Lower bound of the interval.
    pub lower: f64,

    /// Upper bound of the interval.
    pub upper: f64,
}

impl ConfidenceInterval {
    /// Returns the width of the interval (upper - lower).
    #[must_use]
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Returns the midpoint of the interval.
    #[must_use]
    pub fn center(&self) -> f64 {
        (self.lower + self.upper) / 2.0
    }

    /// Checks if a value falls inside the interval, bounds included.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        (self.lower..=self.upper).contains(&value)
    }
}

impl std::fmt::Display for ConfidenceInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2})", self.lower, self.upper)
    }
}
