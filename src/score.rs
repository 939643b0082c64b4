//! Scoring methods for model selection.
//!
//! These methods decide which fitted model should drive the forecast. The default criterion simply
//! prefers the higher R², which always favors the quadratic model when it fits at least as well.
//! The information criteria penalize the extra parameter so a line can win on noisy data.
//!
//! # Overview of Available Scoring Methods
//! - **R²**: Picks whichever model explains more variance. Ties go to the more complex model.
//! - **Akaike Information Criterion (AIC)**: Balances fit quality and complexity. It tends to favor slightly more complex models if they provide a better fit.
//! - **Bayesian Information Criterion (BIC)**: Similar to AIC but applies a stricter penalty for model complexity.
//!
//! The [`ModelScoreProvider`] trait defines the interface for the information criteria, and
//! [`Selection`] picks one of the methods by name.
use serde::{Deserialize, Serialize};

use crate::{error::Error, statistics};

/// Trait for implementing scoring methods for model selection.
pub trait ModelScoreProvider {
    /// Calculate the model's score using this scoring method.
    ///
    /// # Notes
    /// - Lower scores indicate a better choice.
    /// - This is **not** a measure of how well the model fits your data. For that, use `r_squared`.
    ///
    /// # Parameters
    /// - `y`: Iterator over the observed (actual) values.
    /// - `y_fit`: Iterator over the predicted values from the model.
    /// - `k`: Number of model parameters.
    ///
    /// # Example
    /// ```
    /// # use stockfit::score::{Aic, ModelScoreProvider};
    /// # let y = vec![1.0, 2.0, 3.0];
    /// # let y_fit = vec![1.1, 1.9, 3.05];
    /// let score = Aic.score(y.into_iter(), y_fit.into_iter(), 3.0);
    /// ```
    fn score(&self, y: impl Iterator<Item = f64>, y_fit: impl Iterator<Item = f64>, k: f64)
        -> f64;
}

/// Returns `(ln(max(MSE, ε)), n)`, the shared likelihood term of both criteria.
fn log_likelihood_with_n(y: impl Iterator<Item = f64>, y_fit: impl Iterator<Item = f64>) -> (f64, f64) {
    let pairs: Vec<(f64, f64)> = y.zip(y_fit).collect();
    #[allow(clippy::cast_precision_loss)]
    let n = pairs.len() as f64;
    let mse = statistics::mean_squared_error(
        pairs.iter().map(|(y, _)| *y),
        pairs.iter().map(|(_, y_fit)| *y_fit),
    );
    (mse.max(f64::EPSILON).ln(), n)
}

/// Bayesian Information Criterion. Uses a stricter penalty for model complexity.
/// - Prefers simpler models, even if the fit is slightly worse.
///
/// <div class="warning">
///
/// **Technical Details**
///
/// BIC is calculated as:
/// ```math
/// BIC = n * ln(MSE) + k * ln(n)
/// where
///   n = number of observations, k = number of model parameters
/// ```
/// </div>
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bic;
impl ModelScoreProvider for Bic {
    fn score(
        &self,
        y: impl Iterator<Item = f64>,
        y_fit: impl Iterator<Item = f64>,
        k: f64,
    ) -> f64 {
        let (log_likelihood, n) = log_likelihood_with_n(y, y_fit);
        if n == 0.0 {
            return f64::NAN;
        }

        n * log_likelihood + k * n.ln()
    }
}

/// Akaike Information Criterion. Uses a more lenient penalty for model complexity
/// - Picks a slightly more complex model if it fits better.
///
/// <div class="warning">
///
/// **Technical Details**
///
/// AIC is calculated as:
/// ```math
/// AIC = { n * ln(MSE) + 2k
///       { n * ln(MSE) + 2k + (2k(k+1)) / (n - k - 1)  if (n / k < 4) AND (n > k + 1)
/// where
///   n = number of observations, k = number of model parameters
/// ```
/// </div>
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aic;
impl ModelScoreProvider for Aic {
    fn score(
        &self,
        y: impl Iterator<Item = f64>,
        y_fit: impl Iterator<Item = f64>,
        k: f64,
    ) -> f64 {
        let (log_likelihood, n) = log_likelihood_with_n(y, y_fit);
        if n == 0.0 {
            return f64::NAN;
        }

        let mut aic = n * log_likelihood + 2.0 * k;
        if n / k < 4.0 && n > k + 1.0 {
            // Apply AICc correction
            aic += 2.0 * k * (k + 1.0) / (n - k - 1.0);
        }

        aic
    }
}

/// Criterion used to choose between the fitted models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    /// Higher R² wins.
    #[default]
    RSquared,

    /// Lower [`Aic`] wins.
    Aic,

    /// Lower [`Bic`] wins.
    Bic,
}

impl Selection {
    /// Scores a set of fitted values. Lower is better for every criterion.
    ///
    /// For [`Selection::RSquared`] this is the negated R².
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn score(self, y: &[f64], y_fit: &[f64], parameters: usize) -> f64 {
        let k = parameters as f64;
        let (y, y_fit) = (y.iter().copied(), y_fit.iter().copied());
        match self {
            Selection::RSquared => -statistics::r_squared(y, y_fit),
            Selection::Aic => Aic.score(y, y_fit, k),
            Selection::Bic => Bic.score(y, y_fit, k),
        }
    }
}

impl std::fmt::Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Selection::RSquared => write!(f, "r-squared"),
            Selection::Aic => write!(f, "aic"),
            Selection::Bic => write!(f, "bic"),
        }
    }
}

impl std::str::FromStr for Selection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "r-squared" | "r2" => Ok(Selection::RSquared),
            "aic" => Ok(Selection::Aic),
            "bic" => Ok(Selection::Bic),
            other => Err(Error::InvalidConfig(format!(
                "unknown selection criterion `{other}` (expected r-squared, aic or bic)"
            ))),
        }
    }
}
