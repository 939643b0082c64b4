//! Regression models fitted to a price series
//!
//! Two models are available, both solved in closed form:
//! - [`LinearFit`]: ordinary least-squares line.
//! - [`QuadraticFit`]: degree-2 polynomial via the 3×3 normal equations.
//!
//! Both implement [`Predictor`], the capability shared by everything that can turn an `x`
//! (a day index) into a predicted price. [`Model`] wraps either one so the caller can pick a
//! model at runtime, and [`ModelKind`] names a model before it has been fitted.
//!
//! # Example
//! ```rust
//! use stockfit::{ModelKind, Predictor};
//!
//! let xs = [0.0, 1.0, 2.0, 3.0];
//! let ys = [10.0, 12.0, 14.0, 16.0];
//!
//! let model = ModelKind::Linear.fit(&xs, &ys).unwrap();
//! assert_eq!(model.predict(4.0), 18.0);
//! assert_eq!(model.to_string(), "y = 2.00x + 10.00");
//! ```
use serde::{Deserialize, Serialize};

use crate::{display::ModelDisplay, error::Result};

mod linear;
mod quadratic;

pub use linear::LinearFit;
pub use quadratic::{solve_3x3, try_solve_3x3, QuadraticFit, DET_EPSILON};

/// Something that can predict a `y` value for any `x`.
pub trait Predictor {
    /// Predicts the value at `x`.
    ///
    /// Implementations are pure: the same `x` always gives the same result.
    fn predict(&self, x: f64) -> f64;

    /// Predicts every value in `xs`.
    fn fitted(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.predict(x)).collect()
    }

    /// Number of free parameters in the model, used by the selection scores.
    fn parameter_count(&self) -> usize;
}

impl Predictor for LinearFit {
    fn predict(&self, x: f64) -> f64 {
        LinearFit::predict(self, x)
    }

    fn parameter_count(&self) -> usize {
        2
    }
}

impl Predictor for QuadraticFit {
    fn predict(&self, x: f64) -> f64 {
        QuadraticFit::predict(self, x)
    }

    fn parameter_count(&self) -> usize {
        3
    }
}

/// The kinds of regression model that can be fitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// Straight line, see [`LinearFit`].
    Linear,

    /// Degree-2 polynomial, see [`QuadraticFit`].
    Quadratic,
}

impl ModelKind {
    /// All model kinds, in the order they are compared.
    pub const ALL: [ModelKind; 2] = [ModelKind::Linear, ModelKind::Quadratic];

    /// Fits a model of this kind.
    ///
    /// # Errors
    /// See [`LinearFit::fit`] and [`QuadraticFit::fit`].
    pub fn fit(self, xs: &[f64], ys: &[f64]) -> Result<Model> {
        let model = match self {
            ModelKind::Linear => Model::Linear(LinearFit::fit(xs, ys)?),
            ModelKind::Quadratic => Model::Quadratic(QuadraticFit::fit(xs, ys)?),
        };
        log::debug!("Fitted {self}: {model}");
        Ok(model)
    }

    /// Human readable name of the model.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ModelKind::Linear => "Linear Regression",
            ModelKind::Quadratic => "Polynomial Regression",
        }
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A fitted model of either kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Model {
    /// A fitted line.
    Linear(LinearFit),

    /// A fitted degree-2 polynomial.
    Quadratic(QuadraticFit),
}

impl Model {
    /// Which kind of model this is.
    #[must_use]
    pub fn kind(&self) -> ModelKind {
        match self {
            Model::Linear(_) => ModelKind::Linear,
            Model::Quadratic(_) => ModelKind::Quadratic,
        }
    }

    /// Coefficients lowest degree first: `[intercept, slope]` or `[c0, c1, c2]`.
    #[must_use]
    pub fn coefficients(&self) -> Vec<f64> {
        match self {
            Model::Linear(fit) => vec![fit.intercept(), fit.slope()],
            Model::Quadratic(fit) => fit.coefficients().to_vec(),
        }
    }

    /// Human readable equation, e.g. `y = 2.00x + 10.00`.
    #[must_use]
    pub fn equation(&self) -> String {
        self.to_string()
    }
}

impl Predictor for Model {
    fn predict(&self, x: f64) -> f64 {
        match self {
            Model::Linear(fit) => fit.predict(x),
            Model::Quadratic(fit) => fit.predict(x),
        }
    }

    fn parameter_count(&self) -> usize {
        match self {
            Model::Linear(fit) => Predictor::parameter_count(fit),
            Model::Quadratic(fit) => Predictor::parameter_count(fit),
        }
    }
}

impl From<LinearFit> for Model {
    fn from(fit: LinearFit) -> Self {
        Model::Linear(fit)
    }
}

impl From<QuadraticFit> for Model {
    fn from(fit: QuadraticFit) -> Self {
        Model::Quadratic(fit)
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        ModelDisplay.format_model(f, &self.coefficients())
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::{assert_all_close, assert_close, assert_r_squared};

    #[test]
    fn kinds_fit_models() {
        let xs: Vec<f64> = (0..10).map(f64::from).collect();
        let ys: Vec<f64> = xs.iter().map(|x| 2.0 * x * x + 1.0).collect();

        let linear = ModelKind::Linear.fit(&xs, &ys).unwrap();
        let quadratic = ModelKind::Quadratic.fit(&xs, &ys).unwrap();
        assert_eq!(linear.kind(), ModelKind::Linear);
        assert_eq!(quadratic.kind(), ModelKind::Quadratic);
        assert_eq!(linear.parameter_count(), 2);
        assert_eq!(quadratic.parameter_count(), 3);

        assert_r_squared!(quadratic, &xs, &ys, 0.9999);
        assert_close!(quadratic.predict(10.0), 201.0, tol = 1e-8);
    }

    #[test]
    fn fitted_matches_predict() {
        let model = Model::from(QuadraticFit::new([1.0, -1.0, 0.5]));
        let xs = [0.0, 1.0, 2.0, 3.0];
        let fitted = model.fitted(&xs);
        assert_all_close!(fitted, [1.0, 0.5, 1.0, 2.5]);
    }

    #[test]
    fn coefficients_lowest_first() {
        let model = Model::from(LinearFit::new(2.0, 10.0));
        assert_eq!(model.coefficients(), vec![10.0, 2.0]);
    }

    #[test]
    fn equations() {
        assert_eq!(
            Model::from(LinearFit::new(2.0, 10.0)).to_string(),
            "y = 2.00x + 10.00"
        );
        assert_eq!(
            Model::from(QuadraticFit::new([3.0, -1.5, 0.25])).equation(),
            "y = 0.25x² - 1.50x + 3.00"
        );
        assert_eq!(Model::from(QuadraticFit::new([0.0; 3])).equation(), "y = 0");
    }

    #[test]
    fn serde_is_tagged() {
        let model = Model::from(LinearFit::new(1.0, 2.0));
        let json = serde_json::to_string(&model).unwrap();
        assert_eq!(json, r#"{"kind":"linear","slope":1.0,"intercept":2.0}"#);

        let back: Model = serde_json::from_str(&json).unwrap();
        assert_eq!(back, model);
    }
}
