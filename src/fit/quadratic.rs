use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Determinant magnitude under which the normal equations are treated as singular.
pub const DET_EPSILON: f64 = 1e-10;

/// Degree-2 polynomial `y = c0 + c1·x + c2·x²` fitted by least squares.
///
/// Coefficients are stored lowest degree first.
///
/// # Example
/// ```rust
/// # use stockfit::{QuadraticFit, Predictor};
/// let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
/// let ys: Vec<f64> = xs.iter().map(|x| 1.0 + 2.0 * x + 3.0 * x * x).collect();
///
/// let fit = QuadraticFit::fit(&xs, &ys).unwrap();
/// assert!((fit.predict(5.0) - 86.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuadraticFit {
    coefficients: [f64; 3],

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    singular: bool,
}

impl QuadraticFit {
    /// Builds a polynomial from `[c0, c1, c2]`.
    #[must_use]
    pub fn new(coefficients: [f64; 3]) -> Self {
        Self {
            coefficients,
            singular: false,
        }
    }

    /// Fits `c0 + c1·x + c2·x²` to the paired `xs` and `ys`.
    ///
    /// Each point contributes a design row `[1, x, x²]`. The 3×3 normal equations
    /// `XᵀX·c = Xᵀy` are then solved with [`solve_3x3`].
    ///
    /// A singular system is not an error: the coefficients come back as zeros, and
    /// [`QuadraticFit::is_degenerate`] reports it. This happens with fewer than three
    /// distinct x values.
    ///
    /// # Errors
    /// - [`Error::NoData`] if the inputs are empty.
    /// - [`Error::LengthMismatch`] if `xs` and `ys` differ in length.
    pub fn fit(xs: &[f64], ys: &[f64]) -> Result<Self> {
        Error::check_paired(xs.len(), ys.len())?;

        let mut xtx = Matrix3::<f64>::zeros();
        let mut xty = Vector3::<f64>::zeros();
        for (&x, &y) in xs.iter().zip(ys) {
            let row = Vector3::new(1.0, x, x * x);
            xtx += row * row.transpose();
            xty += row * y;
        }

        match try_solve_3x3(&xtx, &xty) {
            Some(coefficients) => Ok(Self::new(coefficients)),
            None => {
                log::warn!(
                    "Quadratic normal equations are singular for {} points; using zero coefficients",
                    xs.len()
                );
                Ok(Self {
                    coefficients: [0.0; 3],
                    singular: true,
                })
            }
        }
    }

    /// Returns `[c0, c1, c2]`.
    #[must_use]
    pub fn coefficients(&self) -> &[f64; 3] {
        &self.coefficients
    }

    /// True when the fit hit a singular system and fell back to zero coefficients.
    ///
    /// A genuine fit that happens to produce zeros, such as all-zero prices, is not degenerate.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.singular
    }

    /// Evaluates the polynomial at `x`.
    #[must_use]
    pub fn predict(&self, x: f64) -> f64 {
        let [c0, c1, c2] = self.coefficients;
        c0 + c1 * x + c2 * x * x
    }
}

/// Solves `a·x = b` for a 3×3 system with Cramer's rule.
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// x_i = det(A_i) / det(A)
/// where
///   A_i = A with column i replaced by b
/// ```
///
/// If `|det(A)| < 1e-10` the system is considered singular and `[0, 0, 0]` is returned.
/// </div>
#[must_use]
pub fn solve_3x3(a: &Matrix3<f64>, b: &Vector3<f64>) -> [f64; 3] {
    try_solve_3x3(a, b).unwrap_or([0.0; 3])
}

/// Like [`solve_3x3`], but returns `None` for a singular system.
#[must_use]
pub fn try_solve_3x3(a: &Matrix3<f64>, b: &Vector3<f64>) -> Option<[f64; 3]> {
    let det = a.determinant();
    if det.abs() < DET_EPSILON {
        return None;
    }

    let mut solution = [0.0; 3];
    for (i, value) in solution.iter_mut().enumerate() {
        let mut replaced = *a;
        replaced.set_column(i, b);
        *value = replaced.determinant() / det;
    }
    Some(solution)
}
