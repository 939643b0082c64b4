use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Ordinary least-squares line `y = slope·x + intercept`.
///
/// Produced by [`LinearFit::fit`]. The value is immutable; refitting creates a new one.
///
/// # Example
/// ```rust
/// # use stockfit::{LinearFit, Predictor};
/// let fit = LinearFit::fit(&[0.0, 1.0, 2.0, 3.0], &[10.0, 12.0, 14.0, 16.0]).unwrap();
/// assert_eq!(fit.predict(4.0), 18.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    slope: f64,
    intercept: f64,
}

impl LinearFit {
    /// Builds a line directly from its parameters.
    #[must_use]
    pub fn new(slope: f64, intercept: f64) -> Self {
        Self { slope, intercept }
    }

    /// Fits a line to the paired `xs` and `ys` by the closed-form least-squares solution.
    ///
    /// <div class="warning">
    ///
    /// **Technical Details**
    ///
    /// ```math
    /// slope     = (n·Σxy − Σx·Σy) / (n·Σx² − (Σx)²)
    /// intercept = (Σy − slope·Σx) / n
    /// ```
    /// </div>
    ///
    /// # Errors
    /// - [`Error::NoData`] if the inputs are empty.
    /// - [`Error::LengthMismatch`] if `xs` and `ys` differ in length.
    /// - [`Error::Degenerate`] if every x value is the same, which includes a single point.
    #[allow(clippy::float_cmp)]
    pub fn fit(xs: &[f64], ys: &[f64]) -> Result<Self> {
        let n = Error::check_paired(xs.len(), ys.len())?;

        let (mut sum_x, mut sum_y, mut sum_xy, mut sum_x2) = (0.0, 0.0, 0.0, 0.0);
        for (&x, &y) in xs.iter().zip(ys) {
            sum_x += x;
            sum_y += y;
            sum_xy += x * y;
            sum_x2 += x * x;
        }

        let nf = n as f64;
        let denominator = nf * sum_x2 - sum_x * sum_x;
        if denominator == 0.0 {
            log::warn!("Linear fit is undefined for {n} points with identical x values");
            return Err(Error::Degenerate { n });
        }

        let slope = (nf * sum_xy - sum_x * sum_y) / denominator;
        let intercept = (sum_y - slope * sum_x) / nf;
        Ok(Self { slope, intercept })
    }

    /// Change in `y` per unit of `x`.
    #[must_use]
    pub fn slope(&self) -> f64 {
        self.slope
    }

    /// Value of the line at `x = 0`.
    #[must_use]
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Evaluates the line at `x`.
    #[must_use]
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}
