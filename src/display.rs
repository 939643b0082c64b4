//! Utilities for displaying models, predictions and comparisons
//!
//! # Equations
//! - [`ModelDisplay`]: Renders a coefficient list as `y = ...`, highest power first.
//! - [`Term`] / [`Sign`]: A single rendered term and how it joins the rest of the equation.
//! - [`format_coefficient`]: Formats a numeric coefficient, skipping zeros.
//! - [`format_variable`]: Formats `x` raised to a power with a Unicode superscript.
//!
//! # Reports
//! - [`summary`]: Headline numbers of a [`PredictionBundle`].
//! - [`comparison_table`]: Metrics of every compared model, best row marked.
//! - [`prediction_table`]: One line per predicted day.
use std::fmt::Write;

use crate::{
    analysis::{ModelComparison, PredictionBundle},
    forecast::PredictionPoint,
};

/// Default number of decimals for coefficients and prices.
pub const DEFAULT_PRECISION: usize = 2;

/// Magnitudes outside this range are written in scientific notation.
pub const FIXED_RANGE: std::ops::Range<f64> = 1e-3..1e6;

/// Renders polynomial coefficients as an equation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelDisplay;

impl ModelDisplay {
    /// Formats the term of a given degree, or `None` to skip it.
    ///
    /// # Example
    /// ```
    /// # use stockfit::display::{ModelDisplay, Sign};
    /// let term = ModelDisplay.format_term(2, -0.5).unwrap();
    /// assert_eq!(term.sign, Sign::Negative);
    /// assert_eq!(term.body, "0.50x²");
    /// ```
    #[must_use]
    pub fn format_term(&self, degree: i32, coef: f64) -> Option<Term> {
        let sign = Sign::from_coef(coef);
        let coef = format_coefficient(coef, degree, DEFAULT_PRECISION)?;
        let body = format!("{coef}{}", format_variable("x", degree));
        Some(Term::new(sign, body))
    }

    /// Writes `y = ...` into `buffer`.
    ///
    /// `coefficients[i]` is the coefficient of `x^i`. Zero terms are skipped, and an all-zero
    /// model is written as `y = 0`.
    ///
    /// # Errors
    /// Returns an error if writing to `buffer` fails.
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn format_model<B: Write>(&self, buffer: &mut B, coefficients: &[f64]) -> std::fmt::Result {
        let mut terms = coefficients
            .iter()
            .enumerate()
            .rev()
            .filter_map(|(degree, &coef)| self.format_term(degree as i32, coef));

        write!(buffer, "y = ")?;
        let Some(first) = terms.next() else {
            return write!(buffer, "0");
        };

        // No leading '+'
        if first.sign == Sign::Negative {
            write!(buffer, "{}", first.sign.char())?;
        }
        write!(buffer, "{}", first.body)?;

        for term in terms {
            write!(buffer, " {} {}", term.sign.char(), term.body)?;
        }
        Ok(())
    }
}

/// Represents the sign of an equation term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    /// Positive sign (`+` when displayed).
    Positive,

    /// Negative sign (`-` when displayed).
    Negative,
}

impl Sign {
    /// Determines the sign from a numeric coefficient.
    #[must_use]
    pub fn from_coef(coef: f64) -> Self {
        if coef.is_sign_negative() {
            Self::Negative
        } else {
            Self::Positive
        }
    }

    /// `+` for `Positive`, `-` for `Negative`.
    #[must_use]
    pub fn char(&self) -> char {
        match self {
            Sign::Positive => '+',
            Sign::Negative => '-',
        }
    }
}

/// A single term of an equation, e.g. `2.00x²`, with its sign kept apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    /// The sign of the term.
    pub sign: Sign,

    /// The unsigned body of the term.
    pub body: String,
}

impl Term {
    /// Creates a new term.
    #[must_use]
    pub fn new(sign: Sign, body: String) -> Self {
        Self { sign, body }
    }
}

/// Formats the magnitude of a coefficient for display in a term.
///
/// - Returns `None` if the coefficient is zero or effectively zero (≤ epsilon).
/// - Returns an empty string for a unit coefficient on a non-constant term (`x`, not `1.00x`).
/// - Formats as a decimal inside [`FIXED_RANGE`], in scientific notation otherwise.
///
/// # Example
/// ```
/// # use stockfit::display::format_coefficient;
/// assert_eq!(format_coefficient(0.0, 1, 2), None);
/// assert_eq!(format_coefficient(-2.5, 1, 2), Some("2.50".to_string()));
/// assert_eq!(format_coefficient(1.0, 1, 2), Some(String::new()));
/// assert_eq!(format_coefficient(1e-5, 2, 2), Some("1.00e-5".to_string()));
/// ```
#[must_use]
pub fn format_coefficient(coef: f64, degree: i32, precision: usize) -> Option<String> {
    let abs = coef.abs();
    if abs <= f64::EPSILON {
        return None;
    }

    if (abs - 1.0).abs() <= f64::EPSILON && degree != 0 {
        return Some(String::new());
    }

    if FIXED_RANGE.contains(&abs) {
        Some(format!("{abs:.precision$}"))
    } else {
        Some(format!("{abs:.precision$e}"))
    }
}

/// Formats `base` raised to `exp`.
///
/// - `exp == 0` gives an empty string.
/// - `exp == 1` gives `base` unchanged.
/// - Otherwise the exponent is appended as a Unicode superscript.
///
/// # Example
/// ```
/// # use stockfit::display::format_variable;
/// assert_eq!(format_variable("x", 0), "");
/// assert_eq!(format_variable("x", 1), "x");
/// assert_eq!(format_variable("x", 12), "x¹²");
/// ```
#[must_use]
pub fn format_variable(base: &str, exp: i32) -> String {
    match exp {
        0 => String::new(),
        1 => base.to_string(),
        _ => format!("{base}{}", superscript(exp)),
    }
}

fn superscript(n: i32) -> String {
    const DIGITS: [char; 10] = ['⁰', '¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹'];
    n.to_string()
        .chars()
        .filter_map(|c| match c {
            '-' => Some('⁻'),
            c => c.to_digit(10).map(|d| DIGITS[d as usize]),
        })
        .collect()
}

fn signed(value: f64, precision: usize) -> String {
    if value >= 0.0 {
        format!("+{value:.precision$}")
    } else {
        format!("{value:.precision$}")
    }
}

/// Headline numbers of an analysis: prices, change, labels, equation and metrics.
#[must_use]
pub fn summary(bundle: &PredictionBundle) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = write_summary(&mut out, bundle);
    out
}

fn write_summary<B: Write>(out: &mut B, bundle: &PredictionBundle) -> std::fmt::Result {
    writeln!(out, "{} ({})", bundle.symbol, bundle.model.kind())?;
    writeln!(out, "  Model:           {}", bundle.model)?;

    if let Some(current) = bundle.current_price() {
        writeln!(out, "  Current price:   ${current:.2}")?;
    }
    if let Some(point) = bundle.final_prediction() {
        writeln!(
            out,
            "  Predicted price: ${:.2} on {} {}",
            point.predicted_price, point.date, point.confidence_interval
        )?;
    }
    if let (Some(change), Some(relative)) = (bundle.price_change(), bundle.relative_change()) {
        writeln!(
            out,
            "  Change:          {} ({}%)",
            signed(change, 2),
            signed(relative * 100.0, 1)
        )?;
    }

    writeln!(out, "  Trend:           {}", bundle.trend)?;
    writeln!(out, "  Risk:            {}", bundle.risk_level)?;

    let m = &bundle.metrics;
    writeln!(
        out,
        "  R² {:.1}%  Accuracy {:.1}%  MSE {:.2}  MAE {:.2}",
        m.r_squared * 100.0,
        m.accuracy,
        m.mse,
        m.mae
    )
}

/// Metrics of every compared model. The row with the best R² is marked with `*`.
///
/// # Example
/// ```
/// # use stockfit::{analysis::ModelComparison, display::comparison_table, statistics::ModelMetrics};
/// let metrics = ModelMetrics { r_squared: 0.5, mse: 2.0, mae: 1.0, accuracy: 80.0 };
/// let rows = [ModelComparison { name: "Moving Average".into(), kind: None, metrics }];
/// assert!(comparison_table(&rows).contains("* Moving Average"));
/// ```
#[must_use]
pub fn comparison_table(rows: &[ModelComparison]) -> String {
    let best = ModelComparison::best(rows).map(|row| row.name.as_str());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "  {:<22} {:>8} {:>9} {:>12} {:>10}",
        "Model", "R²", "Accuracy", "MSE", "MAE"
    );
    for row in rows {
        let marker = if Some(row.name.as_str()) == best { '*' } else { ' ' };
        let m = &row.metrics;
        let _ = writeln!(
            out,
            "{marker} {:<22} {:>7.1}% {:>8.1}% {:>12.3} {:>10.3}",
            row.name,
            m.r_squared * 100.0,
            m.accuracy,
            m.mse,
            m.mae
        );
    }
    out
}

/// One line per predicted day: date, price and interval bounds.
#[must_use]
pub fn prediction_table(points: &[PredictionPoint]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<10} {:>12} {:>12} {:>12}", "Date", "Predicted", "Lower", "Upper");
    for p in points {
        let _ = writeln!(
            out,
            "{:<10} {:>12.2} {:>12.2} {:>12.2}",
            p.date.to_string(),
            p.predicted_price,
            p.confidence_interval.lower,
            p.confidence_interval.upper
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{
        analysis::{RiskLevel, Trend},
        statistics::{ConfidenceInterval, ModelMetrics},
        LinearFit, Model, ModelKind, Observation,
    };

    fn format(coefficients: &[f64]) -> String {
        let mut buf = String::new();
        ModelDisplay.format_model(&mut buf, coefficients).unwrap();
        buf
    }

    #[test]
    fn test_sign() {
        assert_eq!(Sign::from_coef(1.0), Sign::Positive);
        assert_eq!(Sign::from_coef(-1.0), Sign::Negative);
        assert_eq!(Sign::from_coef(0.0), Sign::Positive);
        assert_eq!(Sign::Negative.char(), '-');
    }

    #[test]
    fn test_format_coefficient() {
        assert_eq!(format_coefficient(2.5, 1, 2), Some("2.50".to_string()));
        assert_eq!(format_coefficient(1e-20, 1, 2), None);
        assert_eq!(format_coefficient(-1.0, 2, 2), Some(String::new()));
        assert_eq!(format_coefficient(1.0, 0, 2), Some("1.00".to_string()));
        assert_eq!(format_coefficient(2.5e6, 0, 2), Some("2.50e6".to_string()));
    }

    #[test]
    fn test_format_model() {
        assert_eq!(format(&[10.0, 2.0]), "y = 2.00x + 10.00");
        assert_eq!(format(&[-1.0, 2.0]), "y = 2.00x - 1.00");
        assert_eq!(format(&[3.0, 0.0, -1.0]), "y = -x² + 3.00");
        assert_eq!(format(&[0.0, 0.0, 5.0]), "y = 5.00x²");
        assert_eq!(format(&[0.0, 0.0]), "y = 0");
        assert_eq!(format(&[1.2, -0.0004, 0.0]), "y = -4.00e-4x + 1.20");
    }

    #[test]
    fn test_superscript() {
        assert_eq!(format_variable("x", 2), "x²");
        assert_eq!(format_variable("x", -3), "x⁻³");
    }

    fn bundle() -> PredictionBundle {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        PredictionBundle {
            symbol: "AAPL".into(),
            historical: vec![Observation::new(day, 100.0)],
            predictions: vec![PredictionPoint {
                date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
                predicted_price: 90.0,
                confidence_interval: ConfidenceInterval {
                    lower: 85.0,
                    upper: 95.0,
                },
            }],
            metrics: ModelMetrics {
                r_squared: 0.875,
                mse: 4.0,
                mae: 1.5,
                accuracy: 92.0,
            },
            model: Model::from(LinearFit::new(-0.5, 100.0)),
            trend: Trend::Bearish,
            risk_level: RiskLevel::Medium,
        }
    }

    #[test]
    fn test_summary() {
        let text = summary(&bundle());
        assert!(text.starts_with("AAPL (Linear Regression)"));
        assert!(text.contains("y = -0.50x + 100.00"));
        assert!(text.contains("$100.00"));
        assert!(text.contains("$90.00 on 2024-01-31 (85.00, 95.00)"));
        assert!(text.contains("-10.00 (-10.0%)"));
        assert!(text.contains("bearish"));
        assert!(text.contains("medium"));
        assert!(text.contains("R² 87.5%"));
    }

    #[test]
    fn test_comparison_table() {
        let row = |name: &str, kind, r_squared| ModelComparison {
            name: name.into(),
            kind,
            metrics: ModelMetrics {
                r_squared,
                mse: 1.0,
                mae: 1.0,
                accuracy: 50.0,
            },
        };
        let table = comparison_table(&[
            row("Linear Regression", Some(ModelKind::Linear), 0.6),
            row("Polynomial Regression", Some(ModelKind::Quadratic), 0.8),
            row("Moving Average", None, 0.1),
        ]);
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("  Linear Regression"));
        assert!(lines[2].starts_with("* Polynomial Regression"));
        assert!(lines[3].contains("10.0%"));
    }

    #[test]
    fn test_prediction_table() {
        let table = prediction_table(&bundle().predictions);
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("2024-01-31"));
        assert!(lines[1].ends_with("95.00"));
    }
}
