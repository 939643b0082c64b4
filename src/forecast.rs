//! Forward predictions with confidence intervals
//!
//! A fitted model is extrapolated past the end of the history, one calendar day at a time.
//! Each point carries a symmetric band of `z · SE`, where `SE` is the root mean squared
//! in-sample residual.
//!
//! The band has the same width at every step. It assumes normally distributed residuals
//! with constant variance, and does not widen with distance from the data.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    fit::Predictor,
    series::{Observation, SeriesExt},
    statistics::{self, Confidence, ConfidenceInterval},
};

/// Default number of days to predict.
pub const DEFAULT_HORIZON: usize = 30;

/// One predicted day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionPoint {
    /// The predicted day.
    pub date: NaiveDate,

    /// Predicted price, never negative.
    pub predicted_price: f64,

    /// Range the price is expected to fall in. The lower bound is never negative.
    pub confidence_interval: ConfidenceInterval,
}

/// Root mean squared residual of `model` over the history.
///
/// # Errors
/// [`Error::NoData`] if the series is empty.
pub fn standard_error<P: Predictor + ?Sized>(series: &[Observation], model: &P) -> Result<f64> {
    if series.is_empty() {
        return Err(Error::NoData);
    }

    let fitted = model.fitted(&series.indices());
    Ok(statistics::root_mean_squared_error(
        series.iter().map(|o| o.price),
        fitted.into_iter(),
    ))
}

/// Predicts `horizon` days past the end of `series` at 95% confidence.
///
/// See [`generate_predictions_with`].
///
/// # Errors
/// [`Error::NoData`] if the series is empty.
pub fn generate_predictions<P: Predictor + ?Sized>(
    series: &[Observation],
    model: &P,
    horizon: usize,
) -> Result<Vec<PredictionPoint>> {
    generate_predictions_with(series, model, horizon, Confidence::default())
}

/// Predicts `horizon` days past the end of `series`.
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// SE     = sqrt( Σ (price_i - model(i))² / n )
/// p_k    = model(n + k - 1)          for k = 1..=horizon
/// margin = z · SE
///
/// predicted = max(0, p_k)
/// lower     = max(0, p_k - margin)
/// upper     = predicted + margin
/// ```
/// The date of point `k` is the last observed date plus `k` days.
/// </div>
///
/// A `horizon` of zero gives an empty vector.
///
/// # Errors
/// [`Error::NoData`] if the series is empty.
///
/// # Example
/// ```rust
/// # use chrono::NaiveDate;
/// # use stockfit::{forecast::generate_predictions_with, statistics::Confidence, LinearFit, Observation};
/// let day = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
/// let series = [Observation::new(day, 10.0)];
///
/// let line = LinearFit::new(1.0, 10.0);
/// let points = generate_predictions_with(&series, &line, 2, Confidence::P99).unwrap();
/// assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
/// assert_eq!(points[1].predicted_price, 12.0);
/// ```
#[allow(clippy::cast_precision_loss)]
pub fn generate_predictions_with<P: Predictor + ?Sized>(
    series: &[Observation],
    model: &P,
    horizon: usize,
    confidence: Confidence,
) -> Result<Vec<PredictionPoint>> {
    let last = series.latest().ok_or(Error::NoData)?;
    let se = standard_error(series, model)?;
    let margin = confidence.z_score() * se;
    let n = series.len();

    log::debug!("Forecasting {horizon} days with SE {se:.4} and margin ±{margin:.4} ({confidence})");

    let points = last
        .date
        .iter_days()
        .skip(1)
        .take(horizon)
        .enumerate()
        .map(|(k, date)| {
            let p = model.predict((n + k) as f64);
            let predicted_price = p.max(0.0);
            PredictionPoint {
                date,
                predicted_price,
                confidence_interval: ConfidenceInterval {
                    lower: (p - margin).max(0.0),
                    upper: predicted_price + margin,
                },
            }
        })
        .collect();
    Ok(points)
}
