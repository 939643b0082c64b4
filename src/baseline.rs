//! Moving-average baseline
//!
//! A flat reference model: the mean of the most recent prices. It is never used to forecast,
//! only to show how much the regression models improve on "tomorrow looks like the last few weeks".
use crate::{
    error::{Error, Result},
    fit::Predictor,
    series::{Observation, SeriesExt},
    statistics,
};

/// Default number of trailing prices to average.
pub const DEFAULT_WINDOW: usize = 20;

/// Mean of the last `window` prices, or of the whole series when it is shorter.
///
/// # Errors
/// [`Error::NoData`] if the series is empty or `window` is zero.
///
/// # Example
/// ```rust
/// # use chrono::NaiveDate;
/// # use stockfit::{baseline::calculate_moving_average, Observation};
/// let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let series: Vec<_> = [10.0, 20.0, 30.0].iter().map(|p| Observation::new(day, *p)).collect();
///
/// assert_eq!(calculate_moving_average(&series, 2).unwrap(), 25.0);
/// assert_eq!(calculate_moving_average(&series, 5).unwrap(), 20.0);
/// ```
pub fn calculate_moving_average(series: &[Observation], window: usize) -> Result<f64> {
    if series.is_empty() || window == 0 {
        return Err(Error::NoData);
    }

    let start = series.len().saturating_sub(window);
    Ok(statistics::mean(series[start..].iter().map(|o| o.price)))
}

/// The moving average repeated over every historical index, for scoring against the actual prices.
///
/// # Errors
/// See [`calculate_moving_average`].
pub fn moving_average_fitted(series: &[Observation], window: usize) -> Result<Vec<f64>> {
    let baseline = MovingAverage::new(series, window)?;
    Ok(baseline.fitted(&series.indices()))
}

/// The moving average as a constant [`Predictor`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovingAverage {
    value: f64,
    window: usize,
}

impl MovingAverage {
    /// Averages the trailing `window` prices of `series`.
    ///
    /// # Errors
    /// See [`calculate_moving_average`].
    pub fn new(series: &[Observation], window: usize) -> Result<Self> {
        let value = calculate_moving_average(series, window)?;
        Ok(Self { value, window })
    }

    /// The averaged price.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Requested window size.
    #[must_use]
    pub fn window(&self) -> usize {
        self.window
    }
}

impl Predictor for MovingAverage {
    fn predict(&self, _x: f64) -> f64 {
        self.value
    }

    fn parameter_count(&self) -> usize {
        1
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use chrono::{Days, NaiveDate};

    use super::*;

    fn series(prices: &[f64]) -> Vec<Observation> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        prices
            .iter()
            .enumerate()
            .map(|(i, p)| Observation::new(start + Days::new(i as u64), *p))
            .collect()
    }

    #[test]
    fn trailing_window() {
        let s = series(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(calculate_moving_average(&s, 3).unwrap(), 5.0);
        assert_eq!(calculate_moving_average(&s, 1).unwrap(), 6.0);
        assert_eq!(calculate_moving_average(&s, 6).unwrap(), 3.5);
    }

    #[test]
    fn short_series_uses_everything() {
        let s = series(&[10.0, 20.0, 30.0]);
        assert_eq!(calculate_moving_average(&s, 5).unwrap(), 20.0);
        assert_eq!(calculate_moving_average(&s, DEFAULT_WINDOW).unwrap(), 20.0);
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(calculate_moving_average(&[], 5), Err(Error::NoData)));
        assert!(matches!(
            calculate_moving_average(&series(&[1.0]), 0),
            Err(Error::NoData)
        ));
    }

    #[test]
    fn fitted_is_flat() {
        let s = series(&[2.0, 4.0, 6.0, 8.0]);
        assert_eq!(moving_average_fitted(&s, 2).unwrap(), vec![7.0; 4]);

        let baseline = MovingAverage::new(&s, 2).unwrap();
        assert_eq!(baseline.predict(100.0), 7.0);
        assert_eq!(baseline.window(), 2);
    }
}
