//! Daily price observations
//!
//! A price series is an ordered slice of [`Observation`]s. The position of an observation in the slice
//! is its index, which stands in for elapsed time when fitting models: the first observation is `x = 0`,
//! the next `x = 1`, and so on.
//!
//! The helpers here pull the `(x, y)` channels out of a series for the fitting and scoring functions.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single day of price history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Calendar date of the observation.
    pub date: NaiveDate,

    /// Price on that date. Never negative.
    pub price: f64,

    /// Traded volume, if known. Not used by any model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<u64>,
}

impl Observation {
    /// Creates an observation without volume information.
    #[must_use]
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self {
            date,
            price,
            volume: None,
        }
    }
}

/// Extension trait for reading the channels of a price series.
pub trait SeriesExt {
    /// Returns the prices, in time order.
    fn prices(&self) -> Vec<f64>;

    /// Returns the index of every observation as an `x` value: `0.0, 1.0, ..., n - 1`.
    fn indices(&self) -> Vec<f64>;

    /// Returns the most recent observation, if any.
    fn latest(&self) -> Option<&Observation>;
}

impl SeriesExt for [Observation] {
    fn prices(&self) -> Vec<f64> {
        self.iter().map(|o| o.price).collect()
    }

    fn indices(&self) -> Vec<f64> {
        index_range(0, self.len())
    }

    fn latest(&self) -> Option<&Observation> {
        self.last()
    }
}

/// Returns `len` consecutive `x` values starting at `start`.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn index_range(start: usize, len: usize) -> Vec<f64> {
    (start..start + len).map(|i| i as f64).collect()
}
