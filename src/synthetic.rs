//! Synthetic daily price series
//!
//! Generates a plausible-looking random walk with a per-series drift and volatility, so the
//! models have something to fit without a market-data feed.
//!
//! <div class="warning">
//!
//! **Technical Details**
//!
//! Per series:
//! ```math
//! price₀     ~ U[50, 150)
//! drift      ~ U[-0.01, 0.01)
//! volatility ~ U[0.03, 0.08)
//! ```
//! Per day:
//! ```math
//! price ← price + U[-0.5, 0.5) · volatility · price + drift · price
//! price ← max(price, 1)
//! volume ~ U[100000, 1100000)
//! ```
//! The stored price is rounded to cents. The walk itself continues from the unrounded value.
//! </div>
use chrono::{Days, Local, NaiveDate};
use rand::{rngs::SmallRng, SeedableRng};
use rand_distr::{Distribution, Uniform};

use crate::{
    error::{Error, Result},
    series::Observation,
};

/// Ticker symbols offered for selection.
pub const POPULAR_SYMBOLS: [&str; 8] = ["AAPL", "GOOGL", "MSFT", "AMZN", "TSLA", "META", "NFLX", "NVDA"];

/// Floor applied to every generated price.
pub const MIN_PRICE: f64 = 1.0;

/// Generates synthetic price series.
///
/// Without a seed every call draws from system entropy. With a seed, the same symbol, start
/// date and length always produce the same series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeriesGenerator {
    /// `seed` *(optional)*: Fixes the RNG seed for reproducibility.
    /// If not provided, a system RNG will be used each run.
    pub seed: Option<u64>,
}

impl SeriesGenerator {
    /// Creates a generator with an optional fixed seed.
    #[must_use]
    pub fn new(seed: Option<u64>) -> Self {
        Self { seed }
    }

    fn rng(seed: Option<u64>) -> SmallRng {
        match seed {
            Some(s) => SmallRng::seed_from_u64(s),
            None => SmallRng::from_rng(&mut rand::rng()),
        }
    }

    /// Generates `days` observations ending yesterday.
    ///
    /// # Errors
    /// Returns an error if a sampling range cannot be built.
    pub fn generate(&self, symbol: &str, days: usize) -> Result<Vec<Observation>> {
        let today = Local::now().date_naive();
        let start = today
            .checked_sub_days(Days::new(days as u64))
            .ok_or_else(|| Error::InvalidConfig(format!("{days} days of history is out of range")))?;
        self.generate_from(symbol, start, days)
    }

    /// Generates `days` consecutive observations starting at `start`.
    ///
    /// `symbol` is only used for logging; it does not influence the values.
    ///
    /// # Errors
    /// Returns an error if a sampling range cannot be built.
    pub fn generate_from(
        &self,
        symbol: &str,
        start: NaiveDate,
        days: usize,
    ) -> Result<Vec<Observation>> {
        let mut rng = Self::rng(self.seed);

        let mut price = Uniform::new(50.0_f64, 150.0)?.sample(&mut rng);
        let drift = Uniform::new(-0.01_f64, 0.01)?.sample(&mut rng);
        let volatility = Uniform::new(0.03_f64, 0.08)?.sample(&mut rng);
        let shock = Uniform::new(-0.5_f64, 0.5)?;
        let volume = Uniform::new(100_000_u64, 1_100_000_u64)?;

        log::debug!(
            "Generating {days} days for {symbol}: start {price:.2}, drift {drift:.4}, volatility {volatility:.4}"
        );

        let series = start
            .iter_days()
            .take(days)
            .map(|date| {
                price += shock.sample(&mut rng) * volatility * price + drift * price;
                price = price.max(MIN_PRICE);
                Observation {
                    date,
                    price: (price * 100.0).round() / 100.0,
                    volume: Some(volume.sample(&mut rng)),
                }
            })
            .collect();
        Ok(series)
    }
}

/// Generates `days` observations for `symbol` ending yesterday, from system entropy.
///
/// # Errors
/// Returns an error if a sampling range cannot be built.
pub fn generate_series(symbol: &str, days: usize) -> Result<Vec<Observation>> {
    SeriesGenerator::default().generate(symbol, days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::SeriesExt;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 27).unwrap()
    }

    #[test]
    fn seeded_is_reproducible() {
        let generator = SeriesGenerator::new(Some(42));
        let a = generator.generate_from("AAPL", start(), 120).unwrap();
        let b = generator.generate_from("MSFT", start(), 120).unwrap();
        assert_eq!(a, b);

        let c = SeriesGenerator::new(Some(43))
            .generate_from("AAPL", start(), 120)
            .unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn values_are_in_range() {
        for seed in 0..20 {
            let series = SeriesGenerator::new(Some(seed))
                .generate_from("TSLA", start(), 365)
                .unwrap();
            assert_eq!(series.len(), 365);

            for o in &series {
                assert!(o.price >= MIN_PRICE, "price {} below floor", o.price);
                let cents = o.price * 100.0;
                assert!((cents - cents.round()).abs() < 1e-6, "price {} not in cents", o.price);

                let volume = o.volume.unwrap();
                assert!((100_000..1_100_000).contains(&volume));
            }
        }
    }

    #[test]
    fn dates_are_consecutive() {
        let series = SeriesGenerator::new(Some(7))
            .generate_from("NVDA", start(), 5)
            .unwrap();
        let dates: Vec<_> = series.iter().map(|o| o.date.to_string()).collect();
        assert_eq!(
            dates,
            ["2024-02-27", "2024-02-28", "2024-02-29", "2024-03-01", "2024-03-02"]
        );
    }

    #[test]
    fn ends_yesterday() {
        let series = SeriesGenerator::new(Some(1)).generate("META", 30).unwrap();
        let today = Local::now().date_naive();
        assert_eq!(series.len(), 30);
        assert_eq!(series.latest().unwrap().date.succ_opt(), Some(today));
    }

    #[test]
    fn zero_days() {
        assert!(generate_series("AMZN", 0).unwrap().is_empty());
    }

    #[test]
    fn popular_symbols() {
        assert_eq!(POPULAR_SYMBOLS.len(), 8);
        assert!(POPULAR_SYMBOLS.contains(&"NFLX"));
    }
}
