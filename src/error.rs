//! Error types for fitting, scoring and forecasting
//!
//! This module defines the failure modes of an analysis pass, along with a convenient `Result` alias.
//!
//! Most numeric edge cases are handled by policy rather than by failing:
//! - A singular 3×3 normal-equations system yields zero coefficients (see [`crate::QuadraticFit`]).
//! - A constant actual series yields an R² of 1 or 0 (see [`crate::statistics::r_squared`]).
//! - A zero actual value only counts as accurate on an exact match (see [`crate::statistics::accuracy`]).
//!
//! Everything else that would divide by zero is reported here instead of producing `NaN`.

/// Errors that can occur while fitting models or generating predictions.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Cannot compute anything because there is no data.
    #[error("No data available")]
    NoData,

    /// Paired sequences must be the same length.
    #[error("Length mismatch: {actual} actual values but {predicted} predicted values")]
    LengthMismatch {
        /// Number of actual (or x) values
        actual: usize,
        /// Number of predicted (or y) values
        predicted: usize,
    },

    /// The least-squares line is undefined because every x value is identical.
    ///
    /// This is always the case for a single observation.
    #[error("Cannot fit a line: all {n} x values are identical")]
    Degenerate {
        /// Number of data points
        n: usize,
    },

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A sampling distribution could not be built.
    #[error("Invalid sampling range: {0}")]
    Sampling(#[from] rand::distr::uniform::Error),

    /// A configuration file could not be parsed.
    #[error("Failed to parse configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// A configuration file could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Checks that two paired sequences have equal, non-zero length.
    ///
    /// # Errors
    /// Returns [`Error::LengthMismatch`] if the lengths differ, or [`Error::NoData`] if both are empty.
    pub fn check_paired(actual: usize, predicted: usize) -> Result<usize> {
        if actual != predicted {
            return Err(Error::LengthMismatch { actual, predicted });
        }
        if actual == 0 {
            return Err(Error::NoData);
        }
        Ok(actual)
    }
}

/// Result type for fitting and forecasting
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paired_lengths() {
        assert_eq!(Error::check_paired(3, 3).unwrap(), 3);
        assert!(matches!(Error::check_paired(0, 0), Err(Error::NoData)));
        assert!(matches!(
            Error::check_paired(2, 3),
            Err(Error::LengthMismatch {
                actual: 2,
                predicted: 3
            })
        ));
    }
}
