//! Market data error types.
//!
//! Raised when a curve is constructed or modified with inconsistent data.

use crate::types::PricingError;
use thiserror::Error;

/// Market data operation errors.
///
/// # Variants
///
/// - `InsufficientData`: Not enough knots for construction
/// - `MismatchedLengths`: Knot times and rates of different length
/// - `InvalidKnotTime`: Non-positive, non-finite or non-increasing knot time
/// - `NonFiniteRate`: Knot rate is NaN or infinite
/// - `IndexOutOfRange`: Knot index outside the curve
///
/// # Examples
///
/// ```
/// use isda_core::market_data::MarketDataError;
///
/// let err = MarketDataError::InvalidKnotTime { index: 1, t: -1.0 };
/// assert!(format!("{}", err).contains("-1"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketDataError {
    /// Insufficient data for construction.
    #[error("Insufficient data: got {got}, need {need}")]
    InsufficientData {
        /// Number of points provided
        got: usize,
        /// Minimum number of points required
        need: usize,
    },

    /// Knot times and rates have different lengths.
    #[error("Mismatched lengths: {times} knot times, {rates} rates")]
    MismatchedLengths {
        /// Number of knot times
        times: usize,
        /// Number of rates
        rates: usize,
    },

    /// Knot time is non-positive, non-finite or not strictly increasing.
    #[error("Invalid knot time at index {index}: t = {t}")]
    InvalidKnotTime {
        /// Position of the offending knot
        index: usize,
        /// The invalid time
        t: f64,
    },

    /// Knot rate is NaN or infinite.
    #[error("Non-finite rate at index {index}")]
    NonFiniteRate {
        /// Position of the offending knot
        index: usize,
    },

    /// Knot index outside the curve.
    #[error("Knot index {index} out of range for curve with {len} knots")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of knots
        len: usize,
    },
}

impl From<MarketDataError> for PricingError {
    fn from(err: MarketDataError) -> Self {
        PricingError::InvalidInput(err.to_string())
    }
}
