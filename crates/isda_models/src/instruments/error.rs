//! Instrument error types.
//!
//! Structured errors raised while building or validating a CDS description.

use isda_core::types::PricingError;
use thiserror::Error;

/// Instrument-related errors.
///
/// # Variants
/// - `EmptySchedule`: No accrual periods
/// - `MismatchedPeriods`: Accrual period boundaries are out of order
/// - `InvalidPeriod`: A single period has a non-finite or non-positive span
/// - `InvalidRecoveryRate`: Recovery outside `[0, 1]`
/// - `InvalidProtection`: Protection window is empty or reversed
/// - `InvalidTenor`: Tenor and payment frequency give no whole number of periods
///
/// # Examples
/// ```
/// use isda_models::instruments::InstrumentError;
///
/// let err = InstrumentError::InvalidRecoveryRate { recovery: -0.1 };
/// assert!(format!("{}", err).contains("-0.1"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InstrumentError {
    /// The CDS has no accrual periods.
    #[error("CDS schedule has no accrual periods")]
    EmptySchedule,

    /// Consecutive accrual periods overlap or are out of order.
    #[error("Accrual period {index} starts at {start} before the previous period ends at {previous_end}")]
    MismatchedPeriods {
        /// Index of the offending period
        index: usize,
        /// Its accrual start
        start: f64,
        /// Accrual end of the period before it
        previous_end: f64,
    },

    /// A single period is malformed.
    #[error("Invalid accrual period {index}: {message}")]
    InvalidPeriod {
        /// Index of the offending period
        index: usize,
        /// What is wrong with it
        message: String,
    },

    /// Recovery rate outside `[0, 1]`.
    #[error("Invalid recovery rate: R = {recovery}")]
    InvalidRecoveryRate {
        /// The invalid recovery rate
        recovery: f64,
    },

    /// Protection window with `end <= start` or non-finite bounds.
    #[error("Invalid protection window: [{start}, {end}]")]
    InvalidProtection {
        /// Protection start time
        start: f64,
        /// Protection end time
        end: f64,
    },

    /// Tenor is not a positive whole number of payment periods.
    #[error("Invalid tenor: {tenor} years with {payments_per_year} payments per year")]
    InvalidTenor {
        /// Tenor in years
        tenor: f64,
        /// Payments per year
        payments_per_year: u32,
    },
}

impl From<InstrumentError> for PricingError {
    fn from(err: InstrumentError) -> Self {
        PricingError::InvalidInput(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_schedule_display() {
        let err = InstrumentError::EmptySchedule;
        assert_eq!(format!("{}", err), "CDS schedule has no accrual periods");
    }

    #[test]
    fn test_invalid_protection_display() {
        let err = InstrumentError::InvalidProtection {
            start: 1.0,
            end: 0.5,
        };
        assert_eq!(format!("{}", err), "Invalid protection window: [1, 0.5]");
    }

    #[test]
    fn test_invalid_tenor_display() {
        let err = InstrumentError::InvalidTenor {
            tenor: 5.1,
            payments_per_year: 4,
        };
        assert!(format!("{}", err).contains("5.1 years"));
    }

    #[test]
    fn test_from_instrument_error_to_pricing_error() {
        let pricing_err: PricingError = InstrumentError::InvalidRecoveryRate { recovery: 2.0 }.into();
        match pricing_err {
            PricingError::InvalidInput(msg) => assert!(msg.contains("R = 2")),
            _ => panic!("Expected InvalidInput variant"),
        }
    }

    #[test]
    fn test_clone_and_equality() {
        let err1 = InstrumentError::InvalidPeriod {
            index: 3,
            message: "zero length".to_string(),
        };
        let err2 = err1.clone();
        assert_eq!(err1, err2);
    }
}
