//! Error types for pricing operations.

use thiserror::Error;

/// Categorised pricing errors.
///
/// Pricing is a pure computation: an error is raised synchronously, before
/// any partial work, and callers treat it as a hard failure of that request.
///
/// # Variants
/// - `InvalidInput`: Malformed argument or unparsable option
/// - `NodeOutOfRange`: Credit curve node index outside `[0, num_knots)`
///
/// # Examples
/// ```
/// use isda_core::types::PricingError;
///
/// let err = PricingError::NodeOutOfRange { node: 7, num_knots: 5 };
/// assert_eq!(
///     format!("{}", err),
///     "Credit curve node 7 out of range: curve has 5 knots"
/// );
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PricingError {
    /// Invalid input data or parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Credit curve node index outside `[0, num_knots)`
    #[error("Credit curve node {node} out of range: curve has {num_knots} knots")]
    NodeOutOfRange {
        /// Requested node index
        node: usize,
        /// Number of knots on the credit curve
        num_knots: usize,
    },
}
