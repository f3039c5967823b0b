//! Shared value types for the analytic pricers.
//!
//! - [`PriceType`]: clean or dirty premium leg convention
//! - [`PricingError`]: errors raised by pricing operations

pub mod error;
pub mod price_type;

pub use error::PricingError;
pub use price_type::PriceType;
