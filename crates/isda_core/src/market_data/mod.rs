//! Market data structures consumed by the analytic CDS pricers.
//!
//! # Components
//!
//! - [`curves`]: Curve contracts (`IsdaCurve`, `CreditCurve`) and the
//!   piecewise `IsdaCompliantCurve`
//! - [`error`]: Market data error types (`MarketDataError`)
//!
//! # Example
//!
//! ```
//! use isda_core::market_data::curves::{IsdaCompliantCurve, IsdaCurve};
//!
//! let curve = IsdaCompliantCurve::flat(0.05);
//! let df = curve.discount_factor(1.0);
//! assert!((df - 0.951229).abs() < 1e-5);
//! ```

pub mod curves;
pub mod error;

pub use curves::{CreditCurve, IsdaCompliantCurve, IsdaCurve};
pub use error::MarketDataError;
