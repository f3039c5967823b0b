//! Instrument definitions consumed by the analytic pricers.
//!
//! # Asset Class Modules
//!
//! - [`credit`]: Credit default swaps in analytic (year-fraction) form and
//!   the ISDA standard model pricer
//!
//! # Examples
//!
//! ```
//! use isda_models::instruments::credit::CdsAnalyticBuilder;
//! use isda_models::instruments::InstrumentError;
//!
//! let cds = CdsAnalyticBuilder::new(5.0).build().unwrap();
//! assert_eq!(cds.num_payments(), 20);
//!
//! let err = CdsAnalyticBuilder::new(5.0).recovery_rate(1.5).build().unwrap_err();
//! assert_eq!(err, InstrumentError::InvalidRecoveryRate { recovery: 1.5 });
//! ```

mod error;

pub mod credit;

pub use error::InstrumentError;
