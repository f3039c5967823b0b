//! # isda_core: Foundation for ISDA Standard Model CDS Analytics
//!
//! ## Layer 1 (Foundation) Role
//!
//! isda_core is the bottom layer of the workspace, providing:
//! - Numerically stable `(e^x - 1)/x` helpers and their derivatives (`math::epsilon`)
//! - Curve contracts consumed by the analytic pricers (`market_data::curves`)
//! - An ISDA compliant piecewise curve usable as yield or credit curve
//!   (`market_data::curves::IsdaCompliantCurve`)
//! - Clean/dirty price selection (`types::PriceType`)
//! - Error types: `PricingError`, `MarketDataError`
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other isda_* crates, with minimal external dependencies:
//! - num-traits: Traits for generic numerical computation
//! - thiserror: Error derivation
//!
//! ## Usage Examples
//!
//! ```rust
//! use isda_core::market_data::curves::{CreditCurve, IsdaCompliantCurve, IsdaCurve};
//! use isda_core::math::epsilon;
//!
//! // A credit curve with three hazard rate nodes
//! let curve = IsdaCompliantCurve::new(&[1.0, 3.0, 5.0], &[0.01, 0.015, 0.02]).unwrap();
//! let q = curve.discount_factor(2.0);
//! assert!(q > 0.96 && q < 0.98);
//! assert_eq!(curve.num_knots(), 3);
//!
//! // Stable near zero
//! assert_eq!(epsilon(0.0_f64), 1.0);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod market_data;
pub mod math;
pub mod types;
