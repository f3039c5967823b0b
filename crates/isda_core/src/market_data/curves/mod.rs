//! Curve abstractions for the ISDA standard model.
//!
//! This module provides:
//! - [`IsdaCurve`]: Discount factor and `RT(t) = -ln P(t)` lookups plus native knot times
//! - [`CreditCurve`]: An [`IsdaCurve`] parameterised by hazard rate nodes, exposing
//!   per-node survival probability sensitivities
//! - [`IsdaCompliantCurve`]: Piecewise curve, linear in `RT` between knots, usable
//!   as either a yield curve or a credit curve

mod isda;
mod traits;

pub use isda::IsdaCompliantCurve;
pub use traits::{CreditCurve, IsdaCurve};
