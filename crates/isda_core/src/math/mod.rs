//! Numerical helpers shared by the analytic CDS pricers.
//!
//! - [`epsilon`]: `(e^x - 1)/x` and its first two derivatives, evaluated with a
//!   Taylor series near zero to avoid cancellation

pub mod epsilon;

pub use epsilon::{epsilon, epsilon_p, epsilon_pp};
