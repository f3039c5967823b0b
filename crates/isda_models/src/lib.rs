//! # isda_models: Analytic CDS Pricing under the ISDA Standard Model
//!
//! ## Layer 2 (Models) Role
//!
//! isda_models builds on isda_core's curve contracts and provides:
//! - Integration schedules over the union of curve knots (`schedules`)
//! - The analytic description of a CDS, `CdsAnalytic`, and a year-fraction
//!   schedule builder (`instruments::credit`)
//! - `AnalyticCdsPricer`: protection leg, premium leg (RPV01), PV, par spread and
//!   their sensitivities to individual credit curve nodes
//!
//! All pricing operations are pure functions of their inputs. The pricer holds
//! only the accrual-on-default formula chosen at construction.
//!
//! ## Usage Examples
//!
//! ```rust
//! use isda_core::market_data::curves::IsdaCompliantCurve;
//! use isda_core::types::PriceType;
//! use isda_models::instruments::credit::{AnalyticCdsPricer, CdsAnalyticBuilder};
//!
//! let yield_curve = IsdaCompliantCurve::flat(0.02);
//! let credit_curve = IsdaCompliantCurve::flat(0.03);
//! let cds = CdsAnalyticBuilder::new(5.0).recovery_rate(0.4).build().unwrap();
//!
//! let pricer = AnalyticCdsPricer::new();
//! let spread = pricer.par_spread(&cds, &yield_curve, &credit_curve);
//! assert!((spread - 0.0178).abs() < 1e-4);
//!
//! let pv = pricer.pv(&cds, &yield_curve, &credit_curve, spread, PriceType::Clean);
//! assert!(pv.abs() < 1e-12);
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel`: Compute bucketed sensitivities across nodes with rayon

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod instruments;
pub mod schedules;
