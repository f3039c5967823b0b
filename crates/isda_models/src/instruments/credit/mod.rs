//! Credit default swaps under the ISDA standard model.
//!
//! - [`CdsAnalytic`]: a CDS in year-fraction time, built from explicit
//!   [`CdsAnalyticParts`] or by [`CdsAnalyticBuilder`] for regular schedules
//! - [`AnalyticCdsPricer`]: protection and premium legs, PV, par spread and
//!   their sensitivities to single credit curve nodes
//! - [`AccrualOnDefaultFormula`]: the legacy ISDA or the corrected
//!   accrual-on-default integral, chosen once per pricer
//!
//! # Examples
//!
//! ```
//! use isda_core::market_data::curves::IsdaCompliantCurve;
//! use isda_models::instruments::credit::{
//!     AccrualOnDefaultFormula, AnalyticCdsPricer, CdsAnalyticBuilder,
//! };
//!
//! let yc = IsdaCompliantCurve::flat(0.02);
//! let cc = IsdaCompliantCurve::new(&[1.0, 3.0, 5.0, 7.0], &[0.01, 0.02, 0.03, 0.035]).unwrap();
//! let cds = CdsAnalyticBuilder::new(5.0).build().unwrap();
//!
//! let legacy = AnalyticCdsPricer::new();
//! let corrected = AnalyticCdsPricer::with_formula(AccrualOnDefaultFormula::Corrected);
//! let s_legacy = legacy.par_spread(&cds, &yc, &cc);
//! let s_corrected = corrected.par_spread(&cds, &yc, &cc);
//! assert!((s_legacy - s_corrected).abs() < 1e-5);
//!
//! let buckets = legacy.par_spread_credit_sensitivities(&cds, &yc, &cc).unwrap();
//! assert_eq!(buckets.len(), 4);
//! ```

mod accrual;
mod bucketed;
mod builder;
mod cds;
mod integrand;
mod pricing;

pub use accrual::AccrualOnDefaultFormula;
pub use builder::{CdsAnalyticBuilder, CURVE_ONE_DAY};
pub use cds::{CdsAnalytic, CdsAnalyticParts, CdsPeriod};
pub use integrand::{DHRT_NUDGE, HALF_DAY, SMALL_DHRT};
pub use pricing::{AnalyticCdsPricer, CdsPriceResult};
