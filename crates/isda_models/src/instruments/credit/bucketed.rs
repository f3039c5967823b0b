//! Bucketed (per-node) credit sensitivities.
//!
//! Each function returns one value per credit curve node. The nodes are
//! independent, so with the `parallel` feature they are computed on the rayon
//! thread pool; otherwise sequentially.

use isda_core::market_data::curves::{CreditCurve, IsdaCurve};
use isda_core::types::{PriceType, PricingError};

use super::cds::CdsAnalytic;
use super::pricing::{par_spread_sensitivity, AnalyticCdsPricer};

impl AnalyticCdsPricer {
    /// [`protection_leg_credit_sensitivity`](Self::protection_leg_credit_sensitivity)
    /// for every node of `credit_curve`.
    pub fn protection_leg_credit_sensitivities<Y, C>(
        &self,
        cds: &CdsAnalytic,
        yield_curve: &Y,
        credit_curve: &C,
    ) -> Result<Vec<f64>, PricingError>
    where
        Y: IsdaCurve + Sync + ?Sized,
        C: CreditCurve + Sync + ?Sized,
    {
        per_node(credit_curve.num_knots(), |node| {
            self.protection_leg_credit_sensitivity(cds, yield_curve, credit_curve, node)
        })
    }

    /// [`pv_premium_leg_credit_sensitivity`](Self::pv_premium_leg_credit_sensitivity)
    /// for every node of `credit_curve`.
    pub fn pv_premium_leg_credit_sensitivities<Y, C>(
        &self,
        cds: &CdsAnalytic,
        yield_curve: &Y,
        credit_curve: &C,
    ) -> Result<Vec<f64>, PricingError>
    where
        Y: IsdaCurve + Sync + ?Sized,
        C: CreditCurve + Sync + ?Sized,
    {
        per_node(credit_curve.num_knots(), |node| {
            self.pv_premium_leg_credit_sensitivity(cds, yield_curve, credit_curve, node)
        })
    }

    /// [`pv_credit_sensitivity`](Self::pv_credit_sensitivity) for every node
    /// of `credit_curve`.
    pub fn pv_credit_sensitivities<Y, C>(
        &self,
        cds: &CdsAnalytic,
        yield_curve: &Y,
        credit_curve: &C,
        fractional_spread: f64,
    ) -> Result<Vec<f64>, PricingError>
    where
        Y: IsdaCurve + Sync + ?Sized,
        C: CreditCurve + Sync + ?Sized,
    {
        per_node(credit_curve.num_knots(), |node| {
            self.pv_credit_sensitivity(cds, yield_curve, credit_curve, fractional_spread, node)
        })
    }

    /// [`par_spread_credit_sensitivity`](Self::par_spread_credit_sensitivity)
    /// for every node of `credit_curve`. Leg values are computed once.
    pub fn par_spread_credit_sensitivities<Y, C>(
        &self,
        cds: &CdsAnalytic,
        yield_curve: &Y,
        credit_curve: &C,
    ) -> Result<Vec<f64>, PricingError>
    where
        Y: IsdaCurve + Sync + ?Sized,
        C: CreditCurve + Sync + ?Sized,
    {
        let protection = self.protection_leg(cds, yield_curve, credit_curve);
        let rpv01 = self.pv_premium_leg_per_unit_spread(cds, yield_curve, credit_curve, PriceType::Clean);
        per_node(credit_curve.num_knots(), |node| {
            let d_protection = self.protection_leg_credit_sensitivity(cds, yield_curve, credit_curve, node)?;
            let d_rpv01 = self.pv_premium_leg_credit_sensitivity(cds, yield_curve, credit_curve, node)?;
            Ok(par_spread_sensitivity(protection, rpv01, d_protection, d_rpv01))
        })
    }
}

#[cfg(feature = "parallel")]
fn per_node<F>(num_knots: usize, f: F) -> Result<Vec<f64>, PricingError>
where
    F: Fn(usize) -> Result<f64, PricingError> + Sync + Send,
{
    use rayon::prelude::*;

    (0..num_knots).into_par_iter().map(f).collect()
}

#[cfg(not(feature = "parallel"))]
fn per_node<F>(num_knots: usize, f: F) -> Result<Vec<f64>, PricingError>
where
    F: Fn(usize) -> Result<f64, PricingError> + Sync + Send,
{
    (0..num_knots).map(f).collect()
}
