//! Analytic CDS pricing under the ISDA standard model.
//!
//! # Pricing Model
//!
//! With `P` the discount factor, `Q` the survival probability and
//! `h = -dln Q/dt` the hazard rate, both legs are integrated exactly over an
//! integration grid on which `ln P` and `ln Q` are linear.
//!
//! ## Protection Leg
//!
//! ```text
//! PV_protection = LGD × ∫ h(t) P(t) Q(t) dt / P(t_v)    over [protection start, protection end]
//! ```
//!
//! On a segment with increments `dht` (credit) and `drt` (yield),
//! `dhrt = dht + drt`, the integral is `(b0 - b1) × dht / dhrt`, or
//! `dht × b0 × ε(-dhrt)` when `|dhrt| < 1e-5`.
//!
//! ## Premium Leg
//!
//! Per unit of spread (the RPV01 scaled by 10⁴):
//! ```text
//! RPV01 = [Σ αᵢ P(payᵢ) Q(obsᵢ) + Σ accrual-on-defaultᵢ] / P(t_v)  (- accrued, if clean)
//! ```
//!
//! See [`AccrualOnDefaultFormula`] for the accrual-on-default term.
//!
//! # Example
//!
//! ```
//! use isda_core::market_data::curves::IsdaCompliantCurve;
//! use isda_core::types::PriceType;
//! use isda_models::instruments::credit::{AnalyticCdsPricer, CdsAnalyticBuilder};
//!
//! let yc = IsdaCompliantCurve::flat(0.02);
//! let cc = IsdaCompliantCurve::flat(0.03);
//! let cds = CdsAnalyticBuilder::new(5.0).build().unwrap();
//! let pricer = AnalyticCdsPricer::new();
//!
//! let protection = pricer.protection_leg(&cds, &yc, &cc);
//! let rpv01 = pricer.pv_premium_leg_per_unit_spread(&cds, &yc, &cc, PriceType::Clean);
//! let pv = pricer.pv(&cds, &yc, &cc, 0.01, PriceType::Clean);
//! assert_eq!(pv, protection - 0.01 * rpv01);
//!
//! // Node 0 of a flat curve moves every survival probability
//! let dpv = pricer.pv_credit_sensitivity(&cds, &yc, &cc, 0.01, 0).unwrap();
//! assert!(dpv > 0.0);
//! ```

use isda_core::market_data::curves::{CreditCurve, IsdaCurve};
use isda_core::math::{epsilon, epsilon_p};
use isda_core::types::{PriceType, PricingError};
use tracing::{debug, trace};

use super::accrual::{accrual_schedule, accrual_windows, AccrualOnDefaultFormula};
use super::cds::CdsAnalytic;
use super::integrand::{fold_segments, NodePoint, RiskyPoint, SMALL_DHRT};
use crate::schedules::integration_points;

/// Leg values and derived quantities from a single evaluation of each leg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CdsPriceResult {
    /// Present value of the protection leg per unit notional.
    pub protection_leg: f64,
    /// Clean premium leg per unit spread.
    pub rpv01_clean: f64,
    /// Dirty premium leg per unit spread.
    pub rpv01_dirty: f64,
    /// Accrued premium at the quoted spread.
    pub accrued_premium: f64,
    /// Clean PV for protection bought at the quoted spread.
    pub pv_clean: f64,
    /// Dirty PV for protection bought at the quoted spread.
    pub pv_dirty: f64,
    /// Spread giving zero clean PV.
    pub par_spread: f64,
}

/// Analytic CDS pricer.
///
/// Stateless apart from the accrual-on-default formula chosen at
/// construction. All operations are pure functions of their arguments, so one
/// pricer can be shared freely across threads.
///
/// Value operations return `f64`. Operations taking a credit curve node
/// return `Err(PricingError::NodeOutOfRange)` when `node >= num_knots()`,
/// before doing any work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnalyticCdsPricer {
    formula: AccrualOnDefaultFormula,
}

impl AnalyticCdsPricer {
    /// Pricer using the ISDA standard model (legacy) accrual-on-default formula.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pricer using the given accrual-on-default formula.
    pub fn with_formula(formula: AccrualOnDefaultFormula) -> Self {
        Self { formula }
    }

    /// Pricer using the corrected formula if `use_correct` is set, the
    /// legacy one otherwise.
    pub fn with_correct_accrual_on_default(use_correct: bool) -> Self {
        let formula = if use_correct {
            AccrualOnDefaultFormula::Corrected
        } else {
            AccrualOnDefaultFormula::IsdaLegacy
        };
        Self { formula }
    }

    /// The accrual-on-default formula in use.
    #[inline]
    pub fn formula(&self) -> AccrualOnDefaultFormula {
        self.formula
    }

    // ========================================
    // Protection leg
    // ========================================

    /// Present value of the protection leg per unit notional, as seen at the
    /// valuation time.
    ///
    /// Zero when the protection window is shorter than half a day, since the
    /// integration grid then holds a single point.
    pub fn protection_leg<Y, C>(&self, cds: &CdsAnalytic, yield_curve: &Y, credit_curve: &C) -> f64
    where
        Y: IsdaCurve + ?Sized,
        C: IsdaCurve + ?Sized,
    {
        let schedule = integration_points(
            cds.protection_start(),
            cds.protection_end(),
            yield_curve,
            credit_curve,
        );
        let points = schedule
            .iter()
            .map(|&t| RiskyPoint::sample(t, yield_curve, credit_curve));

        let pv = fold_segments(points, |p0, p1| {
            let dht = p1.ht - p0.ht;
            let dhrt = dht + (p1.rt - p0.rt);
            if dhrt.abs() < SMALL_DHRT {
                dht * p0.b * epsilon(-dhrt)
            } else {
                (p0.b - p1.b) * dht / dhrt
            }
        });

        pv * cds.lgd() / yield_curve.discount_factor(cds.valuation_time())
    }

    /// Sensitivity of [`protection_leg`](Self::protection_leg) to credit
    /// curve node `node`.
    ///
    /// Exactly zero, without integrating, when the node's neighbours
    /// `t[node-1]` and `t[node+1]` do not bracket any part of the protection
    /// window.
    ///
    /// # Errors
    ///
    /// [`PricingError::NodeOutOfRange`] if `node >= credit_curve.num_knots()`.
    pub fn protection_leg_credit_sensitivity<Y, C>(
        &self,
        cds: &CdsAnalytic,
        yield_curve: &Y,
        credit_curve: &C,
        node: usize,
    ) -> Result<f64, PricingError>
    where
        Y: IsdaCurve + ?Sized,
        C: CreditCurve + ?Sized,
    {
        check_node(credit_curve, node)?;

        let last = credit_curve.num_knots() - 1;
        let (start, end) = (cds.protection_start(), cds.protection_end());
        if (node != 0 && end <= credit_curve.time_at_index(node - 1))
            || (node != last && start >= credit_curve.time_at_index(node + 1))
        {
            debug!(node, start, end, "Node has no support over the protection window");
            return Ok(0.0);
        }

        let schedule = integration_points(start, end, yield_curve, credit_curve);
        let points = schedule
            .iter()
            .map(|&t| NodePoint::sample(t, yield_curve, credit_curve, node));

        let sense = fold_segments(points, |p0, p1| {
            if p0.no_support(p1) {
                return 0.0;
            }
            let dht = p1.ht - p0.ht;
            let dhrt = dht + (p1.rt - p0.rt);
            if dhrt.abs() < SMALL_DHRT {
                let e = epsilon(-dhrt);
                let e_p = epsilon_p(-dhrt);
                let a = p0.p * ((1.0 + dht) * e - dht * e_p);
                let b = -p0.p * p0.q / p1.q * (e - dht * e_p);
                a * p0.dqdr + b * p1.dqdr
            } else {
                let w2 = dht / dhrt;
                let w3 = (1.0 - w2) * (p0.b - p1.b);
                (w3 / p0.q + dht * p0.p) / dhrt * p0.dqdr
                    - (w3 / p1.q + dht * p1.p) / dhrt * p1.dqdr
            }
        });

        Ok(sense * cds.lgd() / yield_curve.discount_factor(cds.valuation_time()))
    }

    // ========================================
    // Premium leg
    // ========================================

    /// Premium leg per unit spread (the RPV01 × 10⁴), clean or dirty.
    pub fn pv_premium_leg_per_unit_spread<Y, C>(
        &self,
        cds: &CdsAnalytic,
        yield_curve: &Y,
        credit_curve: &C,
        price_type: PriceType,
    ) -> f64
    where
        Y: IsdaCurve + ?Sized,
        C: IsdaCurve + ?Sized,
    {
        let periods = cds.periods();
        let mut pv: f64 = periods
            .iter()
            .map(|p| {
                p.accrual_fraction
                    * yield_curve.discount_factor(p.payment_time)
                    * credit_curve.discount_factor(p.credit_observation_time)
            })
            .sum();

        if cds.pay_accrued_on_default() {
            let schedule = accrual_schedule(cds, yield_curve, credit_curve);
            pv = accrual_windows(cds).fold(pv, |acc, window| {
                acc + self
                    .formula
                    .period_value(&window, &schedule, yield_curve, credit_curve)
            });
        }

        let pv = pv / yield_curve.discount_factor(cds.valuation_time());
        match price_type {
            PriceType::Clean => pv - cds.accrued_premium_per_unit_spread(),
            PriceType::Dirty => pv,
        }
    }

    /// Sensitivity of the premium leg per unit spread to credit curve node
    /// `node`. Clean and dirty values share it.
    ///
    /// # Errors
    ///
    /// [`PricingError::NodeOutOfRange`] if `node >= credit_curve.num_knots()`.
    pub fn pv_premium_leg_credit_sensitivity<Y, C>(
        &self,
        cds: &CdsAnalytic,
        yield_curve: &Y,
        credit_curve: &C,
        node: usize,
    ) -> Result<f64, PricingError>
    where
        Y: IsdaCurve + ?Sized,
        C: CreditCurve + ?Sized,
    {
        check_node(credit_curve, node)?;

        let periods = cds.periods();
        let mut sense: f64 = periods
            .iter()
            .map(|p| {
                p.accrual_fraction
                    * yield_curve.discount_factor(p.payment_time)
                    * credit_curve.single_node_discount_factor_sensitivity(p.credit_observation_time, node)
            })
            .sum();

        if cds.pay_accrued_on_default() {
            let schedule = accrual_schedule(cds, yield_curve, credit_curve);
            sense = accrual_windows(cds).fold(sense, |acc, window| {
                acc + self
                    .formula
                    .period_sensitivity(&window, &schedule, yield_curve, credit_curve, node)
            });
        }

        Ok(sense / yield_curve.discount_factor(cds.valuation_time()))
    }

    // ========================================
    // Composite values
    // ========================================

    /// PV of bought protection per unit notional:
    /// `protection_leg - fractional_spread × pv_premium_leg_per_unit_spread`.
    pub fn pv<Y, C>(
        &self,
        cds: &CdsAnalytic,
        yield_curve: &Y,
        credit_curve: &C,
        fractional_spread: f64,
        price_type: PriceType,
    ) -> f64
    where
        Y: IsdaCurve + ?Sized,
        C: IsdaCurve + ?Sized,
    {
        let protection = self.protection_leg(cds, yield_curve, credit_curve);
        let rpv01 = self.pv_premium_leg_per_unit_spread(cds, yield_curve, credit_curve, price_type);
        let pv = protection - fractional_spread * rpv01;
        trace!(fractional_spread, %price_type, protection, rpv01, pv, "CDS pv");
        pv
    }

    /// Clean [`pv`](Self::pv).
    pub fn pv_clean<Y, C>(&self, cds: &CdsAnalytic, yield_curve: &Y, credit_curve: &C, fractional_spread: f64) -> f64
    where
        Y: IsdaCurve + ?Sized,
        C: IsdaCurve + ?Sized,
    {
        self.pv(cds, yield_curve, credit_curve, fractional_spread, PriceType::Clean)
    }

    /// Sensitivity of [`pv`](Self::pv) to credit curve node `node`.
    ///
    /// # Errors
    ///
    /// [`PricingError::NodeOutOfRange`] if `node >= credit_curve.num_knots()`.
    pub fn pv_credit_sensitivity<Y, C>(
        &self,
        cds: &CdsAnalytic,
        yield_curve: &Y,
        credit_curve: &C,
        fractional_spread: f64,
        node: usize,
    ) -> Result<f64, PricingError>
    where
        Y: IsdaCurve + ?Sized,
        C: CreditCurve + ?Sized,
    {
        check_node(credit_curve, node)?;
        let d_protection = self.protection_leg_credit_sensitivity(cds, yield_curve, credit_curve, node)?;
        let d_rpv01 = self.pv_premium_leg_credit_sensitivity(cds, yield_curve, credit_curve, node)?;
        let sense = d_protection - fractional_spread * d_rpv01;
        trace!(node, fractional_spread, sense, "CDS pv credit sensitivity");
        Ok(sense)
    }

    /// Spread at which the clean PV is zero:
    /// `protection_leg / pv_premium_leg_per_unit_spread(Clean)`.
    pub fn par_spread<Y, C>(&self, cds: &CdsAnalytic, yield_curve: &Y, credit_curve: &C) -> f64
    where
        Y: IsdaCurve + ?Sized,
        C: IsdaCurve + ?Sized,
    {
        let protection = self.protection_leg(cds, yield_curve, credit_curve);
        let rpv01 = self.pv_premium_leg_per_unit_spread(cds, yield_curve, credit_curve, PriceType::Clean);
        let spread = protection / rpv01;
        trace!(protection, rpv01, spread, "CDS par spread");
        spread
    }

    /// Sensitivity of [`par_spread`](Self::par_spread) to credit curve node
    /// `node`, `s × (dProtection/Protection - dRPV01/RPV01)`.
    ///
    /// # Errors
    ///
    /// [`PricingError::NodeOutOfRange`] if `node >= credit_curve.num_knots()`.
    pub fn par_spread_credit_sensitivity<Y, C>(
        &self,
        cds: &CdsAnalytic,
        yield_curve: &Y,
        credit_curve: &C,
        node: usize,
    ) -> Result<f64, PricingError>
    where
        Y: IsdaCurve + ?Sized,
        C: CreditCurve + ?Sized,
    {
        check_node(credit_curve, node)?;
        let protection = self.protection_leg(cds, yield_curve, credit_curve);
        let rpv01 = self.pv_premium_leg_per_unit_spread(cds, yield_curve, credit_curve, PriceType::Clean);
        let d_protection = self.protection_leg_credit_sensitivity(cds, yield_curve, credit_curve, node)?;
        let d_rpv01 = self.pv_premium_leg_credit_sensitivity(cds, yield_curve, credit_curve, node)?;
        let sense = par_spread_sensitivity(protection, rpv01, d_protection, d_rpv01);
        trace!(node, sense, "CDS par spread credit sensitivity");
        Ok(sense)
    }

    /// Both legs, PVs and par spread at `fractional_spread`, evaluating each
    /// leg once.
    pub fn price<Y, C>(&self, cds: &CdsAnalytic, yield_curve: &Y, credit_curve: &C, fractional_spread: f64) -> CdsPriceResult
    where
        Y: IsdaCurve + ?Sized,
        C: IsdaCurve + ?Sized,
    {
        let protection_leg = self.protection_leg(cds, yield_curve, credit_curve);
        let rpv01_dirty = self.pv_premium_leg_per_unit_spread(cds, yield_curve, credit_curve, PriceType::Dirty);
        let rpv01_clean = rpv01_dirty - cds.accrued_premium_per_unit_spread();

        let result = CdsPriceResult {
            protection_leg,
            rpv01_clean,
            rpv01_dirty,
            accrued_premium: cds.accrued_premium(fractional_spread),
            pv_clean: protection_leg - fractional_spread * rpv01_clean,
            pv_dirty: protection_leg - fractional_spread * rpv01_dirty,
            par_spread: protection_leg / rpv01_clean,
        };
        trace!(?result, "CDS price");
        result
    }
}

/// Quotient rule for `s = A / B`. A zero protection leg gives the limit
/// `dA / B` rather than dividing by zero.
#[inline]
pub(crate) fn par_spread_sensitivity(protection: f64, rpv01: f64, d_protection: f64, d_rpv01: f64) -> f64 {
    if protection == 0.0 {
        return d_protection / rpv01;
    }
    let spread = protection / rpv01;
    spread * (d_protection / protection - d_rpv01 / rpv01)
}

/// Reject node indices outside `[0, num_knots)`.
fn check_node<C: CreditCurve + ?Sized>(credit_curve: &C, node: usize) -> Result<(), PricingError> {
    let num_knots = credit_curve.num_knots();
    if node >= num_knots {
        return Err(PricingError::NodeOutOfRange { node, num_knots });
    }
    Ok(())
}
