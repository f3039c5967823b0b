//! Curve samples and the piecewise fold shared by both legs.
//!
//! Each leg integrates over an increasing grid of times. Every grid point is
//! sampled once and the integral is a left fold over consecutive pairs of
//! samples, so each segment sees exactly the previous and the current point.

use isda_core::market_data::curves::{CreditCurve, IsdaCurve};

/// Below this `|dhrt|` the segment integrals switch to their Taylor forms.
pub const SMALL_DHRT: f64 = 1e-5;

/// Half a day in years. The ISDA model adds it to the elapsed accrual time.
pub const HALF_DAY: f64 = 1.0 / 730.0;

/// Added to `dhrt` in the accrual-on-default segment formulas.
pub const DHRT_NUDGE: f64 = 1e-50;

/// Yield and credit curve sampled at one grid time.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RiskyPoint {
    pub t: f64,
    pub ht: f64,
    pub rt: f64,
    /// Risky discount factor `exp(-ht - rt)`.
    pub b: f64,
}

impl RiskyPoint {
    #[inline]
    pub fn sample<Y, C>(t: f64, yield_curve: &Y, credit_curve: &C) -> Self
    where
        Y: IsdaCurve + ?Sized,
        C: IsdaCurve + ?Sized,
    {
        let ht = credit_curve.rt(t);
        let rt = yield_curve.rt(t);
        Self {
            t,
            ht,
            rt,
            b: (-ht - rt).exp(),
        }
    }
}

/// A grid sample carrying the survival sensitivity to one credit node.
#[derive(Debug, Clone, Copy)]
pub(crate) struct NodePoint {
    pub t: f64,
    pub ht: f64,
    pub rt: f64,
    /// Discount factor.
    pub p: f64,
    /// Survival probability.
    pub q: f64,
    /// `p * q`.
    pub b: f64,
    /// d q / d node.
    pub dqdr: f64,
}

impl NodePoint {
    #[inline]
    pub fn sample<Y, C>(t: f64, yield_curve: &Y, credit_curve: &C, node: usize) -> Self
    where
        Y: IsdaCurve + ?Sized,
        C: CreditCurve + ?Sized,
    {
        let ht = credit_curve.rt(t);
        let rt = yield_curve.rt(t);
        let p = (-rt).exp();
        let q = (-ht).exp();
        Self {
            t,
            ht,
            rt,
            p,
            q,
            b: p * q,
            dqdr: credit_curve.single_node_discount_factor_sensitivity(t, node),
        }
    }

    /// True when the node has no support at either end of the segment.
    #[inline]
    pub fn no_support(&self, next: &Self) -> bool {
        self.dqdr == 0.0 && next.dqdr == 0.0
    }
}

/// Left fold of `segment` over consecutive pairs of `points`.
///
/// Fewer than two points give zero.
pub(crate) fn fold_segments<P, I, F>(points: I, mut segment: F) -> f64
where
    I: IntoIterator<Item = P>,
    F: FnMut(&P, &P) -> f64,
{
    let mut iter = points.into_iter();
    let Some(first) = iter.next() else {
        return 0.0;
    };
    let (_, total) = iter.fold((first, 0.0), |(prev, acc), next| {
        let value = segment(&prev, &next);
        (next, acc + value)
    });
    total
}
