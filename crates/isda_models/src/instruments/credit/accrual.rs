//! Accrual-on-default integration.
//!
//! When a CDS pays accrued premium on default, each payment period adds
//!
//! ```text
//! rate × ∫ (t - s) h(t) P(t) Q(t) dt    over [max(s, step-in), e]
//! ```
//!
//! evaluated piece by piece between integration points `t0 < t1`. Two closed
//! forms of the piecewise integral exist:
//!
//! - [`AccrualOnDefaultFormula::IsdaLegacy`]: the ISDA standard model's
//!   formula. It integrates the elapsed time `t - s` plus half a day exactly:
//!
//!   ```text
//!   dht/dhrt × [(t0 - s + ½d)·b0 - (t1 - s + ½d)·b1 + dt/dhrt·(b0 - b1)]
//!   ```
//!
//!   Relative to [`Corrected`](AccrualOnDefaultFormula::Corrected) it carries
//!   the extra term `dht/dhrt × (t0 - s + ½d)·(b0 - b1)`. It is the default
//!   so that results match the reference model.
//! - [`AccrualOnDefaultFormula::Corrected`]: drops that term, so on each
//!   segment the elapsed time is measured from the segment start `t0` rather
//!   than from `s`:
//!
//!   ```text
//!   dht/dhrt × dt × [(b0 - b1)/dhrt - b1]
//!   ```
//!
//!   This equals the integral above only when the window is a single segment
//!   starting at `s`; with interior knots the result depends on the grid.

use std::fmt;
use std::str::FromStr;

use isda_core::market_data::curves::{CreditCurve, IsdaCurve};
use isda_core::math::{epsilon, epsilon_p, epsilon_pp};
use isda_core::types::PricingError;

use super::integrand::{fold_segments, NodePoint, RiskyPoint, DHRT_NUDGE, HALF_DAY, SMALL_DHRT};
use super::cds::CdsAnalytic;
use crate::schedules::{integration_points, truncate_set_inclusive};

/// Closed form used for the accrual-on-default integral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AccrualOnDefaultFormula {
    /// ISDA standard model formula: elapsed time from accrual start plus half a day.
    #[default]
    IsdaLegacy,
    /// Elapsed time from each segment start, without the half day.
    Corrected,
}

impl AccrualOnDefaultFormula {
    /// Lowercase name, as accepted by [`FromStr`].
    pub fn name(&self) -> &'static str {
        match self {
            AccrualOnDefaultFormula::IsdaLegacy => "legacy",
            AccrualOnDefaultFormula::Corrected => "corrected",
        }
    }

    /// Accrual-on-default value of one payment period, per unit spread.
    ///
    /// `schedule` is the integration grid for the whole premium leg. An empty
    /// window (`max(acc_start, step_in) >= acc_end`) gives zero.
    pub(crate) fn period_value<Y, C>(
        self,
        window: &AccrualWindow,
        schedule: &[f64],
        yield_curve: &Y,
        credit_curve: &C,
    ) -> f64
    where
        Y: IsdaCurve + ?Sized,
        C: IsdaCurve + ?Sized,
    {
        let Some(knots) = window.knots(schedule) else {
            return 0.0;
        };
        let points = knots
            .iter()
            .map(|&t| RiskyPoint::sample(t, yield_curve, credit_curve));

        let acc_start = window.acc_start;
        let pv = match self {
            AccrualOnDefaultFormula::IsdaLegacy => {
                fold_segments(points, |a, b| legacy_segment(acc_start, a, b))
            }
            AccrualOnDefaultFormula::Corrected => fold_segments(points, corrected_segment),
        };
        window.rate * pv
    }

    /// Sensitivity of [`period_value`](Self::period_value) to one credit node.
    pub(crate) fn period_sensitivity<Y, C>(
        self,
        window: &AccrualWindow,
        schedule: &[f64],
        yield_curve: &Y,
        credit_curve: &C,
        node: usize,
    ) -> f64
    where
        Y: IsdaCurve + ?Sized,
        C: CreditCurve + ?Sized,
    {
        let Some(knots) = window.knots(schedule) else {
            return 0.0;
        };
        let points = knots
            .iter()
            .map(|&t| NodePoint::sample(t, yield_curve, credit_curve, node));

        let acc_start = window.acc_start;
        let sense = match self {
            AccrualOnDefaultFormula::IsdaLegacy => {
                fold_segments(points, |a, b| legacy_segment_sensitivity(acc_start, a, b))
            }
            AccrualOnDefaultFormula::Corrected => {
                fold_segments(points, corrected_segment_sensitivity)
            }
        };
        window.rate * sense
    }
}

/// One payment period as seen by the accrual-on-default integral.
///
/// Times are shifted back one curve day when protection starts at the
/// beginning of the day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct AccrualWindow {
    /// Premium accrued per unit time, `accrual_fraction / (acc_end - acc_start)`.
    pub rate: f64,
    pub step_in: f64,
    pub acc_start: f64,
    pub acc_end: f64,
}

impl AccrualWindow {
    /// Integration knots over `[max(acc_start, step_in), acc_end]`, or `None`
    /// if that interval is empty.
    fn knots(&self, schedule: &[f64]) -> Option<Vec<f64>> {
        let start = self.acc_start.max(self.step_in);
        if start >= self.acc_end {
            return None;
        }
        Some(truncate_set_inclusive(start, self.acc_end, schedule))
    }
}

/// Integration grid covering every accrual period of `cds`.
pub(crate) fn accrual_schedule<Y, C>(cds: &CdsAnalytic, yield_curve: &Y, credit_curve: &C) -> Vec<f64>
where
    Y: IsdaCurve + ?Sized,
    C: IsdaCurve + ?Sized,
{
    let periods = cds.periods();
    let first = periods.first().map_or(0.0, |p| p.acc_start);
    let last = periods.last().map_or(0.0, |p| p.acc_end);
    integration_points(first, last, yield_curve, credit_curve)
}

/// The accrual-on-default window of each payment period of `cds`, in order.
pub(crate) fn accrual_windows(cds: &CdsAnalytic) -> impl Iterator<Item = AccrualWindow> + '_ {
    let offset = if cds.protection_from_start_of_day() {
        -cds.curve_one_day()
    } else {
        0.0
    };
    let step_in = cds.step_in() + offset;
    cds.periods().iter().map(move |p| {
        let acc_start = p.acc_start + offset;
        let acc_end = p.acc_end + offset;
        AccrualWindow {
            rate: p.accrual_fraction / (acc_end - acc_start),
            step_in,
            acc_start,
            acc_end,
        }
    })
}

impl fmt::Display for AccrualOnDefaultFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AccrualOnDefaultFormula {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" | "isda" | "isda_legacy" => Ok(AccrualOnDefaultFormula::IsdaLegacy),
            "corrected" | "correct" => Ok(AccrualOnDefaultFormula::Corrected),
            other => Err(PricingError::InvalidInput(format!(
                "unknown accrual-on-default formula '{}': expected 'legacy' or 'corrected'",
                other
            ))),
        }
    }
}

/// `(dt, dht, dhrt)` for a segment, with the nudge applied to `dhrt`.
#[inline]
fn increments(t0: f64, ht0: f64, rt0: f64, t1: f64, ht1: f64, rt1: f64) -> (f64, f64, f64) {
    let dht = ht1 - ht0;
    let drt = rt1 - rt0;
    (t1 - t0, dht, dht + drt + DHRT_NUDGE)
}

fn legacy_segment(acc_start: f64, p0: &RiskyPoint, p1: &RiskyPoint) -> f64 {
    let (dt, dht, dhrt) = increments(p0.t, p0.ht, p0.rt, p1.t, p1.ht, p1.rt);
    let t0 = p0.t - acc_start + HALF_DAY;
    let t1 = p1.t - acc_start + HALF_DAY;

    if dhrt.abs() < SMALL_DHRT {
        dht * p0.b * (t0 * epsilon(-dhrt) + dt * epsilon_p(-dhrt))
    } else {
        dht / dhrt * (t0 * p0.b - t1 * p1.b + dt / dhrt * (p0.b - p1.b))
    }
}

fn corrected_segment(p0: &RiskyPoint, p1: &RiskyPoint) -> f64 {
    let (dt, dht, dhrt) = increments(p0.t, p0.ht, p0.rt, p1.t, p1.ht, p1.rt);

    if dhrt.abs() < SMALL_DHRT {
        dht * dt * p0.b * epsilon_p(-dhrt)
    } else {
        dht * dt / dhrt * ((p0.b - p1.b) / dhrt - p1.b)
    }
}

fn legacy_segment_sensitivity(acc_start: f64, p0: &NodePoint, p1: &NodePoint) -> f64 {
    let (dt, dht, dhrt) = increments(p0.t, p0.ht, p0.rt, p1.t, p1.ht, p1.rt);
    let t0 = p0.t - acc_start + HALF_DAY;
    let t1 = p1.t - acc_start + HALF_DAY;

    if dhrt.abs() < SMALL_DHRT {
        let e = epsilon(-dhrt);
        let e_p = epsilon_p(-dhrt);
        let e_pp = epsilon_pp(-dhrt);
        let w1 = t0 * e + dt * e_p;
        let w2 = t0 * e_p + dt * e_pp;
        let a = p0.p * ((1.0 + dhrt) * w1 - dht * w2);
        let b = p0.b / p1.q * (-w1 + dht * w2);
        a * p0.dqdr + b * p1.dqdr
    } else {
        let w1 = dt / dhrt;
        let w2 = dht / dhrt;
        let w3 = (t0 + w1) * p0.b - (t1 + w1) * p1.b;
        let w4 = (1.0 - w2) / dhrt;
        let w5 = w1 / dhrt * (p0.b - p1.b);
        let a = w4 * w3 / p0.q + w2 * ((t0 + w1) * p0.p - w5 / p0.q);
        let b = w4 * w3 / p1.q + w2 * ((t1 + w1) * p1.p - w5 / p1.q);
        a * p0.dqdr - b * p1.dqdr
    }
}

fn corrected_segment_sensitivity(p0: &NodePoint, p1: &NodePoint) -> f64 {
    let (dt, dht, dhrt) = increments(p0.t, p0.ht, p0.rt, p1.t, p1.ht, p1.rt);

    if dhrt.abs() < SMALL_DHRT {
        let e_p = epsilon_p(-dhrt);
        let e_pp = epsilon_pp(-dhrt);
        let a = p0.p * dt * ((1.0 + dht) * e_p - dht * e_pp);
        let b = p0.b * dt / p1.q * (-e_p + dht * e_pp);
        a * p0.dqdr + b * p1.dqdr
    } else {
        let w5 = (p0.b - p1.b) / dhrt;
        let w1 = w5 - p1.b;
        let w2 = dht / dhrt;
        let w3 = dt / dhrt;
        let w4 = (1.0 - w2) * w1;
        let a = w3 / p0.q * (w4 + w2 * (p0.b - w5));
        let b = w3 / p1.q * (w4 + w2 * (p1.b * (1.0 + dhrt) - w5));
        a * p0.dqdr - b * p1.dqdr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruments::credit::CdsAnalyticBuilder;
    use approx::assert_relative_eq;
    use isda_core::market_data::curves::IsdaCompliantCurve;

    const FORMULAS: [AccrualOnDefaultFormula; 2] =
        [AccrualOnDefaultFormula::IsdaLegacy, AccrualOnDefaultFormula::Corrected];

    fn window(rate: f64, step_in: f64, acc_start: f64, acc_end: f64) -> AccrualWindow {
        AccrualWindow {
            rate,
            step_in,
            acc_start,
            acc_end,
        }
    }

    fn curves() -> (IsdaCompliantCurve, IsdaCompliantCurve) {
        let yc = IsdaCompliantCurve::new(&[0.5, 1.0, 2.0], &[0.01, 0.015, 0.02]).unwrap();
        let cc = IsdaCompliantCurve::new(&[0.5, 1.0, 3.0], &[0.01, 0.02, 0.03]).unwrap();
        (yc, cc)
    }

    #[test]
    fn test_default_is_legacy() {
        assert_eq!(AccrualOnDefaultFormula::default(), AccrualOnDefaultFormula::IsdaLegacy);
    }

    #[test]
    fn test_parse_and_display() {
        for formula in FORMULAS {
            let parsed: AccrualOnDefaultFormula = formula.to_string().parse().unwrap();
            assert_eq!(parsed, formula);
        }
        assert_eq!(
            "ISDA".parse::<AccrualOnDefaultFormula>().unwrap(),
            AccrualOnDefaultFormula::IsdaLegacy
        );
        assert!(matches!(
            "exact".parse::<AccrualOnDefaultFormula>(),
            Err(PricingError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_windows_shift_by_one_day() {
        let cds = CdsAnalyticBuilder::new(1.0).build().unwrap();
        let day = cds.curve_one_day();
        let windows: Vec<_> = accrual_windows(&cds).collect();
        assert_eq!(windows.len(), 4);
        assert_relative_eq!(windows[0].acc_start, -day);
        assert_relative_eq!(windows[0].step_in, 0.0);
        assert_relative_eq!(windows[3].acc_end, 1.0, epsilon = 1e-15);
        // ACT/360 accrual over ACT/365 time
        assert_relative_eq!(windows[0].rate, 365.0 / 360.0, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_window_is_zero() {
        let (yc, cc) = curves();
        let schedule = [0.0, 0.5, 1.0];
        for formula in FORMULAS {
            assert_eq!(formula.period_value(&window(1.0, 0.6, 0.25, 0.5), &schedule, &yc, &cc), 0.0);
            assert_eq!(
                formula.period_sensitivity(&window(1.0, 0.5, 0.25, 0.5), &schedule, &yc, &cc, 1),
                0.0
            );
        }
    }

    #[test]
    fn test_zero_hazard_is_zero() {
        let yc = IsdaCompliantCurve::flat(0.03);
        let cc = IsdaCompliantCurve::flat(0.0);
        let schedule = [0.0, 1.0];
        for formula in FORMULAS {
            assert_eq!(formula.period_value(&window(1.0, 0.0, 0.0, 1.0), &schedule, &yc, &cc), 0.0);
        }
    }

    #[test]
    fn test_corrected_matches_closed_form_flat() {
        // Flat hazard h and rate r: ∫ t h exp(-(h + r) t) dt over [0, T]
        let (h, r, end) = (0.03_f64, 0.02_f64, 0.25_f64);
        let yc = IsdaCompliantCurve::flat(r);
        let cc = IsdaCompliantCurve::flat(h);
        let value = AccrualOnDefaultFormula::Corrected.period_value(
            &window(1.0, 0.0, 0.0, end),
            &[0.0, end],
            &yc,
            &cc,
        );

        let k = h + r;
        let exact = h * ((1.0 - (-k * end).exp() * (1.0 + k * end)) / (k * k));
        assert_relative_eq!(value, exact, max_relative = 1e-12);
    }

    #[test]
    fn test_legacy_matches_half_day_shifted_integral() {
        // ∫ (t + ½d) h exp(-k t) dt over [0, T], flat hazard h and k = h + r
        let (h, r, end) = (0.03_f64, 0.02_f64, 0.25_f64);
        let yc = IsdaCompliantCurve::flat(r);
        let cc = IsdaCompliantCurve::flat(h);
        let schedule = [0.0, end / 2.0, end];
        let value = AccrualOnDefaultFormula::IsdaLegacy.period_value(
            &window(1.0, 0.0, 0.0, end),
            &schedule,
            &yc,
            &cc,
        );

        let k = h + r;
        let b1 = (-k * end).exp();
        let exact = h / k * (HALF_DAY - (end + HALF_DAY) * b1) + h / (k * k) * (1.0 - b1);
        assert_relative_eq!(value, exact, max_relative = 1e-10);
    }

    #[test]
    fn test_corrected_restarts_at_each_segment() {
        // On [a, a + L]: ∫ (t - a) h exp(-k t) dt = exp(-k a) g(L)
        let (h, r, end) = (0.03_f64, 0.02_f64, 0.5_f64);
        let yc = IsdaCompliantCurve::flat(r);
        let cc = IsdaCompliantCurve::flat(h);
        let k = h + r;
        let g = |len: f64| h * (1.0 - (-k * len).exp() * (1.0 + k * len)) / (k * k);

        let w = window(1.0, 0.0, 0.0, end);
        let whole = AccrualOnDefaultFormula::Corrected.period_value(&w, &[0.0, end], &yc, &cc);
        let split = AccrualOnDefaultFormula::Corrected.period_value(&w, &[0.0, end / 2.0, end], &yc, &cc);

        assert_relative_eq!(whole, g(end), max_relative = 1e-10);
        assert_relative_eq!(split, g(end / 2.0) * (1.0 + (-k * end / 2.0).exp()), max_relative = 1e-10);
        assert!(split < whole);
    }

    #[test]
    fn test_legacy_half_day_bias() {
        let (yc, cc) = curves();
        let schedule = [0.0, 0.25, 0.5];
        let w = window(4.0, 0.0, 0.0, 0.25);
        let legacy = AccrualOnDefaultFormula::IsdaLegacy.period_value(&w, &schedule, &yc, &cc);
        let corrected = AccrualOnDefaultFormula::Corrected.period_value(&w, &schedule, &yc, &cc);
        // About one percent on a quarterly period
        assert!(legacy > corrected);
        assert!((legacy - corrected) / corrected < 0.02);
    }

    #[test]
    fn test_sensitivities_match_finite_difference() {
        let (yc, cc) = curves();
        let schedule = [0.0, 0.5, 1.0, 1.5];
        let w = window(2.0, 0.1, 0.0, 1.5);
        let h = 1e-6;
        for formula in FORMULAS {
            for node in 0..3 {
                let up = cc.bumped(node, h).unwrap();
                let down = cc.bumped(node, -h).unwrap();
                let fd = (formula.period_value(&w, &schedule, &yc, &up)
                    - formula.period_value(&w, &schedule, &yc, &down))
                    / (2.0 * h);
                let analytic = formula.period_sensitivity(&w, &schedule, &yc, &cc, node);
                assert_relative_eq!(analytic, fd, max_relative = 1e-6, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_small_dhrt_branch_sensitivities() {
        let yc = IsdaCompliantCurve::flat(0.0);
        let cc = IsdaCompliantCurve::new(&[0.5, 1.0], &[2e-6, 4e-6]).unwrap();
        let schedule = [0.0, 0.5, 1.0];
        let w = window(1.0, 0.0, 0.0, 1.0);
        let h = 1e-7;
        for formula in FORMULAS {
            for node in 0..2 {
                let up = cc.bumped(node, h).unwrap();
                let down = cc.bumped(node, -h).unwrap();
                let fd = (formula.period_value(&w, &schedule, &yc, &up)
                    - formula.period_value(&w, &schedule, &yc, &down))
                    / (2.0 * h);
                let analytic = formula.period_sensitivity(&w, &schedule, &yc, &cc, node);
                assert_relative_eq!(analytic, fd, max_relative = 1e-5, epsilon = 1e-9);
            }
        }
    }
}
