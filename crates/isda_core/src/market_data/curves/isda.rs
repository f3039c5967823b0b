//! ISDA compliant piecewise curve.
//!
//! The curve is defined by knots `(tᵢ, rᵢ)` of zero rates. `RT(t) = r(t)·t` is
//! linear in `t` between knots, which is the same as a flat forward rate (or
//! flat forward hazard rate) on each segment:
//!
//! ```text
//! RT(t) = r₀·t                                             t ≤ t₀
//! RT(t) = ((tᵢ - t)·RTᵢ₋₁ + (t - tᵢ₋₁)·RTᵢ)/(tᵢ - tᵢ₋₁)     tᵢ₋₁ < t ≤ tᵢ
//! ```
//!
//! Beyond the last knot the last segment is extrapolated linearly; a curve
//! with a single knot is flat.

use super::traits::{CreditCurve, IsdaCurve};
use crate::market_data::error::MarketDataError;

/// Piecewise flat-forward curve on zero rates, as used by the ISDA standard model.
///
/// Serves as a yield curve (rates are interest rates) or a credit curve (rates
/// are zero hazard rates, `P(t)` is the survival probability). Node sensitivities
/// are with respect to the zero rate `rᵢ` of each knot.
///
/// # Example
///
/// ```
/// use isda_core::market_data::curves::{CreditCurve, IsdaCompliantCurve, IsdaCurve};
///
/// let curve = IsdaCompliantCurve::new(&[1.0, 3.0, 5.0], &[0.01, 0.02, 0.025]).unwrap();
///
/// // On a knot, RT is the knot's rate times its time
/// assert!((curve.rt(3.0) - 0.06).abs() < 1e-15);
///
/// // Node 2 has no influence before node 1
/// assert_eq!(curve.single_node_discount_factor_sensitivity(0.5, 2), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct IsdaCompliantCurve {
    /// Knot times, strictly increasing and positive
    t: Vec<f64>,
    /// Zero rates at the knots
    r: Vec<f64>,
    /// `r[i] * t[i]`
    rt: Vec<f64>,
}

impl IsdaCompliantCurve {
    /// Construct a curve from knot times and zero rates.
    ///
    /// # Errors
    ///
    /// * `InsufficientData` - No knots
    /// * `MismatchedLengths` - `times` and `rates` differ in length
    /// * `InvalidKnotTime` - A time is not positive, finite and strictly increasing
    /// * `NonFiniteRate` - A rate is NaN or infinite
    pub fn new(times: &[f64], rates: &[f64]) -> Result<Self, MarketDataError> {
        if times.is_empty() {
            return Err(MarketDataError::InsufficientData { got: 0, need: 1 });
        }
        if times.len() != rates.len() {
            return Err(MarketDataError::MismatchedLengths {
                times: times.len(),
                rates: rates.len(),
            });
        }

        let mut prev = 0.0;
        for (index, &t) in times.iter().enumerate() {
            if !t.is_finite() || t <= prev {
                return Err(MarketDataError::InvalidKnotTime { index, t });
            }
            prev = t;
        }
        if let Some(index) = rates.iter().position(|r| !r.is_finite()) {
            return Err(MarketDataError::NonFiniteRate { index });
        }

        Ok(Self::from_parts(times.to_vec(), rates.to_vec()))
    }

    /// Flat curve with a single knot at one year.
    pub fn flat(rate: f64) -> Self {
        Self::from_parts(vec![1.0], vec![rate])
    }

    fn from_parts(t: Vec<f64>, r: Vec<f64>) -> Self {
        let rt = t.iter().zip(&r).map(|(t, r)| t * r).collect();
        Self { t, r, rt }
    }

    /// Zero rates at the knots.
    #[inline]
    pub fn knot_rates(&self) -> &[f64] {
        &self.r
    }

    /// Zero rate of knot `index`.
    ///
    /// # Errors
    ///
    /// * `IndexOutOfRange` - `index >= num_knots()`
    pub fn zero_rate_at_index(&self, index: usize) -> Result<f64, MarketDataError> {
        self.r
            .get(index)
            .copied()
            .ok_or(MarketDataError::IndexOutOfRange {
                index,
                len: self.r.len(),
            })
    }

    /// Continuously compounded zero rate `RT(t)/t`; the first knot's rate at `t = 0`.
    pub fn zero_rate(&self, t: f64) -> f64 {
        if t <= self.t[0] {
            return self.r[0];
        }
        self.rt(t) / t
    }

    /// A copy of this curve with knot `index` set to `rate`.
    ///
    /// # Errors
    ///
    /// * `IndexOutOfRange` - `index >= num_knots()`
    /// * `NonFiniteRate` - `rate` is NaN or infinite
    pub fn with_rate(&self, index: usize, rate: f64) -> Result<Self, MarketDataError> {
        if index >= self.r.len() {
            return Err(MarketDataError::IndexOutOfRange {
                index,
                len: self.r.len(),
            });
        }
        if !rate.is_finite() {
            return Err(MarketDataError::NonFiniteRate { index });
        }
        let mut r = self.r.clone();
        r[index] = rate;
        Ok(Self::from_parts(self.t.clone(), r))
    }

    /// A copy of this curve with `shift` added to the rate of knot `index`.
    pub fn bumped(&self, index: usize, shift: f64) -> Result<Self, MarketDataError> {
        let rate = self.zero_rate_at_index(index)?;
        self.with_rate(index, rate + shift)
    }

    /// Index `i >= 1` of the knot closing the segment that holds `t > t₀`.
    ///
    /// Times beyond the last knot map onto the last segment.
    #[inline]
    fn segment(&self, t: f64) -> usize {
        self.t.partition_point(|&k| k < t).min(self.t.len() - 1)
    }

    /// Sensitivity of `RT(t)` to the zero rate of knot `node`.
    ///
    /// Non-zero only on the two segments adjacent to the knot (and, for the last
    /// two knots, on the extrapolated region).
    pub fn rt_sensitivity(&self, t: f64, node: usize) -> f64 {
        if t <= self.t[0] || self.t.len() == 1 {
            return if node == 0 { t } else { 0.0 };
        }
        let i = self.segment(t);
        let (t1, t2) = (self.t[i - 1], self.t[i]);
        if node == i - 1 {
            t1 * (t2 - t) / (t2 - t1)
        } else if node == i {
            t2 * (t - t1) / (t2 - t1)
        } else {
            0.0
        }
    }
}

impl IsdaCurve for IsdaCompliantCurve {
    fn rt(&self, t: f64) -> f64 {
        if t <= self.t[0] || self.t.len() == 1 {
            return self.r[0] * t;
        }
        let i = self.segment(t);
        let (t1, t2) = (self.t[i - 1], self.t[i]);
        ((t2 - t) * self.rt[i - 1] + (t - t1) * self.rt[i]) / (t2 - t1)
    }

    #[inline]
    fn knot_times(&self) -> &[f64] {
        &self.t
    }
}

impl CreditCurve for IsdaCompliantCurve {
    fn single_node_discount_factor_sensitivity(&self, t: f64, node: usize) -> f64 {
        let drt = self.rt_sensitivity(t, node);
        if drt == 0.0 {
            return 0.0;
        }
        -self.discount_factor(t) * drt
    }
}
