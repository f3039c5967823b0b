//! The function `ε(x) = (e^x - 1)/x` and its derivatives.
//!
//! Every piecewise integral in the ISDA standard model reduces to an expression
//! of the form `(b0 - b1)/Δ` where `b1 = b0·e^{-Δ}`. When the combined
//! hazard/discount step `Δ` is small the direct form cancels catastrophically,
//! so the pricers rewrite it as `b0·ε(-Δ)` and these helpers switch to a
//! truncated Taylor series below a fixed magnitude.
//!
//! # Definitions
//!
//! ```text
//! ε(x)   = (e^x - 1)/x                          ε(0)   = 1
//! ε'(x)  = ((x - 1)(e^x - 1) + x)/x²            ε'(0)  = 1/2
//! ε''(x) = ((x² - 2x + 2)(e^x - 1) + x² - 2x)/x³   ε''(0) = 1/3
//! ```
//!
//! # Example
//!
//! ```
//! use isda_core::math::{epsilon, epsilon_p, epsilon_pp};
//!
//! assert_eq!(epsilon(0.0_f64), 1.0);
//! assert_eq!(epsilon_p(0.0_f64), 0.5);
//! assert!((epsilon_pp(0.0_f64) - 1.0 / 3.0).abs() < 1e-15);
//!
//! let x = 0.3_f64;
//! assert!((epsilon(x) - x.exp_m1() / x).abs() < 1e-15);
//! ```

use num_traits::Float;

/// Magnitude below which [`epsilon`] and [`epsilon_p`] use their Taylor series.
pub const TAYLOR_THRESHOLD: f64 = 1e-5;

/// Magnitude below which [`epsilon_pp`] uses its Taylor series.
///
/// The closed form of the second derivative cancels to `O(x³)`, so it needs a
/// wider series window than the other two functions to stay accurate.
pub const TAYLOR_THRESHOLD_PP: f64 = 1e-3;

#[inline]
fn lit<T: Float>(x: f64) -> T {
    T::from(x).unwrap_or_else(T::zero)
}

/// `(e^x - 1)/x`, continuously extended so that `epsilon(0) = 1`.
///
/// # Example
///
/// ```
/// use isda_core::math::epsilon;
///
/// let e = epsilon(1e-8_f64);
/// assert!((e - 1.000_000_005).abs() < 1e-15);
/// ```
pub fn epsilon<T: Float>(x: T) -> T {
    if x.abs() > lit(TAYLOR_THRESHOLD) {
        return x.exp_m1() / x;
    }
    T::one()
        + x * (lit::<T>(1.0 / 2.0)
            + x * (lit::<T>(1.0 / 6.0)
                + x * (lit::<T>(1.0 / 24.0)
                    + x * (lit::<T>(1.0 / 120.0) + x * lit::<T>(1.0 / 720.0)))))
}

/// First derivative of [`epsilon`], continuously extended so that `epsilon_p(0) = 1/2`.
pub fn epsilon_p<T: Float>(x: T) -> T {
    if x.abs() > lit(TAYLOR_THRESHOLD) {
        return ((x - T::one()) * x.exp_m1() + x) / (x * x);
    }
    lit::<T>(1.0 / 2.0)
        + x * (lit::<T>(1.0 / 3.0)
            + x * (lit::<T>(1.0 / 8.0)
                + x * (lit::<T>(1.0 / 30.0)
                    + x * (lit::<T>(1.0 / 144.0) + x * lit::<T>(1.0 / 840.0)))))
}

/// Second derivative of [`epsilon`], continuously extended so that `epsilon_pp(0) = 1/3`.
pub fn epsilon_pp<T: Float>(x: T) -> T {
    if x.abs() > lit(TAYLOR_THRESHOLD_PP) {
        let two = lit::<T>(2.0);
        let x2 = x * x;
        return ((x2 - two * x + two) * x.exp_m1() + x2 - two * x) / (x2 * x);
    }
    lit::<T>(1.0 / 3.0)
        + x * (lit::<T>(1.0 / 4.0)
            + x * (lit::<T>(1.0 / 10.0)
                + x * (lit::<T>(1.0 / 36.0)
                    + x * (lit::<T>(1.0 / 168.0)
                        + x * (lit::<T>(1.0 / 960.0) + x * lit::<T>(1.0 / 6480.0))))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    const SWEEP: [f64; 7] = [-2e-5, -1e-5, -5e-6, 0.0, 5e-6, 1e-5, 2e-5];

    fn closed_form(x: f64) -> (f64, f64, f64) {
        let e = x.exp();
        (
            (e - 1.0) / x,
            (x * e - e + 1.0) / (x * x),
            ((x * x - 2.0 * x + 2.0) * e - 2.0) / (x * x * x),
        )
    }

    #[test]
    fn test_values_at_zero() {
        assert_eq!(epsilon(0.0_f64), 1.0);
        assert_eq!(epsilon_p(0.0_f64), 0.5);
        assert_relative_eq!(epsilon_pp(0.0_f64), 1.0 / 3.0, max_relative = 1e-15);
    }

    #[test]
    fn test_matches_closed_form_away_from_zero() {
        for &x in &[-3.0, -0.5, -0.01, 0.01, 0.5, 2.0] {
            let (e, ep, epp) = closed_form(x);
            assert_relative_eq!(epsilon(x), e, max_relative = 1e-12);
            assert_relative_eq!(epsilon_p(x), ep, max_relative = 1e-10);
            assert_relative_eq!(epsilon_pp(x), epp, max_relative = 1e-8);
        }
    }

    #[test]
    fn test_continuity_across_switch_threshold() {
        // Neighbouring sweep points straddle the 1e-5 switch; each value must
        // track the first-order expansion around zero.
        for &x in &SWEEP {
            assert_relative_eq!(epsilon(x), 1.0 + x / 2.0 + x * x / 6.0, max_relative = 1e-8);
            assert_relative_eq!(epsilon_p(x), 0.5 + x / 3.0 + x * x / 8.0, max_relative = 1e-8);
            assert_relative_eq!(epsilon_pp(x), 1.0 / 3.0 + x / 4.0, max_relative = 1e-8);
        }
        for pair in SWEEP.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            assert_relative_eq!(epsilon(a), epsilon(b), max_relative = 1e-4);
            assert_relative_eq!(epsilon_p(a), epsilon_p(b), max_relative = 1e-4);
            assert_relative_eq!(epsilon_pp(a), epsilon_pp(b), max_relative = 1e-4);
        }
    }

    #[test]
    fn test_series_and_closed_form_agree_at_threshold() {
        let below = TAYLOR_THRESHOLD * (1.0 - 1e-9);
        let above = TAYLOR_THRESHOLD * (1.0 + 1e-9);
        for sign in [-1.0, 1.0] {
            assert_relative_eq!(epsilon(sign * below), epsilon(sign * above), max_relative = 1e-12);
            assert_relative_eq!(
                epsilon_p(sign * below),
                epsilon_p(sign * above),
                max_relative = 1e-10
            );
        }

        let below = TAYLOR_THRESHOLD_PP * (1.0 - 1e-9);
        let above = TAYLOR_THRESHOLD_PP * (1.0 + 1e-9);
        for sign in [-1.0, 1.0] {
            assert_relative_eq!(
                epsilon_pp(sign * below),
                epsilon_pp(sign * above),
                max_relative = 1e-8
            );
        }
    }

    #[test]
    fn test_with_f32() {
        assert_eq!(epsilon(0.0_f32), 1.0);
        assert!((epsilon(0.5_f32) - 0.5_f32.exp_m1() / 0.5).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_derivative_matches_finite_difference(x in -2.0_f64..2.0) {
            let h = 1e-5;
            let fd = (epsilon(x + h) - epsilon(x - h)) / (2.0 * h);
            prop_assert!((epsilon_p(x) - fd).abs() < 1e-7);
            let fd2 = (epsilon_p(x + h) - epsilon_p(x - h)) / (2.0 * h);
            prop_assert!((epsilon_pp(x) - fd2).abs() < 1e-5);
        }

        #[test]
        fn prop_epsilon_is_positive_and_increasing(x in -20.0_f64..20.0, dx in 1e-3_f64..1.0) {
            prop_assert!(epsilon(x) > 0.0);
            prop_assert!(epsilon(x + dx) > epsilon(x));
        }
    }
}
