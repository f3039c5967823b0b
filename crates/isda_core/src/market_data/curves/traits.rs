//! Curve contracts consumed by the analytic CDS pricers.

/// Curve giving discount factors and the cumulative rate `RT(t) = -ln P(t)`.
///
/// Yield curves and credit (survival) curves share this contract; for a credit
/// curve `P(t)` is the survival probability and `RT(t)` the integrated hazard.
///
/// # Contract
///
/// - `rt(t)` is defined for every `t >= 0` a schedule may ask for
/// - `discount_factor(t) = exp(-rt(t))`
/// - `knot_times()` is strictly increasing; between consecutive knots the curve
///   is assumed to have a flat forward rate, so piecewise integrals over the
///   knot grid are exact
///
/// Implementations are read-only once built. Pricing calls only read a curve,
/// so sharing one across threads is safe whenever the implementation is `Sync`.
///
/// # Example
///
/// ```
/// use isda_core::market_data::curves::{IsdaCompliantCurve, IsdaCurve};
///
/// let curve = IsdaCompliantCurve::flat(0.02);
/// assert!((curve.rt(2.0) - 0.04).abs() < 1e-15);
/// assert!((curve.discount_factor(2.0) - (-0.04_f64).exp()).abs() < 1e-15);
/// ```
pub trait IsdaCurve {
    /// Return `RT(t)`, the zero rate multiplied by time.
    fn rt(&self, t: f64) -> f64;

    /// Return the discount factor `P(t) = exp(-RT(t))`.
    fn discount_factor(&self, t: f64) -> f64 {
        (-self.rt(t)).exp()
    }

    /// Return the native knot times, strictly increasing.
    fn knot_times(&self) -> &[f64];
}

/// Credit (survival) curve parameterised by a finite set of hazard rate nodes.
///
/// # Contract
///
/// `single_node_discount_factor_sensitivity(t, i)` is the partial derivative of
/// the survival probability at `t` with respect to the parameter of node `i`.
/// It is zero wherever node `i` has no local support, which callers use to
/// skip work. Callers validate `node < num_knots()` before asking.
pub trait CreditCurve: IsdaCurve {
    /// Number of nodes (knots).
    fn num_knots(&self) -> usize {
        self.knot_times().len()
    }

    /// Time of node `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= num_knots()`.
    fn time_at_index(&self, index: usize) -> f64 {
        self.knot_times()[index]
    }

    /// Sensitivity of the survival probability at `t` to node `node`.
    fn single_node_discount_factor_sensitivity(&self, t: f64, node: usize) -> f64;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Flat-hazard mock with a single node, exercising the default methods
    struct MockCurve {
        rate: f64,
        knots: [f64; 1],
    }

    impl IsdaCurve for MockCurve {
        fn rt(&self, t: f64) -> f64 {
            self.rate * t
        }

        fn knot_times(&self) -> &[f64] {
            &self.knots
        }
    }

    impl CreditCurve for MockCurve {
        fn single_node_discount_factor_sensitivity(&self, t: f64, _node: usize) -> f64 {
            -t * self.discount_factor(t)
        }
    }

    #[test]
    fn test_default_discount_factor() {
        let curve = MockCurve {
            rate: 0.05,
            knots: [1.0],
        };
        assert!((curve.discount_factor(1.0) - (-0.05_f64).exp()).abs() < 1e-15);
    }

    #[test]
    fn test_default_knot_accessors() {
        let curve = MockCurve {
            rate: 0.05,
            knots: [3.0],
        };
        assert_eq!(curve.num_knots(), 1);
        assert_eq!(curve.time_at_index(0), 3.0);
    }

    #[test]
    fn test_usable_as_trait_object() {
        let curve = MockCurve {
            rate: 0.01,
            knots: [1.0],
        };
        let dyn_curve: &dyn CreditCurve = &curve;
        assert!(dyn_curve.single_node_discount_factor_sensitivity(2.0, 0) < 0.0);
    }
}
