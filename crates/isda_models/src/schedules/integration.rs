//! Integration schedule generation.
//!
//! The analytic legs integrate products of discount and survival factors.
//! Between consecutive knots of both curves each integrand is a single
//! exponential, so integrating piece by piece over the merged knot grid is exact.

use isda_core::market_data::curves::IsdaCurve;

/// Two times closer than this (half a day) are treated as the same point.
pub const POINT_TOLERANCE: f64 = 1.0 / 730.0;

#[inline]
fn is_distinct(a: f64, b: f64) -> bool {
    (a - b).abs() > POINT_TOLERANCE
}

/// The elements of the sorted `set` lying strictly inside `(lower, upper)`.
pub fn truncate_set_exclusive(lower: f64, upper: f64, set: &[f64]) -> &[f64] {
    let lo = set.partition_point(|&t| t <= lower);
    let hi = set.partition_point(|&t| t < upper);
    if lo >= hi {
        return &[];
    }
    &set[lo..hi]
}

/// Integration grid over `[start, end]` for the given yield and credit curves.
///
/// See [`integration_points_from_sets`].
///
/// # Example
///
/// ```
/// use isda_core::market_data::curves::IsdaCompliantCurve;
/// use isda_models::schedules::integration_points;
///
/// let yc = IsdaCompliantCurve::new(&[1.0, 2.0, 5.0], &[0.01, 0.01, 0.01]).unwrap();
/// let cc = IsdaCompliantCurve::new(&[3.0, 5.0, 7.0], &[0.02, 0.02, 0.02]).unwrap();
///
/// let points = integration_points(0.5, 6.0, &yc, &cc);
/// assert_eq!(points, vec![0.5, 1.0, 2.0, 3.0, 5.0, 6.0]);
/// ```
pub fn integration_points<Y, C>(start: f64, end: f64, yield_curve: &Y, credit_curve: &C) -> Vec<f64>
where
    Y: IsdaCurve + ?Sized,
    C: IsdaCurve + ?Sized,
{
    integration_points_from_sets(start, end, yield_curve.knot_times(), credit_curve.knot_times())
}

/// Merge `start`, `end` and the members of two sorted sets lying strictly
/// between them into one increasing grid.
///
/// Points within [`POINT_TOLERANCE`] of the previously kept point are dropped.
/// `end` is always the last point: if it is within tolerance of the last kept
/// knot it replaces that knot.
///
/// A window shorter than [`POINT_TOLERANCE`] collapses to the single point
/// `[end]`, so any leg integrated over it is zero.
pub fn integration_points_from_sets(start: f64, end: f64, set_a: &[f64], set_b: &[f64]) -> Vec<f64> {
    let inner_a = truncate_set_exclusive(start, end, set_a);
    let inner_b = truncate_set_exclusive(start, end, set_b);

    let mut inner: Vec<f64> = inner_a.iter().chain(inner_b).copied().collect();
    inner.sort_by(f64::total_cmp);

    let mut points = Vec::with_capacity(inner.len() + 2);
    points.push(start);
    for t in inner {
        if is_distinct(points[points.len() - 1], t) {
            points.push(t);
        }
    }

    let last = points.len() - 1;
    if is_distinct(points[last], end) {
        points.push(end);
    } else {
        points[last] = end;
    }
    points
}

/// Clip the sorted grid `set` to `[lower, upper]`, keeping both bounds.
///
/// Interior points of `set` are kept. A bound replaces the neighbouring grid
/// point when the two are within [`POINT_TOLERANCE`]; otherwise it is added.
/// The result always has at least the two points `lower` and `upper`.
///
/// # Example
///
/// ```
/// use isda_models::schedules::truncate_set_inclusive;
///
/// let grid = [0.0, 0.25, 0.5, 0.75, 1.0];
/// assert_eq!(truncate_set_inclusive(0.3, 0.7, &grid), vec![0.3, 0.5, 0.7]);
/// assert_eq!(truncate_set_inclusive(0.1, 0.2, &grid), vec![0.1, 0.2]);
/// ```
pub fn truncate_set_inclusive(lower: f64, upper: f64, set: &[f64]) -> Vec<f64> {
    let inner = truncate_set_exclusive(lower, upper, set);
    let n = inner.len();
    if n == 0 {
        return vec![lower, upper];
    }

    let add_lower = is_distinct(lower, inner[0]);
    let add_upper = is_distinct(upper, inner[n - 1]);
    if !add_lower && !add_upper && n == 1 {
        return vec![lower, upper];
    }

    let mut points = Vec::with_capacity(n + 2);
    if add_lower {
        points.push(lower);
    }
    points.extend_from_slice(inner);
    if add_upper {
        points.push(upper);
    }

    let last = points.len() - 1;
    points[0] = lower;
    points[last] = upper;
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use isda_core::market_data::curves::IsdaCompliantCurve;
    use proptest::prelude::*;

    #[test]
    fn test_exclusive_truncation() {
        let set = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(truncate_set_exclusive(1.0, 4.0, &set), &[2.0, 3.0]);
        assert_eq!(truncate_set_exclusive(0.0, 5.0, &set), &set);
        assert!(truncate_set_exclusive(2.0, 3.0, &set).is_empty());
        assert!(truncate_set_exclusive(5.0, 6.0, &set).is_empty());
    }

    #[test]
    fn test_points_merge_and_sort_both_curves() {
        let points = integration_points_from_sets(0.0, 10.0, &[1.0, 5.0, 12.0], &[0.5, 3.0, 5.0]);
        assert_eq!(points, vec![0.0, 0.5, 1.0, 3.0, 5.0, 10.0]);
    }

    #[test]
    fn test_points_drop_knots_within_half_a_day() {
        let near = 1.0 + 0.5 / 730.0;
        let points = integration_points_from_sets(0.0, 2.0, &[1.0], &[near]);
        assert_eq!(points, vec![0.0, 1.0, 2.0]);

        // A knot just before the end is replaced by the end point
        let points = integration_points_from_sets(0.0, 2.0, &[1.0, 2.0 - 1e-4], &[]);
        assert_eq!(points, vec![0.0, 1.0, 2.0]);

        // A knot just after the start is dropped
        let points = integration_points_from_sets(0.0, 2.0, &[1e-4, 1.0], &[]);
        assert_eq!(points, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_points_without_interior_knots() {
        let yc = IsdaCompliantCurve::flat(0.01);
        let cc = IsdaCompliantCurve::flat(0.02);
        assert_eq!(integration_points(2.0, 3.0, &yc, &cc), vec![2.0, 3.0]);
    }

    #[test]
    fn test_points_window_within_half_a_day_collapses() {
        let start = 1.0;
        let end = start + 0.5 * POINT_TOLERANCE;
        assert_eq!(integration_points_from_sets(start, end, &[], &[]), vec![end]);
        assert_eq!(integration_points_from_sets(start, end, &[0.5, 2.0], &[1.0]), vec![end]);

        let yc = IsdaCompliantCurve::flat(0.02);
        let cc = IsdaCompliantCurve::flat(0.03);
        assert_eq!(integration_points(start, end, &yc, &cc).len(), 1);
    }

    #[test]
    fn test_inclusive_truncation_adds_bounds() {
        let grid = [0.0, 1.0, 2.0, 3.0];
        assert_eq!(truncate_set_inclusive(0.5, 2.5, &grid), vec![0.5, 1.0, 2.0, 2.5]);
    }

    #[test]
    fn test_inclusive_truncation_replaces_close_points() {
        let grid = [0.0, 1.0, 2.0, 3.0];
        let lo = 1.0 - 1e-4;
        let hi = 2.0 + 1e-4;
        assert_eq!(truncate_set_inclusive(lo, hi, &grid), vec![lo, hi]);

        let hi = 3.0 - 1e-4;
        assert_eq!(truncate_set_inclusive(lo, hi, &grid), vec![lo, 2.0, hi]);
    }

    #[test]
    fn test_inclusive_truncation_never_collapses() {
        let grid = [1.0];
        let lo = 1.0 - 1e-4;
        let hi = 1.0 + 1e-4;
        assert_eq!(truncate_set_inclusive(lo, hi, &grid), vec![lo, hi]);
    }

    proptest! {
        #[test]
        fn prop_points_strictly_increasing(
            mut a in proptest::collection::vec(0.01_f64..20.0, 0..12),
            mut b in proptest::collection::vec(0.01_f64..20.0, 0..12),
            start in 0.0_f64..2.0,
            len in 0.01_f64..15.0,
        ) {
            a.sort_by(f64::total_cmp);
            b.sort_by(f64::total_cmp);
            let end = start + len;
            let points = integration_points_from_sets(start, end, &a, &b);

            prop_assert!(!points.is_empty());
            prop_assert_eq!(points[points.len() - 1], end);
            for w in points.windows(2) {
                prop_assert!(w[1] > w[0]);
            }
            // Everything between the first and last point is a curve knot
            for &t in points.iter().skip(1).take(points.len().saturating_sub(2)) {
                prop_assert!(t > start && t < end);
            }
        }

        #[test]
        fn prop_inclusive_truncation_keeps_bounds(
            mut grid in proptest::collection::vec(0.0_f64..10.0, 0..20),
            lo in 0.0_f64..5.0,
            len in 0.01_f64..5.0,
        ) {
            grid.sort_by(f64::total_cmp);
            grid.dedup();
            let hi = lo + len;
            let clipped = truncate_set_inclusive(lo, hi, &grid);

            prop_assert!(clipped.len() >= 2);
            prop_assert_eq!(clipped[0], lo);
            prop_assert_eq!(clipped[clipped.len() - 1], hi);
            for w in clipped.windows(2) {
                prop_assert!(w[1] > w[0]);
            }
        }
    }
}
