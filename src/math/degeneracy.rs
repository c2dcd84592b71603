//! Scale-invariant degeneracy tests over path anchor points.
//!
//! Every test here compares relative lengths only — `a² ≤ TOL·b²` forms
//! rather than absolute epsilons — so that verdicts do not change when a
//! whole model is scaled. Squared lengths avoid the square roots and
//! divides the normalized forms would need.

use super::{Point3, TOLERANCE};

/// Returns `true` when the three points are colinear.
///
/// Any pair of coincident points counts as colinear. A segment is also
/// ignored when it is negligible relative to the other segment.
#[must_use]
pub fn colinear(v1: &Point3, v2: &Point3, v3: &Point3) -> bool {
    let v21 = v2 - v1;
    let v32 = v3 - v2;

    let len21 = v21.dot(&v21);
    let len32 = v32.dot(&v32);

    if len32 <= TOLERANCE * len21 || len21 <= TOLERANCE * len32 {
        return true;
    }

    // |v21|²|v32|² - (v21·v32)² is (|v21||v32| sin θ)²; compare it to the
    // same product scaled by the squared tolerance to stay unit-less.
    let dot = v21.dot(&v32);
    len21 * len32 - dot * dot <= len21 * len32 * TOLERANCE * TOLERANCE
}

/// Returns `true` when the two points are degenerate (coincident at the
/// scale of the model).
///
/// The difference is compared against the *sum* of the two position
/// vectors, so the verdict depends only on the ratio of separation to
/// distance from the origin.
#[must_use]
pub fn degenerate(v1: &Point3, v2: &Point3) -> bool {
    let diff = v2 - v1;
    let dlen = diff.dot(&diff);
    let summa = v1.coords + v2.coords;
    let slen = summa.dot(&summa);
    dlen <= TOLERANCE * TOLERANCE * slen
}

/// Returns the index of the next point in `points` after `from` that is
/// not degenerate with `points[from]`, or `None` when every remaining
/// point coincides with it.
#[must_use]
pub fn next_distinct(points: &[Point3], from: usize) -> Option<usize> {
    points[from + 1..]
        .iter()
        .position(|p| !degenerate(&points[from], p))
        .map(|offset| from + 1 + offset)
}

/// Returns the index of the previous point before `from` that is not
/// degenerate with `points[from]`, or `None`.
#[must_use]
pub fn prev_distinct(points: &[Point3], from: usize) -> Option<usize> {
    points[..from]
        .iter()
        .rposition(|p| !degenerate(&points[from], p))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    // ── colinear ──

    #[test]
    fn points_on_a_line_are_colinear() {
        assert!(colinear(
            &p(0.0, 0.0, 0.0),
            &p(1.0, 1.0, 1.0),
            &p(3.0, 3.0, 3.0)
        ));
    }

    #[test]
    fn bent_triple_is_not_colinear() {
        assert!(!colinear(
            &p(0.0, 0.0, 0.0),
            &p(1.0, 0.0, 0.0),
            &p(1.0, 1.0, 0.0)
        ));
    }

    #[test]
    fn coincident_pair_is_colinear() {
        assert!(colinear(
            &p(1.0, 2.0, 3.0),
            &p(1.0, 2.0, 3.0),
            &p(4.0, 5.0, 6.0)
        ));
    }

    #[test]
    fn colinear_is_scale_invariant() {
        let (a, b, c) = (p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(2.0, 1e-8, 0.0));
        let k = 1e9;
        let scaled = |q: &Point3| p(q.x * k, q.y * k, q.z * k);
        assert_eq!(
            colinear(&a, &b, &c),
            colinear(&scaled(&a), &scaled(&b), &scaled(&c))
        );
    }

    // ── degenerate ──

    #[test]
    fn distinct_points_are_not_degenerate() {
        assert!(!degenerate(&p(0.0, 0.0, 0.0), &p(1.0, 0.0, 0.0)));
    }

    #[test]
    fn equal_points_are_degenerate() {
        assert!(degenerate(&p(5.0, -2.0, 1.0), &p(5.0, -2.0, 1.0)));
    }

    #[test]
    fn separation_below_tolerance_ratio_is_degenerate() {
        // Points a million units out, separated by less than the ratio.
        assert!(degenerate(&p(1e6, 0.0, 0.0), &p(1e6 + 0.1, 0.0, 0.0)));
        // Same separation near the origin is significant.
        assert!(!degenerate(&p(1.0, 0.0, 0.0), &p(1.1, 0.0, 0.0)));
    }

    // ── next_distinct / prev_distinct ──

    #[test]
    fn next_distinct_skips_repeats() {
        let pts = [
            p(0.0, 0.0, 0.0),
            p(0.0, 0.0, 0.0),
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
        ];
        assert_eq!(next_distinct(&pts, 0), Some(3));
    }

    #[test]
    fn next_distinct_exhausted() {
        let pts = [p(1.0, 1.0, 1.0), p(1.0, 1.0, 1.0)];
        assert_eq!(next_distinct(&pts, 0), None);
    }

    #[test]
    fn prev_distinct_skips_repeats() {
        let pts = [
            p(1.0, 0.0, 0.0),
            p(2.0, 0.0, 0.0),
            p(2.0, 0.0, 0.0),
            p(2.0, 0.0, 0.0),
        ];
        assert_eq!(prev_distinct(&pts, 3), Some(0));
    }
}
