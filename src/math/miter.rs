//! Miter-plane resolution for three consecutive joint anchors.
//!
//! Both resolvers take the previous, current and next anchor points of a
//! path and return the normal of a plane through the current anchor. The
//! degenerate fallbacks are part of the contract: a path full of
//! coincident or colinear joints must still sweep, so every branch
//! resolves to the nearest well-defined direction instead of failing.

use super::{Point3, Vector3, TOLERANCE};

/// A plane normal paired with a validity flag.
///
/// Only the fully-coincident anchor triple produces an invalid fit; every
/// other degenerate configuration falls back to the surviving segment
/// direction and stays valid.
#[derive(Debug, Clone, Copy)]
pub struct PlaneFit {
    /// Unit plane normal, or the zero vector when invalid.
    pub normal: Vector3,
    /// Whether the normal is meaningful.
    pub valid: bool,
}

impl PlaneFit {
    fn valid(normal: Vector3) -> Self {
        Self {
            normal,
            valid: true,
        }
    }

    fn invalid() -> Self {
        Self {
            normal: Vector3::zeros(),
            valid: false,
        }
    }
}

/// Computes the normal of the plane bisecting the path angle at `v2`.
///
/// The returned plane contains `v2`, makes equal angles with
/// `v21 = v2 − v1` and `v32 = v3 − v2`, and is perpendicular to the plane
/// spanned by the three points. Degenerate inputs resolve as:
///
/// - all three coincident → zero vector, invalid
/// - `v1 == v2` → normalized `v32`
/// - `v2 == v3` → normalized `v21`
/// - colinear triple → normalized `v21`
///
/// "Coincident" is relative: a segment counts as absent when its length
/// is within [`TOLERANCE`] of zero *relative to the other segment*.
#[must_use]
#[allow(clippy::float_cmp)] // exact-zero test on the fully-coincident triple
pub fn bisecting_plane(v1: &Point3, v2: &Point3, v3: &Point3) -> PlaneFit {
    let v21 = v2 - v1;
    let v32 = v3 - v2;

    let len21 = v21.norm();
    let len32 = v32.norm();

    if len21 <= TOLERANCE * len32 {
        if len32 == 0.0 {
            return PlaneFit::invalid();
        }
        return PlaneFit::valid(v32 / len32);
    }

    if len32 <= TOLERANCE * len21 {
        return PlaneFit::valid(v21 / len21);
    }

    let v21 = v21 / len21;
    let v32 = v32 / len32;
    let dot = v32.dot(&v21);

    if dot >= 1.0 - TOLERANCE || dot <= -1.0 + TOLERANCE {
        // Colinear run; the bisector degenerates to the path direction.
        return PlaneFit::valid(v21);
    }

    let n = dot * (v32 + v21) - v32 - v21;
    // The colinearity test above guarantees n has usable length.
    PlaneFit::valid(n / n.norm())
}

/// Computes the cut-plane normal at `v2`: the difference of the two unit
/// segment directions.
///
/// This is a different plane from the bisecting one — it is perpendicular
/// to the local turn of the path rather than splitting its angle, and it
/// is the plane the CUT join style slices against. The preliminary
/// degenerate branches match [`bisecting_plane`]; additionally, a
/// near-colinear triple leaves the cut direction ill-defined and yields
/// an invalid fit.
#[must_use]
#[allow(clippy::float_cmp)] // exact-zero test on the fully-coincident triple
pub fn cutting_plane(v1: &Point3, v2: &Point3, v3: &Point3) -> PlaneFit {
    let v21 = v2 - v1;
    let v32 = v3 - v2;

    let len21 = v21.norm();
    let len32 = v32.norm();

    if len21 <= TOLERANCE * len32 {
        if len32 == 0.0 {
            return PlaneFit::invalid();
        }
        return PlaneFit::valid(v32 / len32);
    }

    if len32 <= TOLERANCE * len21 {
        return PlaneFit::valid(v21 / len21);
    }

    let v21 = v21 / len21;
    let v32 = v32 / len32;

    let n = v21 - v32;
    let len = n.norm();
    if len < TOLERANCE {
        return PlaneFit::invalid();
    }
    PlaneFit::valid(n / len)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    // ── bisecting_plane ──

    #[test]
    fn bisector_splits_right_angle() {
        let fit = bisecting_plane(
            &p(0.0, 0.0, 0.0),
            &p(1.0, 0.0, 0.0),
            &p(1.0, 1.0, 0.0),
        );
        assert!(fit.valid);
        assert_relative_eq!(fit.normal.norm(), 1.0, epsilon = 1e-12);

        // Equal angles against the incoming and outgoing directions.
        let d21 = Vector3::new(1.0, 0.0, 0.0);
        let d32 = Vector3::new(0.0, 1.0, 0.0);
        assert_relative_eq!(
            fit.normal.dot(&d21).abs(),
            fit.normal.dot(&d32).abs(),
            epsilon = TOLERANCE
        );
    }

    #[test]
    fn bisector_equal_angles_for_skew_triple() {
        let (v1, v2, v3) = (
            p(0.3, -1.2, 0.7),
            p(2.0, 0.5, -0.4),
            p(2.5, 3.0, 1.9),
        );
        let fit = bisecting_plane(&v1, &v2, &v3);
        assert!(fit.valid);
        assert_relative_eq!(fit.normal.norm(), 1.0, epsilon = 1e-12);

        let d21 = (v2 - v1).normalize();
        let d32 = (v3 - v2).normalize();
        assert_relative_eq!(
            fit.normal.dot(&d21).abs(),
            fit.normal.dot(&d32).abs(),
            epsilon = TOLERANCE
        );
    }

    #[test]
    fn bisector_all_coincident_is_invalid() {
        let q = p(2.0, 2.0, 2.0);
        let fit = bisecting_plane(&q, &q, &q);
        assert!(!fit.valid);
        assert_eq!(fit.normal, Vector3::zeros());
    }

    #[test]
    fn bisector_first_pair_coincident_uses_outgoing() {
        let fit = bisecting_plane(
            &p(1.0, 1.0, 0.0),
            &p(1.0, 1.0, 0.0),
            &p(1.0, 1.0, 5.0),
        );
        assert!(fit.valid);
        assert_relative_eq!(fit.normal, Vector3::new(0.0, 0.0, 1.0), epsilon = 1e-12);
    }

    #[test]
    fn bisector_last_pair_coincident_uses_incoming() {
        let fit = bisecting_plane(
            &p(0.0, 0.0, 0.0),
            &p(3.0, 0.0, 0.0),
            &p(3.0, 0.0, 0.0),
        );
        assert!(fit.valid);
        assert_relative_eq!(fit.normal, Vector3::new(1.0, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn bisector_colinear_returns_path_direction() {
        let fit = bisecting_plane(
            &p(0.0, 0.0, 0.0),
            &p(1.0, 2.0, 2.0),
            &p(2.0, 4.0, 4.0),
        );
        assert!(fit.valid);
        assert_relative_eq!(
            fit.normal,
            Vector3::new(1.0, 2.0, 2.0) / 3.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn bisector_is_scale_invariant() {
        let (v1, v2, v3) = (
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(1.0, 1.0, 0.0),
        );
        let k = 1e6;
        let s = |q: &Point3| p(q.x * k, q.y * k, q.z * k);
        let a = bisecting_plane(&v1, &v2, &v3);
        let b = bisecting_plane(&s(&v1), &s(&v2), &s(&v3));
        assert_eq!(a.valid, b.valid);
        assert_relative_eq!(a.normal, b.normal, epsilon = 1e-9);
    }

    // ── cutting_plane ──

    #[test]
    fn cut_normal_is_direction_difference() {
        let fit = cutting_plane(
            &p(0.0, 0.0, 0.0),
            &p(1.0, 0.0, 0.0),
            &p(1.0, 1.0, 0.0),
        );
        assert!(fit.valid);
        let expected = (Vector3::new(1.0, 0.0, 0.0) - Vector3::new(0.0, 1.0, 0.0))
            / f64::sqrt(2.0);
        assert_relative_eq!(fit.normal, expected, epsilon = 1e-12);
    }

    #[test]
    fn cut_all_coincident_is_invalid() {
        let q = p(-1.0, 4.0, 0.5);
        let fit = cutting_plane(&q, &q, &q);
        assert!(!fit.valid);
        assert_eq!(fit.normal, Vector3::zeros());
    }

    #[test]
    fn cut_first_pair_coincident_uses_outgoing() {
        let fit = cutting_plane(
            &p(0.0, 0.0, 0.0),
            &p(0.0, 0.0, 0.0),
            &p(0.0, 2.0, 0.0),
        );
        assert!(fit.valid);
        assert_relative_eq!(fit.normal, Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn cut_on_straight_run_is_invalid() {
        let fit = cutting_plane(
            &p(0.0, 0.0, 0.0),
            &p(1.0, 0.0, 0.0),
            &p(5.0, 0.0, 0.0),
        );
        assert!(!fit.valid);
        assert_eq!(fit.normal, Vector3::zeros());
    }

    #[test]
    fn cut_is_scale_invariant() {
        let (v1, v2, v3) = (
            p(0.0, 0.0, 0.0),
            p(0.0, 3.0, 0.0),
            p(2.0, 3.0, 1.0),
        );
        let k = 1e-6;
        let s = |q: &Point3| p(q.x * k, q.y * k, q.z * k);
        let a = cutting_plane(&v1, &v2, &v3);
        let b = cutting_plane(&s(&v1), &s(&v2), &s(&v3));
        assert_eq!(a.valid, b.valid);
        assert_relative_eq!(a.normal, b.normal, epsilon = 1e-9);
    }
}
