pub mod degeneracy;
pub mod intersect;
pub mod miter;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// 3x3 linear transformation matrix.
pub type Matrix3 = nalgebra::Matrix3<f64>;

/// Dimensionless degeneracy tolerance.
///
/// This is the greatest ratio by which two scales in one model may differ
/// before the smaller is considered degenerate. It carries no units: it is
/// only ever used in comparisons of relative lengths, which keeps every
/// degeneracy test scale-invariant. Two parts in a million corresponds to
/// a 19-bit distinction of single-precision mantissas.
///
/// The value is a compile-time constant on purpose: varying it per call
/// would let adjacent joints disagree about what counts as degenerate.
pub const TOLERANCE: f64 = 2e-6;

/// Returns a unit-length copy of `v`, or the zero vector when `v` is too
/// short to normalize.
///
/// Callers that need to distinguish the degenerate outcome must branch on
/// a degeneracy test first; this helper only guards the division.
#[must_use]
pub fn normalize_or_zero(v: Vector3) -> Vector3 {
    let len = v.norm();
    if len <= TOLERANCE {
        Vector3::zeros()
    } else {
        v / len
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn normalize_or_zero_on_regular_vector() {
        let n = normalize_or_zero(Vector3::new(3.0, 0.0, 4.0));
        assert!((n.norm() - 1.0).abs() < 1e-12);
        assert!((n.x - 0.6).abs() < 1e-12);
        assert!((n.z - 0.8).abs() < 1e-12);
    }

    #[test]
    fn normalize_or_zero_on_tiny_vector() {
        let n = normalize_or_zero(Vector3::new(1e-9, 0.0, 0.0));
        assert_eq!(n, Vector3::zeros());
    }
}
