use crate::math::{Matrix3, Point2, Point3, Vector2, Vector3};

/// The affine placement of the contour at one joint along a path.
///
/// Maps a contour point, lifted into 3D as `(u, v, 0)`, to world space:
/// `linear · (u, v, 0) + translation`. The linear block carries rotation
/// and scale; the translation is where the contour origin lands, which is
/// also the joint's anchor point for all miter computations.
///
/// A path is an ordered slice of placements, at least 2 long. Paths are
/// caller-owned and never mutated by the kernel.
#[derive(Debug, Clone, Copy)]
pub struct AffinePlacement {
    linear: Matrix3,
    translation: Vector3,
}

impl AffinePlacement {
    /// Creates a placement from its linear block and translation.
    #[must_use]
    pub fn new(linear: Matrix3, translation: Vector3) -> Self {
        Self {
            linear,
            translation,
        }
    }

    /// A placement that lifts the contour into the plane spanned by
    /// `u_dir` and `v_dir` at `anchor`.
    #[must_use]
    pub fn from_frame(anchor: Point3, u_dir: Vector3, v_dir: Vector3) -> Self {
        let w = u_dir.cross(&v_dir);
        Self {
            linear: Matrix3::from_columns(&[u_dir, v_dir, w]),
            translation: anchor.coords,
        }
    }

    /// Transports a contour point to world space.
    #[must_use]
    pub fn apply(&self, p: Point2) -> Point3 {
        Point3::from(self.linear * Vector3::new(p.x, p.y, 0.0) + self.translation)
    }

    /// Transports a contour-frame direction (normals, tangents) through
    /// the linear block only.
    #[must_use]
    pub fn apply_direction(&self, v: Vector2) -> Vector3 {
        self.linear * Vector3::new(v.x, v.y, 0.0)
    }

    /// The image of the contour origin: the joint's anchor point.
    #[must_use]
    pub fn anchor(&self) -> Point3 {
        Point3::from(self.translation)
    }

    /// Returns the linear block.
    #[must_use]
    pub fn linear(&self) -> &Matrix3 {
        &self.linear
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn identity_frame_lifts_into_xy() {
        let placement = AffinePlacement::from_frame(
            Point3::new(0.0, 0.0, 5.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
        );
        let p = placement.apply(Point2::new(2.0, 3.0));
        assert_relative_eq!(p, Point3::new(2.0, 3.0, 5.0), epsilon = 1e-12);
        assert_relative_eq!(
            placement.anchor(),
            Point3::new(0.0, 0.0, 5.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn frame_reorients_contour_plane() {
        // Contour plane spanned by X and Z: v maps to world Z.
        let placement = AffinePlacement::from_frame(
            Point3::origin(),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
        );
        let p = placement.apply(Point2::new(1.0, 2.0));
        assert_relative_eq!(p, Point3::new(1.0, 0.0, 2.0), epsilon = 1e-12);
    }

    #[test]
    fn directions_ignore_translation() {
        let placement = AffinePlacement::from_frame(
            Point3::new(10.0, 10.0, 10.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
        );
        let n = placement.apply_direction(Vector2::new(0.0, 1.0));
        assert_relative_eq!(n, Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
    }
}
