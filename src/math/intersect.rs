//! Line/plane intersection with the winding-aliasing guard.

use super::{Point3, Vector3};

/// Intersection parameters `t` more negative than this are assumed to
/// have wound through infinity from the positive side.
///
/// As a line approaches parallelism with the plane, `t` grows without
/// bound and can alias past infinity into a large negative value (the
/// winding number hops by one). Detecting this properly needs a
/// topological winding computation that is far too expensive for what it
/// buys, so a large negative `t` is simply reinterpreted as a forward
/// hit. This keeps cut-style joins looking right without introducing
/// bogus cuts at infinity; it is a heuristic and deliberately stays one.
pub const WINDING_GUARD: f64 = -5.0;

/// How a line met a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitKind {
    /// Intersection lies forward along the line (includes parameters that
    /// wound through infinity, see [`WINDING_GUARD`]).
    Forward,
    /// Intersection lies behind the line start.
    Backward,
    /// Line is coplanar with the plane; no unique intersection exists.
    /// The reported point is the plane normal, as a degenerate
    /// substitute.
    Coplanar,
}

/// Result of [`intersect_line_plane`].
#[derive(Debug, Clone, Copy)]
pub struct LinePlaneHit {
    /// The intersection point (or the degenerate substitute).
    pub point: Point3,
    /// Validity and direction of the hit.
    pub kind: HitKind,
}

impl LinePlaneHit {
    /// Returns `true` unless the line was coplanar with the plane.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.kind != HitKind::Coplanar
    }
}

/// Intersects the line through `v1` and `v2` with the plane that contains
/// `plane_point` and is normal to `plane_normal`.
///
/// The line is parameterized as `t·v1 + (1−t)·v2`, so `t = 1` lands on
/// `v1` and `t = 0` on `v2`. The denominator is tested against exact
/// zero, not the tolerance: a nearly-parallel line still has a
/// well-defined (if distant) intersection, and the winding guard handles
/// the aliased cases.
#[must_use]
#[allow(clippy::float_cmp)] // exact-zero denominator test, see above
pub fn intersect_line_plane(
    v1: &Point3,
    v2: &Point3,
    plane_point: &Point3,
    plane_normal: &Vector3,
) -> LinePlaneHit {
    let deno = (v1 - v2).dot(plane_normal);

    if deno == 0.0 {
        return LinePlaneHit {
            point: Point3::from(*plane_normal),
            kind: HitKind::Coplanar,
        };
    }

    let numer = (plane_point - v2).dot(plane_normal);
    let t = numer / deno;
    let point = Point3::from(t * v1.coords + (1.0 - t) * v2.coords);

    let kind = if t < WINDING_GUARD || t >= 0.0 {
        HitKind::Forward
    } else {
        HitKind::Backward
    };

    LinePlaneHit { point, kind }
}

/// Slides `point` along `dir` onto the plane through `plane_point` with
/// normal `plane_normal`.
///
/// When the slide direction is coplanar with the plane the raw point is
/// returned unchanged — refinement is skipped, never fatal.
#[must_use]
pub fn project_onto_plane(
    point: &Point3,
    dir: &Vector3,
    plane_point: &Point3,
    plane_normal: &Vector3,
) -> Point3 {
    let hit = intersect_line_plane(&(point + dir), point, plane_point, plane_normal);
    if hit.is_valid() {
        hit.point
    } else {
        *point
    }
}
