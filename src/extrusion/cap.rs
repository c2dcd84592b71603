//! End-cap emission.
//!
//! The kernel's responsibility ends at producing a consistently-wound
//! closed loop plus the two in-plane vectors that define the cap plane;
//! triangulation and draw submission belong to the caller. A built-in fan
//! triangulator covers the common case of convex closed contours.

use crate::math::{normalize_or_zero, Point3, Vector3};

use super::SweptMesh;

/// One end cap, handed to a [`CapSink`].
///
/// `cut_vector` and `bisect_vector` are an orthonormal pair spanning the
/// cap plane; their cross product is the plane normal, which stays finite
/// even when the ring itself has collapsed to a near-point (a cone tip).
/// The borrowed buffers are valid for the duration of the call only; the
/// kernel does not expect the sink to retain them.
#[derive(Debug)]
pub struct CapRing<'a> {
    /// 0 for the cap at the first joint, 1 for the last.
    pub loop_index: usize,
    /// The closed loop of cap vertices, in contour order.
    pub vertices: &'a [Point3],
    /// Normals associated with the loop vertices.
    pub normals: &'a [Vector3],
    /// First in-plane basis vector of the cap plane.
    pub cut_vector: Vector3,
    /// Second in-plane basis vector of the cap plane.
    pub bisect_vector: Vector3,
    /// `true` for the cap at the path start; flips the winding so both
    /// caps face outward.
    pub front_facing: bool,
}

impl CapRing<'_> {
    /// The flat-shaded cap normal, oriented outward.
    #[must_use]
    pub fn face_normal(&self) -> Vector3 {
        let n = normalize_or_zero(self.cut_vector.cross(&self.bisect_vector));
        if self.front_facing {
            -n
        } else {
            n
        }
    }
}

/// Receives cap loops for triangulation and draw submission.
pub trait CapSink {
    /// Called exactly twice per capped extrusion pass: once for the start
    /// cap, once for the end cap.
    fn emit_cap(&mut self, cap: &CapRing<'_>);
}

/// The built-in sink: triangulates each cap as a fan around its first
/// vertex and appends it to a [`SweptMesh`].
#[derive(Debug)]
pub struct FanCaps<'m> {
    mesh: &'m mut SweptMesh,
    emit_uvs: bool,
}

impl<'m> FanCaps<'m> {
    pub fn new(mesh: &'m mut SweptMesh, emit_uvs: bool) -> Self {
        Self { mesh, emit_uvs }
    }
}

impl CapSink for FanCaps<'_> {
    #[allow(clippy::cast_possible_truncation)]
    fn emit_cap(&mut self, cap: &CapRing<'_>) {
        let n = cap.vertices.len();
        if n < 3 {
            return;
        }

        let normal = cap.face_normal();
        let base = self.mesh.vertices.len() as u32;

        self.mesh.vertices.extend_from_slice(cap.vertices);
        self.mesh.normals.extend(std::iter::repeat_n(normal, n));
        if self.emit_uvs {
            // Caps reuse the adjacent band's uv seam; flat caps get no
            // meaningful parameterization of their own.
            self.mesh
                .uvs
                .extend(std::iter::repeat_n(crate::math::Point2::origin(), n));
        }

        for i in 1..n - 1 {
            let (a, b, c) = (base, base + i as u32, base + i as u32 + 1);
            if cap.front_facing {
                self.mesh.indices.push([a, c, b]);
            } else {
                self.mesh.indices.push([a, b, c]);
            }
        }
    }
}
