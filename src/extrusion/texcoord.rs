//! Texture-coordinate generation.
//!
//! A pure read of already-produced vertex data: nothing here feeds back
//! into geometry. The `v` coordinate (except for spherical modes) is the
//! arc length accumulated along the *transported* path — true world-space
//! segment lengths, monotone within a pass — so texture scale stays
//! consistent in real space regardless of contour-local dimensions.

use std::f64::consts::PI;

use crate::math::{Point2, Point3, Vector3};

use super::TextureMode;

/// Per-vertex inputs to texture-coordinate generation.
#[derive(Debug, Clone, Copy)]
pub struct TexVertex {
    /// Transported world-space position.
    pub position: Point3,
    /// Transported normal.
    pub normal: Vector3,
    /// Contour-local position, lifted to 3D, before any transform.
    pub model_position: Point3,
    /// Contour-local normal before any transform.
    pub model_normal: Vector3,
    /// Accumulated path arc length at this vertex's joint.
    pub arc_length: f64,
}

/// Computes the (u, v) pair for one vertex under the given mode.
#[must_use]
pub fn tex_coord(mode: TextureMode, vertex: &TexVertex) -> Point2 {
    use TextureMode::{
        NormalCylinder, NormalFlat, NormalModelCylinder, NormalModelFlat, NormalModelSphere,
        NormalSphere, VertexCylinder, VertexFlat, VertexModelCylinder, VertexModelFlat,
        VertexModelSphere, VertexSphere,
    };

    let source = match mode {
        VertexFlat | VertexCylinder | VertexSphere => vertex.position.coords,
        NormalFlat | NormalCylinder | NormalSphere => vertex.normal,
        VertexModelFlat | VertexModelCylinder | VertexModelSphere => {
            vertex.model_position.coords
        }
        NormalModelFlat | NormalModelCylinder | NormalModelSphere => vertex.model_normal,
    };

    match mode {
        VertexFlat | NormalFlat | VertexModelFlat | NormalModelFlat => {
            Point2::new(source.x, vertex.arc_length)
        }
        VertexCylinder | NormalCylinder | VertexModelCylinder | NormalModelCylinder => {
            Point2::new(azimuth(&source), vertex.arc_length)
        }
        VertexSphere | NormalSphere | VertexModelSphere | NormalModelSphere => {
            Point2::new(azimuth(&source), 1.0 - source.z.clamp(-1.0, 1.0).acos() / PI)
        }
    }
}

/// `atan2(y, x) / 2π`, the cylindrical azimuth in `(−0.5, 0.5]`.
fn azimuth(v: &Vector3) -> f64 {
    v.y.atan2(v.x) / (2.0 * PI)
}
