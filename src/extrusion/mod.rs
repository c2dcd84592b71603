mod cap;
mod config;
mod sweep;
mod texcoord;

pub use cap::{CapRing, CapSink};
pub use config::{
    ExtrusionConfig, JoinStyle, NormalMode, TextureMode, DEFAULT_ROUND_BLEND_STEPS,
};
pub use sweep::SweepExtrusion;

use crate::math::{Point2, Point3, Vector3};

/// The triangulated skin of a swept solid.
///
/// Vertices and normals are parallel arrays, laid out band by band along
/// the path. Each quad facet contributes two triangles to `indices`. The
/// uv array is filled only when a [`TextureMode`] is configured.
#[derive(Debug, Clone, Default)]
pub struct SweptMesh {
    /// World-space vertex positions.
    pub vertices: Vec<Point3>,
    /// Per-vertex normals.
    pub normals: Vec<Vector3>,
    /// Texture coordinates; empty unless a texture mode is configured.
    pub uvs: Vec<Point2>,
    /// Triangle indices (each triple defines a triangle).
    pub indices: Vec<[u32; 3]>,
}

impl SweptMesh {
    /// Number of quad facets (two triangles each), counting cap fan
    /// triangles as half a quad.
    #[must_use]
    pub fn quad_count(&self) -> usize {
        self.indices.len() / 2
    }
}
