use crate::error::{ExtrusionError, Result};

// Packed-bitfield encoding, kept only as a serialization detail for
// callers migrating configurations from the classic packed-integer form.
const JOIN_RAW: u32 = 0x1;
const JOIN_ANGLE: u32 = 0x2;
const JOIN_CUT: u32 = 0x3;
const JOIN_ROUND: u32 = 0x4;
const JOIN_MASK: u32 = 0xf;
const CAP_ENDS: u32 = 0x10;
const NORM_FACET: u32 = 0x100;
const NORM_EDGE: u32 = 0x200;
const NORM_PATH_EDGE: u32 = 0x400;
const NORM_MASK: u32 = 0xf00;
const CONTOUR_CLOSED: u32 = 0x1000;

/// Default number of transitional rings blended into a ROUND joint.
pub const DEFAULT_ROUND_BLEND_STEPS: usize = 4;

/// Policy for reconciling two adjacent contour copies at a joint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinStyle {
    /// No miter: every segment emits its own bands, leaving visible seams
    /// at sharp turns.
    Raw,
    /// Segments extended until they meet: one band per joint, sliced
    /// against the bisecting plane.
    Angle,
    /// Slice against the cutting plane through the contour origin. At
    /// shallow angles this shaves off large parts of the contour; that is
    /// accepted behavior, not clamped away.
    Cut,
    /// Rounded above the contour origin, angular below, with a
    /// transitional fan of facets blending the two joint orientations.
    Round,
}

/// Policy for generating per-vertex normals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalMode {
    /// One normal per planar facet: flat shading.
    Facet,
    /// One normal per contour edge vertex: smooth around the
    /// circumference, flat along the path.
    Edge,
    /// Edge normals, additionally interpolated between neighboring
    /// segments: smooth along tessellated spline paths.
    PathEdge,
}

/// Which scalar pair feeds the (u, v) texture coordinate per vertex.
///
/// A pure read-side policy with no effect on geometry. The `Model`
/// variants read the untransformed contour-local vertex or normal, so
/// textures stick to the surface under affine contour transforms; the
/// others read the transported world-space values. Unless spherical, `v`
/// is the arc length accumulated along the transported path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureMode {
    /// u = vertex x, v = accumulated segment length.
    VertexFlat,
    /// u = normal x, v = accumulated segment length.
    NormalFlat,
    /// u = atan2(vy, vx) / 2π, v = accumulated segment length.
    VertexCylinder,
    /// u = atan2(ny, nx) / 2π, v = accumulated segment length.
    NormalCylinder,
    /// u = atan2(vy, vx) / 2π, v = 1 − acos(vz) / π.
    VertexSphere,
    /// u = atan2(ny, nx) / 2π, v = 1 − acos(nz) / π.
    NormalSphere,
    /// [`VertexFlat`](Self::VertexFlat) over the untransformed vertex.
    VertexModelFlat,
    /// [`NormalFlat`](Self::NormalFlat) over the untransformed normal.
    NormalModelFlat,
    /// [`VertexCylinder`](Self::VertexCylinder) over the untransformed vertex.
    VertexModelCylinder,
    /// [`NormalCylinder`](Self::NormalCylinder) over the untransformed normal.
    NormalModelCylinder,
    /// [`VertexSphere`](Self::VertexSphere) over the untransformed vertex.
    VertexModelSphere,
    /// [`NormalSphere`](Self::NormalSphere) over the untransformed normal.
    NormalModelSphere,
}

/// Configuration for one extrusion pass.
///
/// Join style, cap flag, normal mode and the closed-contour flag are
/// orthogonal; any combination is recognized. Capping an open contour is
/// not an error, but its visual result is undefined.
#[derive(Debug, Clone, Copy)]
pub struct ExtrusionConfig {
    /// How adjacent contour copies are reconciled at interior joints.
    pub join: JoinStyle,
    /// Emit a cap at the first and last joint.
    pub cap_ends: bool,
    /// How per-vertex normals are generated.
    pub normal_mode: NormalMode,
    /// Texture-coordinate policy; `None` leaves the uv array empty.
    pub texture: Option<TextureMode>,
    /// Number of transitional rings in a ROUND joint. A visual-quality
    /// tunable, not a geometric necessity; must be at least 1.
    pub round_blend_steps: usize,
}

impl Default for ExtrusionConfig {
    fn default() -> Self {
        Self {
            join: JoinStyle::Angle,
            cap_ends: false,
            normal_mode: NormalMode::PathEdge,
            texture: None,
            round_blend_steps: DEFAULT_ROUND_BLEND_STEPS,
        }
    }
}

impl ExtrusionConfig {
    /// Validates the tunables.
    ///
    /// # Errors
    ///
    /// Returns an error if `round_blend_steps` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.round_blend_steps == 0 {
            return Err(ExtrusionError::InvalidConfig(
                "round_blend_steps must be at least 1".to_owned(),
            )
            .into());
        }
        Ok(())
    }

    /// Decodes a packed configuration integer (join style in the low
    /// nibble, cap bit, normal-mode bits, closed-contour bit).
    ///
    /// Returns `None` when either bit range holds an unrecognized value.
    /// The closed-contour bit is returned separately since it belongs to
    /// the [`Contour`](crate::geometry::Contour), not the config.
    #[must_use]
    pub fn from_bits(bits: u32) -> Option<(Self, bool)> {
        let join = match bits & JOIN_MASK {
            JOIN_RAW => JoinStyle::Raw,
            JOIN_ANGLE => JoinStyle::Angle,
            JOIN_CUT => JoinStyle::Cut,
            JOIN_ROUND => JoinStyle::Round,
            _ => return None,
        };
        let normal_mode = match bits & NORM_MASK {
            NORM_FACET => NormalMode::Facet,
            NORM_EDGE => NormalMode::Edge,
            NORM_PATH_EDGE => NormalMode::PathEdge,
            _ => return None,
        };
        let config = Self {
            join,
            cap_ends: bits & CAP_ENDS != 0,
            normal_mode,
            texture: None,
            round_blend_steps: DEFAULT_ROUND_BLEND_STEPS,
        };
        Some((config, bits & CONTOUR_CLOSED != 0))
    }

    /// Encodes the packed configuration integer; inverse of
    /// [`from_bits`](Self::from_bits).
    #[must_use]
    pub fn bits(&self, closed_contour: bool) -> u32 {
        let mut bits = match self.join {
            JoinStyle::Raw => JOIN_RAW,
            JoinStyle::Angle => JOIN_ANGLE,
            JoinStyle::Cut => JOIN_CUT,
            JoinStyle::Round => JOIN_ROUND,
        };
        bits |= match self.normal_mode {
            NormalMode::Facet => NORM_FACET,
            NormalMode::Edge => NORM_EDGE,
            NormalMode::PathEdge => NORM_PATH_EDGE,
        };
        if self.cap_ends {
            bits |= CAP_ENDS;
        }
        if closed_contour {
            bits |= CONTOUR_CLOSED;
        }
        bits
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn bits_round_trip() {
        let config = ExtrusionConfig {
            join: JoinStyle::Round,
            cap_ends: true,
            normal_mode: NormalMode::Edge,
            texture: None,
            round_blend_steps: 7,
        };
        let bits = config.bits(true);
        let (decoded, closed) = ExtrusionConfig::from_bits(bits).unwrap();
        assert!(closed);
        assert_eq!(decoded.join, JoinStyle::Round);
        assert!(decoded.cap_ends);
        assert_eq!(decoded.normal_mode, NormalMode::Edge);
        assert_eq!(decoded.bits(closed), bits);
    }

    #[test]
    fn unknown_join_bits_rejected() {
        assert!(ExtrusionConfig::from_bits(0x8 | 0x100).is_none());
    }

    #[test]
    fn unknown_normal_bits_rejected() {
        assert!(ExtrusionConfig::from_bits(0x1 | 0x800).is_none());
    }

    #[test]
    fn zero_blend_steps_invalid() {
        let config = ExtrusionConfig {
            round_blend_steps: 0,
            ..ExtrusionConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
