//! The sweep engine: contour transport, miter resolution and band
//! emission.
//!
//! One invocation processes its path strictly joint by joint. All
//! degeneracies (coincident joints, colinear runs, coplanar projections)
//! resolve locally at the joint they occur at; a bad joint never aborts
//! the rest of the surface.

use crate::error::{ExtrusionError, Result};
use crate::geometry::{AffinePlacement, Contour};
use crate::math::degeneracy::{degenerate, next_distinct, prev_distinct};
use crate::math::intersect::project_onto_plane;
use crate::math::miter::{bisecting_plane, cutting_plane, PlaneFit};
use crate::math::{normalize_or_zero, Point3, Vector3, TOLERANCE};

use super::cap::{CapRing, CapSink, FanCaps};
use super::texcoord::{tex_coord, TexVertex};
use super::{ExtrusionConfig, JoinStyle, NormalMode, SweptMesh, TextureMode};

/// Sweeps a contour along a path of affine placements, producing the
/// triangulated skin of the swept solid.
///
/// The contour and path are borrowed conceptually from the caller for one
/// pass: they are never mutated, and nothing persists across invocations.
#[derive(Debug)]
pub struct SweepExtrusion {
    contour: Contour,
    path: Vec<AffinePlacement>,
    config: ExtrusionConfig,
}

/// Resolved miter state at one joint.
struct JointMiter {
    anchor: Point3,
    /// Unit tangent of the incoming path segment (zero at the start).
    t_in: Vector3,
    /// Unit tangent of the outgoing path segment (zero at the end).
    t_out: Vector3,
    bisect: PlaneFit,
    cut: PlaneFit,
    /// Whether the joint has distinct neighbors on both sides. Only
    /// interior joints get miter treatment; end joints stay raw and are
    /// cap-eligible instead.
    interior: bool,
}

/// A cap captured at one open path end, owned until emission.
struct CapData {
    loop_index: usize,
    vertices: Vec<Point3>,
    normals: Vec<Vector3>,
    cut_vector: Vector3,
    bisect_vector: Vector3,
    front_facing: bool,
}

impl SweepExtrusion {
    /// Creates a sweep operation.
    ///
    /// # Errors
    ///
    /// Returns an error if the path has fewer than 2 joints or the
    /// configuration is invalid.
    pub fn new(
        contour: Contour,
        path: Vec<AffinePlacement>,
        config: ExtrusionConfig,
    ) -> Result<Self> {
        if path.len() < 2 {
            return Err(ExtrusionError::PathTooShort {
                min: 2,
                got: path.len(),
            }
            .into());
        }
        config.validate()?;
        Ok(Self {
            contour,
            path,
            config,
        })
    }

    /// Executes the sweep. Caps, when enabled, are triangulated as fans
    /// by the built-in sink.
    ///
    /// # Errors
    ///
    /// Input validation only; geometric degeneracies never fail a pass.
    pub fn execute(&self) -> Result<SweptMesh> {
        let (mut mesh, caps) = self.build()?;
        let mut sink = FanCaps::new(&mut mesh, self.config.texture.is_some());
        for cap in &caps {
            sink.emit_cap(&cap.as_ring());
        }
        Ok(mesh)
    }

    /// Executes the sweep, handing each end cap to `sink` instead of the
    /// built-in fan triangulation.
    ///
    /// The buffers passed to the sink are valid for the duration of each
    /// call only. The sink is invoked exactly twice when capping is
    /// enabled and the path produced any band, and never otherwise.
    ///
    /// # Errors
    ///
    /// Input validation only; geometric degeneracies never fail a pass.
    pub fn execute_with_caps(&self, sink: &mut dyn CapSink) -> Result<SweptMesh> {
        let (mesh, caps) = self.build()?;
        for cap in &caps {
            sink.emit_cap(&cap.as_ring());
        }
        Ok(mesh)
    }

    // ── sweep core ──

    fn build(&self) -> Result<(SweptMesh, Vec<CapData>)> {
        let anchors: Vec<Point3> = self.path.iter().map(AffinePlacement::anchor).collect();
        let arc = cumulative_arc_lengths(&anchors);

        let mut emitter = Emitter::new(&self.contour, self.config.texture);
        let mut caps = Vec::new();

        // Index bookkeeping for ring sharing between adjacent bands.
        let share_rings = self.config.normal_mode == NormalMode::PathEdge
            && matches!(self.config.join, JoinStyle::Angle | JoinStyle::Cut);
        let mut prev_end: Option<(usize, Vec<u32>)> = None;

        let mut first_band: Option<usize> = None;
        let mut last_band: Option<usize> = None;

        for j in 0..self.path.len() - 1 {
            let q = j + 1;
            if degenerate(&anchors[j], &anchors[q]) {
                // Coincident joints produce no band; skip without
                // aborting the pass.
                prev_end = None;
                continue;
            }

            let m_start = self.miter_at(&anchors, j);
            let m_end = self.miter_at(&anchors, q);

            let raw_start = self.transported_ring(&self.path[j]);
            let raw_end = self.transported_ring(&self.path[q]);

            let start_ring = self.resolve_ring(&raw_start, &m_start, RingSide::Outgoing);
            let end_ring = self.resolve_ring(&raw_end, &m_end, RingSide::Incoming);

            if first_band.is_none() {
                first_band = Some(j);
                if self.config.cap_ends {
                    caps.push(self.capture_cap(0, &start_ring, &self.path[j], &m_start, true));
                }
            }
            last_band = Some(j);

            match self.config.normal_mode {
                NormalMode::Facet => {
                    let fallback = self.transported_edge_normals(&self.path[j]);
                    emitter.push_facet_band(
                        &start_ring,
                        &end_ring,
                        &fallback,
                        arc[j],
                        arc[q],
                    );
                    prev_end = None;
                }
                NormalMode::Edge | NormalMode::PathEdge => {
                    let start_normals = self.transported_point_normals(&self.path[j]);
                    let end_normals = if self.config.normal_mode == NormalMode::Edge {
                        start_normals.clone()
                    } else {
                        self.transported_point_normals(&self.path[q])
                    };

                    let a_idx = match prev_end.take() {
                        Some((joint, idx)) if share_rings && joint == j => idx,
                        _ => emitter.push_ring(&start_ring, &start_normals, arc[j]),
                    };
                    let b_idx = emitter.push_ring(&end_ring, &end_normals, arc[q]);
                    emitter.connect(&a_idx, &b_idx);

                    if share_rings {
                        prev_end = Some((q, b_idx.clone()));
                    }

                    if self.config.join == JoinStyle::Round {
                        self.emit_round_fan(&mut emitter, &anchors, q, &raw_end, &b_idx, arc[q]);
                    }
                }
            }

            if self.config.normal_mode == NormalMode::Facet
                && self.config.join == JoinStyle::Round
            {
                self.emit_round_fan_facets(&mut emitter, &anchors, q, &raw_end, arc[q]);
            }
        }

        if self.config.cap_ends {
            if let Some(j) = last_band {
                let q = j + 1;
                let m_end = self.miter_at(&anchors, q);
                let raw_end = self.transported_ring(&self.path[q]);
                let end_ring = self.resolve_ring(&raw_end, &m_end, RingSide::Incoming);
                caps.push(self.capture_cap(1, &end_ring, &self.path[q], &m_end, false));
            } else {
                // Fully degenerate path: no bands, no caps.
                caps.clear();
            }
        }

        Ok((emitter.mesh, caps))
    }

    /// Resolves the miter state at joint `q`, skipping coincident
    /// neighbors on either side. End joints reuse their own anchor as the
    /// missing neighbor, which drives the plane fits into their
    /// surviving-segment fallbacks.
    fn miter_at(&self, anchors: &[Point3], q: usize) -> JointMiter {
        let prev = prev_distinct(anchors, q).unwrap_or(q);
        let next = next_distinct(anchors, q).unwrap_or(q);
        JointMiter {
            anchor: anchors[q],
            t_in: normalize_or_zero(anchors[q] - anchors[prev]),
            t_out: normalize_or_zero(anchors[next] - anchors[q]),
            bisect: bisecting_plane(&anchors[prev], &anchors[q], &anchors[next]),
            cut: cutting_plane(&anchors[prev], &anchors[q], &anchors[next]),
            interior: prev != q && next != q,
        }
    }

    /// Projects a transported ring onto the joint's miter plane according
    /// to the join style. This projection — not a re-transformation — is
    /// what realizes the slice visually.
    fn resolve_ring(&self, raw: &[Point3], m: &JointMiter, side: RingSide) -> Vec<Point3> {
        if !m.interior || self.config.join == JoinStyle::Raw {
            return raw.to_vec();
        }

        match self.config.join {
            JoinStyle::Raw => raw.to_vec(),
            JoinStyle::Angle => project_all(raw, &m.t_in, &m.anchor, &m.bisect),
            JoinStyle::Cut => {
                let plane = if m.cut.valid { &m.cut } else { &m.bisect };
                project_all(raw, &m.t_in, &m.anchor, plane)
            }
            JoinStyle::Round => {
                if !m.cut.valid {
                    // Straight run: no turn to round, angular throughout.
                    return project_all(raw, &m.t_in, &m.anchor, &m.bisect);
                }
                raw.iter()
                    .map(|w| {
                        if (w - m.anchor).dot(&m.cut.normal) > 0.0 {
                            // Outside of the bend: end the tube on the
                            // plane perpendicular to its own segment; the
                            // transitional fan bridges to the other side.
                            let t = match side {
                                RingSide::Incoming => m.t_in,
                                RingSide::Outgoing => m.t_out,
                            };
                            w - t * (w - m.anchor).dot(&t)
                        } else {
                            // Inside: angular join on the bisect plane,
                            // shared by both bands.
                            project_plane_fit(w, &m.t_in, &m.anchor, &m.bisect)
                        }
                    })
                    .collect()
            }
        }
    }

    /// Emits the transitional fan of a ROUND joint: `round_blend_steps`
    /// bands spherically interpolating the outside of the bend between
    /// the incoming and outgoing ring orientations, starting from the
    /// already-emitted incoming ring `from_idx`.
    fn emit_round_fan(
        &self,
        emitter: &mut Emitter<'_>,
        anchors: &[Point3],
        q: usize,
        raw_end: &[Point3],
        from_idx: &[u32],
        arc: f64,
    ) {
        let Some((e_ring, s_ring, anchor)) = self.round_fan_rings(anchors, q, raw_end) else {
            return;
        };
        let normals = self.transported_point_normals(&self.path[q]);

        let steps = self.config.round_blend_steps;
        let mut prev: Vec<u32> = from_idx.to_vec();
        for s in 1..=steps {
            #[allow(clippy::cast_precision_loss)]
            let f = s as f64 / steps as f64;
            let ring = blend_ring(&e_ring, &s_ring, &anchor, f);
            let idx = emitter.push_ring(&ring, &normals, arc);
            emitter.connect(&prev, &idx);
            prev = idx;
        }
    }

    /// Facet-mode variant of the transitional fan: per-facet normals,
    /// duplicated vertices.
    fn emit_round_fan_facets(
        &self,
        emitter: &mut Emitter<'_>,
        anchors: &[Point3],
        q: usize,
        raw_end: &[Point3],
        arc: f64,
    ) {
        let Some((e_ring, s_ring, anchor)) = self.round_fan_rings(anchors, q, raw_end) else {
            return;
        };
        let fallback = self.transported_edge_normals(&self.path[q]);

        let steps = self.config.round_blend_steps;
        let mut prev = e_ring.clone();
        for s in 1..=steps {
            #[allow(clippy::cast_precision_loss)]
            let f = s as f64 / steps as f64;
            let ring = blend_ring(&e_ring, &s_ring, &anchor, f);
            emitter.push_facet_band(&prev, &ring, &fallback, arc, arc);
            prev = ring;
        }
    }

    /// The two boundary rings of a ROUND fan at joint `q`: the incoming
    /// ring (perpendicular end of the arriving tube) and the outgoing
    /// ring (perpendicular start of the departing tube). Returns `None`
    /// when the joint has no outgoing band or no turn to round.
    fn round_fan_rings(
        &self,
        anchors: &[Point3],
        q: usize,
        raw_end: &[Point3],
    ) -> Option<(Vec<Point3>, Vec<Point3>, Point3)> {
        if q >= self.path.len() - 1 || degenerate(&anchors[q], &anchors[q + 1]) {
            return None;
        }
        let m = self.miter_at(anchors, q);
        if !m.interior || !m.cut.valid {
            return None;
        }
        let e_ring = self.resolve_ring(raw_end, &m, RingSide::Incoming);
        let s_ring = self.resolve_ring(raw_end, &m, RingSide::Outgoing);
        Some((e_ring, s_ring, m.anchor))
    }

    fn capture_cap(
        &self,
        loop_index: usize,
        ring: &[Point3],
        placement: &AffinePlacement,
        m: &JointMiter,
        front_facing: bool,
    ) -> CapData {
        // The cap plane normal is the end tangent (the bisect fit at an
        // end joint degenerates to exactly that). An in-plane basis keeps
        // the cap normal finite even when the ring has collapsed to a
        // point, as at a cone tip.
        let plane_normal = if front_facing { m.t_out } else { m.t_in };
        let (cut_vector, bisect_vector) = plane_basis(&plane_normal);
        CapData {
            loop_index,
            vertices: ring.to_vec(),
            normals: self.transported_point_normals(placement),
            cut_vector,
            bisect_vector,
            front_facing,
        }
    }

    // ── transport ──

    fn transported_ring(&self, placement: &AffinePlacement) -> Vec<Point3> {
        self.contour
            .points()
            .iter()
            .map(|p| placement.apply(*p))
            .collect()
    }

    fn transported_point_normals(&self, placement: &AffinePlacement) -> Vec<Vector3> {
        self.contour
            .point_normals()
            .iter()
            .map(|n| normalize_or_zero(placement.apply_direction(*n)))
            .collect()
    }

    fn transported_edge_normals(&self, placement: &AffinePlacement) -> Vec<Vector3> {
        self.contour
            .edge_normals()
            .iter()
            .map(|n| normalize_or_zero(placement.apply_direction(*n)))
            .collect()
    }
}

/// Which band a ring terminates at a joint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RingSide {
    /// End ring of the arriving band.
    Incoming,
    /// Start ring of the departing band.
    Outgoing,
}

impl CapData {
    fn as_ring(&self) -> CapRing<'_> {
        CapRing {
            loop_index: self.loop_index,
            vertices: &self.vertices,
            normals: &self.normals,
            cut_vector: self.cut_vector,
            bisect_vector: self.bisect_vector,
            front_facing: self.front_facing,
        }
    }
}

// ── band emission ──

/// Appends rings and facets to the mesh, tracking the per-vertex texture
/// inputs when a texture mode is active.
struct Emitter<'c> {
    mesh: SweptMesh,
    texture: Option<TextureMode>,
    contour: &'c Contour,
    model_points: Vec<Point3>,
    model_point_normals: Vec<Vector3>,
    model_edge_normals: Vec<Vector3>,
}

impl<'c> Emitter<'c> {
    fn new(contour: &'c Contour, texture: Option<TextureMode>) -> Self {
        let lift = |p: &crate::math::Point2| Point3::new(p.x, p.y, 0.0);
        let lift_v = |v: &crate::math::Vector2| Vector3::new(v.x, v.y, 0.0);
        Self {
            mesh: SweptMesh::default(),
            texture,
            contour,
            model_points: contour.points().iter().map(lift).collect(),
            model_point_normals: contour.point_normals().iter().map(lift_v).collect(),
            model_edge_normals: contour.edge_normals().iter().map(lift_v).collect(),
        }
    }

    fn push_vertex(
        &mut self,
        position: Point3,
        normal: Vector3,
        model_point: usize,
        model_normal: Vector3,
        arc: f64,
    ) -> u32 {
        #[allow(clippy::cast_possible_truncation)]
        let idx = self.mesh.vertices.len() as u32;
        self.mesh.vertices.push(position);
        self.mesh.normals.push(normal);
        if let Some(mode) = self.texture {
            self.mesh.uvs.push(tex_coord(
                mode,
                &TexVertex {
                    position,
                    normal,
                    model_position: self.model_points[model_point],
                    model_normal,
                    arc_length: arc,
                },
            ));
        }
        idx
    }

    /// Pushes one ring of vertices; returns their indices.
    fn push_ring(&mut self, positions: &[Point3], normals: &[Vector3], arc: f64) -> Vec<u32> {
        (0..positions.len())
            .map(|i| {
                self.push_vertex(
                    positions[i],
                    normals[i],
                    i,
                    self.model_point_normals[i],
                    arc,
                )
            })
            .collect()
    }

    /// Connects two rings with a band of quad facets.
    fn connect(&mut self, a: &[u32], b: &[u32]) {
        let n = a.len();
        for i in 0..self.contour.edge_count() {
            let i2 = (i + 1) % n;
            self.mesh.indices.push([a[i], a[i2], b[i2]]);
            self.mesh.indices.push([a[i], b[i2], b[i]]);
        }
    }

    /// Emits a band with one flat normal per facet, duplicating the four
    /// corner vertices of every facet.
    fn push_facet_band(
        &mut self,
        start: &[Point3],
        end: &[Point3],
        fallback_normals: &[Vector3],
        arc_start: f64,
        arc_end: f64,
    ) {
        let n = start.len();
        for i in 0..self.contour.edge_count() {
            let i2 = (i + 1) % n;
            let mut normal =
                normalize_or_zero((start[i2] - start[i]).cross(&(end[i] - start[i])));
            if normal == Vector3::zeros() {
                // Degenerate facet (collapsed ring or sliver); reuse the
                // transported contour edge normal so shading stays finite.
                normal = fallback_normals[i];
            }
            let model_n = self.model_edge_normals[i];

            let v0 = self.push_vertex(start[i], normal, i, model_n, arc_start);
            let v1 = self.push_vertex(start[i2], normal, i2, model_n, arc_start);
            let v2 = self.push_vertex(end[i2], normal, i2, model_n, arc_end);
            let v3 = self.push_vertex(end[i], normal, i, model_n, arc_end);
            self.mesh.indices.push([v0, v1, v2]);
            self.mesh.indices.push([v0, v2, v3]);
        }
    }
}

// ── geometry helpers ──

fn cumulative_arc_lengths(anchors: &[Point3]) -> Vec<f64> {
    let mut lengths = Vec::with_capacity(anchors.len());
    lengths.push(0.0);
    for i in 1..anchors.len() {
        let seg = (anchors[i] - anchors[i - 1]).norm();
        lengths.push(lengths[i - 1] + seg);
    }
    lengths
}

fn project_plane_fit(w: &Point3, dir: &Vector3, anchor: &Point3, fit: &PlaneFit) -> Point3 {
    if fit.valid {
        project_onto_plane(w, dir, anchor, &fit.normal)
    } else {
        *w
    }
}

fn project_all(raw: &[Point3], dir: &Vector3, anchor: &Point3, fit: &PlaneFit) -> Vec<Point3> {
    raw.iter()
        .map(|w| project_plane_fit(w, dir, anchor, fit))
        .collect()
}

/// Spherically interpolates one ring toward another about `anchor`.
///
/// Falls back to linear interpolation for collapsed offsets or
/// near-(anti)parallel directions, where the spherical form is unstable.
fn blend_point(e: &Point3, s: &Point3, anchor: &Point3, f: f64) -> Point3 {
    let a = e - anchor;
    let b = s - anchor;
    let (la, lb) = (a.norm(), b.norm());
    if la <= TOLERANCE || lb <= TOLERANCE {
        return lerp(e, s, f);
    }
    let (ua, ub) = (a / la, b / lb);
    let cos = ua.dot(&ub).clamp(-1.0, 1.0);
    let omega = cos.acos();
    if omega.sin() <= TOLERANCE {
        return lerp(e, s, f);
    }
    let dir = (((1.0 - f) * omega).sin() * ua + (f * omega).sin() * ub) / omega.sin();
    let radius = la + f * (lb - la);
    anchor + radius * dir
}

fn blend_ring(e: &[Point3], s: &[Point3], anchor: &Point3, f: f64) -> Vec<Point3> {
    e.iter()
        .zip(s)
        .map(|(pe, ps)| blend_point(pe, ps, anchor, f))
        .collect()
}

fn lerp(a: &Point3, b: &Point3, f: f64) -> Point3 {
    Point3::from(a.coords + f * (b.coords - a.coords))
}

/// An orthonormal in-plane basis `(cut, bisect)` for the plane with the
/// given unit normal, chosen so `cut × bisect` equals the normal.
fn plane_basis(normal: &Vector3) -> (Vector3, Vector3) {
    let reference = if normal.x.abs() < 0.9 {
        Vector3::new(1.0, 0.0, 0.0)
    } else {
        Vector3::new(0.0, 1.0, 0.0)
    };
    let cut = normalize_or_zero(normal.cross(&reference));
    let bisect = normal.cross(&cut);
    (cut, bisect)
}
