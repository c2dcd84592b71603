use crate::error::{GeometryError, Result};
use crate::math::{Point2, Vector2, TOLERANCE};

/// A 2D cross-section outline, swept along a path to form a solid.
///
/// Points live in the contour's local (u, v) frame with the sweep origin
/// at (0, 0). A closed contour connects its last point back to the first;
/// an open contour (corrugated sheet, channel profiles) does not. The
/// contour is supplied once per extrusion pass and never mutated.
#[derive(Debug, Clone)]
pub struct Contour {
    points: Vec<Point2>,
    closed: bool,
}

impl Contour {
    /// Creates a contour from its ordered points.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than 2 points are provided.
    pub fn new(points: Vec<Point2>, closed: bool) -> Result<Self> {
        if points.len() < 2 {
            return Err(GeometryError::ContourTooSmall {
                min: 2,
                got: points.len(),
            }
            .into());
        }
        Ok(Self { points, closed })
    }

    /// Returns the contour points.
    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// Returns the number of contour points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if the contour has no points. Construction enforces
    /// a minimum of 2 points, so this is always `false`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns whether the last point connects back to the first.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Returns the number of edges: `n` for a closed contour, `n − 1` for
    /// an open one.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        if self.closed {
            self.points.len()
        } else {
            self.points.len() - 1
        }
    }

    /// Per-edge unit perpendiculars.
    ///
    /// Edge `i` runs from point `i` to point `(i + 1) % n`; its
    /// perpendicular is `(dy, −dx)` normalized, which points outward for
    /// a counter-clockwise contour. A zero-length edge yields a zero
    /// vector.
    #[must_use]
    pub fn edge_normals(&self) -> Vec<Vector2> {
        let n = self.points.len();
        (0..self.edge_count())
            .map(|i| {
                let d = self.points[(i + 1) % n] - self.points[i];
                perp_or_zero(d)
            })
            .collect()
    }

    /// Per-point unit normals: the normalized average of the adjacent
    /// edge perpendiculars.
    ///
    /// Open ends use their single adjacent edge. These drive the EDGE and
    /// PATH_EDGE shading policies, giving smooth shading around the
    /// contour's circumference.
    #[must_use]
    pub fn point_normals(&self) -> Vec<Vector2> {
        let n = self.points.len();
        let edges = self.edge_normals();
        let e = edges.len();

        (0..n)
            .map(|i| {
                let next = if i < e { Some(edges[i]) } else { None };
                let prev = if i > 0 {
                    Some(edges[i - 1])
                } else if self.closed {
                    Some(edges[e - 1])
                } else {
                    None
                };

                let sum = match (prev, next) {
                    (Some(a), Some(b)) => a + b,
                    (Some(a), None) => a,
                    (None, Some(b)) => b,
                    (None, None) => Vector2::zeros(),
                };
                let len = sum.norm();
                if len <= TOLERANCE {
                    // Adjacent edges cancel (a cusp); keep whichever side
                    // survives so the shading stays finite.
                    next.or(prev).unwrap_or_else(Vector2::zeros)
                } else {
                    sum / len
                }
            })
            .collect()
    }
}

fn perp_or_zero(d: Vector2) -> Vector2 {
    let perp = Vector2::new(d.y, -d.x);
    let len = perp.norm();
    if len <= TOLERANCE {
        Vector2::zeros()
    } else {
        perp / len
    }
}
