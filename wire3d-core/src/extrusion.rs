/// Profile extrusion along an arbitrary 3D direction
///
/// A closed 2D profile is laid out in the plane perpendicular to the
/// extrusion axis, copied to both ends of a segment centered on the origin,
/// and stitched into cap perimeters, rulings and faces.
use nalgebra::{Point2, Point3, Vector3};
use tracing::{debug, trace};

use crate::error::{GeometryError, GeometryResult};
use crate::geometry::{Mesh, MeshStyle};
use crate::transform::normalize;

/// Tolerance used when deciding whether two profile points coincide
pub const POINT_EPSILON: f64 = 1e-10;

/// Profiles whose absolute area falls below this are treated as collapsed
const AREA_EPSILON: f64 = 1e-12;

/// Above this |dot(w, Y)| the Y reference is considered too close to the axis
const PARALLEL_THRESHOLD: f64 = 0.9;

/// Options for [`extrude`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtrudeOptions {
    /// Extrusion axis, need not be normalized (default `+Y`)
    pub direction: Vector3<f64>,
    /// Total length, split evenly on both sides of the origin (default 2)
    pub length: f64,
    pub style: MeshStyle,
}

impl Default for ExtrudeOptions {
    fn default() -> Self {
        Self {
            direction: Vector3::y(),
            length: 2.0,
            style: MeshStyle::default(),
        }
    }
}

impl ExtrudeOptions {
    pub fn new(direction: Vector3<f64>, length: f64) -> Self {
        Self {
            direction,
            length,
            ..Self::default()
        }
    }

    pub fn with_style(mut self, style: MeshStyle) -> Self {
        self.style = style;
        self
    }
}

/// Orthonormal frame whose `w` axis is the extrusion direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtrusionBasis {
    pub u: Vector3<f64>,
    pub v: Vector3<f64>,
    pub w: Vector3<f64>,
}

impl ExtrusionBasis {
    /// Build the frame from a non-zero direction.
    ///
    /// The reference vector is `+Y`, or `+X` when `+Y` is nearly parallel to
    /// the axis. `u = normalize(ref × w)` and `v = w × u`.
    pub fn from_direction(direction: &Vector3<f64>) -> GeometryResult<Self> {
        if direction.norm() == 0.0 {
            return Err(GeometryError::ZeroDirection);
        }
        let w = normalize(direction);

        let mut reference = Vector3::y();
        if w.dot(&reference).abs() > PARALLEL_THRESHOLD {
            reference = Vector3::x();
        }

        let u = normalize(&reference.cross(&w));
        let v = w.cross(&u);
        Ok(Self { u, v, w })
    }

    /// Place a profile point at signed `offset` along the axis
    pub fn place(&self, p: &Point2<f64>, offset: f64) -> Point3<f64> {
        Point3::from(self.u * p.x + self.v * p.y + self.w * offset)
    }

    /// Coordinates of a 3D point within the (u, v) plane
    pub fn flatten(&self, p: &Point3<f64>) -> Point2<f64> {
        Point2::new(p.coords.dot(&self.u), p.coords.dot(&self.v))
    }
}

/// Signed polygon area by the shoelace formula, summing `(x2 - x1)(y2 + y1)`.
///
/// Positive for clockwise loops, negative for counter-clockwise ones.
pub fn signed_area(profile: &[Point2<f64>]) -> f64 {
    let n = profile.len();
    let mut area = 0.0;
    for i in 0..n {
        let a = profile[i];
        let b = profile[(i + 1) % n];
        area += (b.x - a.x) * (b.y + a.y);
    }
    area / 2.0
}

fn points_equal(a: &Point2<f64>, b: &Point2<f64>) -> bool {
    (a.x - b.x).abs() < POINT_EPSILON && (a.y - b.y).abs() < POINT_EPSILON
}

/// Sample a circular arc, both endpoints included.
///
/// Produces `segments + 1` points at uniform angular steps. A segment count
/// of zero is treated as one.
pub fn arc(
    center: Point2<f64>,
    radius: f64,
    start_angle: f64,
    end_angle: f64,
    segments: usize,
) -> Vec<Point2<f64>> {
    let segments = segments.max(1);
    let step = (end_angle - start_angle) / segments as f64;

    (0..=segments)
        .map(|i| {
            let angle = start_angle + i as f64 * step;
            let (s, c) = angle.sin_cos();
            Point2::new(center.x + radius * c, center.y + radius * s)
        })
        .collect()
}

/// Concatenate profile segments into one loop.
///
/// A segment's leading point is dropped when it repeats the previous
/// trailing point, and a final point repeating the very first is dropped.
pub fn join_segments<S: AsRef<[Point2<f64>]>>(segments: &[S]) -> Vec<Point2<f64>> {
    let mut result: Vec<Point2<f64>> = Vec::new();

    for segment in segments {
        let segment = segment.as_ref();
        let Some(first) = segment.first() else {
            continue;
        };
        let skip = match result.last() {
            Some(last) if points_equal(last, first) => 1,
            _ => 0,
        };
        result.extend_from_slice(&segment[skip..]);
    }

    if result.len() > 1 && points_equal(&result[result.len() - 1], &result[0]) {
        result.pop();
    }
    result
}

/// Extrude a closed profile into a prism-like mesh.
///
/// Vertices `0..n` form the start cap at `-length/2` along the axis and
/// `n..2n` the end cap at `+length/2`. The profile is reordered
/// counter-clockwise first, so input winding does not matter.
///
/// Side faces point outward by the right-hand rule, while both cap faces
/// point into the solid.
pub fn extrude(profile: &[Point2<f64>], options: &ExtrudeOptions) -> GeometryResult<Mesh> {
    let n = profile.len();
    if n < 3 {
        return Err(GeometryError::DegenerateProfile { points: n });
    }
    let area = signed_area(profile);
    if !(area.abs() > AREA_EPSILON) {
        return Err(GeometryError::DegenerateProfile { points: n });
    }
    let basis = ExtrusionBasis::from_direction(&options.direction)?;
    if !(options.length > 0.0) || !options.length.is_finite() {
        return Err(GeometryError::InvalidLength(options.length));
    }

    let mut ordered = profile.to_vec();
    if area > 0.0 {
        trace!(area, "profile is clockwise, reversing");
        ordered.reverse();
    }

    let half = options.length / 2.0;
    let style = options.style;
    let edges_per_point = if style.show_rulings { 3 } else { 2 };
    let mut mesh = Mesh::with_capacity(2 * n, edges_per_point * n);

    for p in &ordered {
        mesh.add_vertex(basis.place(p, -half));
    }
    for p in &ordered {
        mesh.add_vertex(basis.place(p, half));
    }

    for i in 0..n {
        let next = (i + 1) % n;
        mesh.add_edge(i, next);
        mesh.add_edge(n + i, n + next);
        if style.show_rulings {
            mesh.add_edge(i, n + i);
        }
    }

    if style.show_fill {
        for i in 0..n {
            let next = (i + 1) % n;
            mesh.faces.push(vec![i, next, n + next, n + i]);
        }
        mesh.cap_faces.push((0..n).collect());
        mesh.cap_faces.push((n..2 * n).rev().collect());
    }

    debug!(
        points = n,
        vertices = mesh.vertex_count(),
        edges = mesh.edge_count(),
        faces = mesh.face_count(),
        "extruded profile"
    );
    Ok(mesh)
}
