/// Parametric primitives: box, cylinder, cone, prism, pyramid, frustum
///
/// Shapes are unit sized and centered on the origin, spanning `y = -1` to
/// `y = 1` (boxes span their own dimensions). Rings of vertices lie in the XZ
/// plane. Index layout, rulings and faces follow the extrusion conventions:
/// the start ring comes first, its cap listed in order, the end cap listed in
/// reverse.
///
/// Invalid parameters are rejected with `InvalidParameter`, never clamped.
use std::f64::consts::TAU;

use nalgebra::Point3;
use tracing::debug;

use crate::error::{GeometryError, GeometryResult};
use crate::geometry::{Mesh, MeshStyle};

const MIN_SEGMENTS: usize = 3;

fn check_segments(name: &'static str, count: usize) -> GeometryResult<()> {
    if count < MIN_SEGMENTS {
        return Err(GeometryError::invalid(name, count as f64, "must be at least 3"));
    }
    Ok(())
}

fn check_dimension(name: &'static str, value: f64) -> GeometryResult<()> {
    if !(value >= 0.0) || !value.is_finite() {
        return Err(GeometryError::invalid(name, value, "must be finite and non-negative"));
    }
    Ok(())
}

/// Point on a ring of `radius` in the XZ plane at height `y`.
///
/// Rings run counter-clockwise about +Y, the same turn `extrude` gives a
/// profile extruded along +Y.
fn ring_point(i: usize, segments: usize, radius: f64, y: f64) -> Point3<f64> {
    let angle = i as f64 / segments as f64 * TAU;
    let (s, c) = angle.sin_cos();
    Point3::new(c * radius, y, -s * radius)
}

/// Two stacked rings joined side by side: cylinder, prism, frustum
fn ring_pair(segments: usize, start_radius: f64, end_radius: f64, style: MeshStyle) -> Mesh {
    let n = segments;
    let mut mesh = Mesh::with_capacity(2 * n, 3 * n);

    for i in 0..n {
        mesh.add_vertex(ring_point(i, n, start_radius, -1.0));
    }
    for i in 0..n {
        mesh.add_vertex(ring_point(i, n, end_radius, 1.0));
    }

    for i in 0..n {
        let next = (i + 1) % n;
        mesh.add_edge(i, next);
        mesh.add_edge(n + i, n + next);
        if style.show_rulings {
            mesh.add_edge(i, n + i);
        }
        if style.show_fill {
            mesh.faces.push(vec![i, next, n + next, n + i]);
        }
    }

    if style.show_fill {
        mesh.cap_faces.push((0..n).collect());
        mesh.cap_faces.push((n..2 * n).rev().collect());
    }
    mesh
}

/// A single apex over a ring: cone, pyramid
fn apex_ring(segments: usize, style: MeshStyle) -> Mesh {
    let n = segments;
    let mut mesh = Mesh::with_capacity(n + 1, 2 * n);

    let apex = mesh.add_vertex(Point3::new(0.0, -1.0, 0.0));
    for i in 0..n {
        mesh.add_vertex(ring_point(i, n, 1.0, 1.0));
    }

    for i in 0..n {
        let curr = i + 1;
        let next = (i + 1) % n + 1;
        if style.show_rulings {
            mesh.add_edge(apex, curr);
        }
        mesh.add_edge(curr, next);
        if style.show_fill {
            mesh.faces.push(vec![apex, next, curr]);
        }
    }

    if style.show_fill {
        // The base is the end cap, listed in reverse like an extrusion's
        mesh.cap_faces.push((1..=n).rev().collect());
    }
    mesh
}

fn finish(kind: &'static str, mesh: Mesh) -> GeometryResult<Mesh> {
    debug!(
        kind,
        vertices = mesh.vertex_count(),
        edges = mesh.edge_count(),
        faces = mesh.face_count(),
        "built primitive"
    );
    Ok(mesh)
}

/// Options for [`make_box`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxOptions {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    pub style: MeshStyle,
}

impl Default for BoxOptions {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
            depth: 1.0,
            style: MeshStyle::default(),
        }
    }
}

/// Rectangular box centered on the origin.
///
/// Vertices `0..4` are the back face (`z = -depth/2`), `4..8` the front face.
pub fn make_box(options: &BoxOptions) -> GeometryResult<Mesh> {
    check_dimension("width", options.width)?;
    check_dimension("height", options.height)?;
    check_dimension("depth", options.depth)?;

    let w = options.width / 2.0;
    let h = options.height / 2.0;
    let d = options.depth / 2.0;
    let corners = [(-w, -h), (w, -h), (w, h), (-w, h)];

    let mut mesh = Mesh::with_capacity(8, 12);
    for z in [-d, d] {
        for &(x, y) in &corners {
            mesh.add_vertex(Point3::new(x, y, z));
        }
    }

    for i in 0..4 {
        let next = (i + 1) % 4;
        mesh.add_edge(i, next);
        mesh.add_edge(4 + i, 4 + next);
        if options.style.show_rulings {
            mesh.add_edge(i, 4 + i);
        }
        if options.style.show_fill {
            mesh.faces.push(vec![i, next, 4 + next, 4 + i]);
        }
    }
    if options.style.show_fill {
        mesh.cap_faces.push(vec![0, 1, 2, 3]);
        mesh.cap_faces.push(vec![7, 6, 5, 4]);
    }

    finish("box", mesh)
}

/// Cube with edge length `size`
pub fn cube(size: f64, style: MeshStyle) -> GeometryResult<Mesh> {
    make_box(&BoxOptions {
        width: size,
        height: size,
        depth: size,
        style,
    })
}

/// Options for [`make_cylinder`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CylinderOptions {
    pub segments: usize,
    pub style: MeshStyle,
}

impl Default for CylinderOptions {
    fn default() -> Self {
        Self {
            segments: 16,
            style: MeshStyle::default(),
        }
    }
}

/// Unit-radius cylinder of height 2
pub fn make_cylinder(options: &CylinderOptions) -> GeometryResult<Mesh> {
    check_segments("segments", options.segments)?;
    finish("cylinder", ring_pair(options.segments, 1.0, 1.0, options.style))
}

/// Options for [`make_prism`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrismOptions {
    pub sides: usize,
    pub style: MeshStyle,
}

impl Default for PrismOptions {
    fn default() -> Self {
        Self {
            sides: 6,
            style: MeshStyle::default(),
        }
    }
}

/// Regular `sides`-gon prism inscribed in the unit cylinder
pub fn make_prism(options: &PrismOptions) -> GeometryResult<Mesh> {
    check_segments("sides", options.sides)?;
    finish("prism", ring_pair(options.sides, 1.0, 1.0, options.style))
}

/// Options for [`make_frustum`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrustumOptions {
    pub segments: usize,
    /// Radius of the ring at `y = -1`
    pub top_radius: f64,
    /// Radius of the ring at `y = 1`
    pub bottom_radius: f64,
    pub style: MeshStyle,
}

impl Default for FrustumOptions {
    fn default() -> Self {
        Self {
            segments: 16,
            top_radius: 0.5,
            bottom_radius: 1.0,
            style: MeshStyle::default(),
        }
    }
}

/// Truncated cone with independent top and bottom radii.
///
/// "Top" is the `y = -1` ring, which is drawn uppermost on screen since
/// screen Y grows downward.
pub fn make_frustum(options: &FrustumOptions) -> GeometryResult<Mesh> {
    check_segments("segments", options.segments)?;
    check_dimension("top_radius", options.top_radius)?;
    check_dimension("bottom_radius", options.bottom_radius)?;
    finish(
        "frustum",
        ring_pair(options.segments, options.top_radius, options.bottom_radius, options.style),
    )
}

/// Options for [`make_cone`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConeOptions {
    pub segments: usize,
    pub style: MeshStyle,
}

impl Default for ConeOptions {
    fn default() -> Self {
        Self {
            segments: 16,
            style: MeshStyle::default(),
        }
    }
}

/// Cone with its apex (vertex 0) at `y = -1` and a unit base ring at `y = 1`
pub fn make_cone(options: &ConeOptions) -> GeometryResult<Mesh> {
    check_segments("segments", options.segments)?;
    finish("cone", apex_ring(options.segments, options.style))
}

/// Options for [`make_pyramid`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PyramidOptions {
    pub sides: usize,
    pub style: MeshStyle,
}

impl Default for PyramidOptions {
    fn default() -> Self {
        Self {
            sides: 4,
            style: MeshStyle::default(),
        }
    }
}

/// Pyramid over a regular `sides`-gon base
pub fn make_pyramid(options: &PyramidOptions) -> GeometryResult<Mesh> {
    check_segments("sides", options.sides)?;
    finish("pyramid", apex_ring(options.sides, options.style))
}
