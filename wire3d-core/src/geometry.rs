/// Wireframe mesh: a vertex arena plus index lists
use nalgebra::{Point3, Vector3};

use crate::error::{GeometryError, GeometryResult};

/// Display toggles shared by extrusion and every primitive generator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshStyle {
    /// Emit the edges joining corresponding start and end vertices
    pub show_rulings: bool,
    /// Emit side faces and cap faces
    pub show_fill: bool,
}

impl Default for MeshStyle {
    fn default() -> Self {
        Self {
            show_rulings: true,
            show_fill: false,
        }
    }
}

impl MeshStyle {
    pub fn new(show_rulings: bool, show_fill: bool) -> Self {
        Self {
            show_rulings,
            show_fill,
        }
    }
}

/// An index-based mesh.
///
/// `edges` are unordered index pairs, `faces` and `cap_faces` are polygon
/// loops of at least three indices. Every index is below `vertices.len()`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Point3<f64>>,
    pub edges: Vec<[usize; 2]>,
    pub faces: Vec<Vec<usize>>,
    pub cap_faces: Vec<Vec<usize>>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, edges: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            edges: Vec::with_capacity(edges),
            faces: Vec::new(),
            cap_faces: Vec::new(),
        }
    }

    /// Append a vertex and return its index
    pub fn add_vertex(&mut self, p: Point3<f64>) -> usize {
        self.vertices.push(p);
        self.vertices.len() - 1
    }

    pub fn add_edge(&mut self, a: usize, b: usize) {
        self.edges.push([a, b]);
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Side faces plus cap faces
    pub fn face_count(&self) -> usize {
        self.faces.len() + self.cap_faces.len()
    }

    /// Shift every vertex by `offset`
    pub fn translate(&mut self, offset: &Vector3<f64>) {
        for v in &mut self.vertices {
            *v += *offset;
        }
    }

    /// Check the index invariants, reporting the first violation
    pub fn validate(&self) -> GeometryResult<()> {
        let n = self.vertices.len();
        for &[a, b] in &self.edges {
            if a >= n || b >= n {
                return Err(GeometryError::invalid(
                    "edge",
                    a.max(b) as f64,
                    "edge index out of range",
                ));
            }
            if a == b {
                return Err(GeometryError::invalid(
                    "edge",
                    a as f64,
                    "edge joins a vertex to itself",
                ));
            }
        }
        for polygon in self.faces.iter().chain(&self.cap_faces) {
            if polygon.len() < 3 {
                return Err(GeometryError::invalid(
                    "face",
                    polygon.len() as f64,
                    "polygon needs at least 3 indices",
                ));
            }
            if let Some(&bad) = polygon.iter().find(|&&i| i >= n) {
                return Err(GeometryError::invalid(
                    "face",
                    bad as f64,
                    "face index out of range",
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Mesh {
        let mut mesh = Mesh::new();
        let a = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
        let c = mesh.add_vertex(Point3::new(0.0, 1.0, 0.0));
        mesh.add_edge(a, b);
        mesh.add_edge(b, c);
        mesh.add_edge(c, a);
        mesh.faces.push(vec![a, b, c]);
        mesh
    }

    #[test]
    fn test_counts() {
        let mesh = triangle();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.edge_count(), 3);
        assert_eq!(mesh.face_count(), 1);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_indices() {
        let mut mesh = triangle();
        mesh.add_edge(0, 3);
        assert!(mesh.validate().is_err());

        let mut mesh = triangle();
        mesh.add_edge(1, 1);
        assert!(mesh.validate().is_err());

        let mut mesh = triangle();
        mesh.cap_faces.push(vec![0, 1]);
        assert!(mesh.validate().is_err());
    }

    #[test]
    fn test_translate() {
        let mut mesh = triangle();
        mesh.translate(&Vector3::new(0.0, 0.0, 2.0));
        assert!(mesh.vertices.iter().all(|v| v.z == 2.0));
    }

    #[test]
    fn test_default_style() {
        let style = MeshStyle::default();
        assert!(style.show_rulings);
        assert!(!style.show_fill);
    }
}
