/// Render pipeline: coordinate system, object rotation, view rotation, projection
use nalgebra::{Matrix4, Point2, Point3};

use crate::coordinate_system::CoordinateSystem;
use crate::geometry::Mesh;
use crate::projection::{ProjectionMode, Projector};
use crate::transform::{transform_point, RotationState, Transform};

/// A mesh after projection: 2D points with the original topology
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedMesh {
    pub points: Vec<Point2<f64>>,
    pub edges: Vec<[usize; 2]>,
    pub faces: Vec<Vec<usize>>,
    pub cap_faces: Vec<Vec<usize>>,
}

impl ProjectedMesh {
    /// Screen-space endpoints of every edge
    pub fn segments(&self) -> impl Iterator<Item = (Point2<f64>, Point2<f64>)> + '_ {
        self.edges
            .iter()
            .map(|&[a, b]| (self.points[a], self.points[b]))
    }

    /// Screen-space outline of a polygon loop
    pub fn polygon(&self, indices: &[usize]) -> Vec<Point2<f64>> {
        indices.iter().map(|&i| self.points[i]).collect()
    }
}

/// Per-frame view state.
///
/// Mesh vertices go through the active coordinate system, then the object
/// rotation, then the view rotation, then the projector. Overlays that stay
/// fixed to the world (coordinate axes) skip the first two steps.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pipeline {
    pub coordinate_system: CoordinateSystem,
    pub object_rotation: RotationState,
    pub view_rotation: RotationState,
    pub projector: Projector,
}

impl Pipeline {
    pub fn new(projector: Projector) -> Self {
        Self {
            coordinate_system: projector.coordinate_system,
            projector,
            ..Self::default()
        }
    }

    pub fn set_coordinate_system(&mut self, system: CoordinateSystem) {
        self.coordinate_system = system;
        self.projector.set_coordinate_system(system);
    }

    pub fn set_mode(&mut self, mode: ProjectionMode) {
        self.projector.set_mode(mode);
    }

    /// Run one mesh vertex through coordinate remap and both rotations
    pub fn transform(&self, p: &Point3<f64>) -> Point3<f64> {
        let p = self.coordinate_system.to_system(p);
        let p = self.object_rotation.apply(&p);
        self.view_rotation.apply(&p)
    }

    /// Transform and project one mesh vertex
    pub fn project_point(&self, p: &Point3<f64>) -> Point2<f64> {
        self.projector.project(&self.transform(p))
    }

    /// Object rotation then view rotation as a single matrix
    pub fn rotation_matrix(&self) -> Matrix4<f64> {
        Transform::object_view_matrix(&self.object_rotation, &self.view_rotation)
    }

    /// Project a mesh that rotates with the object
    pub fn project_mesh(&self, mesh: &Mesh) -> ProjectedMesh {
        let rotation = self.rotation_matrix();
        let points = mesh
            .vertices
            .iter()
            .map(|v| {
                let p = transform_point(&rotation, &self.coordinate_system.to_system(v));
                self.projector.project(&p)
            })
            .collect();
        carry_topology(mesh, points)
    }

    /// Project a mesh that rotates with the view only
    pub fn project_overlay(&self, mesh: &Mesh) -> ProjectedMesh {
        let points = mesh
            .vertices
            .iter()
            .map(|v| self.projector.project(&self.view_rotation.apply(v)))
            .collect();
        carry_topology(mesh, points)
    }

    /// Project a single world-fixed point, such as an axis label anchor
    pub fn project_overlay_point(&self, p: &Point3<f64>) -> Point2<f64> {
        self.projector.project(&self.view_rotation.apply(p))
    }
}

fn carry_topology(mesh: &Mesh, points: Vec<Point2<f64>>) -> ProjectedMesh {
    ProjectedMesh {
        points,
        edges: mesh.edges.clone(),
        faces: mesh.faces.clone(),
        cap_faces: mesh.cap_faces.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::MeshStyle;
    use crate::primitives::cube;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_identity_pipeline_matches_projector() {
        let pipeline = Pipeline::default();
        let p = Point3::new(0.5, -0.25, 1.0);
        assert_eq!(pipeline.project_point(&p), Projector::default().project(&p));
    }

    #[test]
    fn test_coordinate_system_applies_before_rotation() {
        let mut pipeline = Pipeline::default();
        pipeline.set_coordinate_system(CoordinateSystem::Lhs);
        pipeline.object_rotation = RotationState::new(0.0, 0.0, FRAC_PI_2);

        // (0, 1, 0) -> LHS (0, 0, 1) -> rotate about Z leaves it alone
        let moved = pipeline.transform(&Point3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(moved, Point3::new(0.0, 0.0, 1.0), epsilon = 1e-12);
        assert_eq!(pipeline.projector.coordinate_system, CoordinateSystem::Lhs);
    }

    #[test]
    fn test_view_rotation_follows_object_rotation() {
        let mut pipeline = Pipeline::default();
        pipeline.object_rotation = RotationState::new(0.0, 0.0, FRAC_PI_2);
        pipeline.view_rotation = RotationState::new(FRAC_PI_2, 0.0, 0.0);

        // (1,0,0) -> Z quarter turn -> (0,1,0) -> X quarter turn -> (0,0,1)
        let moved = pipeline.transform(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(moved, Point3::new(0.0, 0.0, 1.0), epsilon = 1e-12);
    }

    #[test]
    fn test_overlay_ignores_object_rotation() {
        let mut pipeline = Pipeline::default();
        pipeline.set_coordinate_system(CoordinateSystem::Lhs);
        pipeline.object_rotation = RotationState::new(1.0, 2.0, 3.0);
        let p = Point3::new(0.3, 0.2, 0.1);
        assert_eq!(pipeline.project_overlay_point(&p), pipeline.projector.project(&p));
    }

    #[test]
    fn test_project_mesh_keeps_topology() {
        let mesh = cube(1.0, MeshStyle::new(true, true)).unwrap();
        let pipeline = Pipeline::new(Projector::default());
        let projected = pipeline.project_mesh(&mesh);
        assert_eq!(projected.points.len(), 8);
        assert_eq!(projected.edges, mesh.edges);
        assert_eq!(projected.segments().count(), 12);
        assert_eq!(projected.polygon(&projected.cap_faces[0]).len(), 4);
    }

    #[test]
    fn test_matrix_path_matches_point_path() {
        let mesh = cube(2.0, MeshStyle::default()).unwrap();
        let mut pipeline = Pipeline::default();
        pipeline.set_coordinate_system(CoordinateSystem::Lhs);
        pipeline.object_rotation = RotationState::from_degrees(20.0, 35.0, -10.0);
        pipeline.view_rotation = RotationState::from_degrees(-30.0, 45.0, 0.0);

        let projected = pipeline.project_mesh(&mesh);
        for (v, p) in mesh.vertices.iter().zip(&projected.points) {
            assert_relative_eq!(pipeline.project_point(v), *p, epsilon = 1e-9);
        }
    }
}
