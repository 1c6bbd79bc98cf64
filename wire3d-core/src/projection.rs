/// Camera and projection utilities
use nalgebra::{Matrix4, Point2, Point3, Vector3};
use std::str::FromStr;

use crate::coordinate_system::CoordinateSystem;
use crate::error::GeometryError;
use crate::transform::normalize;

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectionMode {
    Orthographic,
    #[default]
    Perspective,
}

impl ProjectionMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Orthographic => Self::Perspective,
            Self::Perspective => Self::Orthographic,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Orthographic => "orthographic",
            Self::Perspective => "perspective",
        }
    }
}

impl FromStr for ProjectionMode {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "perspective" => Ok(Self::Perspective),
            "orthographic" | "ortho" => Ok(Self::Orthographic),
            _ => Err(GeometryError::unknown_name("projection mode", s)),
        }
    }
}

/// Initial camera configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraOptions {
    pub position: Point3<f64>,
    pub target: Point3<f64>,
    pub up: Vector3<f64>,
    /// Vertical field of view in degrees
    pub fov: f64,
    pub near: f64,
    pub far: f64,
    pub coordinate_system: CoordinateSystem,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 5.0),
            target: Point3::origin(),
            up: Vector3::y(),
            fov: 60.0,
            near: 0.1,
            far: 100.0,
            coordinate_system: CoordinateSystem::Rhs,
        }
    }
}

/// Camera configuration for 3D viewing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Point3<f64>,
    pub target: Point3<f64>,
    pub up: Vector3<f64>,
    pub fov: f64,
    pub near: f64,
    pub far: f64,
    pub coordinate_system: CoordinateSystem,
}

const PRESET_DISTANCE: f64 = 5.0;

impl Camera {
    pub fn new(options: CameraOptions) -> Self {
        Self {
            position: options.position,
            target: options.target,
            up: options.up,
            fov: options.fov,
            near: options.near,
            far: options.far,
            coordinate_system: options.coordinate_system,
        }
    }

    /// Camera adapted to `system`, placed on the orbit sphere at the given angles
    fn preset(system: CoordinateSystem, pitch_deg: f64, yaw_deg: f64) -> Self {
        let mut camera = Self::new(CameraOptions {
            coordinate_system: system,
            ..CameraOptions::default()
        });
        camera.set_coordinate_system(system);
        camera.set_from_euler(
            pitch_deg.to_radians(),
            yaw_deg.to_radians(),
            0.0,
            PRESET_DISTANCE,
        );
        camera
    }

    /// Isometric view: 35.264° above the horizon, 45° around
    pub fn isometric(system: CoordinateSystem) -> Self {
        Self::preset(system, 35.264, 45.0)
    }

    pub fn front(system: CoordinateSystem) -> Self {
        Self::preset(system, 0.0, 0.0)
    }

    pub fn top(system: CoordinateSystem) -> Self {
        Self::preset(system, 90.0, 0.0)
    }

    pub fn side(system: CoordinateSystem) -> Self {
        Self::preset(system, 0.0, 90.0)
    }

    pub fn set_position(&mut self, x: f64, y: f64, z: f64) {
        self.position = Point3::new(x, y, z);
    }

    /// Set the look-at point
    pub fn set_target(&mut self, x: f64, y: f64, z: f64) {
        self.target = Point3::new(x, y, z);
    }

    /// Switch coordinate system and adopt its up vector
    pub fn set_coordinate_system(&mut self, system: CoordinateSystem) {
        self.coordinate_system = system;
        self.up = system.up();
    }

    /// Place the camera on a sphere of radius `distance` around the target.
    ///
    /// `pitch` lifts the camera above the horizon, `yaw` swings it around the
    /// vertical axis. Under LHS the Y and Z offsets are swapped so the orbit
    /// follows the Z-up axis. `_roll` is accepted for symmetry with the
    /// slider controls and does not affect the position.
    pub fn set_from_euler(&mut self, pitch: f64, yaw: f64, _roll: f64, distance: f64) {
        let (sin_p, cos_p) = pitch.sin_cos();
        let (sin_y, cos_y) = yaw.sin_cos();

        let mut offset = Vector3::new(
            distance * sin_y * cos_p,
            distance * sin_p,
            distance * cos_y * cos_p,
        );
        if self.coordinate_system == CoordinateSystem::Lhs {
            offset.swap_rows(1, 2);
        }

        self.position = self.target + offset;
    }

    /// Create the right-handed look-at view matrix.
    ///
    /// `up` must not be parallel to `position - target`; that configuration
    /// produces NaN entries.
    pub fn view_matrix(&self) -> Matrix4<f64> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Unit vector from the camera towards its target
    pub fn forward(&self) -> Vector3<f64> {
        normalize(&(self.target - self.position))
    }

    /// Unit vector pointing to the camera's right
    pub fn right(&self) -> Vector3<f64> {
        normalize(&self.up.cross(&self.forward()))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(CameraOptions::default())
    }
}

/// Initial projector configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectorOptions {
    pub width: f64,
    pub height: f64,
    pub mode: ProjectionMode,
    pub focal_length: f64,
    /// Pixels per world unit
    pub scale: f64,
    pub coordinate_system: CoordinateSystem,
}

impl Default for ProjectorOptions {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 400.0,
            mode: ProjectionMode::Perspective,
            focal_length: 4.0,
            scale: 100.0,
            coordinate_system: CoordinateSystem::Rhs,
        }
    }
}

/// Maps view-space points to 2D screen coordinates centered in the viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    pub width: f64,
    pub height: f64,
    pub mode: ProjectionMode,
    pub focal_length: f64,
    pub scale: f64,
    pub coordinate_system: CoordinateSystem,
}

impl Projector {
    pub fn new(options: ProjectorOptions) -> Self {
        Self {
            width: options.width,
            height: options.height,
            mode: options.mode,
            focal_length: options.focal_length,
            scale: options.scale,
            coordinate_system: options.coordinate_system,
        }
    }

    pub fn set_mode(&mut self, mode: ProjectionMode) {
        self.mode = mode;
    }

    pub fn set_coordinate_system(&mut self, system: CoordinateSystem) {
        self.coordinate_system = system;
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Project a 3D point to 2D screen coordinates.
    ///
    /// In perspective mode a point at `z = -focal_length` divides by zero and
    /// yields non-finite coordinates; callers cull such points first.
    pub fn project(&self, point: &Point3<f64>) -> Point2<f64> {
        let factor = match self.mode {
            ProjectionMode::Perspective => {
                self.focal_length / (self.focal_length + point.z) * self.scale
            }
            ProjectionMode::Orthographic => self.scale,
        };
        Point2::new(
            self.width / 2.0 + point.x * factor,
            self.height / 2.0 + point.y * factor,
        )
    }

    /// Project a slice of points
    pub fn project_all(&self, points: &[Point3<f64>]) -> Vec<Point2<f64>> {
        points.iter().map(|p| self.project(p)).collect()
    }
}

impl Default for Projector {
    fn default() -> Self {
        Self::new(ProjectorOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::transform_point;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_camera_creation() {
        let camera = Camera::default();
        assert_eq!(camera.position, Point3::new(0.0, 0.0, 5.0));
        assert_eq!(camera.fov, 60.0);
        assert_eq!(camera.coordinate_system, CoordinateSystem::Rhs);
    }

    #[test]
    fn test_set_from_euler_front() {
        let mut camera = Camera::default();
        camera.set_from_euler(0.0, 0.0, 0.0, 5.0);
        assert_relative_eq!(camera.position, Point3::new(0.0, 0.0, 5.0), epsilon = 1e-12);
    }

    #[test]
    fn test_set_from_euler_orbits_target() {
        let mut camera = Camera::default();
        camera.set_target(1.0, 2.0, 3.0);
        camera.set_from_euler(0.4, 1.2, 0.0, 7.0);
        assert_relative_eq!((camera.position - camera.target).norm(), 7.0, epsilon = 1e-12);
    }

    #[test]
    fn test_roll_does_not_move_camera() {
        let mut a = Camera::default();
        let mut b = Camera::default();
        a.set_from_euler(0.3, 0.6, 0.0, 5.0);
        b.set_from_euler(0.3, 0.6, 1.3, 5.0);
        assert_eq!(a.position, b.position);
    }

    #[test]
    fn test_lhs_swaps_height_into_z() {
        let mut camera = Camera::default();
        camera.set_coordinate_system(CoordinateSystem::Lhs);
        assert_eq!(camera.up, Vector3::z());
        camera.set_from_euler(FRAC_PI_2, 0.0, 0.0, 5.0);
        assert_relative_eq!(camera.position, Point3::new(0.0, 0.0, 5.0), epsilon = 1e-12);

        let top = Camera::top(CoordinateSystem::Rhs);
        assert_relative_eq!(top.position, Point3::new(0.0, 5.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_view_matrix_layout() {
        let camera = Camera::isometric(CoordinateSystem::Rhs);
        let view = camera.view_matrix();

        let z_axis = normalize(&(camera.position - camera.target));
        let x_axis = normalize(&camera.up.cross(&z_axis));
        let y_axis = z_axis.cross(&x_axis);
        let m = view.as_slice();

        for (row, axis) in [x_axis, y_axis, z_axis].iter().enumerate() {
            for col in 0..3 {
                assert_relative_eq!(m[col * 4 + row], axis[col], epsilon = 1e-12);
            }
            assert_relative_eq!(m[12 + row], -axis.dot(&camera.position.coords), epsilon = 1e-12);
        }
        assert_eq!(m[15], 1.0);
    }

    #[test]
    fn test_view_matrix_moves_target_in_front() {
        let camera = Camera::default();
        let target_in_view = transform_point(&camera.view_matrix(), &camera.target);
        assert_relative_eq!(target_in_view, Point3::new(0.0, 0.0, -5.0), epsilon = 1e-12);
    }

    #[test]
    fn test_forward_and_right() {
        let camera = Camera::default();
        assert_relative_eq!(camera.forward(), Vector3::new(0.0, 0.0, -1.0));
        assert_relative_eq!(camera.right(), Vector3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_perspective_projection() {
        let projector = Projector::default();
        assert_eq!(projector.project(&Point3::origin()), Point2::new(200.0, 200.0));
        assert_relative_eq!(
            projector.project(&Point3::new(1.0, 0.0, 0.0)),
            Point2::new(300.0, 200.0)
        );
        // Farther points shrink towards the center
        let far = projector.project(&Point3::new(1.0, 1.0, 4.0));
        assert_relative_eq!(far, Point2::new(250.0, 250.0));
    }

    #[test]
    fn test_orthographic_projection() {
        let mut projector = Projector::default();
        projector.set_mode(ProjectionMode::Orthographic);
        let points = projector.project_all(&[
            Point3::new(1.0, -1.0, 10.0),
            Point3::new(0.5, 0.5, -3.0),
        ]);
        assert_eq!(points, vec![Point2::new(300.0, 100.0), Point2::new(250.0, 250.0)]);
    }

    #[test]
    fn test_projection_mode_parsing() {
        assert_eq!("Perspective".parse(), Ok(ProjectionMode::Perspective));
        assert_eq!("ortho".parse(), Ok(ProjectionMode::Orthographic));
        assert_eq!(
            "fisheye".parse::<ProjectionMode>(),
            Err(GeometryError::UnknownName {
                kind: "projection mode",
                name: "fisheye".to_string(),
            })
        );
        assert_eq!(ProjectionMode::Perspective.toggled(), ProjectionMode::Orthographic);
    }
}
