/// Vector helpers, 4x4 transformation matrices and rotation state
///
/// Matrices are nalgebra `Matrix4<f64>`, stored column-major: element
/// (row `r`, column `c`) lives at `m.as_slice()[c * 4 + r]`.
use nalgebra::{Matrix4, Point3, Vector3};

/// Normalize a vector, returning the zero vector when its length is exactly zero.
pub fn normalize(v: &Vector3<f64>) -> Vector3<f64> {
    let len = v.norm();
    if len == 0.0 {
        Vector3::zeros()
    } else {
        v / len
    }
}

/// Multiply a point by a 4x4 matrix and divide by the resulting w.
///
/// The caller must keep w away from zero for the points it cares about.
pub fn transform_point(m: &Matrix4<f64>, p: &Point3<f64>) -> Point3<f64> {
    let h = m * p.to_homogeneous();
    Point3::new(h.x / h.w, h.y / h.w, h.z / h.w)
}

/// Rotation matrix around the X axis (radians)
pub fn rotation_x(angle: f64) -> Matrix4<f64> {
    Matrix4::new_rotation(Vector3::new(angle, 0.0, 0.0))
}

/// Rotation matrix around the Y axis (radians)
pub fn rotation_y(angle: f64) -> Matrix4<f64> {
    Matrix4::new_rotation(Vector3::new(0.0, angle, 0.0))
}

/// Rotation matrix around the Z axis (radians)
pub fn rotation_z(angle: f64) -> Matrix4<f64> {
    Matrix4::new_rotation(Vector3::new(0.0, 0.0, angle))
}

/// Translation matrix
pub fn translation(tx: f64, ty: f64, tz: f64) -> Matrix4<f64> {
    Matrix4::new_translation(&Vector3::new(tx, ty, tz))
}

/// Rotate a point around the X axis without building a matrix
pub fn rotate_x(p: &Point3<f64>, angle: f64) -> Point3<f64> {
    let (s, c) = angle.sin_cos();
    Point3::new(p.x, p.y * c - p.z * s, p.y * s + p.z * c)
}

/// Rotate a point around the Y axis without building a matrix
pub fn rotate_y(p: &Point3<f64>, angle: f64) -> Point3<f64> {
    let (s, c) = angle.sin_cos();
    Point3::new(p.x * c + p.z * s, p.y, -p.x * s + p.z * c)
}

/// Rotate a point around the Z axis without building a matrix
pub fn rotate_z(p: &Point3<f64>, angle: f64) -> Point3<f64> {
    let (s, c) = angle.sin_cos();
    Point3::new(p.x * c - p.y * s, p.x * s + p.y * c, p.z)
}

/// Rotation state around three axes (in radians)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl RotationState {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Build from angles given in degrees
    pub fn from_degrees(x: f64, y: f64, z: f64) -> Self {
        Self::new(x.to_radians(), y.to_radians(), z.to_radians())
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f64, dy: f64, dz: f64) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }

    /// Apply X, then Y, then Z rotation to a point
    pub fn apply(&self, p: &Point3<f64>) -> Point3<f64> {
        rotate_z(&rotate_y(&rotate_x(p, self.x), self.y), self.z)
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Create a rotation matrix from a rotation state
    pub fn rotation_matrix(rotation: &RotationState) -> Matrix4<f64> {
        // Apply rotations in order: X, then Y, then Z
        rotation_z(rotation.z) * rotation_y(rotation.y) * rotation_x(rotation.x)
    }

    /// Object rotation followed by view rotation, as one matrix
    pub fn object_view_matrix(object: &RotationState, view: &RotationState) -> Matrix4<f64> {
        Self::rotation_matrix(view) * Self::rotation_matrix(object)
    }
}
