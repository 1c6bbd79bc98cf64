/// Coordinate system registry
///
/// Points are authored in the canonical right-handed, Y-up basis. The
/// left-handed system is that basis with Y and Z exchanged, so remapping into
/// it and back out are the same swap.
use nalgebra::{Point3, Vector3};
use std::fmt;
use std::str::FromStr;

use crate::error::{GeometryError, GeometryResult};

/// Handedness of a coordinate system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handedness {
    Right,
    Left,
}

/// Registered coordinate systems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CoordinateSystem {
    /// Right-handed, Y up, -Z forward, X right
    #[default]
    Rhs,
    /// Left-handed, Z up, X forward, Y right
    Lhs,
}

/// One labelled axis of a coordinate system, used for drawing axis overlays
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisDescriptor {
    pub direction: Vector3<f64>,
    pub color: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

const RED: &str = "#cc0000";
const GREEN: &str = "#00aa00";
const BLUE: &str = "#0066cc";

impl CoordinateSystem {
    pub const ALL: [CoordinateSystem; 2] = [CoordinateSystem::Rhs, CoordinateSystem::Lhs];

    /// Short tag, as accepted by `FromStr`
    pub fn tag(self) -> &'static str {
        match self {
            Self::Rhs => "RHS",
            Self::Lhs => "LHS",
        }
    }

    /// Human readable label
    pub fn name(self) -> &'static str {
        match self {
            Self::Rhs => "Right-Hand System (Y-up)",
            Self::Lhs => "Left-Hand System (Z-up)",
        }
    }

    pub fn handedness(self) -> Handedness {
        match self {
            Self::Rhs => Handedness::Right,
            Self::Lhs => Handedness::Left,
        }
    }

    pub fn up(self) -> Vector3<f64> {
        match self {
            Self::Rhs => Vector3::y(),
            Self::Lhs => Vector3::z(),
        }
    }

    pub fn forward(self) -> Vector3<f64> {
        match self {
            Self::Rhs => -Vector3::z(),
            Self::Lhs => Vector3::x(),
        }
    }

    pub fn right(self) -> Vector3<f64> {
        match self {
            Self::Rhs => Vector3::x(),
            Self::Lhs => Vector3::y(),
        }
    }

    /// The other registered system
    pub fn toggled(self) -> Self {
        match self {
            Self::Rhs => Self::Lhs,
            Self::Lhs => Self::Rhs,
        }
    }

    /// Remap a point authored in the canonical RHS basis into this system
    pub fn to_system(self, p: &Point3<f64>) -> Point3<f64> {
        match self {
            Self::Rhs => *p,
            Self::Lhs => Point3::new(p.x, p.z, p.y),
        }
    }

    /// Remap a point expressed in this system back into the canonical RHS basis
    pub fn from_system(self, p: &Point3<f64>) -> Point3<f64> {
        // The LHS swap is an involution
        self.to_system(p)
    }

    /// The X, Y and Z axes with their colour and role in this system
    pub fn axis_config(self) -> [AxisDescriptor; 3] {
        let (x_role, y_role, z_role) = match self {
            Self::Rhs => ("right", "up", "forward"),
            Self::Lhs => ("forward", "right", "up"),
        };
        [
            AxisDescriptor {
                direction: Vector3::x(),
                color: RED,
                label: "X",
                description: x_role,
            },
            AxisDescriptor {
                direction: Vector3::y(),
                color: GREEN,
                label: "Y",
                description: y_role,
            },
            AxisDescriptor {
                direction: Vector3::z(),
                color: BLUE,
                label: "Z",
                description: z_role,
            },
        ]
    }
}

impl FromStr for CoordinateSystem {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RHS" => Ok(Self::Rhs),
            "LHS" => Ok(Self::Lhs),
            _ => Err(GeometryError::UnknownCoordinateSystem(s.to_string())),
        }
    }
}

impl fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Remap a point from RHS into the system named by `tag`
pub fn transform_to_system(point: &Point3<f64>, tag: &str) -> GeometryResult<Point3<f64>> {
    Ok(tag.parse::<CoordinateSystem>()?.to_system(point))
}

/// Remap a point from the system named by `tag` back into RHS
pub fn transform_from_system(point: &Point3<f64>, tag: &str) -> GeometryResult<Point3<f64>> {
    Ok(tag.parse::<CoordinateSystem>()?.from_system(point))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tags() {
        assert_eq!("RHS".parse::<CoordinateSystem>(), Ok(CoordinateSystem::Rhs));
        assert_eq!("lhs".parse::<CoordinateSystem>(), Ok(CoordinateSystem::Lhs));
        assert_eq!(
            "ENU".parse::<CoordinateSystem>(),
            Err(GeometryError::UnknownCoordinateSystem("ENU".to_string()))
        );
    }

    #[test]
    fn test_basis_vectors_are_orthonormal() {
        for system in CoordinateSystem::ALL {
            let (u, f, r) = (system.up(), system.forward(), system.right());
            for v in [u, f, r] {
                assert_eq!(v.norm(), 1.0);
            }
            assert_eq!(u.dot(&f), 0.0);
            assert_eq!(u.dot(&r), 0.0);
            assert_eq!(f.dot(&r), 0.0);
        }
        assert_eq!(CoordinateSystem::Lhs.up(), Vector3::z());
        assert_eq!(CoordinateSystem::Rhs.forward(), Vector3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_rhs_is_identity() {
        let p = Point3::new(1.0, 2.0, 3.0);
        assert_eq!(transform_to_system(&p, "RHS"), Ok(p));
        assert_eq!(transform_from_system(&p, "RHS"), Ok(p));
    }

    #[test]
    fn test_lhs_round_trip() {
        let p = Point3::new(1.5, -2.0, 7.25);
        let there = transform_to_system(&p, "LHS").unwrap();
        assert_eq!(there, Point3::new(1.5, 7.25, -2.0));
        assert_eq!(transform_from_system(&there, "LHS"), Ok(p));
    }

    #[test]
    fn test_unknown_tag_is_an_error() {
        let p = Point3::origin();
        assert!(matches!(
            transform_to_system(&p, "NED"),
            Err(GeometryError::UnknownCoordinateSystem(_))
        ));
    }

    #[test]
    fn test_axis_config_roles() {
        let lhs = CoordinateSystem::Lhs.axis_config();
        assert_eq!(lhs[2].description, "up");
        let rhs = CoordinateSystem::Rhs.axis_config();
        assert_eq!(rhs[1].description, "up");
        assert_eq!(rhs[0].color, "#cc0000");
    }
}
