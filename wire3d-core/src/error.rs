/// Error types for mesh construction and coordinate system lookup
use thiserror::Error;

/// Errors returned by the geometry builders and registry lookups.
///
/// Every failure is local and deterministic: the same inputs always fail the
/// same way, and no partial mesh is ever returned alongside an error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// The profile has fewer than three points or collapses to a line.
    #[error("degenerate profile: {points} point(s), a closed polygon needs at least 3 non-collinear points")]
    DegenerateProfile { points: usize },

    /// The extrusion direction has zero length, so no basis can be built.
    #[error("extrusion direction has zero length")]
    ZeroDirection,

    /// The extrusion length is zero, negative or not finite.
    #[error("extrusion length must be positive, got {0}")]
    InvalidLength(f64),

    /// A generator parameter is out of range.
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// A name (shape, projection mode) that matches nothing known.
    #[error("unknown {kind} `{name}`")]
    UnknownName { kind: &'static str, name: String },

    /// The coordinate system tag is not one of the registered systems.
    #[error("unknown coordinate system `{0}` (expected RHS or LHS)")]
    UnknownCoordinateSystem(String),
}

/// Result alias used throughout the crate
pub type GeometryResult<T> = Result<T, GeometryError>;

impl GeometryError {
    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        Self::InvalidParameter { name, value, reason }
    }

    pub fn unknown_name(kind: &'static str, name: impl Into<String>) -> Self {
        Self::UnknownName {
            kind,
            name: name.into(),
        }
    }
}
