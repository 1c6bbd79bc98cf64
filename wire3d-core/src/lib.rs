/// Wire3D Core Library - wireframe geometry and projection
///
/// This library provides the stateless core for building wireframe meshes
/// (profile extrusion and parametric primitives), remapping them between
/// coordinate systems, rotating them and projecting them to 2D.

pub mod annotation;
pub mod coordinate_system;
pub mod error;
pub mod extrusion;
pub mod geometry;
pub mod pipeline;
pub mod primitives;
pub mod projection;
pub mod transform;

// Re-export commonly used types
pub use coordinate_system::{transform_from_system, transform_to_system, CoordinateSystem};
pub use error::{GeometryError, GeometryResult};
pub use extrusion::{arc, extrude, join_segments, ExtrudeOptions, ExtrusionBasis};
pub use geometry::{Mesh, MeshStyle};
pub use pipeline::{Pipeline, ProjectedMesh};
pub use projection::{Camera, CameraOptions, ProjectionMode, Projector, ProjectorOptions};
pub use transform::{RotationState, Transform};
