/// Shape selection and scene assembly for the viewer
use nalgebra::{Point2, Point3, Vector3};
use std::f64::consts::PI;
use tracing::debug;
use wire3d_core::annotation::{
    coordinate_axes, dimension_marker, DimensionMarker, DimensionOptions, LabelledAxis,
};
use wire3d_core::primitives::{
    cube, make_box, make_cone, make_cylinder, make_frustum, make_prism, make_pyramid, BoxOptions,
    ConeOptions, CylinderOptions, FrustumOptions, PrismOptions, PyramidOptions,
};
use wire3d_core::{arc, extrude, join_segments, ExtrudeOptions, GeometryResult, Mesh};

use crate::args::Config;

/// Shapes the viewer can display, in Tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Box,
    Cube,
    Cylinder,
    Cone,
    Prism,
    Pyramid,
    Frustum,
    Extrusion,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 8] = [
        ShapeKind::Box,
        ShapeKind::Cube,
        ShapeKind::Cylinder,
        ShapeKind::Cone,
        ShapeKind::Prism,
        ShapeKind::Pyramid,
        ShapeKind::Frustum,
        ShapeKind::Extrusion,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Box => "box",
            Self::Cube => "cube",
            Self::Cylinder => "cylinder",
            Self::Cone => "cone",
            Self::Prism => "prism",
            Self::Pyramid => "pyramid",
            Self::Frustum => "frustum",
            Self::Extrusion => "extrusion",
        }
    }

    /// The shape after this one, wrapping around
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|&k| k == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    /// Ring segment count used when none is given on the command line
    pub fn default_segments(self) -> usize {
        match self {
            Self::Prism => 6,
            Self::Pyramid => 4,
            Self::Extrusion => 8,
            _ => 16,
        }
    }

    /// Shapes built around a circular ring of vertices
    fn is_round(self) -> bool {
        matches!(
            self,
            Self::Cylinder | Self::Cone | Self::Prism | Self::Pyramid | Self::Frustum
        )
    }
}

/// Built-in extrusion profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    LShape,
    TShape,
    Triangle,
    Semicircle,
    Arc90,
    Arc270,
    RoundedRect,
}

impl Preset {
    pub const ALL: [Preset; 7] = [
        Preset::LShape,
        Preset::TShape,
        Preset::Triangle,
        Preset::Semicircle,
        Preset::Arc90,
        Preset::Arc270,
        Preset::RoundedRect,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(name))
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::LShape => "l-shape",
            Self::TShape => "t-shape",
            Self::Triangle => "triangle",
            Self::Semicircle => "semicircle",
            Self::Arc90 => "arc-90",
            Self::Arc270 => "arc-270",
            Self::RoundedRect => "rounded-rect",
        }
    }

    /// Profile points; `segments` controls how finely arcs are sampled
    pub fn profile(self, segments: usize) -> Vec<Point2<f64>> {
        let origin = Point2::origin();
        match self {
            Self::LShape => points(&[
                [0.0, 0.0],
                [1.0, 0.0],
                [1.0, 0.3],
                [0.3, 0.3],
                [0.3, 1.0],
                [0.0, 1.0],
            ]),
            Self::TShape => points(&[
                [-0.15, 0.0],
                [0.15, 0.0],
                [0.15, 0.5],
                [0.5, 0.5],
                [0.5, 0.8],
                [-0.5, 0.8],
                [-0.5, 0.5],
                [-0.15, 0.5],
            ]),
            Self::Triangle => points(&[[0.0, 0.0], [1.0, 0.0], [0.5, 0.8]]),
            Self::Semicircle => join_segments(&[
                arc(origin, 0.5, 0.0, PI, segments),
                vec![Point2::new(-0.5, 0.0)],
            ]),
            Self::Arc90 => {
                join_segments(&[arc(origin, 0.5, 0.0, PI / 2.0, segments), vec![origin]])
            }
            Self::Arc270 => {
                join_segments(&[arc(origin, 0.5, 0.0, PI * 1.5, segments), vec![origin]])
            }
            Self::RoundedRect => {
                let (r, w, h) = (0.15, 0.8, 0.5);
                let quarter = (segments / 4).max(1);
                join_segments(&[
                    arc(Point2::new(w - r, r), r, -PI / 2.0, 0.0, quarter),
                    arc(Point2::new(w - r, h - r), r, 0.0, PI / 2.0, quarter),
                    arc(Point2::new(r, h - r), r, PI / 2.0, PI, quarter),
                    arc(Point2::new(r, r), r, PI, PI * 1.5, quarter),
                ])
            }
        }
    }
}

/// Extrusion axis choices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtrudeAxis {
    X,
    Y,
    Z,
}

impl ExtrudeAxis {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "x" => Some(Self::X),
            "y" => Some(Self::Y),
            "z" => Some(Self::Z),
            _ => None,
        }
    }

    pub fn direction(self) -> Vector3<f64> {
        match self {
            Self::X => Vector3::x(),
            Self::Y => Vector3::y(),
            Self::Z => Vector3::z(),
        }
    }
}

fn points(raw: &[[f64; 2]]) -> Vec<Point2<f64>> {
    raw.iter().map(|p| Point2::new(p[0], p[1])).collect()
}

/// Profile used when neither a preset nor explicit points are given
fn fallback_profile() -> Vec<Point2<f64>> {
    points(&[[0.0, 0.0], [1.0, 0.0], [0.5, 1.0]])
}

/// Everything the viewer draws for one configuration
#[derive(Debug, Clone)]
pub struct Scene {
    pub mesh: Mesh,
    /// Dimension markers, rotating with the object
    pub dimensions: Vec<DimensionMarker>,
    /// Coordinate axes, fixed to the world
    pub axes: Vec<LabelledAxis>,
}

impl Scene {
    pub fn build(config: &Config) -> GeometryResult<Self> {
        let mesh = build_mesh(config)?;
        let dimensions = if config.show_dimensions {
            build_dimensions(config)?
        } else {
            Vec::new()
        };
        let axes = if config.show_axes {
            coordinate_axes(config.system)?
        } else {
            Vec::new()
        };
        debug!(
            shape = config.shape.name(),
            dimensions = dimensions.len(),
            axes = axes.len(),
            "scene built"
        );
        Ok(Self {
            mesh,
            dimensions,
            axes,
        })
    }
}

/// Build the mesh selected by `config`
pub fn build_mesh(config: &Config) -> GeometryResult<Mesh> {
    let segments = config.segments_for(config.shape);
    let style = config.style;
    match config.shape {
        ShapeKind::Box => make_box(&BoxOptions {
            width: config.size.x,
            height: config.size.y,
            depth: config.size.z,
            style,
        }),
        ShapeKind::Cube => cube(2.0, style),
        ShapeKind::Cylinder => make_cylinder(&CylinderOptions { segments, style }),
        ShapeKind::Cone => make_cone(&ConeOptions { segments, style }),
        ShapeKind::Prism => make_prism(&PrismOptions { sides: segments, style }),
        ShapeKind::Pyramid => make_pyramid(&PyramidOptions { sides: segments, style }),
        ShapeKind::Frustum => make_frustum(&FrustumOptions {
            segments,
            top_radius: config.top_radius,
            bottom_radius: 1.0,
            style,
        }),
        ShapeKind::Extrusion => {
            let profile = match (&config.preset, &config.profile) {
                (Some(preset), _) => preset.profile(segments),
                (None, Some(profile)) => profile.clone(),
                (None, None) => fallback_profile(),
            };
            let options =
                ExtrudeOptions::new(config.axis.direction(), config.length).with_style(style);
            extrude(&profile, &options)
        }
    }
}

/// Dimension markers annotating the selected shape
pub fn build_dimensions(config: &Config) -> GeometryResult<Vec<DimensionMarker>> {
    let labelled = |label: &str| DimensionOptions {
        offset: 0.3,
        label: Some(label.to_string()),
        ..DimensionOptions::default()
    };
    let p = Point3::<f64>::new;

    let mut markers = Vec::new();
    match config.shape {
        kind if kind.is_round() => {
            markers.push(dimension_marker(
                p(1.0, -1.0, 0.0),
                p(1.0, 1.0, 0.0),
                &labelled("h"),
            )?);
            markers.push(dimension_marker(
                p(0.0, 1.0, 0.0),
                p(1.0, 1.0, 0.0),
                &DimensionOptions {
                    cap_direction: Some(Vector3::z()),
                    ..labelled("r")
                },
            )?);
        }
        ShapeKind::Cube => {
            markers.push(dimension_marker(
                p(-1.0, 1.0, -1.0),
                p(1.0, 1.0, -1.0),
                &labelled("2"),
            )?);
        }
        ShapeKind::Box => {
            let (w, h, d) = (config.size.x / 2.0, config.size.y / 2.0, config.size.z / 2.0);
            markers.push(dimension_marker(p(-w, h, -d), p(w, h, -d), &labelled("w"))?);
            markers.push(dimension_marker(p(w, -h, -d), p(w, h, -d), &labelled("h"))?);
            markers.push(dimension_marker(
                p(w, h, -d),
                p(w, h, d),
                &DimensionOptions {
                    cap_direction: Some(Vector3::y()),
                    ..labelled("d")
                },
            )?);
        }
        _ => {
            let half = config.axis.direction() * (config.length / 2.0);
            markers.push(dimension_marker(
                Point3::from(-half),
                Point3::from(half),
                &labelled("L"),
            )?);
        }
    }
    Ok(markers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wire3d_core::{GeometryError, MeshStyle};

    #[test]
    fn test_shape_cycle_wraps() {
        let mut kind = ShapeKind::Box;
        for _ in 0..ShapeKind::ALL.len() {
            kind = kind.next();
        }
        assert_eq!(kind, ShapeKind::Box);
        assert_eq!(ShapeKind::Frustum.next(), ShapeKind::Extrusion);
        assert_eq!(ShapeKind::from_name("CYLINDER"), Some(ShapeKind::Cylinder));
        assert_eq!(ShapeKind::from_name("sphere"), None);
    }

    #[test]
    fn test_presets_extrude() {
        for preset in Preset::ALL {
            assert_eq!(Preset::from_name(preset.name()), Some(preset));
            let profile = preset.profile(8);
            let mesh = extrude(&profile, &ExtrudeOptions::default()).unwrap();
            assert_eq!(mesh.vertex_count(), profile.len() * 2);
        }
    }

    #[test]
    fn test_preset_point_counts() {
        assert_eq!(Preset::LShape.profile(8).len(), 6);
        // The closing point coincides with the last arc sample
        assert_eq!(Preset::Semicircle.profile(8).len(), 9);
        assert_eq!(Preset::Arc90.profile(4).len(), 6);
        // Four 2-segment arcs joined by straight sides
        assert_eq!(Preset::RoundedRect.profile(8).len(), 12);
    }

    #[test]
    fn test_build_every_shape() {
        let mut config = Config::default();
        config.style = MeshStyle::new(true, true);
        config.show_axes = true;
        config.show_dimensions = true;
        for kind in ShapeKind::ALL {
            config.shape = kind;
            let scene = Scene::build(&config).unwrap();
            scene.mesh.validate().unwrap();
            assert_eq!(scene.axes.len(), 3);
            assert!(!scene.dimensions.is_empty());
        }
    }

    #[test]
    fn test_round_shapes_get_height_and_radius() {
        let config = Config {
            shape: ShapeKind::Cone,
            ..Config::default()
        };
        let markers = build_dimensions(&config).unwrap();
        let labels: Vec<_> = markers.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, ["h", "r"]);
    }

    #[test]
    fn test_explicit_profile_and_axis() {
        let config = Config {
            shape: ShapeKind::Extrusion,
            profile: Some(points(&[[0.0, 0.0], [2.0, 0.0], [2.0, 1.0], [0.0, 1.0]])),
            axis: ExtrudeAxis::X,
            length: 4.0,
            ..Config::default()
        };
        let mesh = build_mesh(&config).unwrap();
        assert_eq!(mesh.vertex_count(), 8);
        assert!(mesh.vertices[..4].iter().all(|v| v.x == -2.0));
    }

    #[test]
    fn test_invalid_segments_surface_as_errors() {
        let config = Config {
            shape: ShapeKind::Cylinder,
            segments: Some(2),
            ..Config::default()
        };
        assert!(matches!(
            build_mesh(&config),
            Err(GeometryError::InvalidParameter { .. })
        ));
    }
}
