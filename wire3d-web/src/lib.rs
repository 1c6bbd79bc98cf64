/// Wire3D Web - WASM bindings for wireframe scenes
///
/// A `WireframeScene` owns one mesh and the view state around it, and hands
/// flat coordinate arrays to JavaScript for drawing on a canvas or SVG.
use nalgebra::{Point2, Vector3};
use wasm_bindgen::prelude::*;
use wire3d_core::primitives::{
    cube, make_box, make_cone, make_cylinder, make_frustum, make_prism, make_pyramid, BoxOptions,
    ConeOptions, CylinderOptions, FrustumOptions, PrismOptions, PyramidOptions,
};
use wire3d_core::{
    extrude, CoordinateSystem, ExtrudeOptions, GeometryError, GeometryResult, Mesh, MeshStyle,
    Pipeline, ProjectedMesh, ProjectionMode, Projector, ProjectorOptions, RotationState,
};

fn to_js(err: GeometryError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// The last shape request, replayed when the style changes
#[derive(Debug, Clone, PartialEq)]
enum Source {
    Shape { name: String, segments: usize },
    Profile {
        points: Vec<Point2<f64>>,
        length: f64,
        axis: Vector3<f64>,
    },
}

#[wasm_bindgen]
pub struct WireframeScene {
    pipeline: Pipeline,
    style: MeshStyle,
    source: Source,
    mesh: Mesh,
}

#[wasm_bindgen]
impl WireframeScene {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64) -> Result<WireframeScene, JsValue> {
        let style = MeshStyle::default();
        let source = Source::Shape {
            name: "cube".to_string(),
            segments: 16,
        };
        let mesh = build(&source, style).map_err(to_js)?;
        let pipeline = Pipeline::new(Projector::new(ProjectorOptions {
            width,
            height,
            ..ProjectorOptions::default()
        }));
        Ok(WireframeScene {
            pipeline,
            style,
            source,
            mesh,
        })
    }

    /// Select a named shape: box, cube, cylinder, cone, prism, pyramid or frustum
    pub fn set_shape(&mut self, name: &str, segments: usize) -> Result<(), JsValue> {
        self.replace(Source::Shape {
            name: name.to_ascii_lowercase(),
            segments,
        })
        .map_err(to_js)
    }

    /// Extrude a profile given as flat `[x0, y0, x1, y1, ...]` along `x`, `y` or `z`
    pub fn set_profile(&mut self, flat_xy: &[f64], length: f64, axis: &str) -> Result<(), JsValue> {
        let axis = match axis.to_ascii_lowercase().as_str() {
            "x" => Vector3::x(),
            "y" => Vector3::y(),
            "z" => Vector3::z(),
            other => return Err(JsValue::from_str(&format!("unknown axis '{other}'"))),
        };
        let points = flat_xy
            .chunks_exact(2)
            .map(|xy| Point2::new(xy[0], xy[1]))
            .collect();
        self.replace(Source::Profile {
            points,
            length,
            axis,
        })
        .map_err(to_js)
    }

    /// Object rotation in radians
    pub fn set_object_rotation(&mut self, x: f64, y: f64, z: f64) {
        self.pipeline.object_rotation = RotationState::new(x, y, z);
    }

    /// View rotation in radians
    pub fn set_view_rotation(&mut self, x: f64, y: f64, z: f64) {
        self.pipeline.view_rotation = RotationState::new(x, y, z);
    }

    pub fn set_orthographic(&mut self, orthographic: bool) {
        let mode = if orthographic {
            ProjectionMode::Orthographic
        } else {
            ProjectionMode::Perspective
        };
        self.pipeline.set_mode(mode);
    }

    pub fn set_coordinate_system(&mut self, tag: &str) -> Result<(), JsValue> {
        let system: CoordinateSystem = tag.parse().map_err(to_js)?;
        self.pipeline.set_coordinate_system(system);
        Ok(())
    }

    pub fn set_style(&mut self, show_rulings: bool, show_fill: bool) -> Result<(), JsValue> {
        self.style = MeshStyle::new(show_rulings, show_fill);
        self.mesh = build(&self.source, self.style).map_err(to_js)?;
        Ok(())
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.pipeline.projector.resize(width, height);
    }

    pub fn vertex_count(&self) -> usize {
        self.mesh.vertex_count()
    }

    /// Projected edges as `[x1, y1, x2, y2, ...]`
    pub fn edge_segments(&self) -> Vec<f64> {
        let projected = self.project();
        projected
            .segments()
            .flat_map(|(a, b)| [a.x, a.y, b.x, b.y])
            .collect()
    }

    /// Projected side faces then cap faces, each as a point count followed by
    /// that many `x, y` pairs
    pub fn face_polygons(&self) -> Vec<f64> {
        let projected = self.project();
        let mut out = Vec::new();
        for face in projected.faces.iter().chain(&projected.cap_faces) {
            out.push(face.len() as f64);
            for p in projected.polygon(face) {
                out.push(p.x);
                out.push(p.y);
            }
        }
        out
    }
}

impl WireframeScene {
    fn project(&self) -> ProjectedMesh {
        self.pipeline.project_mesh(&self.mesh)
    }

    /// Swap in a new source only if it builds
    fn replace(&mut self, source: Source) -> GeometryResult<()> {
        self.mesh = build(&source, self.style)?;
        self.source = source;
        Ok(())
    }
}

fn build(source: &Source, style: MeshStyle) -> GeometryResult<Mesh> {
    match source {
        Source::Shape { name, segments } => {
            let segments = *segments;
            match name.as_str() {
                "box" => make_box(&BoxOptions {
                    style,
                    ..BoxOptions::default()
                }),
                "cube" => cube(2.0, style),
                "cylinder" => make_cylinder(&CylinderOptions { segments, style }),
                "cone" => make_cone(&ConeOptions { segments, style }),
                "prism" => make_prism(&PrismOptions {
                    sides: segments,
                    style,
                }),
                "pyramid" => make_pyramid(&PyramidOptions {
                    sides: segments,
                    style,
                }),
                "frustum" => make_frustum(&FrustumOptions {
                    segments,
                    style,
                    ..FrustumOptions::default()
                }),
                other => Err(GeometryError::unknown_name("shape", other)),
            }
        }
        Source::Profile {
            points,
            length,
            axis,
        } => extrude(points, &ExtrudeOptions::new(*axis, *length).with_style(style)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> WireframeScene {
        WireframeScene::new(400.0, 400.0).unwrap()
    }

    #[test]
    fn test_default_cube_edges() {
        let scene = scene();
        assert_eq!(scene.vertex_count(), 8);
        assert_eq!(scene.edge_segments().len(), 12 * 4);
        assert!(scene.face_polygons().is_empty());
    }

    #[test]
    fn test_face_polygons_are_count_prefixed() {
        let mut scene = scene();
        scene.set_style(true, true).unwrap();
        let flat = scene.face_polygons();
        // Four side quads and two caps, each 1 + 4 * 2 values
        assert_eq!(flat.len(), 6 * 9);
        assert_eq!(flat[0], 4.0);
        assert_eq!(flat[9], 4.0);
    }

    #[test]
    fn test_style_change_keeps_shape() {
        let mut scene = scene();
        scene.set_shape("prism", 5).unwrap();
        assert_eq!(scene.vertex_count(), 10);
        scene.set_style(false, false).unwrap();
        assert_eq!(scene.vertex_count(), 10);
        // Rings only, no rulings
        assert_eq!(scene.edge_segments().len(), 10 * 4);
    }

    #[test]
    fn test_profile_extrusion() {
        let mut scene = scene();
        scene
            .set_profile(&[0.0, 0.0, 1.0, 0.0, 0.5, 1.0], 2.0, "x")
            .unwrap();
        assert_eq!(scene.vertex_count(), 6);
        assert_eq!(scene.edge_segments().len(), 9 * 4);
    }

    #[test]
    fn test_unknown_shape_names_the_shape() {
        let source = Source::Shape {
            name: "torus".to_string(),
            segments: 8,
        };
        assert_eq!(
            build(&source, MeshStyle::default()).unwrap_err(),
            GeometryError::UnknownName {
                kind: "shape",
                name: "torus".to_string(),
            }
        );
    }

    #[test]
    fn test_view_settings_move_points() {
        let mut scene = scene();
        let before = scene.edge_segments();
        scene.set_object_rotation(0.4, 0.2, 0.0);
        let rotated = scene.edge_segments();
        assert_ne!(before, rotated);

        scene.set_orthographic(true);
        assert_ne!(scene.edge_segments(), rotated);

        scene.set_coordinate_system("LHS").unwrap();
        assert_eq!(
            scene.pipeline.coordinate_system,
            CoordinateSystem::Lhs
        );
    }
}
