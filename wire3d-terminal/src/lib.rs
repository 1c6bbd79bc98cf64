/// Terminal wireframe viewer
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use std::io::{self, stdout, Write};
use std::time::Duration;
use tracing::{debug, warn};
use wire3d_core::{GeometryResult, Pipeline, Projector, ProjectorOptions, RotationState};

pub mod args;
pub mod renderer;
pub mod scene;

pub use args::{ArgError, Config, USAGE};
pub use renderer::{parse_hex_color, WireframeRenderer, CELL_ASPECT};
pub use scene::{build_mesh, Scene, ShapeKind};

/// Rotation applied per key press, in radians
const ROTATION_STEP: f64 = 0.1;

const DIMENSION_COLOR: Color = Color::Rgb {
    r: 0x00,
    g: 0x66,
    b: 0xcc,
};

/// Main application struct for terminal wireframe viewing
pub struct TerminalApp {
    config: Config,
    scene: Scene,
    pipeline: Pipeline,
    renderer: WireframeRenderer,
    running: bool,
}

impl TerminalApp {
    pub fn new(config: Config) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Self::with_size(config, width as usize, height as usize)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))
    }

    /// Build the app for a terminal of `width` by `height` cells
    pub fn with_size(config: Config, width: usize, height: usize) -> GeometryResult<Self> {
        let scene = Scene::build(&config)?;
        let mut pipeline = Pipeline::new(Projector::new(ProjectorOptions {
            mode: config.mode,
            coordinate_system: config.system,
            ..ProjectorOptions::default()
        }));
        pipeline.object_rotation = RotationState::new(0.3, 0.3, 0.0);

        let mut app = Self {
            config,
            scene,
            pipeline,
            renderer: WireframeRenderer::new(width, height),
            running: true,
        };
        app.fit_viewport(width, height);
        Ok(app)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Size the projector so a 4-unit span fills the shorter screen side
    fn fit_viewport(&mut self, width: usize, height: usize) {
        let (w, h) = (width as f64, height as f64 * CELL_ASPECT);
        self.renderer.resize(width, height);
        self.pipeline.projector.resize(w, h);
        self.pipeline.projector.scale = w.min(h) / 4.0;
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let mut dirty = true;
        while self.running {
            if dirty {
                self.render()?;
                dirty = false;
            }
            if event::poll(Duration::from_millis(100))? {
                match event::read()? {
                    Event::Key(KeyEvent {
                        code,
                        kind: KeyEventKind::Press | KeyEventKind::Repeat,
                        ..
                    }) => {
                        self.handle_key(code);
                        dirty = true;
                    }
                    Event::Resize(width, height) => {
                        self.fit_viewport(width as usize, height as usize);
                        dirty = true;
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    /// Apply one key press to the view state
    pub fn handle_key(&mut self, code: KeyCode) {
        let step = ROTATION_STEP;
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('w') | KeyCode::Up => self.pipeline.object_rotation.rotate(step, 0.0, 0.0),
            KeyCode::Char('s') | KeyCode::Down => {
                self.pipeline.object_rotation.rotate(-step, 0.0, 0.0)
            }
            KeyCode::Char('a') | KeyCode::Left => {
                self.pipeline.object_rotation.rotate(0.0, -step, 0.0)
            }
            KeyCode::Char('d') | KeyCode::Right => {
                self.pipeline.object_rotation.rotate(0.0, step, 0.0)
            }
            KeyCode::Char('e') => self.pipeline.object_rotation.rotate(0.0, 0.0, step),
            KeyCode::Char('r') => self.pipeline.object_rotation.rotate(0.0, 0.0, -step),
            KeyCode::Char('i') => self.pipeline.view_rotation.rotate(-step, 0.0, 0.0),
            KeyCode::Char('k') => self.pipeline.view_rotation.rotate(step, 0.0, 0.0),
            KeyCode::Char('j') => self.pipeline.view_rotation.rotate(0.0, -step, 0.0),
            KeyCode::Char('l') => self.pipeline.view_rotation.rotate(0.0, step, 0.0),
            KeyCode::Char('p') => {
                self.config.mode = self.config.mode.toggled();
                self.pipeline.set_mode(self.config.mode);
            }
            KeyCode::Char('c') => {
                self.config.system = self.config.system.toggled();
                self.pipeline.set_coordinate_system(self.config.system);
                self.rebuild();
            }
            KeyCode::Char('f') => {
                self.config.style.show_fill = !self.config.style.show_fill;
                self.rebuild();
            }
            KeyCode::Char('g') => {
                self.config.style.show_rulings = !self.config.style.show_rulings;
                self.rebuild();
            }
            KeyCode::Tab => {
                self.config.shape = self.config.shape.next();
                self.rebuild();
            }
            _ => {}
        }
    }

    /// Rebuild the scene after a configuration change, keeping the old
    /// scene if the new configuration is rejected
    fn rebuild(&mut self) {
        match Scene::build(&self.config) {
            Ok(scene) => {
                debug!(shape = self.config.shape.name(), "rebuilt scene");
                self.scene = scene;
            }
            Err(err) => warn!(%err, shape = self.config.shape.name(), "keeping previous scene"),
        }
    }

    /// Rasterize the current frame into the renderer's buffer
    pub fn compose(&mut self) {
        self.renderer.clear();

        let projected = self.pipeline.project_mesh(&self.scene.mesh);
        self.renderer.render_mesh(&projected);

        for marker in &self.scene.dimensions {
            let overlay = self.pipeline.project_mesh(&marker.mesh);
            self.renderer.render_overlay(&overlay, '+', DIMENSION_COLOR);
            let anchor = self.pipeline.project_point(&marker.midpoint);
            self.renderer.draw_label(&anchor, &marker.label, DIMENSION_COLOR);
        }

        for labelled in &self.scene.axes {
            let color = parse_hex_color(labelled.color);
            let overlay = self.pipeline.project_overlay(&labelled.axis.mesh);
            self.renderer.render_overlay(&overlay, '-', color);
            for (text, at) in labelled.axis.labels.iter().zip(&labelled.axis.label_positions) {
                let anchor = self.pipeline.project_overlay_point(at);
                self.renderer.draw_label(&anchor, text, color);
            }
        }
    }

    /// One-line summary of the view state
    pub fn status_line(&self) -> String {
        let on_off = |flag: bool| if flag { "on" } else { "off" };
        format!(
            "Wire3D | {} | {} | {} | rulings:{} fill:{} | WASD/Arrows=Rotate IJKL=View E/R=Roll P=Proj C=System F=Fill G=Rulings Tab=Shape Q=Quit",
            self.config.shape.name(),
            self.config.system.tag(),
            self.config.mode.as_str(),
            on_off(self.config.style.show_rulings),
            on_off(self.config.style.show_fill),
        )
    }

    fn render(&mut self) -> io::Result<()> {
        self.compose();

        let mut stdout = stdout();
        self.renderer.draw(&mut stdout)?;

        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(self.status_line()),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wire3d_core::{CoordinateSystem, ProjectionMode};

    fn app(config: Config) -> TerminalApp {
        TerminalApp::with_size(config, 80, 24).unwrap()
    }

    #[test]
    fn test_viewport_fits_terminal() {
        let app = app(Config::default());
        let projector = app.pipeline().projector;
        assert_eq!(projector.width, 80.0);
        assert_eq!(projector.height, 48.0);
        assert_eq!(projector.scale, 12.0);
    }

    #[test]
    fn test_rotation_keys() {
        let mut app = app(Config::default());
        let before = app.pipeline().object_rotation;
        app.handle_key(KeyCode::Char('w'));
        app.handle_key(KeyCode::Right);
        app.handle_key(KeyCode::Char('l'));
        let after = app.pipeline().object_rotation;
        assert!((after.x - before.x - ROTATION_STEP).abs() < 1e-12);
        assert!((after.y - before.y - ROTATION_STEP).abs() < 1e-12);
        assert!((app.pipeline().view_rotation.y - ROTATION_STEP).abs() < 1e-12);
    }

    #[test]
    fn test_toggles() {
        let mut app = app(Config::default());
        app.handle_key(KeyCode::Char('p'));
        assert_eq!(app.pipeline().projector.mode, ProjectionMode::Orthographic);

        app.handle_key(KeyCode::Char('c'));
        assert_eq!(app.pipeline().coordinate_system, CoordinateSystem::Lhs);
        assert_eq!(app.config().system, CoordinateSystem::Lhs);

        app.handle_key(KeyCode::Char('f'));
        assert_eq!(app.scene().mesh.cap_faces.len(), 2);
        app.handle_key(KeyCode::Char('g'));
        // Cube without rulings keeps only the two square outlines
        assert_eq!(app.scene().mesh.edge_count(), 8);
    }

    #[test]
    fn test_tab_cycles_shapes() {
        let mut app = app(Config::default());
        app.handle_key(KeyCode::Tab);
        assert_eq!(app.config().shape, ShapeKind::Cylinder);
        assert_eq!(app.scene().mesh.vertex_count(), 32);
    }

    #[test]
    fn test_rejected_rebuild_keeps_scene() {
        let mut app = app(Config {
            segments: Some(2),
            ..Config::default()
        });
        let cube = app.scene().mesh.clone();
        app.handle_key(KeyCode::Tab);
        assert_eq!(app.config().shape, ShapeKind::Cylinder);
        assert_eq!(app.scene().mesh, cube);
    }

    #[test]
    fn test_quit() {
        let mut app = app(Config::default());
        app.handle_key(KeyCode::Esc);
        assert!(!app.is_running());
    }

    #[test]
    fn test_compose_draws_edges_and_overlays() {
        let mut app = app(Config {
            show_axes: true,
            show_dimensions: true,
            ..Config::default()
        });
        app.compose();
        let mut edges = 0;
        for y in 0..24 {
            for x in 0..80 {
                if app.renderer.char_at(x, y) == Some(renderer::EDGE) {
                    edges += 1;
                }
            }
        }
        assert!(edges > 0);
        assert!(app.status_line().contains("cube | RHS | perspective"));
    }
}
