/// Character-cell wireframe rasterizer for terminal rendering
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::Point2;
use std::io::Write;
use wire3d_core::ProjectedMesh;

/// Terminal cells are roughly twice as tall as they are wide; projected
/// coordinates use square pixels with this many per cell row
pub const CELL_ASPECT: f64 = 2.0;

pub const SIDE_FILL: char = '.';
pub const CAP_FILL: char = ':';
pub const EDGE: char = '#';

/// Lines reaching further than this many cells off screen are skipped
const MAX_REACH: f64 = 10_000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    ch: char,
    color: Color,
}

const BLANK: Cell = Cell {
    ch: ' ',
    color: Color::Reset,
};

/// Painter's-order renderer: later draws overwrite earlier ones
pub struct WireframeRenderer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl WireframeRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![BLANK; width * height],
        }
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.cells = vec![BLANK; width * height];
    }

    pub fn clear(&mut self) {
        self.cells.fill(BLANK);
    }

    /// Character at a cell, `None` outside the buffer
    pub fn char_at(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.cells[y * self.width + x].ch)
    }

    fn plot(&mut self, x: i64, y: i64, ch: char, color: Color) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        self.cells[y as usize * self.width + x as usize] = Cell { ch, color };
    }

    /// Draw a projected mesh: side faces, then caps, then edges
    pub fn render_mesh(&mut self, mesh: &ProjectedMesh) {
        for face in &mesh.faces {
            self.fill_polygon(&mesh.polygon(face), SIDE_FILL, Color::DarkGrey);
        }
        for cap in &mesh.cap_faces {
            self.fill_polygon(&mesh.polygon(cap), CAP_FILL, Color::Grey);
        }
        for (a, b) in mesh.segments() {
            self.draw_line(&a, &b, EDGE, Color::White);
        }
    }

    /// Draw only the edges of a projected overlay in one colour
    pub fn render_overlay(&mut self, mesh: &ProjectedMesh, ch: char, color: Color) {
        for (a, b) in mesh.segments() {
            self.draw_line(&a, &b, ch, color);
        }
    }

    /// Fill a polygon with the even-odd rule, sampling at cell centers
    pub fn fill_polygon(&mut self, points: &[Point2<f64>], ch: char, color: Color) {
        if points.len() < 3 || points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return;
        }
        let cells: Vec<(f64, f64)> = points.iter().map(to_cell).collect();

        let (min_y, max_y) = cells
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, y)| {
                (lo.min(y), hi.max(y))
            });
        let first_row = (min_y.floor() as i64).max(0);
        let last_row = (max_y.ceil() as i64).min(self.height as i64 - 1);

        let mut crossings = Vec::with_capacity(cells.len());
        for row in first_row..=last_row {
            let sy = row as f64 + 0.5;
            crossings.clear();
            for (i, &(x0, y0)) in cells.iter().enumerate() {
                let (x1, y1) = cells[(i + 1) % cells.len()];
                if (y0 <= sy) != (y1 <= sy) {
                    crossings.push(x0 + (sy - y0) * (x1 - x0) / (y1 - y0));
                }
            }
            crossings.sort_by(|a, b| a.total_cmp(b));

            for span in crossings.chunks_exact(2) {
                let start = ((span[0] - 0.5).ceil() as i64).max(0);
                let end = ((span[1] - 0.5).ceil() as i64 - 1).min(self.width as i64 - 1);
                for col in start..=end {
                    self.plot(col, row, ch, color);
                }
            }
        }
    }

    /// Bresenham line between two projected points
    pub fn draw_line(&mut self, a: &Point2<f64>, b: &Point2<f64>, ch: char, color: Color) {
        let (ax, ay) = to_cell(a);
        let (bx, by) = to_cell(b);
        if [ax, ay, bx, by].iter().any(|v| !v.is_finite() || v.abs() > MAX_REACH) {
            return;
        }

        let (mut x0, mut y0) = (ax.floor() as i64, ay.floor() as i64);
        let (x1, y1) = (bx.floor() as i64, by.floor() as i64);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.plot(x0, y0, ch, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Write text starting at a cell, clipped to the buffer
    pub fn draw_text(&mut self, x: i64, y: i64, text: &str, color: Color) {
        for (i, ch) in text.chars().enumerate() {
            self.plot(x + i as i64, y, ch, color);
        }
    }

    /// Write text centered on a projected point
    pub fn draw_label(&mut self, at: &Point2<f64>, text: &str, color: Color) {
        if !at.x.is_finite() || !at.y.is_finite() {
            return;
        }
        let (x, y) = to_cell(at);
        let half = text.chars().count() as f64 / 2.0;
        self.draw_text((x - half).round() as i64, y.floor() as i64, text, color);
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            let row = &self.cells[y * self.width..(y + 1) * self.width];
            let mut current = None;
            for cell in row {
                if current != Some(cell.color) {
                    writer.queue(SetForegroundColor(cell.color))?;
                    current = Some(cell.color);
                }
                writer.queue(Print(cell.ch))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

fn to_cell(p: &Point2<f64>) -> (f64, f64) {
    (p.x, p.y / CELL_ASPECT)
}

/// Parse a `#rrggbb` colour, falling back to white
pub fn parse_hex_color(hex: &str) -> Color {
    let digits = hex.trim_start_matches('#');
    let channel = |range: std::ops::Range<usize>| {
        digits
            .get(range)
            .and_then(|s| u8::from_str_radix(s, 16).ok())
    };
    match (digits.len(), channel(0..2), channel(2..4), channel(4..6)) {
        (6, Some(r), Some(g), Some(b)) => Color::Rgb { r, g, b },
        _ => Color::White,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_string(renderer: &WireframeRenderer, y: usize) -> String {
        let (width, _) = renderer.size();
        (0..width).filter_map(|x| renderer.char_at(x, y)).collect()
    }

    #[test]
    fn test_renderer_creation() {
        let renderer = WireframeRenderer::new(80, 24);
        assert_eq!(renderer.size(), (80, 24));
        assert_eq!(renderer.char_at(0, 0), Some(' '));
        assert_eq!(renderer.char_at(80, 0), None);
    }

    #[test]
    fn test_horizontal_line() {
        let mut renderer = WireframeRenderer::new(10, 4);
        renderer.draw_line(
            &Point2::new(1.0, 2.0),
            &Point2::new(6.0, 2.0),
            EDGE,
            Color::White,
        );
        assert_eq!(row_string(&renderer, 1), " ######   ");
    }

    #[test]
    fn test_diagonal_line_hits_both_ends() {
        let mut renderer = WireframeRenderer::new(10, 10);
        renderer.draw_line(
            &Point2::new(0.5, 0.5),
            &Point2::new(8.5, 16.5),
            EDGE,
            Color::White,
        );
        assert_eq!(renderer.char_at(0, 0), Some(EDGE));
        assert_eq!(renderer.char_at(8, 8), Some(EDGE));
        for y in 0..=8 {
            assert!(row_string(&renderer, y).contains(EDGE));
        }
    }

    #[test]
    fn test_fill_square() {
        let mut renderer = WireframeRenderer::new(8, 8);
        let square = [
            Point2::new(2.0, 2.0),
            Point2::new(6.0, 2.0),
            Point2::new(6.0, 10.0),
            Point2::new(2.0, 10.0),
        ];
        renderer.fill_polygon(&square, CAP_FILL, Color::Grey);
        // Rows 1..5 in cell space, columns 2..6
        assert_eq!(row_string(&renderer, 0), "        ");
        for y in 1..5 {
            assert_eq!(row_string(&renderer, y), "  ::::  ");
        }
        assert_eq!(row_string(&renderer, 5), "        ");
    }

    #[test]
    fn test_fill_even_odd_leaves_hole() {
        // Outer square and inner square traced as one loop through a seam
        let mut renderer = WireframeRenderer::new(12, 12);
        let ring = [
            Point2::new(0.0, 0.0),
            Point2::new(12.0, 0.0),
            Point2::new(12.0, 24.0),
            Point2::new(0.0, 24.0),
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 8.0),
            Point2::new(4.0, 16.0),
            Point2::new(8.0, 16.0),
            Point2::new(8.0, 8.0),
            Point2::new(4.0, 8.0),
        ];
        renderer.fill_polygon(&ring, SIDE_FILL, Color::DarkGrey);
        assert_eq!(renderer.char_at(1, 6), Some(SIDE_FILL));
        assert_eq!(renderer.char_at(6, 6), Some(' '));
        assert_eq!(renderer.char_at(10, 6), Some(SIDE_FILL));
    }

    #[test]
    fn test_non_finite_input_is_ignored() {
        let mut renderer = WireframeRenderer::new(4, 4);
        renderer.draw_line(
            &Point2::new(f64::NAN, 0.0),
            &Point2::new(1.0, 1.0),
            EDGE,
            Color::White,
        );
        renderer.fill_polygon(
            &[
                Point2::new(0.0, 0.0),
                Point2::new(f64::INFINITY, 0.0),
                Point2::new(1.0, 1.0),
            ],
            CAP_FILL,
            Color::Grey,
        );
        for y in 0..4 {
            assert_eq!(row_string(&renderer, y), "    ");
        }
    }

    #[test]
    fn test_edges_draw_over_fill() {
        let mut renderer = WireframeRenderer::new(8, 8);
        let mesh = ProjectedMesh {
            points: vec![
                Point2::new(1.0, 2.0),
                Point2::new(7.0, 2.0),
                Point2::new(7.0, 14.0),
                Point2::new(1.0, 14.0),
            ],
            edges: vec![[0, 1], [1, 2], [2, 3], [3, 0]],
            faces: Vec::new(),
            cap_faces: vec![vec![0, 1, 2, 3]],
        };
        renderer.render_mesh(&mesh);
        assert_eq!(row_string(&renderer, 1), " #######");
        assert_eq!(row_string(&renderer, 3), " #:::::#");
    }

    #[test]
    fn test_labels_and_text_clip() {
        let mut renderer = WireframeRenderer::new(6, 2);
        renderer.draw_text(4, 0, "abc", Color::Yellow);
        assert_eq!(row_string(&renderer, 0), "    ab");
        renderer.draw_label(&Point2::new(3.0, 2.0), "xy", Color::Blue);
        assert_eq!(row_string(&renderer, 1), "  xy  ");
    }

    #[test]
    fn test_draw_emits_buffer() {
        let mut renderer = WireframeRenderer::new(3, 2);
        renderer.draw_text(0, 1, "ok", Color::Green);
        let mut out = Vec::new();
        renderer.draw(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("ok"));
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(
            parse_hex_color("#cc0000"),
            Color::Rgb { r: 0xcc, g: 0, b: 0 }
        );
        assert_eq!(parse_hex_color("nope"), Color::White);
    }
}
