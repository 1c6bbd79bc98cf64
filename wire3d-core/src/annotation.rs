/// Wireframe annotations: dimension markers, ticked axes, coordinate axes
use nalgebra::{Point3, Vector3};

use crate::coordinate_system::CoordinateSystem;
use crate::error::{GeometryError, GeometryResult};
use crate::geometry::Mesh;
use crate::transform::normalize;

/// A vector perpendicular to `dir`, using the same reference rule as extrusion
fn perpendicular(dir: &Vector3<f64>) -> Vector3<f64> {
    let mut reference = Vector3::y();
    if dir.dot(&reference).abs() > 0.9 {
        reference = Vector3::x();
    }
    normalize(&dir.cross(&reference))
}

fn span(start: &Point3<f64>, end: &Point3<f64>) -> GeometryResult<(Vector3<f64>, f64)> {
    let dir = end - start;
    let length = dir.norm();
    if length == 0.0 {
        return Err(GeometryError::invalid("length", 0.0, "start and end coincide"));
    }
    Ok((dir / length, length))
}

/// Options for [`dimension_marker`]
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionOptions {
    /// Distance of the dimension line from the measured points
    pub offset: f64,
    pub arrow_size: f64,
    /// Gap left in the middle of the line for the label
    pub gap_size: f64,
    /// Explicit offset direction; derived from the measured span when `None`
    pub cap_direction: Option<Vector3<f64>>,
    /// Label text; the measured length to two decimals when `None`
    pub label: Option<String>,
}

impl Default for DimensionOptions {
    fn default() -> Self {
        Self {
            offset: 0.2,
            arrow_size: 0.08,
            gap_size: 0.3,
            cap_direction: None,
            label: None,
        }
    }
}

/// A measured span drawn as an engineering dimension
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionMarker {
    pub mesh: Mesh,
    /// Where the label goes, in the middle of the gap
    pub midpoint: Point3<f64>,
    pub label: String,
    pub length: f64,
}

/// Build a dimension marker between two points.
///
/// Vertex layout: `0..2` left half of the line, `2..4` right half,
/// `4..6` start arrow, `6..8` end arrow, `8..12` extension lines.
pub fn dimension_marker(
    start: Point3<f64>,
    end: Point3<f64>,
    options: &DimensionOptions,
) -> GeometryResult<DimensionMarker> {
    let (dir, length) = span(&start, &end)?;
    let perp = match &options.cap_direction {
        Some(d) => normalize(d),
        None => perpendicular(&dir),
    };

    let offset_start = start + perp * options.offset;
    let offset_end = end + perp * options.offset;
    let midpoint = nalgebra::center(&offset_start, &offset_end);
    let half_gap = dir * (options.gap_size / 2.0);

    let mut mesh = Mesh::with_capacity(12, 8);

    mesh.add_vertex(offset_start);
    mesh.add_vertex(midpoint - half_gap);
    mesh.add_edge(0, 1);
    mesh.add_vertex(midpoint + half_gap);
    mesh.add_vertex(offset_end);
    mesh.add_edge(2, 3);

    let wing = perp * (options.arrow_size * 0.5);
    let start_back = offset_start + dir * options.arrow_size;
    mesh.add_vertex(start_back + wing);
    mesh.add_vertex(start_back - wing);
    mesh.add_edge(0, 4);
    mesh.add_edge(0, 5);

    let end_back = offset_end - dir * options.arrow_size;
    mesh.add_vertex(end_back + wing);
    mesh.add_vertex(end_back - wing);
    mesh.add_edge(3, 6);
    mesh.add_edge(3, 7);

    let reach = perp * (options.offset + options.arrow_size);
    mesh.add_vertex(start);
    mesh.add_vertex(start + reach);
    mesh.add_vertex(end);
    mesh.add_vertex(end + reach);
    mesh.add_edge(8, 9);
    mesh.add_edge(10, 11);

    let label = options
        .label
        .clone()
        .unwrap_or_else(|| format!("{length:.2}"));

    Ok(DimensionMarker {
        mesh,
        midpoint,
        label,
        length,
    })
}

/// Options for [`axis`]
#[derive(Debug, Clone, PartialEq)]
pub struct AxisOptions {
    /// Number of tick marks including both ends; at least 2 are drawn
    pub ticks: usize,
    pub tick_length: f64,
    /// Direction the ticks point; derived from the axis when `None`
    pub tick_direction: Option<Vector3<f64>>,
    pub show_end_ticks: bool,
    pub labels: Vec<String>,
}

impl Default for AxisOptions {
    fn default() -> Self {
        Self {
            ticks: 5,
            tick_length: 0.1,
            tick_direction: None,
            show_end_ticks: true,
            labels: Vec::new(),
        }
    }
}

/// A line segment with evenly spaced tick marks
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub mesh: Mesh,
    /// Tick positions on the line, end ticks included even when hidden
    pub tick_positions: Vec<Point3<f64>>,
    /// Tick positions pushed out by one tick length, for labels
    pub label_positions: Vec<Point3<f64>>,
    pub labels: Vec<String>,
    pub length: f64,
    pub direction: Vector3<f64>,
    pub tick_direction: Vector3<f64>,
}

/// Build a ticked axis from `start` to `end`
pub fn axis(start: Point3<f64>, end: Point3<f64>, options: &AxisOptions) -> GeometryResult<Axis> {
    let (direction, length) = span(&start, &end)?;
    let tick_direction = match &options.tick_direction {
        Some(d) => normalize(d),
        None => perpendicular(&direction),
    };
    let half_tick = tick_direction * (options.tick_length / 2.0);

    let mut mesh = Mesh::new();
    mesh.add_vertex(start);
    mesh.add_vertex(end);
    mesh.add_edge(0, 1);

    let count = options.ticks.max(2);
    let mut tick_positions = Vec::with_capacity(count);
    for i in 0..count {
        let t = i as f64 / (count - 1) as f64;
        let pos = start + (end - start) * t;
        tick_positions.push(pos);

        let is_end = i == 0 || i == count - 1;
        if is_end && !options.show_end_ticks {
            continue;
        }
        let a = mesh.add_vertex(pos - half_tick);
        let b = mesh.add_vertex(pos + half_tick);
        mesh.add_edge(a, b);
    }

    let label_positions = tick_positions
        .iter()
        .map(|p| p + tick_direction * options.tick_length)
        .collect();

    Ok(Axis {
        mesh,
        tick_positions,
        label_positions,
        labels: options.labels.clone(),
        length,
        direction,
        tick_direction,
    })
}

/// An axis with its display colour and name
#[derive(Debug, Clone, PartialEq)]
pub struct LabelledAxis {
    pub axis: Axis,
    pub color: &'static str,
    pub name: String,
}

const AXIS_EXTENT: f64 = 1.5;
const AXIS_TICKS: usize = 7;

/// The three ±1.5 coordinate axes, ticked every 0.5 and labelled for `system`.
///
/// Axes are expressed directly in the target system's coordinates and are
/// not passed through `to_system` again.
pub fn coordinate_axes(system: CoordinateSystem) -> GeometryResult<Vec<LabelledAxis>> {
    let labels: Vec<String> = (0..AXIS_TICKS)
        .map(|i| {
            let value = -AXIS_EXTENT + i as f64 * 0.5;
            if value.fract() == 0.0 {
                format!("{value:.0}")
            } else {
                format!("{value:.1}")
            }
        })
        .collect();

    // Ticks point along the system's up axis, or along X for the up axis itself
    let up = system.up();

    system
        .axis_config()
        .iter()
        .map(|desc| {
            let tick_direction = if desc.direction == up { Vector3::x() } else { up };
            let end = Point3::from(desc.direction * AXIS_EXTENT);
            let start = Point3::from(desc.direction * -AXIS_EXTENT);
            let ticked = axis(
                start,
                end,
                &AxisOptions {
                    ticks: AXIS_TICKS,
                    tick_length: 0.1,
                    tick_direction: Some(tick_direction),
                    show_end_ticks: true,
                    labels: labels.clone(),
                },
            )?;
            Ok(LabelledAxis {
                axis: ticked,
                color: desc.color,
                name: format!("{} ({})", desc.label, desc.description),
            })
        })
        .collect()
}
