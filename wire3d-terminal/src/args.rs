/// Command-line options for the terminal viewer
use nalgebra::{Point2, Vector3};
use nom::{
    character::complete::{char, multispace0},
    combinator::{all_consuming, map},
    multi::separated_list0,
    number::complete::double,
    sequence::{delimited, separated_pair},
    IResult,
};
use thiserror::Error;
use wire3d_core::{CoordinateSystem, MeshStyle, ProjectionMode};

use crate::scene::{ExtrudeAxis, Preset, ShapeKind};

pub const USAGE: &str = "\
Usage: wire3d-terminal [OPTIONS]

Shape:
  --shape NAME        box, cube, cylinder, cone, prism, pyramid, frustum, extrusion
  --segments N        ring segments, prism/pyramid sides, or arc samples
  --top-radius R      frustum top radius
  --size W,H,D        box dimensions
  --profile POINTS    extrusion profile, e.g. \"[[0,0],[1,0],[0.5,1]]\"
  --preset NAME       l-shape, t-shape, triangle, semicircle, arc-90, arc-270, rounded-rect
  --axis x|y|z        extrusion axis
  --length L          extrusion length

View:
  --system rhs|lhs    coordinate system
  --ortho             orthographic projection
  --fill              fill side and cap faces
  --no-rulings        hide rulings
  --axes              show coordinate axes
  --dimensions        show dimension markers
  -h, --help          print this message";

/// Errors produced while reading the command line
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArgError {
    #[error("help requested")]
    Help,

    #[error("unknown option '{0}'")]
    UnknownFlag(String),

    #[error("option '{0}' needs a value")]
    MissingValue(String),

    #[error("invalid value '{value}' for '{flag}'")]
    InvalidValue { flag: String, value: String },

    #[error("malformed profile '{0}', expected [[x,y],...]")]
    Profile(String),
}

/// Viewer configuration assembled from the command line
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub shape: ShapeKind,
    /// Overrides the shape's default segment count
    pub segments: Option<usize>,
    pub top_radius: f64,
    pub size: Vector3<f64>,
    pub profile: Option<Vec<Point2<f64>>>,
    /// Takes precedence over `profile`
    pub preset: Option<Preset>,
    pub axis: ExtrudeAxis,
    pub length: f64,
    pub system: CoordinateSystem,
    pub mode: ProjectionMode,
    pub style: MeshStyle,
    pub show_axes: bool,
    pub show_dimensions: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shape: ShapeKind::Cube,
            segments: None,
            top_radius: 0.5,
            size: Vector3::new(1.0, 1.0, 1.0),
            profile: None,
            preset: None,
            axis: ExtrudeAxis::Y,
            length: 2.0,
            system: CoordinateSystem::Rhs,
            mode: ProjectionMode::Perspective,
            style: MeshStyle::default(),
            show_axes: false,
            show_dimensions: false,
        }
    }
}

impl Config {
    /// Parse arguments, excluding the program name
    pub fn from_args<I>(args: I) -> Result<Self, ArgError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Config::default();
        let mut shape_given = false;
        let mut args = args.into_iter();

        while let Some(flag) = args.next() {
            match flag.as_str() {
                "-h" | "--help" => return Err(ArgError::Help),
                "--ortho" => config.mode = ProjectionMode::Orthographic,
                "--fill" => config.style.show_fill = true,
                "--no-rulings" => config.style.show_rulings = false,
                "--axes" => config.show_axes = true,
                "--dimensions" => config.show_dimensions = true,
                "--shape" | "--segments" | "--top-radius" | "--size" | "--profile"
                | "--preset" | "--axis" | "--length" | "--system" => {
                    let value = args
                        .next()
                        .ok_or_else(|| ArgError::MissingValue(flag.clone()))?;
                    let invalid = || ArgError::InvalidValue {
                        flag: flag.clone(),
                        value: value.clone(),
                    };
                    match flag.as_str() {
                        "--shape" => {
                            config.shape = ShapeKind::from_name(&value).ok_or_else(invalid)?;
                            shape_given = true;
                        }
                        "--segments" => {
                            config.segments = Some(value.parse().map_err(|_| invalid())?);
                        }
                        "--top-radius" => config.top_radius = parse_number(&value).ok_or_else(invalid)?,
                        "--size" => config.size = parse_size(&value).ok_or_else(invalid)?,
                        "--profile" => config.profile = Some(parse_profile(&value)?),
                        "--preset" => {
                            config.preset = Some(Preset::from_name(&value).ok_or_else(invalid)?);
                        }
                        "--axis" => config.axis = ExtrudeAxis::from_name(&value).ok_or_else(invalid)?,
                        "--length" => config.length = parse_number(&value).ok_or_else(invalid)?,
                        _ => config.system = value.parse().map_err(|_| invalid())?,
                    }
                }
                _ => return Err(ArgError::UnknownFlag(flag)),
            }
        }

        if !shape_given && (config.profile.is_some() || config.preset.is_some()) {
            config.shape = ShapeKind::Extrusion;
        }
        Ok(config)
    }

    /// Segment count for `shape`, honouring `--segments`
    pub fn segments_for(&self, shape: ShapeKind) -> usize {
        self.segments.unwrap_or_else(|| shape.default_segments())
    }
}

fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_size(value: &str) -> Option<Vector3<f64>> {
    let parts: Vec<f64> = value
        .split(',')
        .map(parse_number)
        .collect::<Option<_>>()?;
    match parts.as_slice() {
        &[w, h, d] => Some(Vector3::new(w, h, d)),
        _ => None,
    }
}

fn ws<'a, O, F>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

fn point(input: &str) -> IResult<&str, Point2<f64>> {
    map(
        delimited(
            char('['),
            separated_pair(ws(double), char(','), ws(double)),
            char(']'),
        ),
        |(x, y)| Point2::new(x, y),
    )(input)
}

fn point_list(input: &str) -> IResult<&str, Vec<Point2<f64>>> {
    delimited(
        char('['),
        separated_list0(char(','), ws(point)),
        char(']'),
    )(input)
}

/// Parse profile text of the form `[[x, y], [x, y], ...]`
pub fn parse_profile(text: &str) -> Result<Vec<Point2<f64>>, ArgError> {
    all_consuming(ws(point_list))(text)
        .map(|(_, points)| points)
        .map_err(|_| ArgError::Profile(text.to_string()))
}
