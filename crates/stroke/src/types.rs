use geo_types::{Coord, LineString};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// Integer pixel coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<Point> for Coord<f64> {
    fn from(p: Point) -> Self {
        Coord { x: p.x as f64, y: p.y as f64 }
    }
}

/// Traversal order of a contour in image coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize, JsonSchema)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Winding {
    Clockwise,
    CounterClockwise,
}

impl Winding {
    /// +1 for clockwise, -1 for counter-clockwise.
    pub const fn sign(self) -> i8 {
        match self {
            Self::Clockwise => 1,
            Self::CounterClockwise => -1,
        }
    }
}

/// Role of an emitted polygon.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ContourKind {
    /// Outer boundary of a stroke region
    Outer,
    /// Boundary of a background cavity enclosed by a region
    Hole,
}

impl ContourKind {
    /// Winding every emitted contour of this kind carries.
    pub const fn winding(self) -> Winding {
        match self {
            Self::Outer => Winding::Clockwise,
            Self::Hole => Winding::CounterClockwise,
        }
    }
}

/// A simplified closed contour. The closing edge from the last point back to
/// the first is implicit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub kind: ContourKind,
    pub points: Vec<Point>,
}

impl Polygon {
    pub fn new(kind: ContourKind, points: Vec<Point>) -> Self {
        Self { kind, points }
    }

    /// Convert to a geo-types polygon for geometric operations
    pub fn to_geo_polygon(&self) -> geo_types::Polygon<f64> {
        let ring: LineString<f64> = self.points.iter().copied().map(Coord::from).collect();
        geo_types::Polygon::new(ring, vec![])
    }

    /// Shoelace area. Positive for clockwise contours in image coordinates.
    pub fn signed_area(&self) -> f64 {
        use geo::Area;
        self.to_geo_polygon().signed_area()
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// `None` for degenerate (zero-area) contours.
    pub fn winding(&self) -> Option<Winding> {
        winding_of(&self.points)
    }

    /// Length of the closed ring.
    pub fn perimeter(&self) -> f64 {
        use geo::EuclideanLength;
        self.to_geo_polygon().exterior().euclidean_length()
    }

    /// Inclusive (min, max) corners.
    pub fn bounding_box(&self) -> Option<(Point, Point)> {
        let first = *self.points.first()?;
        Some(self.points.iter().fold((first, first), |(min, max), p| {
            (
                Point::new(min.x.min(p.x), min.y.min(p.y)),
                Point::new(max.x.max(p.x), max.y.max(p.y)),
            )
        }))
    }
}

/// Orientation of a closed point sequence, from the sign of its shoelace sum.
pub fn winding_of(points: &[Point]) -> Option<Winding> {
    let n = points.len();
    if n < 3 {
        return None;
    }
    let mut twice_area = 0i64;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        twice_area += a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64;
    }
    match twice_area.signum() {
        1 => Some(Winding::Clockwise),
        -1 => Some(Winding::CounterClockwise),
        _ => None,
    }
}

/// Everything one processed stroke produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrokeOutline {
    /// Outer contours and holes, in discovery order
    pub polygons: Vec<Polygon>,
    /// Original image dimensions
    pub image_width: u32,
    pub image_height: u32,
    /// Lowest image row still holding ink after noise removal
    pub lowest_row: Option<u32>,
}

impl StrokeOutline {
    pub fn outers(&self) -> impl Iterator<Item = &Polygon> {
        self.polygons.iter().filter(|p| p.kind == ContourKind::Outer)
    }

    pub fn holes(&self) -> impl Iterator<Item = &Polygon> {
        self.polygons.iter().filter(|p| p.kind == ContourKind::Hole)
    }

    pub fn vertex_count(&self) -> usize {
        self.polygons.iter().map(|p| p.points.len()).sum()
    }
}
