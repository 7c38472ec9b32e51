//! Geometry primitives shared by every MapSketch crate.
//!
//! Coordinates live in the working projection (EPSG:3857 spherical mercator),
//! so a [`Point`] is a planar pair of metres-at-the-equator values. Conversion
//! to longitude/latitude and real-world distances are handled by the designer's
//! measurement module.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A planar coordinate in the working projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Coordinate pair in GeoJSON order.
    pub fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl From<[f64; 2]> for Point {
    fn from(c: [f64; 2]) -> Self {
        Self::new(c[0], c[1])
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Drawing tool selected in the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DrawTool {
    #[default]
    None,
    Point,
    LineString,
    Polygon,
}

impl DrawTool {
    /// Minimum number of distinct vertices a finished geometry needs.
    pub fn min_vertices(self) -> usize {
        match self {
            DrawTool::None => 0,
            DrawTool::Point => 1,
            DrawTool::LineString => 2,
            DrawTool::Polygon => 3,
        }
    }

    /// Whether the tool produces a multi-vertex geometry with measurable segments.
    pub fn is_path(self) -> bool {
        matches!(self, DrawTool::LineString | DrawTool::Polygon)
    }
}

impl fmt::Display for DrawTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawTool::None => write!(f, "None"),
            DrawTool::Point => write!(f, "Point"),
            DrawTool::LineString => write!(f, "LineString"),
            DrawTool::Polygon => write!(f, "Polygon"),
        }
    }
}

impl std::str::FromStr for DrawTool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" | "select" => Ok(Self::None),
            "point" => Ok(Self::Point),
            "linestring" | "line" => Ok(Self::LineString),
            "polygon" => Ok(Self::Polygon),
            _ => Err(format!("Unknown drawing tool: {}", s)),
        }
    }
}

/// Geometry type tag, matching the GeoJSON `type` member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryKind {
    Point,
    LineString,
    Polygon,
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryKind::Point => write!(f, "Point"),
            GeometryKind::LineString => write!(f, "LineString"),
            GeometryKind::Polygon => write!(f, "Polygon"),
        }
    }
}

/// A drawn geometry.
///
/// Polygons hold their outer ring open: the closing vertex back to the first
/// one is implicit and only materialised when exporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Point(Point),
    LineString(Vec<Point>),
    Polygon(Vec<Point>),
}

impl Geometry {
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point(_) => GeometryKind::Point,
            Geometry::LineString(_) => GeometryKind::LineString,
            Geometry::Polygon(_) => GeometryKind::Polygon,
        }
    }

    /// Vertices in drawing order (the outer ring for polygons, open).
    pub fn vertices(&self) -> &[Point] {
        match self {
            Geometry::Point(p) => std::slice::from_ref(p),
            Geometry::LineString(v) | Geometry::Polygon(v) => v,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices().len()
    }

    /// Number of adjacent vertex pairs along the open chain.
    pub fn segment_count(&self) -> usize {
        match self {
            Geometry::Point(_) => 0,
            Geometry::LineString(v) | Geometry::Polygon(v) => v.len().saturating_sub(1),
        }
    }

    /// Number of distinct vertex positions, ignoring repeats.
    pub fn distinct_vertex_count(&self) -> usize {
        let mut seen: Vec<Point> = Vec::with_capacity(self.vertex_count());
        for v in self.vertices() {
            if !seen.contains(v) {
                seen.push(*v);
            }
        }
        seen.len()
    }

    pub fn is_finite(&self) -> bool {
        self.vertices().iter().all(Point::is_finite)
    }
}
