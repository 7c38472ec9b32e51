//! GeoJSON document model used for export.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use mapsketch_core::{Geometry, Point};

/// GeoJSON geometry object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJsonGeometry {
    Point {
        coordinates: [f64; 2],
    },
    LineString {
        coordinates: Vec<[f64; 2]>,
    },
    Polygon {
        coordinates: Vec<Vec<[f64; 2]>>,
    },
}

impl GeoJsonGeometry {
    /// Convert a drawn geometry, mapping each vertex through `transform`
    ///
    /// Polygon rings are closed by repeating the first vertex.
    pub fn from_geometry(geometry: &Geometry, transform: impl Fn(Point) -> [f64; 2]) -> Self {
        match geometry {
            Geometry::Point(p) => Self::Point {
                coordinates: transform(*p),
            },
            Geometry::LineString(v) => Self::LineString {
                coordinates: v.iter().map(|p| transform(*p)).collect(),
            },
            Geometry::Polygon(v) => {
                let mut ring: Vec<[f64; 2]> = v.iter().map(|p| transform(*p)).collect();
                if let (Some(first), Some(last)) = (ring.first().copied(), ring.last()) {
                    if first != *last {
                        ring.push(first);
                    }
                }
                Self::Polygon {
                    coordinates: vec![ring],
                }
            }
        }
    }

    /// Convert back to a drawn geometry; the closing vertex of a polygon is dropped
    pub fn to_geometry(&self) -> Geometry {
        match self {
            Self::Point { coordinates } => Geometry::Point(Point::from(*coordinates)),
            Self::LineString { coordinates } => {
                Geometry::LineString(coordinates.iter().map(|c| Point::from(*c)).collect())
            }
            Self::Polygon { coordinates } => {
                let mut ring: Vec<Point> = coordinates
                    .first()
                    .map(|r| r.iter().map(|c| Point::from(*c)).collect())
                    .unwrap_or_default();
                if ring.len() > 1 && ring.first() == ring.last() {
                    ring.pop();
                }
                Geometry::Polygon(ring)
            }
        }
    }
}

/// GeoJSON feature or feature collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJson {
    Feature {
        geometry: GeoJsonGeometry,
        properties: Map<String, Value>,
    },
    FeatureCollection {
        features: Vec<GeoJson>,
    },
}

impl GeoJson {
    pub fn feature(geometry: GeoJsonGeometry, properties: Map<String, Value>) -> Self {
        Self::Feature {
            geometry,
            properties,
        }
    }

    pub fn collection(features: Vec<GeoJson>) -> Self {
        Self::FeatureCollection { features }
    }

    /// Features of a collection, or the feature itself
    pub fn features(&self) -> Vec<&GeoJson> {
        match self {
            Self::Feature { .. } => vec![self],
            Self::FeatureCollection { features } => features.iter().collect(),
        }
    }
}
