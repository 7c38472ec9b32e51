//! Committed features and GeoJSON export.
//!
//! Finished drawings are copied into the store with a fresh identity. The
//! store never shares vertex storage with a draw session: later edits to a
//! sketch cannot reach a committed feature.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use mapsketch_core::{FeatureId, Geometry, GeometryKind, Point, StoreError};
use mapsketch_settings::{ExportProjection, ExportSettings};

use crate::geojson::{GeoJson, GeoJsonGeometry};
use crate::measure;

/// A committed geometry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feature {
    pub id: FeatureId,
    pub geometry: Geometry,
    pub created_at: DateTime<Utc>,
}

impl Feature {
    pub fn kind(&self) -> GeometryKind {
        self.geometry.kind()
    }

    /// GeoJSON representation in the requested coordinate space
    pub fn to_geojson(&self, projection: ExportProjection) -> GeoJson {
        let geometry = match projection {
            ExportProjection::Working => {
                GeoJsonGeometry::from_geometry(&self.geometry, Point::to_array)
            }
            ExportProjection::Wgs84 => {
                GeoJsonGeometry::from_geometry(&self.geometry, measure::to_lon_lat)
            }
        };

        let mut properties = Map::new();
        properties.insert("id".to_string(), Value::from(self.id));
        properties.insert(
            "created_at".to_string(),
            Value::from(self.created_at.to_rfc3339()),
        );
        GeoJson::feature(geometry, properties)
    }
}

/// Ordered collection of committed features
#[derive(Debug)]
pub struct FeatureStore {
    features: Vec<Feature>,
    next_id: FeatureId,
}

impl Default for FeatureStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureStore {
    pub fn new() -> Self {
        Self {
            features: Vec::new(),
            next_id: 1,
        }
    }

    /// Store a copy of a finished geometry and return its new identity
    pub fn commit(&mut self, geometry: Geometry) -> std::result::Result<FeatureId, StoreError> {
        if !geometry.is_finite() {
            return Err(StoreError::InvalidGeometry {
                reason: "non-finite coordinate".to_string(),
            });
        }
        let required = match geometry.kind() {
            GeometryKind::Point => 1,
            GeometryKind::LineString => 2,
            GeometryKind::Polygon => 3,
        };
        if geometry.distinct_vertex_count() < required {
            return Err(StoreError::InvalidGeometry {
                reason: format!(
                    "{} needs {} distinct vertices, got {}",
                    geometry.kind(),
                    required,
                    geometry.distinct_vertex_count()
                ),
            });
        }

        let id = self.next_id;
        self.next_id += 1;
        self.features.push(Feature {
            id,
            geometry,
            created_at: Utc::now(),
        });
        tracing::debug!("Feature {} committed", id);
        Ok(id)
    }

    /// Remove a feature; unknown ids are ignored
    pub fn remove(&mut self, id: FeatureId) -> Option<Feature> {
        let pos = self.features.iter().position(|f| f.id == id)?;
        Some(self.features.remove(pos))
    }

    /// Remove every feature and return how many there were
    pub fn clear(&mut self) -> usize {
        let count = self.features.len();
        self.features.clear();
        count
    }

    pub fn get(&self, id: FeatureId) -> Option<&Feature> {
        self.features.iter().find(|f| f.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// One line per feature: `"{type}: {coordinates}"`
    pub fn summary(&self) -> Vec<String> {
        self.features
            .iter()
            .map(|f| {
                let coords: Vec<[f64; 2]> = f.geometry.vertices().iter().map(|p| p.to_array()).collect();
                let coords = match &f.geometry {
                    Geometry::Point(p) => serde_json::to_string(&p.to_array()),
                    _ => serde_json::to_string(&coords),
                }
                .unwrap_or_default();
                format!("{}: {}", f.kind(), coords)
            })
            .collect()
    }

    /// The whole store as a feature collection
    pub fn to_geojson(&self, projection: ExportProjection) -> GeoJson {
        GeoJson::collection(
            self.features
                .iter()
                .map(|f| f.to_geojson(projection))
                .collect(),
        )
    }

    /// Serialize the store as a GeoJSON feature collection
    pub fn export_geojson(
        &self,
        projection: ExportProjection,
        pretty: bool,
    ) -> std::result::Result<String, StoreError> {
        let doc = self.to_geojson(projection);
        let json = if pretty {
            serde_json::to_string_pretty(&doc)
        } else {
            serde_json::to_string(&doc)
        };
        json.map_err(|e| StoreError::Serialization {
            reason: e.to_string(),
        })
    }

    /// Write the export artifact into `dir` and return its path
    pub fn export_to_file(&self, dir: &Path, settings: &ExportSettings) -> Result<PathBuf> {
        let json = self.export_geojson(settings.projection, settings.pretty)?;
        let path = dir.join(&settings.file_name);
        std::fs::write(&path, &json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Exported {} features to {}", self.len(), path.display());
        Ok(path)
    }
}
