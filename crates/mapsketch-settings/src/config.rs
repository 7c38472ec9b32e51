//! Configuration for MapSketch
//!
//! Provides configuration file handling and validation.
//! Supports JSON and TOML file formats stored in the platform config directory.
//!
//! Configuration is organized into logical sections:
//! - View settings (initial center and zoom)
//! - Basemap providers and the active basemap
//! - Measurement label formatting and edit limits
//! - Drawing behaviour
//! - Export options

use crate::error::{ConfigError, SettingsError, SettingsResult};
use mapsketch_core::units::LengthFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Initial map view
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    /// Initial center as `[longitude, latitude]` in degrees
    pub center_lon_lat: [f64; 2],
    /// Initial zoom level
    pub zoom: f64,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            center_lon_lat: [100.5, 13.7],
            zoom: 5.0,
        }
    }
}

/// A tiled raster basemap source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasemapProvider {
    /// Stable key used by the basemap switch buttons
    pub key: String,
    /// Button label
    pub name: String,
    /// XYZ URL template (`{z}`, `{x}`, `{y}`, `{a-c}`, `{r}`)
    pub url: String,
    /// Attribution shown in the map corner
    pub attribution: String,
}

impl BasemapProvider {
    pub fn new(key: &str, name: &str, url: &str, attribution: &str) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            url: url.to_string(),
            attribution: attribution.to_string(),
        }
    }
}

/// Basemap settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BasemapSettings {
    /// Key of the basemap shown at startup
    pub active: String,
    /// Available providers, in button order
    pub providers: Vec<BasemapProvider>,
}

impl Default for BasemapSettings {
    fn default() -> Self {
        Self {
            active: "osm".to_string(),
            providers: vec![
                BasemapProvider::new(
                    "osm",
                    "OpenStreetMap",
                    "https://{a-c}.tile.openstreetmap.org/{z}/{x}/{y}.png",
                    "© OpenStreetMap contributors",
                ),
                BasemapProvider::new(
                    "stadia",
                    "Satellite",
                    "https://tiles.stadiamaps.com/tiles/alidade_satellite/{z}/{x}/{y}.jpg",
                    "© Stadia Maps",
                ),
                BasemapProvider::new(
                    "carto",
                    "Carto Voyager",
                    "https://{a-c}.basemaps.cartocdn.com/rastertiles/voyager_nolabels/{z}/{x}/{y}{r}.png",
                    "© Carto",
                ),
                BasemapProvider::new(
                    "esri",
                    "Esri World Imagery",
                    "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}",
                    "© Esri",
                ),
            ],
        }
    }
}

/// Measurement label settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasurementSettings {
    /// Lengths at or above this many metres are labelled in km
    pub km_threshold_m: f64,
    /// Decimals for metre labels
    pub meter_decimals: usize,
    /// Decimals for kilometre labels
    pub km_decimals: usize,
    /// Segments shorter than this cannot be rescaled by a length edit
    pub min_segment_length_m: f64,
}

impl Default for MeasurementSettings {
    fn default() -> Self {
        Self {
            km_threshold_m: 1000.0,
            meter_decimals: 1,
            km_decimals: 2,
            min_segment_length_m: 1e-6,
        }
    }
}

impl MeasurementSettings {
    /// Label formatting rules derived from these settings
    pub fn length_format(&self) -> LengthFormat {
        LengthFormat {
            km_threshold_m: self.km_threshold_m,
            meter_decimals: self.meter_decimals,
            km_decimals: self.km_decimals,
        }
    }
}

/// Drawing behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawingSettings {
    /// Keep the tool armed for another drawing after one completes
    pub keep_tool_after_complete: bool,
}

impl Default for DrawingSettings {
    fn default() -> Self {
        Self {
            keep_tool_after_complete: true,
        }
    }
}

/// Coordinate space written to the export file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportProjection {
    /// Working projection coordinates (EPSG:3857), as drawn
    Working,
    /// Longitude/latitude degrees (EPSG:4326)
    Wgs84,
}

impl Default for ExportProjection {
    fn default() -> Self {
        Self::Working
    }
}

/// Export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// File name of the downloaded artifact
    pub file_name: String,
    /// Coordinate space of the exported geometries
    #[serde(default)]
    pub projection: ExportProjection,
    /// Pretty-print the JSON payload
    #[serde(default)]
    pub pretty: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            file_name: "features.geojson".to_string(),
            projection: ExportProjection::default(),
            pretty: false,
        }
    }
}

/// Complete application configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// View settings
    #[serde(default)]
    pub view: ViewSettings,
    /// Basemap settings
    #[serde(default)]
    pub basemap: BasemapSettings,
    /// Measurement settings
    #[serde(default)]
    pub measurement: MeasurementSettings,
    /// Drawing settings
    #[serde(default)]
    pub drawing: DrawingSettings,
    /// Export settings
    #[serde(default)]
    pub export: ExportSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default location of the config file
    pub fn default_path() -> SettingsResult<PathBuf> {
        let dir = dirs::config_dir().ok_or_else(|| {
            SettingsError::ConfigDirectory("no platform config directory".to_string())
        })?;
        Ok(dir.join("mapsketch").join("config.toml"))
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: Self = match Format::from_path(path)? {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load the config file if it exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::from_path(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)
                .map_err(|e| SettingsError::SaveError(e.to_string()))?,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let [lon, lat] = self.view.center_lon_lat;
        if !(-180.0..=180.0).contains(&lon) || !(-85.06..=85.06).contains(&lat) {
            return Err(ConfigError::ValueOutOfRange {
                key: "view.center_lon_lat".to_string(),
                value: format!("[{}, {}]", lon, lat),
            });
        }

        if !(0.0..=28.0).contains(&self.view.zoom) {
            return Err(ConfigError::ValueOutOfRange {
                key: "view.zoom".to_string(),
                value: self.view.zoom.to_string(),
            });
        }

        if self.basemap.providers.is_empty() {
            return Err(ConfigError::MissingKey("basemap.providers".to_string()));
        }

        if !self
            .basemap
            .providers
            .iter()
            .any(|p| p.key == self.basemap.active)
        {
            return Err(ConfigError::ValueOutOfRange {
                key: "basemap.active".to_string(),
                value: self.basemap.active.clone(),
            });
        }

        if self.measurement.km_threshold_m <= 0.0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "measurement.km_threshold_m".to_string(),
                value: self.measurement.km_threshold_m.to_string(),
            });
        }

        if self.measurement.min_segment_length_m <= 0.0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "measurement.min_segment_length_m".to_string(),
                value: self.measurement.min_segment_length_m.to_string(),
            });
        }

        if self.export.file_name.trim().is_empty() {
            return Err(ConfigError::MissingKey("export.file_name".to_string()));
        }

        Ok(())
    }
}

/// Supported config file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

impl Format {
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}
