//! MapSketch Settings Crate
//!
//! Handles application configuration: loading, saving and validating the
//! view, basemap, measurement, drawing and export sections.

pub mod config;
pub mod error;

pub use config::{
    BasemapProvider, BasemapSettings, Config, DrawingSettings, ExportProjection, ExportSettings,
    MeasurementSettings, ViewSettings,
};
pub use error::{ConfigError, SettingsError, SettingsResult};
