//! # MapSketch
//!
//! An interactive map drawing engine: draw points, lines and polygons over a
//! web-mercator basemap, watch every segment's great-circle length update as
//! you draw, retype a segment's length to move its far vertex, and export the
//! result as GeoJSON.
//!
//! ## Architecture
//!
//! MapSketch is organized as a workspace with multiple crates:
//!
//! 1. **mapsketch-core** - Geometry types, errors, event bus, length units
//! 2. **mapsketch-settings** - Configuration files and validation
//! 3. **mapsketch-designer** - Draw sessions, overlays, length editing, feature store, layers
//! 4. **mapsketch** - Replay binary that drives a map session from a script

pub mod script;

pub use mapsketch_designer as designer;
pub use mapsketch_settings as settings;

pub use mapsketch_core::{
    DrawError, DrawTool, EditError, Error, EventBus, Geometry, GeometryKind, LengthFormat,
    LengthUnit, MapEvent, Point, Result,
};

pub use mapsketch_designer::{
    EditOutcome, Feature, FeatureStore, LengthEdit, MapSession, MeasurementSummary,
    SegmentOverlay,
};

pub use mapsketch_settings::{Config, SettingsError};

pub use script::{load_script, parse_script, replay, Action, StepReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging
///
/// Console output honouring `RUST_LOG`, INFO by default. With `json` set,
/// events are written as one JSON object per line.
pub fn init_logging(json: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .json();
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .with_line_number(true);
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    }

    Ok(())
}
