//! # MapSketch Core
//!
//! Core types shared by the MapSketch crates: working-projection geometry,
//! the error hierarchy, the synchronous event bus and length/area units.

pub mod error;
pub mod event_bus;
pub mod geometry;
pub mod units;

pub use error::{DrawError, EditError, Error, GeometryError, LayerError, Result, StoreError};

// Re-export event bus for convenience
pub use event_bus::{
    DrawEvent, EventBus, EventBusConfig, EventCategory, EventFilter, FeatureEvent, FeatureId,
    LayerEvent, MapEvent, OverlayEvent, SessionEndReason, SessionId, SubscriptionId,
};

pub use geometry::{DrawTool, Geometry, GeometryKind, Point};
pub use units::{format_area, format_length, parse_length, LengthFormat, LengthUnit};
