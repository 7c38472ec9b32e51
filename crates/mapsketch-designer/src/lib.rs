//! # MapSketch Designer
//!
//! Drawing and measurement engine for an interactive map editor. Users draw
//! points, lines and polygons on a web-mercator map; every segment of the
//! sketch carries a live great-circle length label that can be clicked and
//! retyped to move the segment's far vertex.
//!
//! ## Architecture
//!
//! ```text
//! MapSession
//!   ├── EventBus (synchronous, per session)
//!   ├── DrawController ── DrawSession (one gesture)
//!   │        └── publishes GeometryChanged / SessionEnded
//!   ├── OverlayManager (subscribed for one session)
//!   │        └── SegmentOverlay per vertex pair
//!   ├── LengthEditor (inline edits → vertex moves)
//!   ├── FeatureStore (committed features, GeoJSON export)
//!   └── Layers (basemap catalog, district parcels)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use mapsketch_designer::MapSession;
//! use mapsketch_core::DrawTool;
//! use mapsketch_settings::Config;
//!
//! let mut map = MapSession::new(&Config::default()).unwrap();
//! map.select_tool(DrawTool::LineString);
//! map.click_lon_lat(100.50, 13.70).unwrap();
//! map.click_lon_lat(100.51, 13.70).unwrap();
//! assert_eq!(map.overlays().len(), 1);
//!
//! let id = map.double_click().unwrap();
//! assert_eq!(map.features().get(id).map(|f| f.id), Some(id));
//! ```

pub mod draw_session;
pub mod feature_store;
pub mod geojson;
pub mod layers;
pub mod length_editor;
pub mod map_session;
pub mod measure;
pub mod overlay;

pub use draw_session::{DrawController, DrawSession, DrawState};
pub use feature_store::{Feature, FeatureStore};
pub use geojson::{GeoJson, GeoJsonGeometry};
pub use layers::{BasemapCatalog, District, DistrictLayer, DistrictLayers, Parcel, ParcelStyle};
pub use length_editor::{EditOutcome, LengthEdit, LengthEditor, ResolvedEdit};
pub use map_session::MapSession;
pub use overlay::{build_overlays, MeasurementSummary, OverlayManager, SegmentOverlay};
