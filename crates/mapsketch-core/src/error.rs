//! Error handling for MapSketch
//!
//! Provides error types for each layer of the drawing engine:
//! - Geometry errors (degenerate or non-finite coordinates)
//! - Draw errors (state machine violations)
//! - Edit errors (inline length edits that cannot be applied)
//! - Store errors (feature store and export)
//! - Layer errors (basemap and district overlays)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

use crate::geometry::DrawTool;

/// Geometry error type
///
/// Raised by the coordinate utilities when an operation would produce
/// a coordinate that cannot be represented.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Segment is too short to derive a direction from
    #[error("Segment length {length_m} m is below the minimum of {min_m} m")]
    DegenerateSegment {
        /// Measured length in metres.
        length_m: f64,
        /// Minimum accepted length in metres.
        min_m: f64,
    },

    /// Requested target length is unusable
    #[error("Invalid target length: {value}")]
    InvalidLength {
        /// The rejected value in metres.
        value: f64,
    },

    /// Target length lies beyond where the segment's ray leaves the map
    #[error("Target length {target_m} m is out of reach (at most {max_m} m along this segment)")]
    UnreachableLength {
        /// Requested length in metres.
        target_m: f64,
        /// Longest length found along the ray in metres.
        max_m: f64,
    },

    /// A computed coordinate is NaN or infinite
    #[error("Non-finite coordinate ({x}, {y})")]
    NonFinite {
        /// X coordinate.
        x: f64,
        /// Y coordinate.
        y: f64,
    },
}

/// Draw session error type
///
/// Represents transitions the drawing state machine refuses.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DrawError {
    /// No drawing is in progress
    #[error("No drawing in progress")]
    NotDrawing,

    /// Completion requested before enough vertices were placed
    #[error("{tool} needs at least {required} distinct vertices, got {actual}")]
    TooFewVertices {
        /// Active tool.
        tool: DrawTool,
        /// Required number of distinct vertices.
        required: usize,
        /// Distinct vertices placed so far.
        actual: usize,
    },

    /// Pointer input carried a NaN or infinite coordinate
    #[error("Invalid pointer coordinate ({x}, {y})")]
    InvalidCoordinate {
        /// X coordinate.
        x: f64,
        /// Y coordinate.
        y: f64,
    },

    /// Vertex index outside the committed vertex list
    #[error("Vertex {index} out of range (vertex count {count})")]
    VertexOutOfRange {
        /// Requested index.
        index: usize,
        /// Committed vertex count.
        count: usize,
    },
}

/// Inline length edit error type
///
/// Every variant is recovered locally by reverting the label; the variants
/// exist so the cause can be logged and tested.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    /// Typed text is not a usable number
    #[error("Invalid length input '{input}'")]
    InvalidInput {
        /// The text that failed to parse.
        input: String,
    },

    /// The session the edit was opened on has ended
    #[error("Edit belongs to session {edit_session}, active session is {active_session:?}")]
    StaleSession {
        /// Session the edit was opened on.
        edit_session: u64,
        /// Currently active session, if any.
        active_session: Option<u64>,
    },

    /// Segment index does not address an editable segment
    #[error("Segment {index} is not editable")]
    SegmentNotEditable {
        /// Index of the segment's far vertex.
        index: usize,
    },

    /// The segment is already being edited
    #[error("Segment {index} is already in edit mode")]
    AlreadyEditing {
        /// Index of the segment's far vertex.
        index: usize,
    },

    /// Rescaling the segment failed
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Feature store error type
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    /// Geometry cannot be committed as a feature
    #[error("Cannot commit geometry: {reason}")]
    InvalidGeometry {
        /// Why the geometry was rejected.
        reason: String,
    },

    /// GeoJSON serialization failed
    #[error("Failed to serialize features: {reason}")]
    Serialization {
        /// Serializer message.
        reason: String,
    },
}

/// Map layer error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayerError {
    /// No basemap with that key
    #[error("Unknown basemap: {key}")]
    UnknownBasemap {
        /// The requested key.
        key: String,
    },

    /// No district with that name
    #[error("Unknown district: {name}")]
    UnknownDistrict {
        /// The requested name.
        name: String,
    },

    /// Catalog has no providers
    #[error("Basemap catalog is empty")]
    EmptyCatalog,
}

/// Main error type for MapSketch
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Geometry error
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Draw session error
    #[error(transparent)]
    Draw(#[from] DrawError),

    /// Length edit error
    #[error(transparent)]
    Edit(#[from] EditError),

    /// Feature store error
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Layer error
    #[error(transparent)]
    Layer(#[from] LayerError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a draw session error
    pub fn is_draw_error(&self) -> bool {
        matches!(self, Error::Draw(_))
    }

    /// Check if this is a length edit error
    pub fn is_edit_error(&self) -> bool {
        matches!(self, Error::Edit(_))
    }

    /// Check if this is a geometry error, directly or behind an edit
    pub fn is_geometry_error(&self) -> bool {
        matches!(
            self,
            Error::Geometry(_) | Error::Edit(EditError::Geometry(_))
        )
    }

    /// Check if this is a layer error
    pub fn is_layer_error(&self) -> bool {
        matches!(self, Error::Layer(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
