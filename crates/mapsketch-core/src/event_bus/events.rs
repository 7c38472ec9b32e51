//! Event type definitions for the event bus.
//!
//! This module defines all map editor events organized by category.
//! Events are cloneable and serializable for logging/replay.

use serde::{Deserialize, Serialize};

use crate::geometry::{DrawTool, Geometry};

/// Identity of one draw session (one drawing gesture)
pub type SessionId = u64;

/// Identity of a committed feature
pub type FeatureId = u64;

/// Root event enum for all map editor events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MapEvent {
    /// Drawing state machine events
    Draw(DrawEvent),
    /// Feature store events
    Feature(FeatureEvent),
    /// Segment overlay events
    Overlay(OverlayEvent),
    /// Basemap and district layer events
    Layer(LayerEvent),
}

impl MapEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            MapEvent::Draw(_) => EventCategory::Draw,
            MapEvent::Feature(_) => EventCategory::Feature,
            MapEvent::Overlay(_) => EventCategory::Overlay,
            MapEvent::Layer(_) => EventCategory::Layer,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            MapEvent::Draw(e) => e.description(),
            MapEvent::Feature(e) => e.description(),
            MapEvent::Overlay(e) => e.description(),
            MapEvent::Layer(e) => e.description(),
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Drawing state machine events.
    Draw,
    /// Feature store events.
    Feature,
    /// Segment overlay events.
    Overlay,
    /// Map layer events.
    Layer,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Draw => write!(f, "Draw"),
            EventCategory::Feature => write!(f, "Feature"),
            EventCategory::Overlay => write!(f, "Overlay"),
            EventCategory::Layer => write!(f, "Layer"),
        }
    }
}

/// Why a draw session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEndReason {
    /// The drawing was finished and handed to the feature store
    Completed,
    /// The user switched tools
    ToolChanged,
    /// The user pressed Escape
    Cancelled,
    /// All features were cleared
    Cleared,
}

/// Drawing state machine events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DrawEvent {
    /// Active tool changed.
    ToolChanged {
        /// Previously active tool.
        from: DrawTool,
        /// Newly selected tool.
        to: DrawTool,
    },
    /// A new session started drawing.
    SessionStarted {
        /// The new session.
        session: SessionId,
        /// Tool the session draws with.
        tool: DrawTool,
    },
    /// The in-progress geometry changed.
    GeometryChanged {
        /// Session owning the geometry.
        session: SessionId,
        /// Snapshot of the sketch geometry, including any rubber-band vertex.
        geometry: Geometry,
    },
    /// A drawing was finished.
    DrawCompleted {
        /// Session that produced the geometry.
        session: SessionId,
        /// The finished geometry.
        geometry: Geometry,
    },
    /// A session ended; its overlays must be gone.
    SessionEnded {
        /// The session that ended.
        session: SessionId,
        /// Why it ended.
        reason: SessionEndReason,
    },
}

impl DrawEvent {
    /// Get a short description for logging
    pub fn description(&self) -> String {
        match self {
            DrawEvent::ToolChanged { from, to } => format!("Tool changed: {} -> {}", from, to),
            DrawEvent::SessionStarted { session, tool } => {
                format!("Session {} started ({})", session, tool)
            }
            DrawEvent::GeometryChanged { session, geometry } => format!(
                "Session {} geometry changed ({} vertices)",
                session,
                geometry.vertex_count()
            ),
            DrawEvent::DrawCompleted { session, geometry } => {
                format!("Session {} completed a {}", session, geometry.kind())
            }
            DrawEvent::SessionEnded { session, reason } => {
                format!("Session {} ended: {:?}", session, reason)
            }
        }
    }
}

/// Feature store events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FeatureEvent {
    /// A feature was committed.
    Added {
        /// Assigned identity.
        id: FeatureId,
    },
    /// A feature was removed.
    Removed {
        /// Removed identity.
        id: FeatureId,
    },
    /// All features were removed.
    Cleared {
        /// Number of features removed.
        count: usize,
    },
    /// Features were exported.
    Exported {
        /// Number of features written.
        count: usize,
        /// Payload size in bytes.
        bytes: usize,
    },
}

impl FeatureEvent {
    /// Get a short description for logging
    pub fn description(&self) -> String {
        match self {
            FeatureEvent::Added { id } => format!("Feature {} added", id),
            FeatureEvent::Removed { id } => format!("Feature {} removed", id),
            FeatureEvent::Cleared { count } => format!("{} features cleared", count),
            FeatureEvent::Exported { count, bytes } => {
                format!("{} features exported ({} bytes)", count, bytes)
            }
        }
    }
}

/// Segment overlay events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OverlayEvent {
    /// Overlays were rebuilt for a session.
    Rebuilt {
        /// Session the overlays belong to.
        session: SessionId,
        /// Number of overlays now mounted.
        count: usize,
    },
    /// All overlays were removed.
    TornDown {
        /// Number of overlays removed.
        removed: usize,
    },
}

impl OverlayEvent {
    /// Get a short description for logging
    pub fn description(&self) -> String {
        match self {
            OverlayEvent::Rebuilt { session, count } => {
                format!("Session {} overlays rebuilt ({})", session, count)
            }
            OverlayEvent::TornDown { removed } => format!("{} overlays torn down", removed),
        }
    }
}

/// Map layer events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LayerEvent {
    /// The visible basemap changed.
    BasemapChanged {
        /// Key of the now visible basemap.
        key: String,
    },
    /// A district layer was toggled.
    DistrictToggled {
        /// District name.
        name: String,
        /// New checked state.
        checked: bool,
    },
}

impl LayerEvent {
    /// Get a short description for logging
    pub fn description(&self) -> String {
        match self {
            LayerEvent::BasemapChanged { key } => format!("Basemap changed to {}", key),
            LayerEvent::DistrictToggled { name, checked } => {
                format!("District {} {}", name, if *checked { "shown" } else { "hidden" })
            }
        }
    }
}
