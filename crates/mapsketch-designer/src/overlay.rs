//! Segment measurement overlays.
//!
//! One [`SegmentOverlay`] is shown per adjacent vertex pair of the sketch
//! being drawn: a label at the segment midpoint, rotated to the segment's
//! screen angle, showing its great-circle length. Overlays are rebuilt from
//! scratch on every geometry change; there is no incremental patching, so an
//! overlay index always matches the current vertex list.
//!
//! The [`OverlayManager`] subscribes to the bus for the lifetime of a single
//! draw session and tears everything down when that session ends.

use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use serde::Serialize;

use mapsketch_core::{
    format_area, DrawEvent, EventBus, EventCategory, EventFilter, Geometry, LengthFormat,
    LengthUnit, MapEvent, OverlayEvent, Point, SessionId, SubscriptionId,
};

use crate::measure;

/// A length label anchored to one segment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentOverlay {
    /// Index of the segment's far vertex; the segment runs from `index - 1` to `index`
    pub index: usize,
    pub start: Point,
    pub end: Point,
    /// Label anchor, the projected midpoint
    pub position: Point,
    /// Great-circle length in metres
    pub length_m: f64,
    /// Rendered label, e.g. `"812.4 m"`
    pub display: String,
    pub unit: LengthUnit,
    /// Label rotation in degrees, `atan2(dy, dx)` of the projected segment
    pub rotation_deg: f64,
    /// The label is currently an inline edit field
    pub editing: bool,
}

/// Totals shown alongside the segment labels
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeasurementSummary {
    /// Length of the open chain in metres
    pub total_length_m: f64,
    /// Enclosed area for polygons with at least three vertices
    pub area_m2: Option<f64>,
}

impl MeasurementSummary {
    pub fn of(geometry: &Geometry) -> Self {
        let vertices = geometry.vertices();
        let area_m2 = match geometry {
            Geometry::Polygon(ring) if ring.len() >= 3 => Some(measure::ring_area(ring)),
            _ => None,
        };
        Self {
            total_length_m: measure::path_length(vertices),
            area_m2,
        }
    }

    pub fn display(&self, format: &LengthFormat) -> String {
        match self.area_m2 {
            Some(area) => format!("{} / {}", format.format(self.total_length_m), format_area(area)),
            None => format.format(self.total_length_m),
        }
    }
}

/// Build the overlays of one geometry
///
/// Yields `max(0, n - 1)` overlays for `n` vertices. The closing edge of a
/// polygon is not measured.
pub fn build_overlays(geometry: &Geometry, format: &LengthFormat) -> Vec<SegmentOverlay> {
    geometry
        .vertices()
        .windows(2)
        .enumerate()
        .map(|(i, pair)| {
            let (start, end) = (pair[0], pair[1]);
            let length_m = measure::segment_length(start, end);
            SegmentOverlay {
                index: i + 1,
                start,
                end,
                position: measure::midpoint(start, end),
                length_m,
                display: format.format(length_m),
                unit: format.unit_for(length_m),
                rotation_deg: measure::bearing_degrees(start, end),
                editing: false,
            }
        })
        .collect()
}

#[derive(Debug, Default)]
struct OverlayState {
    overlays: Vec<SegmentOverlay>,
    summary: Option<MeasurementSummary>,
}

impl OverlayState {
    fn rebuild(&mut self, geometry: &Geometry, format: &LengthFormat) -> usize {
        self.overlays = build_overlays(geometry, format);
        self.summary = Some(MeasurementSummary::of(geometry));
        self.overlays.len()
    }

    fn clear(&mut self) -> usize {
        self.summary = None;
        std::mem::take(&mut self.overlays).len()
    }
}

/// Owns the overlays of the active draw session
#[derive(Debug)]
pub struct OverlayManager {
    state: Arc<RwLock<OverlayState>>,
    format: LengthFormat,
    attached: Option<(SessionId, SubscriptionId)>,
}

impl OverlayManager {
    pub fn new(format: LengthFormat) -> Self {
        Self {
            state: Arc::new(RwLock::new(OverlayState::default())),
            format,
            attached: None,
        }
    }

    pub fn format(&self) -> &LengthFormat {
        &self.format
    }

    /// Session the manager is currently subscribed for
    pub fn attached_session(&self) -> Option<SessionId> {
        self.attached.map(|(session, _)| session)
    }

    /// Subscribe to geometry changes of `session`
    ///
    /// Any previous subscription is dropped first. Events of other sessions
    /// are ignored. The handler holds the bus weakly.
    pub fn attach(&mut self, bus: &Arc<EventBus>, session: SessionId) {
        self.detach(bus);

        let state = Arc::clone(&self.state);
        let format = self.format;
        let weak: Weak<EventBus> = Arc::downgrade(bus);

        let subscription = bus.subscribe(
            EventFilter::Categories(vec![EventCategory::Draw]),
            move |event| {
                let follow_up = match event {
                    MapEvent::Draw(DrawEvent::GeometryChanged {
                        session: s,
                        geometry,
                    }) if *s == session => {
                        let count = state.write().rebuild(geometry, &format);
                        OverlayEvent::Rebuilt { session, count }
                    }
                    MapEvent::Draw(DrawEvent::SessionEnded { session: s, .. }) if *s == session => {
                        let removed = state.write().clear();
                        OverlayEvent::TornDown { removed }
                    }
                    _ => return,
                };
                if let Some(bus) = weak.upgrade() {
                    bus.publish(MapEvent::Overlay(follow_up));
                }
            },
        );

        tracing::debug!("Overlays attached to session {}", session);
        self.attached = Some((session, subscription));
    }

    /// Tear down and unsubscribe
    pub fn detach(&mut self, bus: &EventBus) {
        self.teardown();
        if let Some((session, subscription)) = self.attached.take() {
            bus.unsubscribe(subscription);
            tracing::debug!("Overlays detached from session {}", session);
        }
    }

    /// Remove every overlay. Safe to call repeatedly; returns how many were removed.
    pub fn teardown(&self) -> usize {
        self.state.write().clear()
    }

    /// Rebuild from a geometry directly, bypassing the bus
    pub fn rebuild(&self, geometry: &Geometry) -> usize {
        self.state.write().rebuild(geometry, &self.format)
    }

    /// Snapshot of the mounted overlays
    pub fn overlays(&self) -> Vec<SegmentOverlay> {
        self.state.read().overlays.clone()
    }

    /// Overlay of the segment ending at vertex `index`
    pub fn overlay(&self, index: usize) -> Option<SegmentOverlay> {
        self.state
            .read()
            .overlays
            .iter()
            .find(|o| o.index == index)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.state.read().overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn summary(&self) -> Option<MeasurementSummary> {
        self.state.read().summary
    }

    /// Flag an overlay as being edited
    ///
    /// Returns false when no overlay ends at `index`.
    pub fn set_editing(&self, index: usize, editing: bool) -> bool {
        let mut state = self.state.write();
        match state.overlays.iter_mut().find(|o| o.index == index) {
            Some(overlay) => {
                overlay.editing = editing;
                true
            }
            None => false,
        }
    }
}
