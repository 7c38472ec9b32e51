//! Map editor session.
//!
//! `MapSession` owns everything one map editor instance needs: the event
//! bus, the draw controller, the overlay manager, the feature store and the
//! map layers. Nothing is global; two sessions never observe each other.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use mapsketch_core::{
    DrawError, DrawTool, EditError, EventBus, FeatureEvent, FeatureId, Geometry, LayerEvent,
    MapEvent, Point, Result, SessionEndReason, SessionId,
};
use mapsketch_settings::{Config, ExportSettings, ViewSettings};

use crate::draw_session::{DrawController, DrawSession};
use crate::feature_store::FeatureStore;
use crate::layers::{BasemapCatalog, DistrictLayers};
use crate::length_editor::{EditOutcome, LengthEdit, LengthEditor, ResolvedEdit};
use crate::measure;
use crate::overlay::{MeasurementSummary, OverlayManager, SegmentOverlay};

#[derive(Debug)]
pub struct MapSession {
    bus: Arc<EventBus>,
    draw: DrawController,
    overlays: OverlayManager,
    editor: LengthEditor,
    store: FeatureStore,
    basemaps: BasemapCatalog,
    districts: DistrictLayers,
    export: ExportSettings,
    view: ViewSettings,
}

impl MapSession {
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_bus(config, Arc::new(EventBus::new()))
    }

    /// Build a session on an existing bus, e.g. one with history enabled
    pub fn with_bus(config: &Config, bus: Arc<EventBus>) -> Result<Self> {
        Ok(Self {
            draw: DrawController::new(
                Arc::clone(&bus),
                config.drawing.keep_tool_after_complete,
            ),
            overlays: OverlayManager::new(config.measurement.length_format()),
            editor: LengthEditor::new(config.measurement.min_segment_length_m),
            store: FeatureStore::new(),
            basemaps: BasemapCatalog::from_settings(&config.basemap)?,
            districts: DistrictLayers::default(),
            export: config.export.clone(),
            view: config.view.clone(),
            bus,
        })
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub fn view(&self) -> &ViewSettings {
        &self.view
    }

    // ----- drawing -----

    pub fn active_tool(&self) -> DrawTool {
        self.draw.tool()
    }

    pub fn is_drawing(&self) -> bool {
        self.draw.is_drawing()
    }

    pub fn active_session(&self) -> Option<SessionId> {
        self.draw.active_session()
    }

    pub fn draw_session(&self) -> Option<&DrawSession> {
        self.draw.session()
    }

    /// The sketch being drawn, rubber-band vertex included
    pub fn sketch(&self) -> Option<Geometry> {
        self.draw.session().and_then(DrawSession::sketch)
    }

    pub fn select_tool(&mut self, tool: DrawTool) {
        self.draw.select_tool(tool);
        self.sync_overlays();
        tracing::info!("Tool selected: {}", tool);
    }

    /// Single click on the map
    ///
    /// Returns the new feature id when the click completed a drawing.
    pub fn click(&mut self, p: Point) -> Result<Option<FeatureId>> {
        let finished = self.draw.add_vertex(p);
        let id = match finished {
            Ok(Some(geometry)) => Some(self.commit(geometry)?),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Click ignored: {}", e);
                return Err(e.into());
            }
        };
        self.sync_overlays();
        Ok(id)
    }

    pub fn click_lon_lat(&mut self, lon: f64, lat: f64) -> Result<Option<FeatureId>> {
        self.click(measure::from_lon_lat(lon, lat))
    }

    /// Pointer moved over the map
    pub fn pointer_move(&mut self, p: Point) -> Result<()> {
        match self.draw.move_pointer(p) {
            Ok(()) | Err(DrawError::NotDrawing) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Double-click or Enter: finish the drawing and commit it
    pub fn double_click(&mut self) -> Result<FeatureId> {
        let geometry = self.draw.finish().map_err(|e| {
            tracing::warn!("Finish refused: {}", e);
            e
        })?;
        let id = self.commit(geometry)?;
        self.sync_overlays();
        Ok(id)
    }

    /// Escape: discard the sketch, keep the tool armed
    pub fn cancel_drawing(&mut self) -> bool {
        let cancelled = self.draw.cancel(SessionEndReason::Cancelled);
        self.sync_overlays();
        cancelled
    }

    fn commit(&mut self, geometry: Geometry) -> Result<FeatureId> {
        let id = self.store.commit(geometry)?;
        self.bus.publish(MapEvent::Feature(FeatureEvent::Added { id }));
        Ok(id)
    }

    /// Keep the overlay subscription bound to the active draw session
    fn sync_overlays(&mut self) {
        let active = self.draw.active_session();
        if self.overlays.attached_session() == active {
            return;
        }
        self.overlays.detach(&self.bus);
        if let Some(session) = active {
            self.overlays.attach(&self.bus, session);
        }
    }

    // ----- measurement -----

    pub fn overlays(&self) -> Vec<SegmentOverlay> {
        self.overlays.overlays()
    }

    pub fn overlay_manager(&self) -> &OverlayManager {
        &self.overlays
    }

    pub fn measurement(&self) -> Option<MeasurementSummary> {
        self.overlays.summary()
    }

    /// Pointer position as `"lon, lat"`
    pub fn coordinate_readout(&self, p: Point) -> String {
        measure::format_coordinate(p)
    }

    /// Click on a segment label: open it for editing
    pub fn begin_length_edit(&mut self, index: usize) -> Result<LengthEdit> {
        let session = self.draw.session().ok_or(DrawError::NotDrawing)?;
        if index == 0 || index >= session.vertices().len() {
            return Err(EditError::SegmentNotEditable { index }.into());
        }
        let overlay = self
            .overlays
            .overlay(index)
            .ok_or(EditError::SegmentNotEditable { index })?;
        if overlay.editing {
            return Err(EditError::AlreadyEditing { index }.into());
        }

        let edit = LengthEdit::begin(session.id(), &overlay, self.overlays.format());
        self.overlays.set_editing(index, true);
        tracing::debug!("Editing segment {} ({})", index, overlay.display);
        Ok(edit)
    }

    /// Enter or blur: apply the typed length, or revert the label
    pub fn commit_length_edit(&mut self, edit: LengthEdit, text: &str) -> EditOutcome {
        match self.apply_length_edit(&edit, text) {
            Ok(resolved) => {
                tracing::info!(
                    "Segment {} set to {}",
                    resolved.index,
                    self.overlays.format().format(resolved.length_m)
                );
                EditOutcome::Applied {
                    index: resolved.index,
                    previous: resolved.previous,
                    vertex: resolved.vertex,
                    length_m: resolved.length_m,
                }
            }
            Err(reason) => {
                tracing::debug!("Length edit reverted: {}", reason);
                self.release_edit(&edit);
                EditOutcome::Reverted {
                    label: edit.label().to_string(),
                    reason,
                }
            }
        }
    }

    /// Escape inside the edit field
    pub fn cancel_length_edit(&mut self, edit: LengthEdit) {
        self.release_edit(&edit);
    }

    fn apply_length_edit(
        &mut self,
        edit: &LengthEdit,
        text: &str,
    ) -> std::result::Result<ResolvedEdit, EditError> {
        let active = self.draw.active_session();
        let stale = || EditError::StaleSession {
            edit_session: edit.session(),
            active_session: active,
        };
        let session = self
            .draw
            .session()
            .filter(|s| s.id() == edit.session())
            .ok_or_else(stale)?;

        let resolved = self.editor.resolve(edit, text, session.vertices())?;
        self.draw
            .set_vertex(resolved.index, resolved.vertex)
            .map_err(|_| EditError::SegmentNotEditable {
                index: resolved.index,
            })?;
        Ok(resolved)
    }

    fn release_edit(&self, edit: &LengthEdit) {
        if self.draw.active_session() == Some(edit.session()) {
            self.overlays.set_editing(edit.index(), false);
        }
    }

    // ----- features -----

    pub fn features(&self) -> &FeatureStore {
        &self.store
    }

    /// Remove one feature; unknown ids are ignored
    pub fn remove_feature(&mut self, id: FeatureId) -> bool {
        let removed = self.store.remove(id).is_some();
        if removed {
            self.bus.publish(MapEvent::Feature(FeatureEvent::Removed { id }));
        }
        removed
    }

    /// Clear every feature, abandoning any drawing in progress
    pub fn clear_all(&mut self) -> usize {
        self.draw.cancel(SessionEndReason::Cleared);
        self.sync_overlays();
        self.overlays.teardown();

        let count = self.store.clear();
        self.bus
            .publish(MapEvent::Feature(FeatureEvent::Cleared { count }));
        tracing::info!("Cleared {} features", count);
        count
    }

    pub fn export_geojson(&self) -> Result<String> {
        let json = self
            .store
            .export_geojson(self.export.projection, self.export.pretty)?;
        self.bus.publish(MapEvent::Feature(FeatureEvent::Exported {
            count: self.store.len(),
            bytes: json.len(),
        }));
        Ok(json)
    }

    /// Write the export artifact into `dir`
    pub fn export_to_dir(&self, dir: &Path) -> anyhow::Result<PathBuf> {
        let path = self.store.export_to_file(dir, &self.export)?;
        self.bus.publish(MapEvent::Feature(FeatureEvent::Exported {
            count: self.store.len(),
            bytes: std::fs::metadata(&path).map(|m| m.len() as usize).unwrap_or(0),
        }));
        Ok(path)
    }

    // ----- layers -----

    pub fn basemaps(&self) -> &BasemapCatalog {
        &self.basemaps
    }

    pub fn switch_basemap(&mut self, key: &str) -> Result<()> {
        self.basemaps.switch(key)?;
        self.bus.publish(MapEvent::Layer(LayerEvent::BasemapChanged {
            key: key.to_string(),
        }));
        Ok(())
    }

    pub fn districts(&self) -> &DistrictLayers {
        &self.districts
    }

    pub fn districts_mut(&mut self) -> &mut DistrictLayers {
        &mut self.districts
    }

    pub fn toggle_district(&mut self, name: &str) -> Result<bool> {
        let checked = self.districts.toggle(name)?;
        self.bus.publish(MapEvent::Layer(LayerEvent::DistrictToggled {
            name: name.to_string(),
            checked,
        }));
        Ok(checked)
    }
}
