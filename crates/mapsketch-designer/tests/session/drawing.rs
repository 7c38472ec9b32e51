use mapsketch_core::{
    DrawError, DrawTool, Error, EventBus, EventBusConfig, Geometry, MapEvent, OverlayEvent,
};
use mapsketch_designer::MapSession;
use mapsketch_settings::Config;
use std::sync::Arc;

use crate::common::*;

#[test]
fn test_one_kilometre_line_is_labelled_in_km() {
    let mut map = map();
    let a = origin();
    sketch(&mut map, DrawTool::LineString, &[a, north_of(a, 1000.0)]);

    let overlays = map.overlays();
    assert_eq!(overlays.len(), 1);
    assert_eq!(overlays[0].display, "1.00 km");
    assert_eq!(overlays[0].index, 1);
}

#[test]
fn test_overlays_track_each_click() {
    let mut map = map();
    map.select_tool(DrawTool::LineString);
    let a = origin();
    let b = north_of(a, 250.0);
    let c = east_of(b, 400.0);

    map.click(a).unwrap();
    assert_eq!(map.overlays().len(), 0);
    map.click(b).unwrap();
    assert_eq!(map.overlays().len(), 1);
    map.click(c).unwrap();

    let labels: Vec<String> = map.overlays().into_iter().map(|o| o.display).collect();
    assert_eq!(labels, vec!["250.0 m", "400.0 m"]);

    let summary = map.measurement().unwrap();
    assert!((summary.total_length_m - 650.0).abs() < 1e-6);
    assert_eq!(summary.area_m2, None);
}

#[test]
fn test_rubber_band_segment_is_measured() {
    let mut map = map();
    let a = origin();
    sketch(&mut map, DrawTool::LineString, &[a]);

    map.pointer_move(north_of(a, 100.0)).unwrap();
    let overlays = map.overlays();
    assert_eq!(overlays.len(), 1);
    assert_eq!(overlays[0].display, "100.0 m");

    map.pointer_move(north_of(a, 300.0)).unwrap();
    assert_eq!(map.overlays()[0].display, "300.0 m");
    assert_eq!(map.draw_session().unwrap().vertices().len(), 1);
}

#[test]
fn test_switching_tool_discards_sketch() {
    let mut map = map();
    let a = origin();
    sketch(&mut map, DrawTool::LineString, &[a, north_of(a, 100.0), east_of(a, 100.0)]);
    assert_eq!(map.overlays().len(), 2);

    map.select_tool(DrawTool::Polygon);
    assert!(map.features().is_empty());
    assert!(map.overlays().is_empty());
    assert_eq!(map.active_tool(), DrawTool::Polygon);
    assert!(map.draw_session().unwrap().vertices().is_empty());
}

#[test]
fn test_double_click_with_one_vertex_is_refused() {
    let mut map = map();
    sketch(&mut map, DrawTool::LineString, &[origin()]);

    assert!(matches!(
        map.double_click(),
        Err(Error::Draw(DrawError::TooFewVertices { .. }))
    ));
    assert!(map.features().is_empty());
    assert_eq!(map.draw_session().unwrap().vertices().len(), 1);
}

#[test]
fn test_polygon_completion() {
    let mut map = map();
    let a = origin();
    let b = east_of(a, 100.0);
    let c = north_of(b, 100.0);
    sketch(&mut map, DrawTool::Polygon, &[a, b, c]);

    let summary = map.measurement().unwrap();
    assert!(summary.area_m2.unwrap() > 4_900.0);

    let id = map.double_click().unwrap();
    let feature = map.features().get(id).unwrap();
    assert!(matches!(&feature.geometry, Geometry::Polygon(ring) if ring.len() == 3));
    assert!(map.overlays().is_empty());
    // tool stays armed for the next polygon
    assert_eq!(map.active_tool(), DrawTool::Polygon);
}

#[test]
fn test_point_tool_commits_each_click() {
    let mut map = map();
    map.select_tool(DrawTool::Point);
    let first = map.click(origin()).unwrap();
    let second = map.click(north_of(origin(), 10.0)).unwrap();
    assert_eq!(first, Some(1));
    assert_eq!(second, Some(2));
    assert!(map.overlays().is_empty());
}

#[test]
fn test_escape_keeps_tool() {
    let mut map = map();
    let a = origin();
    sketch(&mut map, DrawTool::LineString, &[a, north_of(a, 50.0)]);

    assert!(map.cancel_drawing());
    assert!(map.overlays().is_empty());
    assert_eq!(map.active_tool(), DrawTool::LineString);
    assert!(map.features().is_empty());
}

#[test]
fn test_overlay_events_are_published() {
    let bus = Arc::new(EventBus::with_config(EventBusConfig {
        enable_history: true,
        ..Default::default()
    }));
    let mut map = MapSession::with_bus(&Config::default(), bus.clone()).unwrap();
    let a = origin();
    sketch(&mut map, DrawTool::LineString, &[a, north_of(a, 10.0)]);
    map.cancel_drawing();

    let overlay_events: Vec<OverlayEvent> = bus
        .history(None)
        .into_iter()
        .filter_map(|e| match e {
            MapEvent::Overlay(o) => Some(o),
            _ => None,
        })
        .collect();
    assert!(matches!(
        overlay_events.as_slice(),
        [
            OverlayEvent::Rebuilt { count: 0, .. },
            OverlayEvent::Rebuilt { count: 1, .. },
            OverlayEvent::TornDown { removed: 1 }
        ]
    ));
}

#[test]
fn test_sessions_are_isolated() {
    let mut first = map();
    let mut second = map();
    let a = origin();
    sketch(&mut first, DrawTool::LineString, &[a, north_of(a, 10.0)]);
    sketch(&mut second, DrawTool::LineString, &[a]);

    assert_eq!(first.overlays().len(), 1);
    assert!(second.overlays().is_empty());
}
