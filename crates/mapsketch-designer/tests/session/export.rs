use mapsketch_core::{DrawTool, Geometry};
use mapsketch_designer::{GeoJson, MapSession};
use mapsketch_settings::{Config, ExportProjection};
use serde_json::Value;

use crate::common::*;

fn draw_line(map: &mut MapSession, length_m: f64) -> u64 {
    let a = origin();
    sketch(map, DrawTool::LineString, &[a, north_of(a, length_m)]);
    map.double_click().unwrap()
}

#[test]
fn test_clear_after_polygon() {
    let mut map = map();
    let a = origin();
    sketch(&mut map, DrawTool::Polygon, &[a, east_of(a, 50.0), north_of(a, 50.0)]);
    map.double_click().unwrap();
    assert_eq!(map.features().len(), 1);

    assert_eq!(map.clear_all(), 1);
    assert!(map.features().is_empty());
    assert!(map.overlays().is_empty());
}

#[test]
fn test_clear_abandons_drawing_in_progress() {
    let mut map = map();
    draw_line(&mut map, 10.0);
    let a = origin();
    sketch(&mut map, DrawTool::LineString, &[a, east_of(a, 30.0)]);
    assert_eq!(map.overlays().len(), 1);

    map.clear_all();
    assert!(map.overlays().is_empty());
    assert!(map.draw_session().unwrap().vertices().is_empty());
    assert!(map.features().is_empty());
}

#[test]
fn test_remove_unknown_feature() {
    let mut map = map();
    let id = draw_line(&mut map, 10.0);

    assert!(!map.remove_feature(id + 100));
    assert_eq!(map.features().len(), 1);
    assert!(map.features().get(id).is_some());

    assert!(map.remove_feature(id));
    assert!(map.features().is_empty());
}

#[test]
fn test_export_round_trip() {
    let mut map = map();
    let first = draw_line(&mut map, 100.0);
    map.select_tool(DrawTool::Point);
    let second = map.click(east_of(origin(), 5.0)).unwrap().unwrap();

    let json = map.export_geojson().unwrap();
    let doc: GeoJson = serde_json::from_str(&json).unwrap();
    let features = doc.features();
    assert_eq!(features.len(), 2);

    let ids: Vec<u64> = features
        .iter()
        .map(|f| match f {
            GeoJson::Feature { properties, .. } => properties["id"].as_u64().unwrap(),
            GeoJson::FeatureCollection { .. } => panic!("nested collection"),
        })
        .collect();
    assert_eq!(ids, vec![first, second]);

    let GeoJson::Feature { geometry, .. } = features[0] else {
        panic!("expected feature");
    };
    let parsed = geometry.to_geometry();
    let stored = &map.features().get(first).unwrap().geometry;
    assert_eq!(parsed.kind(), stored.kind());
    for (p, q) in parsed.vertices().iter().zip(stored.vertices()) {
        assert!((p.x - q.x).abs() < 1e-6 && (p.y - q.y).abs() < 1e-6);
    }
}

#[test]
fn test_exported_polygon_ring_is_closed() {
    let mut map = map();
    let a = origin();
    sketch(&mut map, DrawTool::Polygon, &[a, east_of(a, 50.0), north_of(a, 50.0)]);
    map.double_click().unwrap();

    let doc: Value = serde_json::from_str(&map.export_geojson().unwrap()).unwrap();
    let ring = doc["features"][0]["geometry"]["coordinates"][0]
        .as_array()
        .unwrap();
    assert_eq!(ring.len(), 4);
    assert_eq!(ring[0], ring[3]);
}

#[test]
fn test_export_to_dir_in_wgs84() {
    let mut config = Config::default();
    config.export.projection = ExportProjection::Wgs84;
    let mut map = MapSession::new(&config).unwrap();
    map.select_tool(DrawTool::Point);
    map.click_lon_lat(100.5, 13.7).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = map.export_to_dir(dir.path()).unwrap();
    assert_eq!(path.file_name().unwrap(), "features.geojson");

    let doc: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let coords = &doc["features"][0]["geometry"]["coordinates"];
    assert!((coords[0].as_f64().unwrap() - 100.5).abs() < 1e-9);
    assert!((coords[1].as_f64().unwrap() - 13.7).abs() < 1e-9);
}

#[test]
fn test_committed_feature_is_a_copy() {
    let mut map = map();
    let a = origin();
    map.select_tool(DrawTool::LineString);
    map.click(a).unwrap();
    map.click(north_of(a, 100.0)).unwrap();
    let id = map.double_click().unwrap();
    let before = map.features().get(id).unwrap().geometry.clone();

    // the next session starts from an empty sketch
    map.click(east_of(a, 10.0)).unwrap();
    assert_eq!(map.features().get(id).unwrap().geometry, before);
    assert!(matches!(before, Geometry::LineString(ref v) if v.len() == 2));
}

#[test]
fn test_summary_lists_features() {
    let mut map = map();
    map.select_tool(DrawTool::Point);
    map.click(mapsketch_core::Point::new(1.0, 2.0)).unwrap();
    assert_eq!(map.features().summary(), vec!["Point: [1.0,2.0]".to_string()]);
}
