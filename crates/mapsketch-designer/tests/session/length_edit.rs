use mapsketch_core::{DrawTool, EditError, GeometryError};
use mapsketch_designer::{measure, EditOutcome};

use crate::common::*;

#[test]
fn test_edit_km_segment_to_half() {
    let mut map = map();
    let a = origin();
    let b = north_of(a, 1000.0);
    sketch(&mut map, DrawTool::LineString, &[a, b]);

    let edit = map.begin_length_edit(1).unwrap();
    assert_eq!(edit.text(), "1.00");
    assert!(map.overlays()[0].editing);

    let outcome = map.commit_length_edit(edit, "0.5");
    let EditOutcome::Applied { vertex, previous, length_m, .. } = outcome else {
        panic!("edit should apply: {:?}", outcome);
    };
    assert_eq!(previous, b);
    assert!((length_m - 500.0).abs() < 1e-6);
    assert!((measure::segment_length(a, vertex) - 500.0).abs() < 1e-6);
    // same bearing: the segment still points due north
    assert!((vertex.x - a.x).abs() < 1e-6);

    let overlays = map.overlays();
    assert_eq!(overlays.len(), 1);
    assert_eq!(overlays[0].display, "500.0 m");
    assert!(!overlays[0].editing);
    assert_eq!(map.draw_session().unwrap().vertices()[1], vertex);
}

#[test]
fn test_edit_metre_segment() {
    let mut map = map();
    let a = origin();
    sketch(&mut map, DrawTool::LineString, &[a, north_of(a, 800.0)]);

    let edit = map.begin_length_edit(1).unwrap();
    assert_eq!(edit.text(), "800.0");
    assert!(map.commit_length_edit(edit, "500").is_applied());
    assert_eq!(map.overlays()[0].display, "500.0 m");
}

#[test]
fn test_edit_can_cross_into_km() {
    let mut map = map();
    let a = measure::from_lon_lat(100.5, 13.7);
    sketch(&mut map, DrawTool::LineString, &[a, measure::destination(a, 45.0, 300.0)]);

    let edit = map.begin_length_edit(1).unwrap();
    assert!(map.commit_length_edit(edit, "1500").is_applied());
    assert_eq!(map.overlays()[0].display, "1.50 km");
}

#[test]
fn test_invalid_input_reverts_label() {
    let mut map = map();
    let a = origin();
    let b = north_of(a, 120.0);
    sketch(&mut map, DrawTool::LineString, &[a, b]);

    for text in ["abc", "", "0", "-10"] {
        let edit = map.begin_length_edit(1).unwrap();
        let outcome = map.commit_length_edit(edit, text);
        assert!(
            matches!(&outcome, EditOutcome::Reverted { label, reason: EditError::InvalidInput { .. } } if label == "120.0 m"),
            "{text:?} gave {outcome:?}"
        );
        assert!(!map.overlays()[0].editing);
    }
    assert_eq!(map.draw_session().unwrap().vertices()[1], b);
}

#[test]
fn test_same_length_edit_keeps_vertex() {
    let mut map = map();
    let a = origin();
    let b = north_of(a, 250.0);
    sketch(&mut map, DrawTool::LineString, &[a, b]);

    let length = map.overlays()[0].length_m;
    let edit = map.begin_length_edit(1).unwrap();
    let outcome = map.commit_length_edit(edit, &length.to_string());
    assert!(matches!(outcome, EditOutcome::Applied { vertex, .. } if vertex == b));
}

#[test]
fn test_long_edit_at_high_latitude_reports_measured_length() {
    let mut map = map();
    let a = measure::from_lon_lat(10.0, 60.0);
    sketch(&mut map, DrawTool::LineString, &[a, measure::destination(a, 45.0, 1000.0)]);

    let edit = map.begin_length_edit(1).unwrap();
    assert_eq!(edit.text(), "1.00");
    let outcome = map.commit_length_edit(edit, "1500");
    let EditOutcome::Applied { vertex, length_m, .. } = outcome else {
        panic!("edit should apply: {:?}", outcome);
    };
    let actual = measure::segment_length(a, vertex);
    assert_eq!(length_m, actual);
    assert!((actual - 1_500_000.0).abs() < 1e-5, "got {}", actual);
    assert!(vertex.y.abs() <= measure::MERCATOR_EXTENT_M);
    assert_eq!(map.overlays()[0].display, "1500.00 km");
}

#[test]
fn test_unreachable_length_reverts() {
    let mut map = map();
    let a = origin();
    let b = east_of(a, 1000.0);
    sketch(&mut map, DrawTool::LineString, &[a, b]);

    let edit = map.begin_length_edit(1).unwrap();
    let outcome = map.commit_length_edit(edit, "30000");
    assert!(
        matches!(
            &outcome,
            EditOutcome::Reverted {
                label,
                reason: EditError::Geometry(GeometryError::UnreachableLength { .. }),
            } if label == "1.00 km"
        ),
        "got {outcome:?}"
    );
    assert_eq!(map.draw_session().unwrap().vertices(), &[a, b]);
    assert_eq!(map.overlays()[0].display, "1.00 km");
    assert!(!map.overlays()[0].editing);
}

#[test]
fn test_degenerate_segment_is_not_rescaled() {
    let mut map = map();
    let a = origin();
    sketch(&mut map, DrawTool::LineString, &[a, a]);

    let edit = map.begin_length_edit(1).unwrap();
    let outcome = map.commit_length_edit(edit, "10");
    assert!(matches!(
        outcome,
        EditOutcome::Reverted {
            reason: EditError::Geometry(GeometryError::DegenerateSegment { .. }),
            ..
        }
    ));
    assert_eq!(map.draw_session().unwrap().vertices(), &[a, a]);
}

#[test]
fn test_edit_from_ended_session_is_stale() {
    let mut map = map();
    let a = origin();
    sketch(&mut map, DrawTool::LineString, &[a, north_of(a, 100.0)]);
    let edit = map.begin_length_edit(1).unwrap();

    map.select_tool(DrawTool::Polygon);
    let outcome = map.commit_length_edit(edit, "50");
    assert!(matches!(
        outcome,
        EditOutcome::Reverted {
            reason: EditError::StaleSession { .. },
            ..
        }
    ));
}

#[test]
fn test_edits_on_different_segments() {
    let mut map = map();
    let a = origin();
    let b = north_of(a, 100.0);
    let c = north_of(b, 100.0);
    sketch(&mut map, DrawTool::LineString, &[a, b, c]);

    let first = map.begin_length_edit(1).unwrap();
    let second = map.begin_length_edit(2).unwrap();

    assert!(map.commit_length_edit(second, "300").is_applied());
    assert!(map.commit_length_edit(first, "200").is_applied());

    let v = map.draw_session().unwrap().vertices().to_vec();
    assert!((measure::segment_length(v[0], v[1]) - 200.0).abs() < 1e-6);
    // moving vertex 1 changes the second segment, which is then measured afresh
    assert_eq!(map.overlays().len(), 2);
    assert_eq!(map.overlays()[0].display, "200.0 m");
}

#[test]
fn test_polygon_segment_edit() {
    let mut map = map();
    let a = origin();
    let b = east_of(a, 100.0);
    let c = north_of(b, 100.0);
    sketch(&mut map, DrawTool::Polygon, &[a, b, c]);

    let edit = map.begin_length_edit(2).unwrap();
    assert!(map.commit_length_edit(edit, "40").is_applied());

    let id = map.double_click().unwrap();
    let ring = map.features().get(id).unwrap().geometry.vertices().to_vec();
    assert!((measure::segment_length(ring[1], ring[2]) - 40.0).abs() < 1e-6);
}
