use mapsketch_core::{Geometry, LengthFormat, Point};
use mapsketch_designer::{build_overlays, OverlayManager};
use proptest::prelude::*;

fn chain() -> impl Strategy<Value = Vec<Point>> {
    prop::collection::vec((-2.0e7..2.0e7f64, -2.0e7..2.0e7f64), 0..24)
        .prop_map(|v| v.into_iter().map(Point::from).collect())
}

proptest! {
    #[test]
    fn overlay_count_is_vertex_count_minus_one(vertices in chain(), polygon in any::<bool>()) {
        let n = vertices.len();
        let geometry = if polygon {
            Geometry::Polygon(vertices)
        } else {
            Geometry::LineString(vertices)
        };
        let overlays = build_overlays(&geometry, &LengthFormat::default());
        prop_assert_eq!(overlays.len(), n.saturating_sub(1));
        for (i, o) in overlays.iter().enumerate() {
            prop_assert_eq!(o.index, i + 1);
            prop_assert!(o.length_m.is_finite() && o.length_m >= 0.0);
            prop_assert!(!o.editing);
        }
    }

    #[test]
    fn teardown_always_empties(vertices in chain()) {
        let manager = OverlayManager::new(LengthFormat::default());
        manager.rebuild(&Geometry::LineString(vertices));
        manager.teardown();
        prop_assert!(manager.is_empty());
        prop_assert_eq!(manager.teardown(), 0);
    }
}
