use mapsketch_designer::{District, Parcel};
use serde_json::{json, Map};

use crate::common::*;

#[test]
fn test_basemap_switch_and_tiles() {
    let mut map = map();
    assert_eq!(map.basemaps().active().key, "osm");

    map.switch_basemap("esri").unwrap();
    assert_eq!(
        map.basemaps().tile_url(4, 12, 7),
        "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/4/7/12"
    );
    assert!(map.switch_basemap("unknown").is_err());
    assert_eq!(map.basemaps().active().key, "esri");
}

#[test]
fn test_district_toggle_through_session() {
    let mut map = map();
    map.districts_mut()
        .set_parcels("missing", Vec::new())
        .unwrap_err();

    *map.districts_mut() = mapsketch_designer::DistrictLayers::new(vec![District::new(
        "silom",
        "Silom",
        "#aa00aa",
    )]);
    map.districts_mut()
        .set_parcels(
            "silom",
            vec![Parcel {
                geometry: json!({"type": "Point", "coordinates": [0.0, 0.0]}),
                properties: Map::new(),
            }],
        )
        .unwrap();

    assert!(map.districts().visible_layers().is_empty());
    assert!(map.toggle_district("silom").unwrap());
    assert_eq!(map.districts().visible_layers().len(), 1);
    assert!(!map.toggle_district("silom").unwrap());
}
