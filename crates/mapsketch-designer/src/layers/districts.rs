//! District parcel overlays.
//!
//! Each district is a toggleable vector layer of land parcels. Parcels arrive
//! as raw GeoJSON geometries with free-form properties; the layer only adds
//! styling and tags every parcel with its district.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use mapsketch_core::LayerError;

/// Stroke drawn around every parcel
pub const PARCEL_STROKE: &str = "#ffffff";

/// One land parcel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parcel {
    /// GeoJSON geometry object
    pub geometry: Value,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct District {
    pub name: String,
    pub display_name: String,
    /// Base colour, `#rrggbb`
    pub color: String,
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub loading: bool,
    #[serde(default)]
    pub parcels: Vec<Parcel>,
}

impl District {
    pub fn new(name: &str, display_name: &str, color: &str) -> Self {
        Self {
            name: name.to_string(),
            display_name: display_name.to_string(),
            color: color.to_string(),
            checked: false,
            loading: false,
            parcels: Vec::new(),
        }
    }
}

/// Style of a parcel layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParcelStyle {
    /// Fill colour with 50% alpha, `#rrggbb80`
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f64,
}

/// A renderable district layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistrictLayer {
    pub name: String,
    pub style: ParcelStyle,
    /// FeatureCollection of the district's parcels
    pub collection: Value,
}

#[derive(Debug, Clone, Default)]
pub struct DistrictLayers {
    districts: Vec<District>,
}

impl DistrictLayers {
    pub fn new(districts: Vec<District>) -> Self {
        Self { districts }
    }

    /// Parse a JSON array of districts
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn districts(&self) -> &[District] {
        &self.districts
    }

    pub fn get(&self, name: &str) -> Option<&District> {
        self.districts.iter().find(|d| d.name == name)
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut District, LayerError> {
        self.districts
            .iter_mut()
            .find(|d| d.name == name)
            .ok_or_else(|| LayerError::UnknownDistrict {
                name: name.to_string(),
            })
    }

    /// Flip a district's visibility and return the new state
    pub fn toggle(&mut self, name: &str) -> Result<bool, LayerError> {
        let district = self.get_mut(name)?;
        district.checked = !district.checked;
        Ok(district.checked)
    }

    /// Replace a district's parcels once they have loaded
    pub fn set_parcels(&mut self, name: &str, parcels: Vec<Parcel>) -> Result<(), LayerError> {
        let district = self.get_mut(name)?;
        district.parcels = parcels;
        district.loading = false;
        tracing::debug!("District {} loaded {} parcels", name, district.parcels.len());
        Ok(())
    }

    pub fn set_loading(&mut self, name: &str, loading: bool) -> Result<(), LayerError> {
        self.get_mut(name)?.loading = loading;
        Ok(())
    }

    /// Layers to render: checked districts that have parcels
    pub fn visible_layers(&self) -> Vec<DistrictLayer> {
        self.districts
            .iter()
            .filter(|d| d.checked && !d.parcels.is_empty())
            .map(|d| DistrictLayer {
                name: d.name.clone(),
                style: ParcelStyle {
                    fill: format!("{}80", d.color),
                    stroke: PARCEL_STROKE.to_string(),
                    stroke_width: 1.0,
                },
                collection: parcel_collection(d),
            })
            .collect()
    }
}

fn parcel_collection(district: &District) -> Value {
    let features: Vec<Value> = district
        .parcels
        .iter()
        .map(|parcel| {
            let mut properties = parcel.properties.clone();
            properties.insert("districtName".to_string(), Value::from(district.name.clone()));
            json!({
                "type": "Feature",
                "geometry": parcel.geometry,
                "properties": properties,
            })
        })
        .collect();

    json!({ "type": "FeatureCollection", "features": features })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parcel(owner: &str) -> Parcel {
        let mut properties = Map::new();
        properties.insert("owner".to_string(), Value::from(owner));
        Parcel {
            geometry: json!({
                "type": "Polygon",
                "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
            }),
            properties,
        }
    }

    fn layers() -> DistrictLayers {
        DistrictLayers::new(vec![
            District::new("bang_rak", "Bang Rak", "#ff8800"),
            District::new("pathum_wan", "Pathum Wan", "#0088ff"),
        ])
    }

    #[test]
    fn test_toggle() {
        let mut layers = layers();
        assert_eq!(layers.toggle("bang_rak"), Ok(true));
        assert_eq!(layers.toggle("bang_rak"), Ok(false));
        assert!(matches!(
            layers.toggle("nowhere"),
            Err(LayerError::UnknownDistrict { .. })
        ));
    }

    #[test]
    fn test_only_checked_districts_with_parcels_render() {
        let mut layers = layers();
        layers.set_loading("bang_rak", true).unwrap();
        layers.set_parcels("bang_rak", vec![parcel("a"), parcel("b")]).unwrap();
        assert!(!layers.get("bang_rak").unwrap().loading);
        assert!(layers.visible_layers().is_empty());

        layers.toggle("bang_rak").unwrap();
        layers.toggle("pathum_wan").unwrap();
        let visible = layers.visible_layers();
        assert_eq!(visible.len(), 1);

        let layer = &visible[0];
        assert_eq!(layer.style.fill, "#ff880080");
        assert_eq!(layer.style.stroke, "#ffffff");
        assert_eq!(layer.collection["features"].as_array().unwrap().len(), 2);
        assert_eq!(layer.collection["features"][1]["properties"]["owner"], "b");
        assert_eq!(
            layer.collection["features"][0]["properties"]["districtName"],
            "bang_rak"
        );
    }

    #[test]
    fn test_from_json() {
        let layers = DistrictLayers::from_json(
            r##"[{"name":"x","display_name":"X","color":"#112233","checked":true}]"##,
        )
        .unwrap();
        assert!(layers.get("x").unwrap().checked);
        assert!(layers.get("x").unwrap().parcels.is_empty());
    }
}
