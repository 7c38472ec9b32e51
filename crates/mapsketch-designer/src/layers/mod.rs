//! Map layers beneath the drawing: the basemap and district parcels.

pub mod basemap;
pub mod districts;

pub use basemap::{expand_template, BasemapCatalog};
pub use districts::{District, DistrictLayer, DistrictLayers, Parcel, ParcelStyle};
