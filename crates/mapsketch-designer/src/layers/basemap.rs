//! Basemap catalog.
//!
//! Exactly one tiled basemap is visible at a time. Providers come from the
//! configuration in button order.

use mapsketch_core::LayerError;
use mapsketch_settings::{BasemapProvider, BasemapSettings};

#[derive(Debug, Clone)]
pub struct BasemapCatalog {
    providers: Vec<BasemapProvider>,
    active: usize,
}

impl BasemapCatalog {
    pub fn new(providers: Vec<BasemapProvider>, active: &str) -> Result<Self, LayerError> {
        if providers.is_empty() {
            return Err(LayerError::EmptyCatalog);
        }
        let active = position(&providers, active)?;
        Ok(Self { providers, active })
    }

    pub fn from_settings(settings: &BasemapSettings) -> Result<Self, LayerError> {
        Self::new(settings.providers.clone(), &settings.active)
    }

    /// Make `key` the visible basemap
    pub fn switch(&mut self, key: &str) -> Result<&BasemapProvider, LayerError> {
        self.active = position(&self.providers, key)?;
        tracing::info!("Basemap switched to {}", key);
        Ok(&self.providers[self.active])
    }

    pub fn active(&self) -> &BasemapProvider {
        &self.providers[self.active]
    }

    /// Providers with their visibility
    pub fn layers(&self) -> impl Iterator<Item = (&BasemapProvider, bool)> {
        self.providers
            .iter()
            .enumerate()
            .map(move |(i, p)| (p, i == self.active))
    }

    /// Tile URL of the visible basemap
    pub fn tile_url(&self, z: u32, x: u32, y: u32) -> String {
        expand_template(&self.active().url, z, x, y)
    }
}

fn position(providers: &[BasemapProvider], key: &str) -> Result<usize, LayerError> {
    providers
        .iter()
        .position(|p| p.key == key)
        .ok_or_else(|| LayerError::UnknownBasemap {
            key: key.to_string(),
        })
}

/// Expand an XYZ URL template
///
/// `{a-c}` picks a subdomain from `(x + y) mod 3`; `{r}` (retina suffix) expands to nothing.
pub fn expand_template(template: &str, z: u32, x: u32, y: u32) -> String {
    let subdomain = ["a", "b", "c"][((x as u64 + y as u64) % 3) as usize];
    template
        .replace("{z}", &z.to_string())
        .replace("{x}", &x.to_string())
        .replace("{y}", &y.to_string())
        .replace("{a-c}", subdomain)
        .replace("{r}", "")
}
