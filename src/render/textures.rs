//! Lazy egui texture cache for catalog assets.
//!
//! Asset bytes are decoded once on first sight of a url and kept as egui
//! textures; anything the catalog cannot resolve stays a placeholder.

use std::collections::HashMap;

use crate::models::assets::AssetCatalog;

pub struct TextureCache {
    textures: HashMap<String, egui::TextureHandle>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self {
            textures: HashMap::new(),
        }
    }

    /// Returns the texture for an item url, decoding and uploading it on
    /// first use. `None` for urls the catalog cannot resolve.
    pub fn get(
        &mut self,
        ctx: &egui::Context,
        assets: &AssetCatalog,
        url: &str,
    ) -> Option<egui::TextureId> {
        if !self.textures.contains_key(url) {
            let entry = assets.resolve(url)?;
            let image = image::load_from_memory(&entry.bytes).ok()?;
            let rgba = image.to_rgba8();
            let size = [rgba.width() as usize, rgba.height() as usize];
            let color_image = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
            let handle = ctx.load_texture(url, color_image, egui::TextureOptions::LINEAR);
            self.textures.insert(url.to_string(), handle);
        }
        self.textures.get(url).map(|handle| handle.id())
    }

    /// Drops textures whose url no longer resolves, e.g. after an import
    /// replaced the catalog.
    pub fn retain_known(&mut self, assets: &AssetCatalog) {
        self.textures.retain(|url, _| assets.resolve(url).is_some());
    }
}
