//! Asset catalog: content-addressed storage for imported images.
//!
//! Files dropped on the window are decoded once to prove they are images,
//! hashed, and stored under an opaque `asset-<digest>` reference. The scene
//! model only ever holds the reference string; rendering resolves it back
//! to bytes through the catalog.

use std::collections::BTreeMap;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::GenericImageView;

/// One stored asset with its decoded dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetEntry {
    /// Original file name, kept for display in the palette.
    pub name: String,
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// All imported assets of a project, keyed by reference.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetCatalog {
    entries: BTreeMap<String, AssetEntry>,
}

impl AssetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and stores raw file bytes, returning the reference to
    /// place into an item's `url`. Re-ingesting identical bytes yields the
    /// same reference and overwrites the entry in place.
    pub fn ingest(&mut self, name: &str, bytes: Vec<u8>) -> Result<String, String> {
        let image = image::load_from_memory(&bytes)
            .map_err(|e| format!("{name}: not a readable image ({e})"))?;
        let reference = format!("asset-{:x}", md5::compute(&bytes));
        self.entries.insert(
            reference.clone(),
            AssetEntry {
                name: name.to_string(),
                bytes,
                width: image.width(),
                height: image.height(),
            },
        );
        Ok(reference)
    }

    /// Resolves an item url. Only `asset-…` references resolve; literal
    /// paths are the renderer's problem.
    pub fn resolve(&self, url: &str) -> Option<&AssetEntry> {
        self.entries.get(url)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AssetEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reference -> base64 payload, the shape stored in project files.
    pub fn to_portable(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|(reference, entry)| (reference.clone(), BASE64.encode(&entry.bytes)))
            .collect()
    }

    /// Rebuilds a catalog from a project file's asset map. Entries that
    /// fail to decode are reported, not silently dropped.
    pub fn from_portable(portable: &BTreeMap<String, String>) -> Result<Self, String> {
        let mut catalog = Self::new();
        for (reference, payload) in portable {
            let bytes = BASE64
                .decode(payload)
                .map_err(|e| format!("asset {reference}: bad base64 ({e})"))?;
            let (width, height) = match image::load_from_memory(&bytes) {
                Ok(image) => (image.width(), image.height()),
                Err(e) => return Err(format!("asset {reference}: not an image ({e})")),
            };
            catalog.entries.insert(
                reference.clone(),
                AssetEntry {
                    name: reference.clone(),
                    bytes,
                    width,
                    height,
                },
            );
        }
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Smallest valid PNG: 1x1, opaque.
    fn tiny_png() -> Vec<u8> {
        let mut buf = Vec::new();
        let image = image::RgbaImage::from_pixel(1, 1, image::Rgba([10, 20, 30, 255]));
        image::DynamicImage::ImageRgba8(image)
            .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageOutputFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn test_ingest_is_content_addressed() {
        let mut catalog = AssetCatalog::new();
        let bytes = tiny_png();
        let a = catalog.ingest("rock.png", bytes.clone()).unwrap();
        let b = catalog.ingest("rock-copy.png", bytes).unwrap();
        assert_eq!(a, b);
        assert_eq!(catalog.len(), 1);
        assert!(a.starts_with("asset-"));
        let entry = catalog.resolve(&a).unwrap();
        assert_eq!((entry.width, entry.height), (1, 1));
    }

    #[test]
    fn test_ingest_rejects_garbage() {
        let mut catalog = AssetCatalog::new();
        assert!(catalog.ingest("notes.txt", b"hello".to_vec()).is_err());
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_portable_round_trip() {
        let mut catalog = AssetCatalog::new();
        catalog.ingest("rock.png", tiny_png()).unwrap();
        let restored = AssetCatalog::from_portable(&catalog.to_portable()).unwrap();
        assert_eq!(restored.len(), 1);
        let (reference, entry) = catalog.iter().next().unwrap();
        assert_eq!(restored.resolve(reference).unwrap().bytes, entry.bytes);
    }

    #[test]
    fn test_portable_rejects_bad_base64() {
        let mut portable = BTreeMap::new();
        portable.insert("asset-xyz".to_string(), "///not base64///".to_string());
        assert!(AssetCatalog::from_portable(&portable).is_err());
    }
}
