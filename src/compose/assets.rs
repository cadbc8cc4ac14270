//! Fixed overlay art lookup.
//!
//! Overlay art (masks, badges, crop guides, focal-window art, fonts) is
//! addressed by a relative key such as `masks/mt-s-1.png`. A store answers
//! `None` for keys it does not hold; the compositor then skips that layer.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use image::RgbaImage;
use tracing::debug;

use crate::codec::decode_raster;
use crate::error::{AdsynthError, Result};

/// Source of overlay art bytes.
pub trait AssetStore: Send + Sync {
    /// Raw bytes for `key`, or `None` when the asset does not exist.
    fn fetch(&self, key: &str) -> Result<Option<Vec<u8>>>;
}

/// Assets read from a directory tree.
#[derive(Debug, Clone)]
pub struct FsAssetStore {
    root: PathBuf,
}

impl FsAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || key.is_empty() {
            return Err(AdsynthError::InvalidRequest {
                message: format!("asset key '{}' must be a relative path inside the asset root", key),
            });
        }
        Ok(self.root.join(relative))
    }
}

impl AssetStore for FsAssetStore {
    fn fetch(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.resolve(key)?;
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AdsynthError::Io {
                path,
                message: e.to_string(),
            }),
        }
    }
}

/// Assets held in memory, keyed by asset key.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssetStore {
    assets: HashMap<String, Vec<u8>>,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, bytes: Vec<u8>) {
        self.assets.insert(key.into(), bytes);
    }

    pub fn with(mut self, key: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(key, bytes);
        self
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl AssetStore for MemoryAssetStore {
    fn fetch(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.assets.get(key).cloned())
    }
}

/// Load and decode an optional overlay layer.
///
/// Undeclared and missing assets yield `None`; an asset that exists but
/// cannot be decoded is an error.
pub(crate) fn load_layer(store: &dyn AssetStore, key: Option<&str>, layer: &str) -> Result<Option<RgbaImage>> {
    let Some(key) = key else {
        debug!(layer, "no asset declared, skipping layer");
        return Ok(None);
    };
    match store.fetch(key)? {
        Some(bytes) => Ok(Some(decode_raster(&bytes, key)?.to_rgba8())),
        None => {
            debug!(layer, key, "asset missing, skipping layer");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgba};
    use std::io::Cursor;
    use tempfile::TempDir;

    fn png(colour: [u8; 4]) -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba(colour)))
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_fs_store_reads_and_misses() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("masks")).unwrap();
        std::fs::write(temp.path().join("masks/a.png"), png([1, 2, 3, 255])).unwrap();

        let store = FsAssetStore::new(temp.path());
        assert!(store.fetch("masks/a.png").unwrap().is_some());
        assert!(store.fetch("masks/b.png").unwrap().is_none());
    }

    #[test]
    fn test_fs_store_rejects_escaping_keys() {
        let temp = TempDir::new().unwrap();
        let store = FsAssetStore::new(temp.path());
        assert!(store.fetch("../secret.png").is_err());
        assert!(store.fetch("/etc/passwd").is_err());
        assert!(store.fetch("").is_err());
    }

    #[test]
    fn test_load_layer() {
        let store = MemoryAssetStore::new()
            .with("badges/x.png", png([9, 9, 9, 255]))
            .with("broken.png", b"nope".to_vec());

        let layer = load_layer(&store, Some("badges/x.png"), "badge").unwrap().unwrap();
        assert_eq!(layer.get_pixel(0, 0).0, [9, 9, 9, 255]);

        assert!(load_layer(&store, Some("badges/y.png"), "badge").unwrap().is_none());
        assert!(load_layer(&store, None, "badge").unwrap().is_none());

        let err = load_layer(&store, Some("broken.png"), "mask").unwrap_err();
        assert!(matches!(err, AdsynthError::Decode { .. }));
    }
}
