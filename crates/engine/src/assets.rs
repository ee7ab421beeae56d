use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::ImageReader;
use thiserror::Error;
use tracing::info;

/// Decoded RGBA8 texture. Tiles and sprite frames share textures through
/// [`TextureHandle`]; the store owns the canonical copy for the process
/// lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

pub type TextureHandle = Arc<Texture>;

impl Texture {
    /// Builds a texture from raw RGBA8 bytes. `rgba.len()` must equal
    /// `width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Option<Self> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return None;
        }
        Some(Self {
            width,
            height,
            rgba,
        })
    }

    /// Uniform fill, handy for tests and solid cards.
    pub fn solid(width: u32, height: u32, color: [u8; 4]) -> Self {
        let mut rgba = Vec::with_capacity(width as usize * height as usize * 4);
        for _ in 0..width as usize * height as usize {
            rgba.extend_from_slice(&color);
        }
        Self {
            width,
            height,
            rgba,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to open texture file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode texture file {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Synchronous, caching texture loader. A missing or corrupt file is fatal
/// to the caller; there is no placeholder fallback.
#[derive(Debug, Default)]
pub struct TextureStore {
    cache: HashMap<PathBuf, TextureHandle>,
}

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, path: &Path) -> Result<TextureHandle, AssetError> {
        if let Some(handle) = self.cache.get(path) {
            return Ok(Arc::clone(handle));
        }

        let reader = ImageReader::open(path).map_err(|source| AssetError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let decoded = reader.decode().map_err(|source| AssetError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let image = decoded.to_rgba8();
        let texture = Arc::new(Texture {
            width: image.width(),
            height: image.height(),
            rgba: image.into_raw(),
        });
        info!(
            path = %path.display(),
            width = texture.width,
            height = texture.height,
            "texture_loaded"
        );
        self.cache.insert(path.to_path_buf(), Arc::clone(&texture));
        Ok(texture)
    }

    pub fn loaded_count(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_png(dir: &TempDir, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.path().join(name);
        let image = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
        image.save(&path).expect("write png");
        path
    }

    #[test]
    fn load_decodes_png_dimensions() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_png(&dir, "tile.png", 16, 16);

        let mut store = TextureStore::new();
        let texture = store.load(&path).expect("load");
        assert_eq!(texture.width(), 16);
        assert_eq!(texture.height(), 16);
        assert_eq!(texture.rgba().len(), 16 * 16 * 4);
    }

    #[test]
    fn load_caches_and_shares_one_texture() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_png(&dir, "tile.png", 8, 8);

        let mut store = TextureStore::new();
        let first = store.load(&path).expect("first load");
        let second = store.load(&path).expect("second load");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.loaded_count(), 1);
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let dir = TempDir::new().expect("tempdir");
        let mut store = TextureStore::new();
        let result = store.load(&dir.path().join("nope.png"));
        assert!(matches!(result, Err(AssetError::Open { .. })));
    }

    #[test]
    fn corrupt_file_is_a_decode_error() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not a png").expect("write junk");

        let mut store = TextureStore::new();
        let result = store.load(&path);
        assert!(matches!(result, Err(AssetError::Decode { .. })));
    }

    #[test]
    fn from_rgba_rejects_wrong_length() {
        assert!(Texture::from_rgba(2, 2, vec![0; 15]).is_none());
        assert!(Texture::from_rgba(2, 2, vec![0; 16]).is_some());
    }
}
