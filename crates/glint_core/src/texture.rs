//! Texture loading and the texture registry.
//!
//! Textures are decoded once into normalized RGBA floats and handed out by
//! index. The registry is owned by the scene and passed to whoever needs to
//! load or sample textures.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use glint_math::{Color, DVec2};
use thiserror::Error;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Failed to load texture: {0}")]
    LoadError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decoding error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Texture {path} has {actual} pixels, expected {width}x{height}")]
    BadDimensions {
        path: String,
        width: u32,
        height: u32,
        actual: usize,
    },
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A loaded texture with pixel data.
#[derive(Clone, Debug)]
pub struct Texture {
    /// Texture width in pixels
    pub width: u32,

    /// Texture height in pixels
    pub height: u32,

    /// Pixel data in RGBA format (0-1 range)
    /// Stored as [R, G, B, A] per pixel, row-major order, top row first
    pub pixels: Vec<[f32; 4]>,

    /// Original file path (for debugging)
    pub path: String,
}

impl Texture {
    /// Create a new texture from pixel data.
    pub fn new(
        width: u32,
        height: u32,
        pixels: Vec<[f32; 4]>,
        path: impl Into<String>,
    ) -> TextureResult<Self> {
        let path = path.into();
        if width == 0 || height == 0 || pixels.len() != (width * height) as usize {
            return Err(TextureError::BadDimensions {
                path,
                width,
                height,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
            path,
        })
    }

    /// Create a solid color texture (1x1).
    pub fn solid_color(color: Color) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![[color.x as f32, color.y as f32, color.z as f32, 1.0]],
            path: "<solid>".to_string(),
        }
    }

    /// Nearest-pixel lookup at texture coordinates.
    ///
    /// (0, 0) is the bottom-left corner. Coordinates are clamped to [0, 1].
    pub fn color_at(&self, tc: DVec2) -> Color {
        let u = tc.x.clamp(0.0, 1.0);
        let v = (1.0 - tc.y).clamp(0.0, 1.0);

        let x = (u * (self.width - 1) as f64).round() as u32;
        let y = (v * (self.height - 1) as f64).round() as u32;

        let p = self.get_pixel(x, y);
        Color::new(p[0] as f64, p[1] as f64, p[2] as f64)
    }

    /// Get pixel at integer coordinates.
    fn get_pixel(&self, x: u32, y: u32) -> [f32; 4] {
        let idx = (y * self.width + x) as usize;
        self.pixels
            .get(idx)
            .copied()
            .unwrap_or([0.0, 0.0, 0.0, 1.0])
    }

    /// Get total size in bytes (approximate).
    pub fn size_bytes(&self) -> usize {
        self.pixels.len() * std::mem::size_of::<[f32; 4]>()
    }
}

/// Textures addressed by index, with file loads deduplicated by path.
#[derive(Default)]
pub struct TextureRegistry {
    /// Textures by index
    textures: Vec<Arc<Texture>>,

    /// Index of each loaded file path
    by_path: HashMap<String, usize>,

    /// Base directory for resolving relative paths
    base_dir: Option<PathBuf>,
}

impl TextureRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with a base directory for relative paths.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
            ..Self::default()
        }
    }

    /// Store an in-memory texture and return its index.
    pub fn add(&mut self, texture: Texture) -> usize {
        let id = self.textures.len();
        self.textures.push(Arc::new(texture));
        id
    }

    /// Load a texture from file, reusing the index of an earlier load.
    pub fn load(&mut self, path: &str) -> TextureResult<usize> {
        if let Some(&id) = self.by_path.get(path) {
            return Ok(id);
        }

        let full_path = self.resolve_path(path);
        let texture = load_texture_file(&full_path)?;

        log::debug!(
            "Loaded texture: {} ({}x{}, {:.1} KB)",
            path,
            texture.width,
            texture.height,
            texture.size_bytes() as f32 / 1024.0
        );

        let id = self.add(texture);
        self.by_path.insert(path.to_string(), id);
        Ok(id)
    }

    /// Texture by index.
    pub fn get(&self, id: usize) -> Option<&Texture> {
        self.textures.get(id).map(Arc::as_ref)
    }

    /// Sample a texture, black when the index is unknown.
    pub fn color_at(&self, id: usize, tc: DVec2) -> Color {
        self.get(id).map_or(Color::ZERO, |t| t.color_at(tc))
    }

    /// Get the number of textures.
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Drop all textures.
    pub fn clear(&mut self) {
        self.textures.clear();
        self.by_path.clear();
    }

    /// Resolve a path relative to the base directory.
    fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);

        if path.is_absolute() {
            path.to_path_buf()
        } else if let Some(base) = &self.base_dir {
            base.join(path)
        } else {
            path.to_path_buf()
        }
    }
}

/// Load a texture from a file path.
fn load_texture_file(path: &Path) -> TextureResult<Texture> {
    let img = image::open(path).map_err(|e| {
        TextureError::LoadError(format!("Failed to open {}: {}", path.display(), e))
    })?;

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let pixels: Vec<[f32; 4]> = rgba
        .pixels()
        .map(|p| {
            [
                p[0] as f32 / 255.0,
                p[1] as f32 / 255.0,
                p[2] as f32 / 255.0,
                p[3] as f32 / 255.0,
            ]
        })
        .collect();

    Texture::new(width, height, pixels, path.to_string_lossy().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 2x2 texture: top row red, green; bottom row blue, white.
    fn quad() -> Texture {
        Texture::new(
            2,
            2,
            vec![
                [1.0, 0.0, 0.0, 1.0],
                [0.0, 1.0, 0.0, 1.0],
                [0.0, 0.0, 1.0, 1.0],
                [1.0, 1.0, 1.0, 1.0],
            ],
            "quad",
        )
        .unwrap()
    }

    #[test]
    fn test_solid_color_texture() {
        let tex = Texture::solid_color(Color::new(1.0, 0.5, 0.0));
        let sample = tex.color_at(DVec2::new(0.5, 0.5));
        assert!((sample.x - 1.0).abs() < 0.001);
        assert!((sample.y - 0.5).abs() < 0.001);
        assert!((sample.z - 0.0).abs() < 0.001);
    }

    #[test]
    fn test_nearest_lookup_flips_vertically() {
        let tex = quad();

        // (0, 0) is bottom-left -> blue
        assert_eq!(tex.color_at(DVec2::new(0.0, 0.0)), Color::new(0.0, 0.0, 1.0));
        // (1, 1) is top-right -> green
        assert_eq!(tex.color_at(DVec2::new(1.0, 1.0)), Color::new(0.0, 1.0, 0.0));
        // (0, 1) is top-left -> red
        assert_eq!(tex.color_at(DVec2::new(0.0, 1.0)), Color::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_lookup_clamps() {
        let tex = quad();
        assert_eq!(tex.color_at(DVec2::new(-3.0, 7.0)), Color::new(1.0, 0.0, 0.0));
        assert_eq!(tex.color_at(DVec2::new(2.0, -1.0)), Color::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_bad_dimensions() {
        let err = Texture::new(2, 2, vec![[0.0; 4]; 3], "broken").unwrap_err();
        assert!(matches!(err, TextureError::BadDimensions { actual: 3, .. }));
    }

    #[test]
    fn test_registry_add_and_sample() {
        let mut registry = TextureRegistry::new();
        assert!(registry.is_empty());

        let id = registry.add(quad());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.color_at(id, DVec2::new(1.0, 0.0)), Color::ONE);
        assert_eq!(registry.color_at(id + 5, DVec2::ZERO), Color::ZERO);
    }

    #[test]
    fn test_registry_load_from_disk() {
        let dir = std::env::temp_dir().join("glint_texture_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("checker.png");

        let mut img = image::RgbaImage::new(2, 1);
        img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 0, image::Rgba([0, 0, 255, 255]));
        img.save(&path).unwrap();

        let mut registry = TextureRegistry::with_base_dir(&dir);
        let id = registry.load("checker.png").unwrap();
        let again = registry.load("checker.png").unwrap();
        assert_eq!(id, again);
        assert_eq!(registry.len(), 1);

        let tex = registry.get(id).unwrap();
        assert_eq!((tex.width, tex.height), (2, 1));
        assert_eq!(tex.color_at(DVec2::new(0.0, 0.5)), Color::new(1.0, 0.0, 0.0));
        assert_eq!(tex.color_at(DVec2::new(1.0, 0.5)), Color::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_registry_missing_file() {
        let mut registry = TextureRegistry::new();
        assert!(registry.load("/definitely/not/here.png").is_err());
        assert!(registry.is_empty());
    }
}
