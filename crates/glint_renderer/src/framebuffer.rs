//! Packed 32-bit frame buffer.

use glint_math::Color;
use image::RgbaImage;

/// Opaque black.
const BLACK: u32 = 0xFF00_0000;

/// Pack a linear colour as `0xFFRRGGBB`, clamping each channel to [0, 1].
pub fn to_rgb(color: Color) -> u32 {
    let channel = |c: f64| (c.clamp(0.0, 1.0) * 255.0) as u32;
    BLACK | channel(color.x) << 16 | channel(color.y) << 8 | channel(color.z)
}

/// Row-major buffer of packed pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl FrameBuffer {
    /// Create a new frame filled with opaque black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![BLACK; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Write a pixel. Out-of-range coordinates are ignored.
    pub fn put_pixel(&mut self, x: u32, y: u32, value: u32) {
        if x < self.width && y < self.height {
            self.pixels[(y * self.width + x) as usize] = value;
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.pixels[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    pub fn fill(&mut self, value: u32) {
        self.pixels.fill(value);
    }

    /// Change the size. Contents are cleared to black.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width as usize * height as usize, BLACK);
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Raw bytes, native-endian `u32` per pixel.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Mutable rows, top to bottom.
    pub(crate) fn rows_mut(&mut self) -> std::slice::ChunksMut<'_, u32> {
        self.pixels.chunks_mut(self.width.max(1) as usize)
    }

    /// Convert to an 8-bit RGBA image for saving.
    pub fn to_rgba_image(&self) -> RgbaImage {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for p in &self.pixels {
            bytes.extend_from_slice(&[(p >> 16) as u8, (p >> 8) as u8, *p as u8, (p >> 24) as u8]);
        }
        RgbaImage::from_raw(self.width, self.height, bytes)
            .unwrap_or_else(|| RgbaImage::new(self.width, self.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_rgb_packs_and_clamps() {
        assert_eq!(to_rgb(Color::new(1.0, 0.0, 0.0)), 0xFFFF_0000);
        assert_eq!(to_rgb(Color::new(0.0, 1.0, 0.0)), 0xFF00_FF00);
        assert_eq!(to_rgb(Color::new(-3.0, 7.0, 1.0)), 0xFF00_FFFF);
        assert_eq!(to_rgb(Color::splat(0.5)), 0xFF7F_7F7F);
    }

    #[test]
    fn test_put_and_get() {
        let mut frame = FrameBuffer::new(4, 3);
        frame.put_pixel(2, 1, 0xFF12_3456);
        frame.put_pixel(9, 9, 0xFFFF_FFFF);

        assert_eq!(frame.pixel(2, 1), Some(0xFF12_3456));
        assert_eq!(frame.pixel(0, 0), Some(BLACK));
        assert_eq!(frame.pixel(4, 0), None);
    }

    #[test]
    fn test_fill_and_resize() {
        let mut frame = FrameBuffer::new(2, 2);
        frame.fill(0xFFAB_CDEF);
        assert!(frame.pixels().iter().all(|&p| p == 0xFFAB_CDEF));

        frame.resize(3, 5);
        assert_eq!(frame.pixels().len(), 15);
        assert!(frame.pixels().iter().all(|&p| p == BLACK));
        assert_eq!(frame.as_bytes().len(), 60);
    }

    #[test]
    fn test_rgba_image() {
        let mut frame = FrameBuffer::new(2, 1);
        frame.put_pixel(1, 0, to_rgb(Color::new(1.0, 0.5, 0.0)));
        let image = frame.to_rgba_image();

        assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0, 255]);
        assert_eq!(image.get_pixel(1, 0).0, [255, 127, 0, 255]);
    }
}
