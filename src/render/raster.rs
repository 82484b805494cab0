//! # Raster Render Surface
//!
//! A 1-bit canvas that barcode encoders paint onto. The dimensions are fixed
//! when the raster is created; painting outside the canvas is clipped.
//!
//! ```
//! use scanbook::render::Raster;
//!
//! let mut raster = Raster::new(40, 20);
//! raster.fill_rect(0, 0, 4, 20);
//! assert!(raster.is_black(2, 10));
//! assert!(!raster.is_black(10, 10));
//! ```

use image::{GrayImage, ImageEncoder, Luma};

use super::font::{GLYPH_HEIGHT, GLYPH_WIDTH, generate_glyph, text_width};
use crate::error::ScanbookError;

/// Pixel buffer with one byte per pixel (0 = white, 1 = black).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Raster {
    /// Create a blank (all white) raster.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u8; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw pixel bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Whether the pixel at (x, y) is black. Out-of-range reads are white.
    pub fn is_black(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.pixels[y * self.width + x] != 0
    }

    /// Set a pixel. Out-of-range writes are ignored.
    pub fn set(&mut self, x: usize, y: usize, black: bool) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = u8::from(black);
        }
    }

    /// Fill a black rectangle.
    pub fn fill_rect(&mut self, x: usize, y: usize, width: usize, height: usize) {
        let x_end = (x + width).min(self.width);
        let y_end = (y + height).min(self.height);
        for py in y..y_end {
            let row = py * self.width;
            for px in x..x_end {
                self.pixels[row + px] = 1;
            }
        }
    }

    /// Draw a 1-pixel rectangle outline.
    pub fn stroke_rect(&mut self, x: usize, y: usize, width: usize, height: usize) {
        if width == 0 || height == 0 {
            return;
        }
        for px in x..x + width {
            self.set(px, y, true);
            self.set(px, y + height - 1, true);
        }
        for py in y..y + height {
            self.set(x, py, true);
            self.set(x + width - 1, py, true);
        }
    }

    /// Draw a line of text starting at (x, y).
    pub fn draw_text(&mut self, x: usize, y: usize, text: &str) {
        for (i, ch) in text.chars().enumerate() {
            let glyph = generate_glyph(ch);
            let gx = x + i * GLYPH_WIDTH;
            for row in 0..GLYPH_HEIGHT {
                for col in 0..GLYPH_WIDTH {
                    if glyph[row * GLYPH_WIDTH + col] != 0 {
                        self.set(gx + col, y + row, true);
                    }
                }
            }
        }
    }

    /// Draw a line of text horizontally centered, with its top edge at `y`.
    /// Text wider than the canvas is left-aligned and clipped.
    pub fn draw_text_centered(&mut self, y: usize, text: &str) {
        let x = self.width.saturating_sub(text_width(text)) / 2;
        self.draw_text(x, y, text);
    }

    /// Copy another raster's black pixels onto this one at (x, y).
    pub fn blit(&mut self, src: &Raster, x: usize, y: usize) {
        for sy in 0..src.height {
            for sx in 0..src.width {
                if src.pixels[sy * src.width + sx] != 0 {
                    self.set(x + sx, y + sy, true);
                }
            }
        }
    }

    /// Paint a boxed X with label lines underneath, used when a symbol
    /// could not be generated.
    pub fn placeholder(label_lines: &[&str]) -> Self {
        let text_w = label_lines.iter().map(|l| text_width(l)).max().unwrap_or(0);
        let width = (text_w + 16).max(160);
        let box_height = 60;
        let height = box_height + 8 + label_lines.len() * (GLYPH_HEIGHT + 2);

        let mut raster = Self::new(width, height);
        raster.stroke_rect(0, 0, width, box_height);
        for i in 0..box_height {
            let x1 = i * width / box_height;
            let x2 = width - 1 - x1;
            raster.set(x1, i, true);
            raster.set(x2, i, true);
        }

        let mut y = box_height + 6;
        for line in label_lines {
            raster.draw_text_centered(y, line);
            y += GLYPH_HEIGHT + 2;
        }
        raster
    }

    /// Encode as an 8-bit grayscale PNG.
    pub fn to_png(&self) -> Result<Vec<u8>, ScanbookError> {
        let mut img = GrayImage::new(self.width as u32, self.height as u32);
        for y in 0..self.height {
            for x in 0..self.width {
                let color = if self.is_black(x, y) { 0u8 } else { 255u8 };
                img.put_pixel(x as u32, y as u32, Luma([color]));
            }
        }

        let mut png_bytes = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder
            .write_image(
                img.as_raw(),
                self.width as u32,
                self.height as u32,
                image::ExtendedColorType::L8,
            )
            .map_err(|e: image::ImageError| ScanbookError::Image(e.to_string()))?;

        Ok(png_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_rect_clips() {
        let mut raster = Raster::new(10, 10);
        raster.fill_rect(8, 8, 5, 5);
        assert!(raster.is_black(9, 9));
        assert_eq!(raster.pixels().iter().filter(|&&p| p == 1).count(), 4);
    }

    #[test]
    fn test_centered_text_has_ink() {
        let mut raster = Raster::new(100, 20);
        raster.draw_text_centered(2, "123");
        assert!(raster.pixels().iter().any(|&p| p == 1));
        // Nothing drawn in the left margin
        for y in 0..20 {
            assert!(!raster.is_black(0, y));
        }
    }

    #[test]
    fn test_blit_offsets() {
        let mut small = Raster::new(2, 2);
        small.fill_rect(0, 0, 2, 2);
        let mut big = Raster::new(10, 10);
        big.blit(&small, 5, 5);
        assert!(big.is_black(5, 5));
        assert!(big.is_black(6, 6));
        assert!(!big.is_black(4, 4));
    }

    #[test]
    fn test_placeholder_is_labeled_box() {
        let raster = Raster::placeholder(&["DataMatrix", "0100049000000443"]);
        assert!(raster.width() >= 160);
        assert!(raster.is_black(0, 0));
        assert!(raster.height() > 60);
    }

    #[test]
    fn test_png_signature() {
        let png = Raster::new(4, 4).to_png().unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }
}
