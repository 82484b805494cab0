//! Glyph generation for human-readable barcode text.
//!
//! Uses the Spleen 8x16 bitmap font. Characters the font doesn't cover are
//! drawn as an outlined box.

use spleen_font::{FONT_8X16, PSF2Font};

/// Glyph cell width in pixels.
pub const GLYPH_WIDTH: usize = 8;

/// Glyph cell height in pixels.
pub const GLYPH_HEIGHT: usize = 16;

/// Generate a glyph bitmap for a character.
/// Returns a Vec<u8> where each byte is 0 (white) or 1 (black).
pub fn generate_glyph(ch: char) -> Vec<u8> {
    let mut glyph = vec![0u8; GLYPH_WIDTH * GLYPH_HEIGHT];

    let mut spleen = match PSF2Font::new(FONT_8X16) {
        Ok(font) => font,
        Err(_) => {
            draw_box(&mut glyph, GLYPH_WIDTH, GLYPH_HEIGHT);
            return glyph;
        }
    };

    let utf8_bytes = ch.to_string();
    match spleen.glyph_for_utf8(utf8_bytes.as_bytes()) {
        Some(spleen_glyph) => {
            for (row_y, row) in spleen_glyph.enumerate() {
                for (col_x, on) in row.enumerate() {
                    if row_y < GLYPH_HEIGHT && col_x < GLYPH_WIDTH {
                        glyph[row_y * GLYPH_WIDTH + col_x] = u8::from(on);
                    }
                }
            }
        }
        None => draw_box(&mut glyph, GLYPH_WIDTH, GLYPH_HEIGHT),
    }

    glyph
}

/// Width in pixels of a single line of text.
pub fn text_width(text: &str) -> usize {
    text.chars().count() * GLYPH_WIDTH
}

/// Draw a box outline in the glyph buffer.
fn draw_box(glyph: &mut [u8], width: usize, height: usize) {
    for x in 0..width {
        glyph[x] = 1;
        glyph[(height - 1) * width + x] = 1;
    }
    for y in 0..height {
        glyph[y * width] = 1;
        glyph[y * width + width - 1] = 1;
    }
}
