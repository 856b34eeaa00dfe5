//! Per-scanline TMDS encoding of one colour plane.
//!
//! The hot loop of the renderer: for every cell it reads one glyph byte
//! from the font cache, applies the underline and blink attribute
//! overrides, pulls the cell's 4-bit colour nibble out of the packed plane
//! word, and resolves both glyph nibbles through the palette table. Eight
//! pixels per cell become four packed symbol words.

use dviterm_core::CellAttrs;
use dviterm_core::Geometry;

use crate::font::FontCache;
use crate::surface::RowScratch;
use crate::tmds::TmdsLut;

/// Packed symbol words per cell (8 pixels, 2 per word).
pub const WORDS_PER_CELL: usize = 4;

/// Stateless scanline encoder; owns the palette table and font cache.
#[derive(Debug)]
pub struct ScanlineEncoder {
    lut: TmdsLut,
    font: FontCache,
    geometry: Geometry,
}

impl ScanlineEncoder {
    #[must_use]
    pub fn new(font: FontCache, geometry: Geometry) -> Self {
        Self {
            lut: TmdsLut::new(),
            font,
            geometry,
        }
    }

    #[must_use]
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Symbol words needed for one plane of one scanline.
    #[must_use]
    pub fn words_per_scanline(&self) -> usize {
        usize::from(self.geometry.cols) * WORDS_PER_CELL
    }

    /// Encode one plane of one scanline into `out`.
    ///
    /// `glyph_line` selects the scan position inside the character row.
    /// `blink_visible` is the current phase of the attribute blink clock;
    /// in the off phase blinking cells render as background only.
    ///
    /// # Panics
    ///
    /// Panics if `out` is shorter than [`Self::words_per_scanline`].
    pub fn encode_plane(
        &self,
        scratch: &RowScratch,
        glyph_line: u16,
        plane: usize,
        blink_visible: bool,
        out: &mut [u32],
    ) {
        let cols = usize::from(self.geometry.cols);
        assert!(out.len() >= cols * WORDS_PER_CELL);
        let underline_line = usize::from(self.geometry.glyph_height) - 1;
        let glyph_line = usize::from(glyph_line);
        let font_row = self.font.line(glyph_line);

        for x in 0..cols {
            let mut font_byte = font_row[usize::from(scratch.chars[x])];

            let attrs = CellAttrs::from_bits_truncate(scratch.attrs[x]);
            if attrs.contains(CellAttrs::UNDERLINE) && glyph_line == underline_line {
                font_byte = 0xFF;
            }
            if attrs.contains(CellAttrs::BLINK) && !blink_visible {
                font_byte = 0x00;
            }

            let colour_word = scratch.planes[plane][x / 8];
            let colour_nibble = ((colour_word >> ((x % 8) * 4)) & 0xF) as u8;

            let low = self.lut.lookup(colour_nibble, font_byte & 0x0F);
            let high = self.lut.lookup(colour_nibble, font_byte >> 4);
            let base = x * WORDS_PER_CELL;
            out[base] = low[0];
            out[base + 1] = low[1];
            out[base + 2] = high[0];
            out[base + 3] = high[1];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tmds::{decode_entry, expand_level};
    use dviterm_core::{FrameBuffer, Rgb222};

    fn scratch_from(frame: &FrameBuffer, y: u16) -> RowScratch {
        let mut s = RowScratch::new(Geometry::vga_640x480());
        s.chars.copy_from_slice(frame.row_chars(y));
        s.attrs.copy_from_slice(frame.row_attrs(y));
        for plane in 0..3 {
            s.planes[plane].copy_from_slice(frame.row_plane_words(plane, y));
        }
        s.row = y;
        s
    }

    fn encoder_with(glyph: u8, line: usize, bits: u8) -> ScanlineEncoder {
        let mut rom = [[0u8; 16]; 256];
        rom[usize::from(glyph)][line] = bits;
        ScanlineEncoder::new(FontCache::new(&rom), Geometry::vga_640x480())
    }

    /// Decode the 8 pixel bytes the encoder produced for cell `x`.
    fn cell_pixels(out: &[u32], x: usize) -> [u8; 8] {
        let base = x * WORDS_PER_CELL;
        let low = decode_entry([out[base], out[base + 1]]);
        let high = decode_entry([out[base + 2], out[base + 3]]);
        [
            low[0], low[1], low[2], low[3], high[0], high[1], high[2], high[3],
        ]
    }

    #[test]
    fn lit_pixels_take_foreground_level_left_to_right() {
        // Glyph 'T' line 2: leftmost pixel and pixel 5 lit in ROM order.
        let enc = encoder_with(b'T', 2, 0b1000_0100);
        let mut frame = FrameBuffer::new(Geometry::vga_640x480());
        frame.set_char(0, 0, b'T');
        // fg green level 3 in plane 1, bg level 0.
        frame.set_colour(0, 0, Rgb222::new(0b00_11_00), Rgb222::BLACK);
        let scratch = scratch_from(&frame, 0);

        let mut out = vec![0u32; enc.words_per_scanline()];
        enc.encode_plane(&scratch, 2, 1, true, &mut out);

        let px = cell_pixels(&out, 0);
        let on = expand_level(3);
        assert_eq!(px, [on, 0, 0, 0, 0, on, 0, 0]);
    }

    #[test]
    fn other_glyph_lines_render_background_only() {
        let enc = encoder_with(b'T', 2, 0xFF);
        let mut frame = FrameBuffer::new(Geometry::vga_640x480());
        frame.set_char(0, 0, b'T');
        frame.set_colour(0, 0, Rgb222::new(0b00_11_00), Rgb222::new(0b00_01_00));
        let scratch = scratch_from(&frame, 0);

        let mut out = vec![0u32; enc.words_per_scanline()];
        enc.encode_plane(&scratch, 3, 1, true, &mut out);
        assert_eq!(cell_pixels(&out, 0), [expand_level(1); 8]);
    }

    #[test]
    fn underline_forces_a_solid_last_glyph_line() {
        let enc = encoder_with(b'u', 15, 0x00);
        let mut frame = FrameBuffer::new(Geometry::vga_640x480());
        frame.set_char(0, 0, b'u');
        frame.set_attrs(0, 0, CellAttrs::UNDERLINE);
        frame.set_colour(0, 0, Rgb222::new(0b00_11_00), Rgb222::BLACK);
        let scratch = scratch_from(&frame, 0);

        let mut out = vec![0u32; enc.words_per_scanline()];
        enc.encode_plane(&scratch, 15, 1, true, &mut out);
        assert_eq!(cell_pixels(&out, 0), [expand_level(3); 8]);

        // Not on any earlier line.
        enc.encode_plane(&scratch, 14, 1, true, &mut out);
        assert_eq!(cell_pixels(&out, 0), [0; 8]);
    }

    #[test]
    fn blink_off_phase_blanks_the_glyph_to_background() {
        let enc = encoder_with(b'b', 5, 0xFF);
        let mut frame = FrameBuffer::new(Geometry::vga_640x480());
        frame.set_char(0, 0, b'b');
        frame.set_attrs(0, 0, CellAttrs::BLINK);
        frame.set_colour(0, 0, Rgb222::new(0b00_11_00), Rgb222::new(0b00_10_00));
        let scratch = scratch_from(&frame, 0);

        let mut out = vec![0u32; enc.words_per_scanline()];
        enc.encode_plane(&scratch, 5, 1, true, &mut out);
        assert_eq!(cell_pixels(&out, 0), [expand_level(3); 8]);

        enc.encode_plane(&scratch, 5, 1, false, &mut out);
        assert_eq!(cell_pixels(&out, 0), [expand_level(2); 8]);
    }

    #[test]
    fn planes_isolate_their_colour_channel() {
        let enc = encoder_with(b'R', 0, 0xFF);
        let mut frame = FrameBuffer::new(Geometry::vga_640x480());
        frame.set_char(1, 0, b'R');
        // Pure red: plane 2 carries level 3, planes 0 and 1 carry 0.
        frame.set_colour(1, 0, Rgb222::new(0b11_00_00), Rgb222::BLACK);
        let scratch = scratch_from(&frame, 0);

        let mut out = vec![0u32; enc.words_per_scanline()];
        enc.encode_plane(&scratch, 0, 2, true, &mut out);
        assert_eq!(cell_pixels(&out, 1), [expand_level(3); 8]);
        enc.encode_plane(&scratch, 0, 0, true, &mut out);
        assert_eq!(cell_pixels(&out, 1), [0; 8]);
    }

    #[test]
    fn every_cell_of_a_row_is_encoded() {
        let enc = encoder_with(b'x', 1, 0b0000_0001);
        let mut frame = FrameBuffer::new(Geometry::vga_640x480());
        for x in 0..80 {
            frame.set_char(x, 0, b'x');
            frame.set_colour(x, 0, Rgb222::WHITE, Rgb222::BLACK);
        }
        let scratch = scratch_from(&frame, 0);

        let mut out = vec![0u32; enc.words_per_scanline()];
        enc.encode_plane(&scratch, 1, 0, true, &mut out);
        for x in 0..80 {
            // ROM bit 7 is leftmost, so 0b0000_0001 lights the rightmost
            // pixel of each cell.
            let px = cell_pixels(&out, x);
            assert_eq!(px, [0, 0, 0, 0, 0, 0, 0, 0xFF], "cell {x}");
        }
    }
}
