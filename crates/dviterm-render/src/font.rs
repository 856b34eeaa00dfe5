//! Glyph bitmap cache, laid out for the scanline encoder.
//!
//! Font ROMs store glyphs glyph-major with bit 7 as the leftmost pixel.
//! The encoder walks a scanline cell by cell and indexes the palette table
//! with bit 0 as the leftmost pixel, so the cache transposes the ROM into
//! scanline-major order and bit-reverses every byte once at startup.

pub const GLYPH_COUNT: usize = 256;
pub const GLYPH_HEIGHT: usize = 16;

/// One row of glyph data per scan position, 256 glyphs wide.
#[derive(Debug)]
pub struct FontCache {
    rows: Box<[[u8; GLYPH_COUNT]; GLYPH_HEIGHT]>,
}

impl FontCache {
    /// Build the cache from a glyph-major 8x16 font ROM.
    #[must_use]
    pub fn new(rom: &[[u8; GLYPH_HEIGHT]; GLYPH_COUNT]) -> Self {
        let mut rows = Box::new([[0u8; GLYPH_COUNT]; GLYPH_HEIGHT]);
        for (glyph, lines) in rom.iter().enumerate() {
            for (line, byte) in lines.iter().enumerate() {
                rows[line][glyph] = byte.reverse_bits();
            }
        }
        Self { rows }
    }

    /// Deterministic placeholder font for tests and the simulator.
    ///
    /// Printable ASCII gets a hollow box with a glyph-dependent interior
    /// stripe so adjacent characters are distinguishable in a dump; space
    /// and NUL stay empty; everything else renders as a checkerboard.
    #[must_use]
    pub fn test_pattern() -> Self {
        let mut rom = [[0u8; GLYPH_HEIGHT]; GLYPH_COUNT];
        for (glyph, lines) in rom.iter_mut().enumerate() {
            let g = glyph as u8;
            if g == 0 || g == b' ' {
                continue;
            }
            for (line, byte) in lines.iter_mut().enumerate() {
                *byte = if g.is_ascii_graphic() {
                    match line {
                        0 | 15 => 0xFF,
                        _ => 0x81 | (g.rotate_left(line as u32) & 0x3C),
                    }
                } else if line % 2 == 0 {
                    0xAA
                } else {
                    0x55
                };
            }
        }
        Self::new(&rom)
    }

    /// Bit-reversed glyph byte for one scan position.
    #[inline]
    #[must_use]
    pub fn byte(&self, line: usize, glyph: u8) -> u8 {
        self.rows[line % GLYPH_HEIGHT][usize::from(glyph)]
    }

    /// All 256 glyph bytes for one scan position.
    #[inline]
    #[must_use]
    pub fn line(&self, line: usize) -> &[u8; GLYPH_COUNT] {
        &self.rows[line % GLYPH_HEIGHT]
    }
}
