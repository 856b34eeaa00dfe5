//! Frame geometry: character grid dimensions and glyph size.
//!
//! The geometry is fixed for the lifetime of the engine; every component that
//! needs pixel/cell arithmetic derives it from one `Geometry` value handed in
//! at startup.

/// Character-grid and glyph dimensions for one video mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    /// Character columns.
    pub cols: u16,
    /// Character rows.
    pub rows: u16,
    /// Glyph width in pixels (fixed-width font).
    pub glyph_width: u16,
    /// Glyph height in pixels (scanlines per character row).
    pub glyph_height: u16,
}

impl Geometry {
    /// The default mode: 80×30 cells of 8×16 glyphs on a 640×480 frame.
    #[must_use]
    pub const fn vga_640x480() -> Self {
        Self {
            cols: 80,
            rows: 30,
            glyph_width: 8,
            glyph_height: 16,
        }
    }

    /// Frame width in pixels.
    #[must_use]
    pub const fn frame_width(&self) -> u32 {
        self.cols as u32 * self.glyph_width as u32
    }

    /// Frame height in pixels (total scanlines per frame).
    #[must_use]
    pub const fn frame_height(&self) -> u32 {
        self.rows as u32 * self.glyph_height as u32
    }

    /// Colour-plane words per character row (8 cells packed per word).
    #[must_use]
    pub const fn words_per_row(&self) -> usize {
        (self.cols as usize).div_ceil(8)
    }

    /// Map a scanline to its character row, clamped to the last row.
    #[must_use]
    pub const fn row_for_scanline(&self, y: u32) -> u16 {
        let row = y / self.glyph_height as u32;
        if row >= self.rows as u32 {
            self.rows - 1
        } else {
            row as u16
        }
    }

    /// Map a scanline to its offset within the glyph bitmap.
    #[must_use]
    pub const fn glyph_line_for_scanline(&self, y: u32) -> u16 {
        (y % self.glyph_height as u32) as u16
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::vga_640x480()
    }
}
