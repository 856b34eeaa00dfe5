//! Terminal cell: one glyph slot of the character grid.
//!
//! A cell is a character code (one of 256 font glyphs), a foreground and
//! background colour, and an attribute byte. The frame store keeps these
//! fields in separate planes for the encoder's benefit; `Cell` is the
//! unpacked form used at API seams (snapshots, overlay save/restore).

use bitflags::bitflags;

use crate::color::Rgb222;

bitflags! {
    /// Per-cell attribute flags applied by the scanline encoder.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CellAttrs: u8 {
        /// Force the last glyph row fully set (SGR 4 / 24).
        const UNDERLINE = 1 << 0;
        /// Render as blank while the global blink phase is off (SGR 5 / 25).
        const BLINK = 1 << 1;
    }
}

/// One unpacked character cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Font glyph code (0–255; the font is a full 256-glyph bitmap table).
    pub ch: u8,
    pub fg: Rgb222,
    pub bg: Rgb222,
    pub attrs: CellAttrs,
}

impl Cell {
    /// A blank cell with the given colours.
    #[must_use]
    pub const fn blank(fg: Rgb222, bg: Rgb222) -> Self {
        Self {
            ch: b' ',
            fg,
            bg,
            attrs: CellAttrs::empty(),
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::blank(Rgb222::WHITE, Rgb222::BLACK)
    }
}
