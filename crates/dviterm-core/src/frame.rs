//! Frame store: character grid, attribute grid, and packed colour planes.
//!
//! One `FrameBuffer` is a full cell grid in the exact layout the scanline
//! encoder consumes: a flat character array, a parallel attribute array, and
//! three colour bit-planes. Each plane carries 4 bits per cell (2 foreground
//! + 2 background bits for that plane's channel), eight cells packed per
//! `u32` word, row-major.
//!
//! The engine keeps two of these (front/back); this type knows nothing about
//! the swap protocol — see `dviterm-render`'s surface module.

use crate::cell::{Cell, CellAttrs};
use crate::color::Rgb222;
use crate::geometry::Geometry;

/// Colour planes per frame (one per RGB channel pair).
pub const COLOUR_PLANES: usize = 3;

/// Character + attribute + colour-plane store for one frame.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    chars: Vec<u8>,
    attrs: Vec<u8>,
    planes: [Vec<u32>; COLOUR_PLANES],
    cols: u16,
    rows: u16,
    words_per_row: usize,
}

impl FrameBuffer {
    /// Create a blank frame (spaces, white on black).
    #[must_use]
    pub fn new(geometry: Geometry) -> Self {
        let cells = geometry.cols as usize * geometry.rows as usize;
        let words_per_row = geometry.words_per_row();
        let plane_words = words_per_row * geometry.rows as usize;
        let mut frame = Self {
            chars: vec![b' '; cells],
            attrs: vec![0; cells],
            planes: [
                vec![0; plane_words],
                vec![0; plane_words],
                vec![0; plane_words],
            ],
            cols: geometry.cols,
            rows: geometry.rows,
            words_per_row,
        };
        frame.clear(Rgb222::WHITE, Rgb222::BLACK);
        frame
    }

    #[must_use]
    pub fn cols(&self) -> u16 {
        self.cols
    }

    #[must_use]
    pub fn rows(&self) -> u16 {
        self.rows
    }

    fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.cols as usize + x as usize
    }

    fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.cols && y < self.rows
    }

    // ── Cell access ─────────────────────────────────────────────────

    /// Write a character code. Out-of-bounds writes are dropped.
    pub fn set_char(&mut self, x: u16, y: u16, ch: u8) {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            self.chars[idx] = ch;
        }
    }

    /// Write an attribute byte. Out-of-bounds writes are dropped.
    pub fn set_attrs(&mut self, x: u16, y: u16, attrs: CellAttrs) {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            self.attrs[idx] = attrs.bits();
        }
    }

    /// Write foreground/background colour into all three planes.
    ///
    /// Out-of-bounds writes are dropped.
    pub fn set_colour(&mut self, x: u16, y: u16, fg: Rgb222, bg: Rgb222) {
        if !self.in_bounds(x, y) {
            return;
        }
        let word = y as usize * self.words_per_row + x as usize / 8;
        let shift = (x as usize % 8) * 4;
        let mask = !(0xFu32 << shift);
        for (plane, words) in self.planes.iter_mut().enumerate() {
            let nibble = u32::from(colour_nibble(fg, bg, plane));
            words[word] = (words[word] & mask) | (nibble << shift);
        }
    }

    /// Write a whole unpacked cell.
    pub fn set_cell(&mut self, x: u16, y: u16, cell: Cell) {
        self.set_char(x, y, cell.ch);
        self.set_attrs(x, y, cell.attrs);
        self.set_colour(x, y, cell.fg, cell.bg);
    }

    /// Read the character code at `(x, y)`.
    #[must_use]
    pub fn char_at(&self, x: u16, y: u16) -> Option<u8> {
        if self.in_bounds(x, y) {
            Some(self.chars[self.index(x, y)])
        } else {
            None
        }
    }

    /// Decode `(foreground, background)` from the three planes.
    #[must_use]
    pub fn colour_at(&self, x: u16, y: u16) -> Option<(Rgb222, Rgb222)> {
        if !self.in_bounds(x, y) {
            return None;
        }
        let word = y as usize * self.words_per_row + x as usize / 8;
        let shift = (x as usize % 8) * 4;
        let mut fg = 0u8;
        let mut bg = 0u8;
        for plane in (0..COLOUR_PLANES).rev() {
            let nibble = ((self.planes[plane][word] >> shift) & 0xF) as u8;
            fg = (fg << 2) | (nibble & 0b11);
            bg = (bg << 2) | ((nibble >> 2) & 0b11);
        }
        Some((Rgb222::new(fg), Rgb222::new(bg)))
    }

    /// Read a whole unpacked cell.
    #[must_use]
    pub fn cell_at(&self, x: u16, y: u16) -> Option<Cell> {
        let (fg, bg) = self.colour_at(x, y)?;
        Some(Cell {
            ch: self.chars[self.index(x, y)],
            fg,
            bg,
            attrs: CellAttrs::from_bits_truncate(self.attrs[self.index(x, y)]),
        })
    }

    // ── Row access (encoder path) ───────────────────────────────────

    /// Character codes for one row.
    #[must_use]
    pub fn row_chars(&self, y: u16) -> &[u8] {
        let start = y.min(self.rows - 1) as usize * self.cols as usize;
        &self.chars[start..start + self.cols as usize]
    }

    /// Attribute bytes for one row.
    #[must_use]
    pub fn row_attrs(&self, y: u16) -> &[u8] {
        let start = y.min(self.rows - 1) as usize * self.cols as usize;
        &self.attrs[start..start + self.cols as usize]
    }

    /// Packed colour words for one row of one plane.
    #[must_use]
    pub fn row_plane_words(&self, plane: usize, y: u16) -> &[u32] {
        let start = y.min(self.rows - 1) as usize * self.words_per_row;
        &self.planes[plane % COLOUR_PLANES][start..start + self.words_per_row]
    }

    // ── Whole-frame operations ──────────────────────────────────────

    /// Blank the entire grid with the given colours.
    pub fn clear(&mut self, fg: Rgb222, bg: Rgb222) {
        self.chars.fill(b' ');
        self.attrs.fill(0);
        for plane in 0..COLOUR_PLANES {
            let pattern = row_fill_pattern(fg, bg, plane);
            self.planes[plane].fill(pattern);
        }
    }

    /// Blank one row with the given colours.
    pub fn clear_row(&mut self, y: u16, fg: Rgb222, bg: Rgb222) {
        if y >= self.rows {
            return;
        }
        let start = self.index(0, y);
        let end = start + self.cols as usize;
        self.chars[start..end].fill(b' ');
        self.attrs[start..end].fill(0);
        let wstart = y as usize * self.words_per_row;
        for plane in 0..COLOUR_PLANES {
            let pattern = row_fill_pattern(fg, bg, plane);
            self.planes[plane][wstart..wstart + self.words_per_row].fill(pattern);
        }
    }

    /// Blank from column `x` to the end of row `y` (EL to end of line).
    pub fn blank_to_line_end(&mut self, x: u16, y: u16, fg: Rgb222, bg: Rgb222) {
        for col in x..self.cols {
            self.set_char(col, y, b' ');
            self.set_attrs(col, y, CellAttrs::empty());
            self.set_colour(col, y, fg, bg);
        }
    }

    /// Shift every row up by one, losing the top row, and blank the newly
    /// exposed bottom row with the given colours.
    pub fn scroll_up(&mut self, fg: Rgb222, bg: Rgb222) {
        if self.rows < 2 {
            self.clear_row(0, fg, bg);
            return;
        }
        let cols = self.cols as usize;
        self.chars.copy_within(cols.., 0);
        self.attrs.copy_within(cols.., 0);
        for plane in 0..COLOUR_PLANES {
            self.planes[plane].copy_within(self.words_per_row.., 0);
        }
        self.clear_row(self.rows - 1, fg, bg);
    }

    /// Copy another frame's contents into this one.
    ///
    /// Both frames must share a geometry; this is the swap coordinator's
    /// fixed-size copy step and never allocates.
    pub fn copy_from(&mut self, other: &FrameBuffer) {
        debug_assert_eq!(self.cols, other.cols);
        debug_assert_eq!(self.rows, other.rows);
        self.chars.copy_from_slice(&other.chars);
        self.attrs.copy_from_slice(&other.attrs);
        for plane in 0..COLOUR_PLANES {
            self.planes[plane].copy_from_slice(&other.planes[plane]);
        }
    }
}

/// The 4-bit plane field for a colour pair: 2 fg bits | 2 bg bits.
fn colour_nibble(fg: Rgb222, bg: Rgb222, plane: usize) -> u8 {
    fg.plane_bits(plane) | (bg.plane_bits(plane) << 2)
}

/// A full word of the per-plane nibble, for bulk row fills.
fn row_fill_pattern(fg: Rgb222, bg: Rgb222, plane: usize) -> u32 {
    u32::from(colour_nibble(fg, bg, plane)) * 0x1111_1111
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> FrameBuffer {
        FrameBuffer::new(Geometry::vga_640x480())
    }

    #[test]
    fn colour_roundtrips_through_planes() {
        let mut f = frame();
        for &(fg, bg) in &[(0u8, 63u8), (48, 12), (63, 0), (21, 42), (1, 2)] {
            f.set_colour(17, 5, Rgb222::new(fg), Rgb222::new(bg));
            assert_eq!(
                f.colour_at(17, 5),
                Some((Rgb222::new(fg), Rgb222::new(bg))),
                "fg={fg} bg={bg}"
            );
        }
    }

    #[test]
    fn set_colour_does_not_disturb_neighbours() {
        let mut f = frame();
        f.set_colour(8, 0, Rgb222::new(63), Rgb222::new(0));
        f.set_colour(9, 0, Rgb222::new(0), Rgb222::new(63));
        f.set_colour(10, 0, Rgb222::new(51), Rgb222::new(12));
        assert_eq!(f.colour_at(8, 0), Some((Rgb222::new(63), Rgb222::new(0))));
        assert_eq!(f.colour_at(9, 0), Some((Rgb222::new(0), Rgb222::new(63))));
        assert_eq!(f.colour_at(10, 0), Some((Rgb222::new(51), Rgb222::new(12))));
    }

    #[test]
    fn out_of_bounds_writes_are_dropped() {
        let mut f = frame();
        f.set_char(80, 0, b'x');
        f.set_char(0, 30, b'x');
        f.set_colour(200, 200, Rgb222::WHITE, Rgb222::WHITE);
        assert_eq!(f.char_at(80, 0), None);
        assert_eq!(f.char_at(79, 29), Some(b' '));
    }

    #[test]
    fn scroll_up_shifts_rows_and_blanks_the_last() {
        let mut f = frame();
        f.set_char(0, 0, b'A');
        f.set_char(0, 1, b'B');
        f.set_colour(0, 1, Rgb222::new(48), Rgb222::new(3));
        f.set_char(3, 29, b'Z');
        f.scroll_up(Rgb222::new(12), Rgb222::new(0));

        // Top row content is gone; row 1 moved to row 0 with its colours.
        assert_eq!(f.char_at(0, 0), Some(b'B'));
        assert_eq!(f.colour_at(0, 0), Some((Rgb222::new(48), Rgb222::new(3))));
        assert_eq!(f.char_at(3, 28), Some(b'Z'));
        // Exposed bottom row is blank in the scroll colours.
        assert_eq!(f.char_at(3, 29), Some(b' '));
        assert_eq!(f.colour_at(0, 29), Some((Rgb222::new(12), Rgb222::new(0))));
    }

    #[test]
    fn clear_resets_every_cell() {
        let mut f = frame();
        f.set_cell(
            40,
            15,
            Cell {
                ch: b'#',
                fg: Rgb222::new(48),
                bg: Rgb222::new(3),
                attrs: CellAttrs::UNDERLINE,
            },
        );
        f.clear(Rgb222::new(12), Rgb222::new(0));
        let cell = f.cell_at(40, 15).unwrap();
        assert_eq!(cell.ch, b' ');
        assert_eq!(cell.fg, Rgb222::new(12));
        assert_eq!(cell.bg, Rgb222::new(0));
        assert!(cell.attrs.is_empty());
    }

    #[test]
    fn row_views_match_cell_writes() {
        let mut f = frame();
        f.set_char(79, 7, b'!');
        f.set_attrs(79, 7, CellAttrs::BLINK);
        f.set_colour(79, 7, Rgb222::new(63), Rgb222::new(0));
        assert_eq!(f.row_chars(7)[79], b'!');
        assert_eq!(f.row_attrs(7)[79], CellAttrs::BLINK.bits());
        // Cell 79 sits in word 9, nibble 7.
        let nibble = (f.row_plane_words(0, 7)[9] >> 28) & 0xF;
        assert_eq!(nibble, 0b0011); // fg blue pair = 3, bg = 0
    }
}
