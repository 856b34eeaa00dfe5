//! Shared double-buffered frame surface.
//!
//! The logic loop edits the back frame; the render loop reads the front
//! frame one row at a time. Both sides take the same mutex, and every
//! critical section is bounded: the render loop copies a single row into
//! private scratch and encodes outside the lock, so the logic loop is
//! never starved for longer than one row copy.
//!
//! Presentation is a pointer swap followed by a front-to-back copy, so the
//! logic loop always continues editing the content it just published. A
//! deferred swap is requested with an atomic flag and honoured by the
//! render loop only before scanline 0 of a frame; a forced swap happens
//! immediately under the lock.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use dviterm_core::{FrameBuffer, Geometry};
use dviterm_core::frame::COLOUR_PLANES;

#[derive(Debug)]
struct FramePair {
    front: FrameBuffer,
    back: FrameBuffer,
}

/// Double-buffered frame store shared between the two loops.
#[derive(Debug)]
pub struct Surface {
    pair: Mutex<FramePair>,
    swap_pending: AtomicBool,
    geometry: Geometry,
}

impl Surface {
    #[must_use]
    pub fn new(geometry: Geometry) -> Self {
        Self {
            pair: Mutex::new(FramePair {
                front: FrameBuffer::new(geometry),
                back: FrameBuffer::new(geometry),
            }),
            swap_pending: AtomicBool::new(false),
            geometry,
        }
    }

    #[must_use]
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Run `f` with exclusive access to the back frame.
    pub fn with_back<R>(&self, f: impl FnOnce(&mut FrameBuffer) -> R) -> R {
        let mut pair = self.pair.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut pair.back)
    }

    /// Ask the render loop to present the back frame at its next frame
    /// boundary. Idempotent until the swap happens.
    pub fn request_swap(&self) {
        self.swap_pending.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn swap_requested(&self) -> bool {
        self.swap_pending.load(Ordering::Acquire)
    }

    /// Present the back frame immediately, mid-frame tearing and all.
    pub fn force_swap(&self) {
        let mut pair = self.pair.lock().unwrap_or_else(PoisonError::into_inner);
        Self::swap_locked(&mut pair);
        self.swap_pending.store(false, Ordering::Release);
    }

    /// Honour a pending swap request. Called by the render loop before it
    /// reads scanline 0. Returns whether a swap took place.
    pub fn swap_if_pending(&self) -> bool {
        if !self.swap_pending.swap(false, Ordering::AcqRel) {
            return false;
        }
        let mut pair = self.pair.lock().unwrap_or_else(PoisonError::into_inner);
        Self::swap_locked(&mut pair);
        true
    }

    fn swap_locked(pair: &mut FramePair) {
        std::mem::swap(&mut pair.front, &mut pair.back);
        // Keep the back frame identical to what was just published so
        // incremental edits carry forward.
        let FramePair { front, back } = pair;
        back.copy_from(front);
    }

    /// Copy one front-frame row into `scratch`.
    pub fn copy_front_row(&self, y: u16, scratch: &mut RowScratch) {
        let pair = self.pair.lock().unwrap_or_else(PoisonError::into_inner);
        scratch.chars.copy_from_slice(pair.front.row_chars(y));
        scratch.attrs.copy_from_slice(pair.front.row_attrs(y));
        for plane in 0..COLOUR_PLANES {
            scratch.planes[plane].copy_from_slice(pair.front.row_plane_words(plane, y));
        }
        scratch.row = y;
    }
}

/// Private per-row staging area for the render loop.
#[derive(Debug, Clone)]
pub struct RowScratch {
    pub row: u16,
    pub chars: Vec<u8>,
    pub attrs: Vec<u8>,
    pub planes: [Vec<u32>; COLOUR_PLANES],
}

impl RowScratch {
    #[must_use]
    pub fn new(geometry: Geometry) -> Self {
        let cols = usize::from(geometry.cols);
        let words = geometry.words_per_row();
        Self {
            row: 0,
            chars: vec![0; cols],
            attrs: vec![0; cols],
            planes: std::array::from_fn(|_| vec![0; words]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dviterm_core::Rgb222;

    fn surface() -> Surface {
        Surface::new(Geometry::vga_640x480())
    }

    #[test]
    fn back_edits_stay_invisible_until_a_swap() {
        let s = surface();
        s.with_back(|f| f.set_char(5, 5, b'Q'));
        let mut scratch = RowScratch::new(s.geometry());
        s.copy_front_row(5, &mut scratch);
        assert_eq!(scratch.chars[5], b' ');

        s.request_swap();
        assert!(s.swap_if_pending());
        s.copy_front_row(5, &mut scratch);
        assert_eq!(scratch.chars[5], b'Q');
    }

    #[test]
    fn swap_copies_the_published_frame_back() {
        let s = surface();
        s.with_back(|f| f.set_char(0, 0, b'A'));
        s.force_swap();
        // The back frame kept the published content, so a further edit
        // accumulates instead of starting from a stale frame.
        s.with_back(|f| {
            assert_eq!(f.char_at(0, 0), Some(b'A'));
            f.set_char(1, 0, b'B');
        });
        s.force_swap();
        let mut scratch = RowScratch::new(s.geometry());
        s.copy_front_row(0, &mut scratch);
        assert_eq!(&scratch.chars[..2], b"AB");
    }

    #[test]
    fn swap_if_pending_is_a_no_op_without_a_request() {
        let s = surface();
        s.with_back(|f| f.set_char(0, 0, b'X'));
        assert!(!s.swap_if_pending());
        let mut scratch = RowScratch::new(s.geometry());
        s.copy_front_row(0, &mut scratch);
        assert_eq!(scratch.chars[0], b' ');
    }

    #[test]
    fn force_swap_clears_a_pending_request() {
        let s = surface();
        s.request_swap();
        s.force_swap();
        assert!(!s.swap_requested());
        assert!(!s.swap_if_pending());
    }

    #[test]
    fn colour_words_travel_with_the_row() {
        let s = surface();
        s.with_back(|f| f.set_colour(0, 2, Rgb222::new(0b11_00_00), Rgb222::BLACK));
        s.force_swap();
        let mut scratch = RowScratch::new(s.geometry());
        s.copy_front_row(2, &mut scratch);
        // Red lives in plane 2; its foreground bits occupy the low nibble
        // of the first word.
        assert_eq!(scratch.planes[2][0] & 0xF, 0b0011);
        assert_eq!(scratch.planes[0][0] & 0xF, 0);
    }
}
