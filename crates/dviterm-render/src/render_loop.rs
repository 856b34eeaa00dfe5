//! The render execution context.
//!
//! Walks the front frame scanline by scanline, honouring deferred swaps
//! only at the frame boundary so a presented frame is always internally
//! consistent. Each character row is copied out of the shared surface
//! once and reused for its sixteen scanlines; every encode happens outside
//! the surface lock.

use std::sync::Arc;

use tracing::{debug, trace};

use dviterm_core::frame::COLOUR_PLANES;

use crate::scanline::ScanlineEncoder;
use crate::sink::VideoSink;
use crate::surface::{RowScratch, Surface};

/// Frames per attribute-blink phase at the nominal 60 Hz refresh.
const BLINK_PHASE_FRAMES: u64 = 30;

/// Drives one frame after another from the front buffer into a sink.
pub struct RenderLoop<S: VideoSink> {
    surface: Arc<Surface>,
    encoder: ScanlineEncoder,
    sink: S,
    scratch: RowScratch,
    frame_index: u64,
}

impl<S: VideoSink> RenderLoop<S> {
    #[must_use]
    pub fn new(surface: Arc<Surface>, encoder: ScanlineEncoder, sink: S) -> Self {
        let geometry = surface.geometry();
        Self {
            scratch: RowScratch::new(geometry),
            surface,
            encoder,
            sink,
            frame_index: 0,
        }
    }

    #[must_use]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Whether blinking cells are in their visible phase this frame.
    #[must_use]
    pub fn blink_visible(&self) -> bool {
        (self.frame_index / BLINK_PHASE_FRAMES) % 2 == 0
    }

    /// Encode and submit one complete frame.
    pub fn render_frame(&mut self) {
        if self.surface.swap_if_pending() {
            debug!(frame = self.frame_index, "presented deferred swap");
        }
        self.sink.begin_frame(self.frame_index);

        let geometry = self.encoder.geometry();
        let blink_visible = self.blink_visible();
        let mut loaded_row: Option<u16> = None;

        for scanline in 0..geometry.frame_height() {
            let row = geometry.row_for_scanline(scanline);
            if loaded_row != Some(row) {
                self.surface.copy_front_row(row, &mut self.scratch);
                loaded_row = Some(row);
            }
            let glyph_line = geometry.glyph_line_for_scanline(scanline);
            let mut buf = self.sink.take_free_buffer();
            buf.scanline = scanline;
            for plane in 0..COLOUR_PLANES {
                self.encoder.encode_plane(
                    &self.scratch,
                    glyph_line,
                    plane,
                    blink_visible,
                    &mut buf.planes[plane],
                );
            }
            self.sink.submit_filled(buf);
        }

        trace!(frame = self.frame_index, "frame encoded");
        self.frame_index += 1;
    }

    /// Render frames forever.
    pub fn run(&mut self) -> ! {
        loop {
            self.render_frame();
        }
    }
}
