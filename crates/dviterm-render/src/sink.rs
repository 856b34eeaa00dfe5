//! Output seam for encoded scanlines.
//!
//! The render loop does not know what consumes its symbol words. Real
//! hardware would hand them to serializer DMA; tests and the simulator
//! capture them. The contract is a buffer pool: `take_free_buffer` blocks
//! until a scanline buffer is available for reuse, the loop fills it, and
//! `submit_filled` queues it for display. `begin_frame` marks the vertical
//! blank between frames.

use crate::scanline::WORDS_PER_CELL;

/// One encoded scanline: three planes of packed TMDS symbol words.
#[derive(Debug, Clone)]
pub struct ScanlineBuffer {
    /// Scanline index within the frame.
    pub scanline: u32,
    /// Packed symbol words, one `Vec` per colour plane.
    pub planes: [Vec<u32>; 3],
}

impl ScanlineBuffer {
    #[must_use]
    pub fn new(cols: u16) -> Self {
        let words = usize::from(cols) * WORDS_PER_CELL;
        Self {
            scanline: 0,
            planes: std::array::from_fn(|_| vec![0; words]),
        }
    }
}

/// Consumer of encoded scanlines.
pub trait VideoSink {
    /// Called at the vertical-blank boundary, before scanline 0.
    fn begin_frame(&mut self, frame_index: u64);

    /// Obtain a reusable buffer, blocking until one is free. The only
    /// point where the render context is allowed to wait.
    fn take_free_buffer(&mut self) -> ScanlineBuffer;

    /// Queue a filled buffer for display. Buffers come back through
    /// [`Self::take_free_buffer`] once the sink is done with them.
    fn submit_filled(&mut self, buf: ScanlineBuffer);
}

/// Buffers a [`CaptureSink`] keeps in its free pool.
const CAPTURE_POOL: usize = 4;

/// Sink that records the most recently completed frame, for tests and the
/// simulator. Recycles its pool immediately, so it never blocks.
#[derive(Debug)]
pub struct CaptureSink {
    cols: u16,
    free: Vec<ScanlineBuffer>,
    current: Vec<ScanlineBuffer>,
    last_frame: Vec<ScanlineBuffer>,
    frames_seen: u64,
}

impl CaptureSink {
    #[must_use]
    pub fn new(cols: u16) -> Self {
        Self {
            cols,
            free: (0..CAPTURE_POOL).map(|_| ScanlineBuffer::new(cols)).collect(),
            current: Vec::new(),
            last_frame: Vec::new(),
            frames_seen: 0,
        }
    }

    /// Scanlines of the last fully submitted frame.
    #[must_use]
    pub fn last_frame(&self) -> &[ScanlineBuffer] {
        &self.last_frame
    }

    #[must_use]
    pub fn frames_seen(&self) -> u64 {
        self.frames_seen
    }
}

impl VideoSink for CaptureSink {
    fn begin_frame(&mut self, _frame_index: u64) {
        if !self.current.is_empty() {
            self.last_frame = std::mem::take(&mut self.current);
            self.frames_seen += 1;
        }
    }

    fn take_free_buffer(&mut self) -> ScanlineBuffer {
        self.free
            .pop()
            .unwrap_or_else(|| ScanlineBuffer::new(self.cols))
    }

    fn submit_filled(&mut self, buf: ScanlineBuffer) {
        self.current.push(buf.clone());
        self.free.push(buf);
    }
}
