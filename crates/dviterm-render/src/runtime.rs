//! The logic execution context.
//!
//! Drains the interrupt-fed input ring, feeds bytes through the terminal
//! engine against the back frame, advances the cursor blink clock, and
//! turns dirty frames into swaps per the configured policy. The surface
//! lock is taken once per byte, so the render context can interleave its
//! row copies with a draining burst. One iteration is one blink tick;
//! [`LogicLoop::run`] paces iterations at the tick period.

use std::sync::Arc;
use std::time::Duration;

use tracing::{trace, warn};

use dviterm_core::{InputRing, SwapPolicy, TermConfig, Terminal};

use crate::surface::Surface;

/// Nominal logic-loop iteration period (the blink tick).
pub const TICK_PERIOD: Duration = Duration::from_millis(10);

/// Byte producer feeding the logic loop.
pub trait InputSource {
    /// Next pending byte, or `None` when drained.
    fn try_read_byte(&self) -> Option<u8>;

    /// Whether the source has dropped bytes since the last check.
    fn overflowed(&self) -> bool {
        false
    }
}

impl InputSource for InputRing {
    fn try_read_byte(&self) -> Option<u8> {
        self.pop()
    }

    fn overflowed(&self) -> bool {
        InputRing::overflowed(self)
    }
}

/// Owns the terminal engine and runs its side of the surface.
pub struct LogicLoop<I: InputSource> {
    term: Terminal,
    surface: Arc<Surface>,
    input: I,
    swap: SwapPolicy,
    overflow_reported: bool,
}

impl<I: InputSource> LogicLoop<I> {
    #[must_use]
    pub fn new(cfg: TermConfig, surface: Arc<Surface>, input: I) -> Self {
        // Boot both frames in the configured colours so the planes agree
        // with the terminal's colour state before the first edit.
        surface.with_back(|frame| frame.clear(cfg.initial_fg, cfg.initial_bg));
        surface.force_swap();
        Self {
            term: Terminal::new(cfg),
            surface,
            input,
            swap: cfg.swap,
            overflow_reported: false,
        }
    }

    #[must_use]
    pub fn terminal(&self) -> &Terminal {
        &self.term
    }

    #[must_use]
    pub fn input(&self) -> &I {
        &self.input
    }

    /// One logic iteration: drain input, tick blink, arrange a swap if
    /// anything changed. Returns the number of bytes consumed.
    pub fn poll(&mut self) -> usize {
        if self.input.overflowed() {
            if !self.overflow_reported {
                warn!("input ring overflow, bytes dropped");
                self.overflow_reported = true;
            }
        } else {
            self.overflow_reported = false;
        }

        // The surface lock is taken per byte, never around the drain loop,
        // so a burst cannot hold the render context off its row copies.
        let mut consumed = 0;
        while let Some(byte) = self.input.try_read_byte() {
            let term = &mut self.term;
            self.surface.with_back(|frame| term.process_byte(byte, frame));
            consumed += 1;
        }
        let term = &mut self.term;
        self.surface.with_back(|frame| term.tick_blink(frame));

        if self.term.take_dirty() {
            match self.swap {
                SwapPolicy::Deferred => self.surface.request_swap(),
                SwapPolicy::Forced => self.surface.force_swap(),
            }
            trace!(consumed, "frame updated");
        }
        consumed
    }

    /// Run the loop forever at the tick period.
    pub fn run(&mut self) -> ! {
        loop {
            self.poll();
            std::thread::sleep(TICK_PERIOD);
        }
    }
}
