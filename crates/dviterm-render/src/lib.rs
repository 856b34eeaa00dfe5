#![forbid(unsafe_code)]

//! Real-time half of dviterm: scanline rendering and the two loops.
//!
//! `dviterm-render` takes the platform-independent engine from
//! `dviterm-core` and turns it into video: a shared double-buffered
//! [`Surface`], a TMDS palette encoder that emits three colour planes of
//! packed 10-bit symbols per scanline, and the two execution contexts —
//! the [`RenderLoop`] walking the front frame and the [`LogicLoop`]
//! feeding the back frame from an input source.
//!
//! # Primary responsibilities
//!
//! - **TmdsLut / ScanlineEncoder**: pre-encoded 4-pixel palette entries;
//!   per-scanline plane encoding with underline and blink overrides.
//! - **FontCache**: scanline-major, bit-reversed glyph bitmaps.
//! - **Surface**: mutex-guarded front/back frame pair with deferred and
//!   forced swap, bounded per-row critical sections.
//! - **RenderLoop / LogicLoop**: the render and logic execution contexts.
//! - **VideoSink / InputSource**: the seams where hardware plugs in.
//!
//! # Design principles
//!
//! - **Tear-free by construction**: deferred swaps land only before
//!   scanline 0; a presented frame is always one consistent edit state.
//! - **Nothing slow under the lock**: the render loop copies one row and
//!   encodes outside; the logic loop takes the lock once per input byte.

pub mod font;
pub mod render_loop;
pub mod runtime;
pub mod scanline;
pub mod sink;
pub mod surface;
pub mod tmds;

pub use font::FontCache;
pub use render_loop::RenderLoop;
pub use runtime::{InputSource, LogicLoop, TICK_PERIOD};
pub use scanline::{ScanlineEncoder, WORDS_PER_CELL};
pub use sink::{CaptureSink, ScanlineBuffer, VideoSink};
pub use surface::{RowScratch, Surface};
pub use tmds::TmdsLut;
