#![forbid(unsafe_code)]

//! Host-agnostic character-terminal engine.
//!
//! `dviterm-core` is the platform-independent half of dviterm. It owns the
//! cell/colour frame store, the escape-sequence state machine, the cursor and
//! menu overlays, and the interrupt-fed input ring — all without any host I/O
//! dependencies. The real-time half (scanline encoding, buffer swapping, the
//! render and logic loops) lives in `dviterm-render`.
//!
//! # Primary responsibilities
//!
//! - **FrameBuffer**: character grid plus three packed RGB222 colour planes.
//! - **Parser**: escape/CSI state machine turning bytes into [`Action`]s.
//! - **Terminal**: applies actions; owns cursor position, colours, CR/LF
//!   normalization, and modal menu routing.
//! - **CursorOverlay**: blink-timed, non-destructive cursor glyph.
//! - **MenuSession**: modal colour-picker / cursor-style / theme overlays.
//! - **InputRing**: bounded lock-free byte queue for the interrupt producer.
//!
//! # Design principles
//!
//! - **No I/O**: all types are pure data + logic; the host supplies bytes.
//! - **Infallible**: out-of-range input is clamped, dropped, or reset.
//!   Nothing in this crate propagates an error; the target device has no
//!   one to report failures to.
//! - **`#![forbid(unsafe_code)]`**: safety enforced at compile time.

pub mod cell;
pub mod color;
pub mod config;
pub mod cursor;
pub mod frame;
pub mod geometry;
pub mod menu;
pub mod parser;
pub mod ring;
pub mod terminal;

pub use cell::{Cell, CellAttrs};
pub use color::{ANSI_PALETTE, Rgb222, THEME_PRESETS};
pub use config::{EchoPolicy, SwapPolicy, TermConfig};
pub use cursor::{CursorOverlay, CursorStyle};
pub use frame::FrameBuffer;
pub use geometry::Geometry;
pub use menu::{MenuKind, MenuOutcome, MenuSession};
pub use parser::{Action, CsiParams, Parser};
pub use ring::InputRing;
pub use terminal::Terminal;
