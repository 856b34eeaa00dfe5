//! Engine configuration.
//!
//! The two transport deployments (UART and I2C) disagree on swap timing and
//! on CR echo suppression; both behaviors are explicit policy here rather
//! than a guess at the "correct" one.

use crate::color::Rgb222;
use crate::cursor::CursorStyle;

/// How line-break echo from the sender is normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EchoPolicy {
    /// After an injected line break, additionally suppress one echoed CR.
    /// Matches the UART variant, which feeds Microsoft BASIC senders that
    /// echo the CR back after the terminal has already broken the line.
    #[default]
    SuppressEchoedCr,
    /// Plain CRLF/LFCR pairing only (the I2C variant's behavior).
    PassThrough,
}

/// When edits become visible to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwapPolicy {
    /// Raise the swap-pending flag and let the render loop copy at the next
    /// frame boundary. Tear-free by construction.
    #[default]
    Deferred,
    /// Copy back→front immediately after every dirtying edit, before the
    /// next input byte is processed.
    Forced,
}

/// Terminal engine configuration.
#[derive(Debug, Clone, Copy)]
pub struct TermConfig {
    pub echo: EchoPolicy,
    pub swap: SwapPolicy,
    /// Logic-loop iterations between cursor blink toggles
    /// (blink interval ÷ minimum loop period; 500 ms / 10 ms by default).
    pub blink_ticks: u32,
    pub cursor_style: CursorStyle,
    /// Boot colours (green on black by default).
    pub initial_fg: Rgb222,
    pub initial_bg: Rgb222,
}

impl Default for TermConfig {
    fn default() -> Self {
        Self {
            echo: EchoPolicy::default(),
            swap: SwapPolicy::default(),
            blink_ticks: 50,
            cursor_style: CursorStyle::AppleI,
            initial_fg: Rgb222::GREEN,
            initial_bg: Rgb222::BLACK,
        }
    }
}
