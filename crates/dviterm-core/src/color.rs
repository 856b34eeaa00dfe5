//! 6-bit RGB222 colour values and the fixed palettes built on them.
//!
//! The wire format is `00RRGGBB`: two bits per channel, 64 colours total.
//! Colour data is stored across three bit-planes — plane 0 carries the blue
//! pair, plane 1 green, plane 2 red — so a cell contributes one 2-bit field
//! per plane for each of foreground and background.

/// A packed 6-bit RGB colour (`00RRGGBB`), range 0–63.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb222(u8);

impl Rgb222 {
    pub const BLACK: Self = Self(0);
    pub const WHITE: Self = Self(63);
    pub const GREEN: Self = Self(12);

    /// Build from a raw 6-bit value; out-of-range bits are masked off.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value & 0x3F)
    }

    /// Build from per-channel 2-bit intensities.
    #[must_use]
    pub const fn from_channels(r: u8, g: u8, b: u8) -> Self {
        Self(((r & 0b11) << 4) | ((g & 0b11) << 2) | (b & 0b11))
    }

    /// The raw 6-bit value.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// The 2-bit channel pair carried by the given colour plane
    /// (0 = blue, 1 = green, 2 = red).
    #[must_use]
    pub const fn plane_bits(self, plane: usize) -> u8 {
        (self.0 >> (2 * (plane % 3))) & 0b11
    }

    /// Expand one channel's 2-bit level to 8 bits (0x00, 0x55, 0xAA, 0xFF).
    #[must_use]
    pub const fn expand_plane(self, plane: usize) -> u8 {
        self.plane_bits(plane) * 0x55
    }
}

/// The 8-entry palette behind SGR 30–37 (foreground) and 40–47 (background).
///
/// The mapping is not linear in the colour code; each entry is a hand-picked
/// 6-bit value.
pub const ANSI_PALETTE: [Rgb222; 8] = [
    Rgb222::new(0),  // black
    Rgb222::new(48), // red
    Rgb222::new(12), // green
    Rgb222::new(60), // yellow
    Rgb222::new(3),  // blue
    Rgb222::new(51), // magenta
    Rgb222::new(15), // cyan
    Rgb222::new(63), // white
];

/// Theme presets selectable via the theme menu (Ctrl+T then `0`–`9`):
/// `(foreground, background)` pairs.
pub const THEME_PRESETS: [(Rgb222, Rgb222); 10] = [
    (Rgb222::new(12), Rgb222::new(0)),  // green on black (VT100 / Apple IIe)
    (Rgb222::new(60), Rgb222::new(0)),  // amber on black (Wyse / VT220)
    (Rgb222::new(63), Rgb222::new(3)),  // white on blue (DOS / PC BIOS)
    (Rgb222::new(0), Rgb222::new(63)),  // black on white (Mac Classic)
    (Rgb222::new(11), Rgb222::new(3)),  // light blue on blue (C64)
    (Rgb222::new(60), Rgb222::new(3)),  // yellow on blue (Turbo Pascal)
    (Rgb222::new(51), Rgb222::new(0)),  // magenta on black (ZX Spectrum)
    (Rgb222::new(42), Rgb222::new(0)),  // light gray on black (DOS text mode)
    (Rgb222::new(15), Rgb222::new(0)),  // cyan on black
    (Rgb222::new(48), Rgb222::new(21)), // red on dark gray (alert)
];
