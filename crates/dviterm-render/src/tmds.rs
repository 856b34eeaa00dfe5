//! TMDS 8b/10b symbol encoding and the pre-encoded palette table.
//!
//! Each colour plane of a scanline is emitted as a stream of 10-bit TMDS
//! symbols, two symbols packed per `u32` (low symbol in bits 0..10, high
//! symbol in bits 10..20). Encoding per pixel at draw time would never fit
//! the scanline deadline, so all of it is front-loaded into a 256-entry
//! lookup table covering every `(colour nibble, font nibble)` combination:
//! four pixels in, two packed words out.
//!
//! A plane carries 2-bit intensity, expanded to the byte levels `0x00`,
//! `0x55`, `0xAA`, `0xFF` before encoding. Running disparity is tracked
//! within each 4-pixel entry and starts balanced, so entries can be
//! concatenated in any order without accumulating DC bias worth caring
//! about for these four levels.

/// Encode one 8-bit video byte into a 10-bit TMDS symbol.
///
/// `disparity` is the running bias of previously emitted symbols, updated
/// in place. The returned symbol occupies the low 10 bits.
#[must_use]
pub fn encode_byte(d: u8, disparity: &mut i32) -> u16 {
    let ones = u16::from(d.count_ones() as u8);

    // Stage 1: transition minimization (XOR or XNOR chain).
    let use_xnor = ones > 4 || (ones == 4 && d & 1 == 0);
    let mut q_m: u16 = u16::from(d & 1);
    for i in 1..8 {
        let prev = (q_m >> (i - 1)) & 1;
        let bit = u16::from((d >> i) & 1);
        let next = if use_xnor { !(prev ^ bit) & 1 } else { prev ^ bit };
        q_m |= next << i;
    }
    if !use_xnor {
        q_m |= 1 << 8;
    }

    // Stage 2: DC balance via conditional inversion of the low 8 bits.
    let ones_qm = i32::from((q_m & 0xFF).count_ones() as u16);
    let zeros_qm = 8 - ones_qm;
    let bit8 = (q_m >> 8) & 1;

    if *disparity == 0 || ones_qm == zeros_qm {
        if bit8 == 0 {
            *disparity += zeros_qm - ones_qm;
            (1 << 9) | (bit8 << 8) | (!q_m & 0xFF)
        } else {
            *disparity += ones_qm - zeros_qm;
            (bit8 << 8) | (q_m & 0xFF)
        }
    } else if (*disparity > 0 && ones_qm > zeros_qm) || (*disparity < 0 && ones_qm < zeros_qm) {
        *disparity += 2 * i32::from(bit8) + zeros_qm - ones_qm;
        (1 << 9) | (bit8 << 8) | (!q_m & 0xFF)
    } else {
        *disparity += ones_qm - zeros_qm - 2 * i32::from(1 - bit8);
        (bit8 << 8) | (q_m & 0xFF)
    }
}

/// Decode a 10-bit TMDS symbol back to its video byte.
#[must_use]
pub fn decode_symbol(sym: u16) -> u8 {
    let mut q = (sym & 0xFF) as u8;
    if sym & (1 << 9) != 0 {
        q = !q;
    }
    let xor_mode = sym & (1 << 8) != 0;
    let mut d = q & 1;
    for i in 1..8 {
        let prev = (q >> (i - 1)) & 1;
        let bit = (q >> i) & 1;
        let out = if xor_mode { prev ^ bit } else { !(prev ^ bit) & 1 };
        d |= out << i;
    }
    d
}

/// Expand a 2-bit plane level to its full-scale byte.
#[must_use]
pub const fn expand_level(bits: u8) -> u8 {
    (bits & 0b11).wrapping_mul(0x55)
}

// ── Palette table ───────────────────────────────────────────────────

/// Pre-encoded symbols for every `(colour nibble, font nibble)` pair.
///
/// Index layout: bits 4..8 are the colour nibble (low 2 bits foreground
/// level, high 2 bits background level), bits 0..4 the font nibble with
/// bit 0 the leftmost pixel. Each entry holds four pixels as two packed
/// words.
#[derive(Debug)]
pub struct TmdsLut {
    entries: Box<[[u32; 2]; 256]>,
}

impl TmdsLut {
    #[must_use]
    pub fn new() -> Self {
        let mut entries = Box::new([[0u32; 2]; 256]);
        for (index, entry) in entries.iter_mut().enumerate() {
            let font_nibble = (index & 0x0F) as u8;
            let fg_level = expand_level((index >> 4) as u8);
            let bg_level = expand_level((index >> 6) as u8);

            let mut disparity = 0i32;
            let mut symbols = [0u16; 4];
            for (pixel, sym) in symbols.iter_mut().enumerate() {
                let lit = font_nibble & (1 << pixel) != 0;
                let byte = if lit { fg_level } else { bg_level };
                *sym = encode_byte(byte, &mut disparity);
            }
            entry[0] = u32::from(symbols[0]) | (u32::from(symbols[1]) << 10);
            entry[1] = u32::from(symbols[2]) | (u32::from(symbols[3]) << 10);
        }
        Self { entries }
    }

    /// Two packed words for four pixels.
    #[inline]
    #[must_use]
    pub fn lookup(&self, colour_nibble: u8, font_nibble: u8) -> [u32; 2] {
        self.entries[usize::from((colour_nibble << 4) | (font_nibble & 0x0F))]
    }
}

impl Default for TmdsLut {
    fn default() -> Self {
        Self::new()
    }
}

/// Unpack the four pixel bytes out of a LUT entry, for inspection.
#[must_use]
pub fn decode_entry(entry: [u32; 2]) -> [u8; 4] {
    [
        decode_symbol((entry[0] & 0x3FF) as u16),
        decode_symbol(((entry[0] >> 10) & 0x3FF) as u16),
        decode_symbol((entry[1] & 0x3FF) as u16),
        decode_symbol(((entry[1] >> 10) & 0x3FF) as u16),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balance(sym: u16) -> i32 {
        let ones = (sym & 0x3FF).count_ones() as i32;
        ones - (10 - ones)
    }

    #[test]
    fn every_byte_round_trips_through_a_symbol() {
        for d in 0..=255u8 {
            let mut disp = 0;
            let sym = encode_byte(d, &mut disp);
            assert_eq!(decode_symbol(sym), d, "byte {d:#04x}");
        }
    }

    #[test]
    fn symbols_use_exactly_ten_bits() {
        for d in 0..=255u8 {
            let mut disp = 3;
            assert_eq!(encode_byte(d, &mut disp) & !0x3FF, 0);
            let mut disp = -3;
            assert_eq!(encode_byte(d, &mut disp) & !0x3FF, 0);
        }
    }

    #[test]
    fn disparity_tracks_the_emitted_symbol_bias() {
        for d in 0..=255u8 {
            let mut disp = 0;
            let mut total = 0;
            // A run of the same byte must keep the tracked disparity in
            // sync with the actual bit bias of what was emitted.
            for _ in 0..16 {
                let sym = encode_byte(d, &mut disp);
                total += balance(sym);
                assert_eq!(disp, total, "byte {d:#04x}");
            }
            assert!(disp.abs() <= 10, "byte {d:#04x} diverges");
        }
    }

    #[test]
    fn lut_entries_reproduce_their_pixels() {
        let lut = TmdsLut::new();
        for colour in 0..16u8 {
            let fg = expand_level(colour);
            let bg = expand_level(colour >> 2);
            for font in 0..16u8 {
                let pixels = decode_entry(lut.lookup(colour, font));
                for (i, px) in pixels.iter().enumerate() {
                    let want = if font & (1 << i) != 0 { fg } else { bg };
                    assert_eq!(*px, want, "colour {colour:#x} font {font:#x} px {i}");
                }
            }
        }
    }

    #[test]
    fn expand_level_covers_the_four_intensities() {
        assert_eq!(expand_level(0), 0x00);
        assert_eq!(expand_level(1), 0x55);
        assert_eq!(expand_level(2), 0xAA);
        assert_eq!(expand_level(3), 0xFF);
        assert_eq!(expand_level(0b111), 0xFF);
    }
}
