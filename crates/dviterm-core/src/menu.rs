//! Modal menu overlays: colour pickers, cursor-style menu, theme presets.
//!
//! A menu session snapshots the rectangle of cells it is about to cover and
//! restores it verbatim when the session ends, so menus are non-destructive
//! no matter what they draw. While a session is active it owns byte routing:
//! digits accumulate into a two-digit colour code, backspace erases, ESC
//! cancels; everything else is ignored and the session stays open.
//!
//! The theme-preset session is the odd one out: it draws nothing and waits
//! for a single digit.

use crate::cell::Cell;
use crate::color::{Rgb222, THEME_PRESETS};
use crate::cursor::CursorStyle;
use crate::frame::FrameBuffer;

/// Snapshot rectangle dimensions (covers the largest menu).
pub const MENU_ROWS: u16 = 12;
pub const MENU_COLS: u16 = 34;

/// Which modal overlay is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuKind {
    FgPicker,
    BgPicker,
    CursorStyle,
    ThemePreset,
}

/// What a routed byte did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOutcome {
    /// Session still active; byte consumed (possibly ignored).
    Pending,
    /// ESC: session over, screen restored, nothing selected.
    Cancelled,
    SelectFg(Rgb222),
    SelectBg(Rgb222),
    SelectCursor(CursorStyle),
    SelectTheme { fg: Rgb222, bg: Rgb222 },
}

/// One active modal overlay.
#[derive(Debug, Clone)]
pub struct MenuSession {
    kind: MenuKind,
    /// Top-left of the saved rectangle.
    origin: (u16, u16),
    /// Saved cells, row-major `MENU_ROWS × MENU_COLS`; empty for the
    /// (undrawn) theme session.
    saved: Vec<Cell>,
    digits: [u8; 2],
    digit_len: u8,
}

impl MenuSession {
    /// Open a menu: snapshot the covered region and draw (except themes).
    ///
    /// The menu sits just below the cursor row when it fits, else flush with
    /// the bottom of the grid.
    #[must_use]
    pub fn open(
        kind: MenuKind,
        frame: &mut FrameBuffer,
        cursor_y: u16,
        fg: Rgb222,
        bg: Rgb222,
    ) -> Self {
        if kind == MenuKind::ThemePreset {
            return Self {
                kind,
                origin: (0, 0),
                saved: Vec::new(),
                digits: [0; 2],
                digit_len: 0,
            };
        }

        let content_y = if cursor_y + MENU_ROWS < frame.rows() {
            cursor_y + 1
        } else {
            frame.rows().saturating_sub(MENU_ROWS)
        };
        let top = content_y.saturating_sub(1);
        let left = 1;

        let mut session = Self {
            kind,
            origin: (left, top),
            saved: Vec::with_capacity(MENU_ROWS as usize * MENU_COLS as usize),
            digits: [0; 2],
            digit_len: 0,
        };
        for row in 0..MENU_ROWS {
            for col in 0..MENU_COLS {
                session.saved.push(
                    frame
                        .cell_at(left + col, top + row)
                        .unwrap_or_else(|| Cell::blank(fg, bg)),
                );
            }
        }

        match kind {
            MenuKind::FgPicker => session.draw_colour_menu(
                frame,
                b"Foreground Color Menu",
                b"Enter color code (00-63):",
                fg,
                bg,
            ),
            MenuKind::BgPicker => session.draw_colour_menu(
                frame,
                b"Background Color Menu",
                b"Enter color code (00-63):",
                fg,
                bg,
            ),
            MenuKind::CursorStyle => session.draw_cursor_menu(frame, fg, bg),
            MenuKind::ThemePreset => unreachable!("theme sessions return early"),
        }
        session
    }

    #[must_use]
    pub fn kind(&self) -> MenuKind {
        self.kind
    }

    /// Route one byte to the session's mini state machine.
    ///
    /// On any terminal outcome the saved region has already been restored.
    pub fn handle_byte(&mut self, byte: u8, frame: &mut FrameBuffer) -> MenuOutcome {
        match self.kind {
            MenuKind::FgPicker | MenuKind::BgPicker => self.handle_picker_byte(byte, frame),
            MenuKind::CursorStyle => match byte {
                0x1B => {
                    self.restore(frame);
                    MenuOutcome::Cancelled
                }
                _ => match CursorStyle::from_menu_digit(byte) {
                    Some(style) => {
                        self.restore(frame);
                        MenuOutcome::SelectCursor(style)
                    }
                    None => MenuOutcome::Pending,
                },
            },
            MenuKind::ThemePreset => match byte {
                0x1B => MenuOutcome::Cancelled,
                b'0'..=b'9' => {
                    let (fg, bg) = THEME_PRESETS[usize::from(byte - b'0')];
                    MenuOutcome::SelectTheme { fg, bg }
                }
                _ => MenuOutcome::Pending,
            },
        }
    }

    fn handle_picker_byte(&mut self, byte: u8, frame: &mut FrameBuffer) -> MenuOutcome {
        match byte {
            b'0'..=b'9' if self.digit_len < 2 => {
                self.digits[usize::from(self.digit_len)] = byte - b'0';
                self.digit_len += 1;
                if self.digit_len < 2 {
                    return MenuOutcome::Pending;
                }
                let code = self.digits[0] * 10 + self.digits[1];
                if code >= 64 {
                    // Invalid code: stay open and await a fresh entry.
                    self.digit_len = 0;
                    return MenuOutcome::Pending;
                }
                self.restore(frame);
                let colour = Rgb222::new(code);
                if self.kind == MenuKind::FgPicker {
                    MenuOutcome::SelectFg(colour)
                } else {
                    MenuOutcome::SelectBg(colour)
                }
            }
            0x08 if self.digit_len > 0 => {
                self.digit_len -= 1;
                MenuOutcome::Pending
            }
            0x1B => {
                self.restore(frame);
                MenuOutcome::Cancelled
            }
            _ => MenuOutcome::Pending,
        }
    }

    /// Put the saved rectangle back, cell for cell.
    fn restore(&self, frame: &mut FrameBuffer) {
        if self.saved.is_empty() {
            return;
        }
        let (left, top) = self.origin;
        for row in 0..MENU_ROWS {
            for col in 0..MENU_COLS {
                let idx = row as usize * MENU_COLS as usize + col as usize;
                frame.set_cell(left + col, top + row, self.saved[idx]);
            }
        }
    }

    // ── Drawing ─────────────────────────────────────────────────────

    /// Bordered box: title, 8×8 grid of two-digit codes each painted in its
    /// own colour with a sample block, and an input prompt.
    fn draw_colour_menu(
        &self,
        frame: &mut FrameBuffer,
        title: &[u8],
        prompt: &[u8],
        fg: Rgb222,
        bg: Rgb222,
    ) {
        let (left, top) = self.origin;
        let x = left + 1;
        let y = top + 1;

        draw_border(frame, left, top, 32, 11);
        draw_text(frame, x, y, title, fg, bg);

        for row in 0..8u16 {
            for col in 0..8u16 {
                let code = (row * 8 + col) as u8;
                let sample_bg = Rgb222::new(code);
                let pos_x = x + col * 4;
                let pos_y = y + row + 1;
                frame.set_char(pos_x, pos_y, b'0' + code / 10);
                frame.set_char(pos_x + 1, pos_y, b'0' + code % 10);
                frame.set_colour(pos_x, pos_y, Rgb222::WHITE, sample_bg);
                frame.set_colour(pos_x + 1, pos_y, Rgb222::WHITE, sample_bg);
                frame.set_char(pos_x + 2, pos_y, 0xDB);
                frame.set_colour(pos_x + 2, pos_y, Rgb222::WHITE, sample_bg);
            }
        }

        draw_text(frame, x, y + 9, prompt, fg, bg);
    }

    fn draw_cursor_menu(&self, frame: &mut FrameBuffer, fg: Rgb222, bg: Rgb222) {
        const LINES: [&[u8]; 8] = [
            b"Cursor Style Menu:",
            b"[1] Block        \xDB",
            b"[2] Underline    _",
            b"[3] Bar          |",
            b"[4] Apple I      @",
            b"[5] Shaded Block \xB2",
            b"[6] Arrow        >",
            b"Select style: ",
        ];
        let (left, top) = self.origin;
        let x = left + 1;
        let y = top + 1;

        draw_border(frame, left, top, 32, LINES.len() as u16 + 1);
        for (i, line) in LINES.iter().enumerate() {
            draw_text(frame, x, y + i as u16, line, fg, bg);
        }
    }
}

/// `+--+` / `|  |` box outline. Characters only; the covered cells keep
/// whatever colour they had.
fn draw_border(frame: &mut FrameBuffer, left: u16, top: u16, width: u16, bottom_offset: u16) {
    let right = left + width;
    let bottom = top + bottom_offset;
    frame.set_char(left, top, b'+');
    frame.set_char(right, top, b'+');
    frame.set_char(left, bottom, b'+');
    frame.set_char(right, bottom, b'+');
    for i in 1..width {
        frame.set_char(left + i, top, b'-');
        frame.set_char(left + i, bottom, b'-');
    }
    for i in 1..bottom_offset {
        frame.set_char(left, top + i, b'|');
        frame.set_char(right, top + i, b'|');
    }
}

fn draw_text(frame: &mut FrameBuffer, x: u16, y: u16, text: &[u8], fg: Rgb222, bg: Rgb222) {
    for (i, &ch) in text.iter().enumerate() {
        frame.set_char(x + i as u16, y, ch);
        frame.set_colour(x + i as u16, y, fg, bg);
    }
}
