//! Terminal state machine.
//!
//! Consumes one byte at a time and mutates the back frame: CR/LF
//! normalization first, then escape continuation, then modal menu routing,
//! then ground dispatch through the [`Parser`]. Owns cursor position and
//! visibility, current colours and attributes, the saved cursor, and the
//! one-shot line-ending suppression flags that let CRLF, LF-only, and
//! CR-only senders all produce exactly one line break.
//!
//! Every mutation it makes raises an internal dirty flag; the logic loop
//! drains the flag with [`Terminal::take_dirty`] and turns it into a swap
//! request (deferred) or an immediate swap (forced) per [`SwapPolicy`].

use crate::cell::CellAttrs;
use crate::color::{ANSI_PALETTE, Rgb222};
use crate::config::{EchoPolicy, TermConfig};
use crate::cursor::CursorOverlay;
use crate::frame::FrameBuffer;
use crate::menu::{MenuKind, MenuOutcome, MenuSession};
use crate::parser::{Action, Parser};

/// The terminal engine: all session state apart from the frames themselves.
#[derive(Debug)]
pub struct Terminal {
    parser: Parser,
    overlay: CursorOverlay,
    menu: Option<MenuSession>,
    cfg: TermConfig,

    cursor_x: u16,
    cursor_y: u16,
    cursor_visible: bool,
    saved_cursor: Option<(u16, u16)>,

    fg: Rgb222,
    bg: Rgb222,
    attrs: CellAttrs,

    // One-shot line-ending suppression (cleared on any non-matching byte).
    skip_next_lf: bool,
    skip_next_cr: bool,
    suppress_next_cr: bool,

    dirty: bool,
}

impl Terminal {
    #[must_use]
    pub fn new(cfg: TermConfig) -> Self {
        Self {
            parser: Parser::new(),
            overlay: CursorOverlay::new(cfg.cursor_style, cfg.blink_ticks),
            menu: None,
            cursor_x: 0,
            cursor_y: 0,
            cursor_visible: true,
            saved_cursor: None,
            fg: cfg.initial_fg,
            bg: cfg.initial_bg,
            attrs: CellAttrs::empty(),
            skip_next_lf: false,
            skip_next_cr: false,
            suppress_next_cr: false,
            cfg,
            dirty: false,
        }
    }

    // ── Accessors ───────────────────────────────────────────────────

    #[must_use]
    pub fn cursor(&self) -> (u16, u16) {
        (self.cursor_x, self.cursor_y)
    }

    #[must_use]
    pub fn colours(&self) -> (Rgb222, Rgb222) {
        (self.fg, self.bg)
    }

    #[must_use]
    pub fn attrs(&self) -> CellAttrs {
        self.attrs
    }

    #[must_use]
    pub fn menu_active(&self) -> bool {
        self.menu.is_some()
    }

    #[must_use]
    pub fn overlay(&self) -> &CursorOverlay {
        &self.overlay
    }

    /// Drain the dirty flag. `true` means the back buffer changed since the
    /// last call and a swap should be arranged.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    // ── Byte pipeline ───────────────────────────────────────────────

    /// Process one input byte against the back frame.
    pub fn process_byte(&mut self, byte: u8, frame: &mut FrameBuffer) {
        // The cursor glyph must never be mistaken for content.
        self.hide_overlay(frame);

        // 1. Line-ending normalization, ahead of everything else.
        if self.suppress_next_cr && byte == b'\r' {
            self.suppress_next_cr = false;
            self.show_overlay(frame);
            return;
        }
        self.suppress_next_cr = false;
        if self.skip_next_lf {
            self.skip_next_lf = false;
            if byte == b'\n' {
                self.show_overlay(frame);
                return;
            }
        }
        if self.skip_next_cr {
            self.skip_next_cr = false;
            if byte == b'\r' {
                self.show_overlay(frame);
                return;
            }
        }

        // 2./3. A sequence in flight keeps the parser; otherwise an open
        // menu owns the byte; otherwise ground dispatch.
        if self.parser.in_sequence() {
            if let Some(action) = self.parser.advance(byte) {
                self.apply_action(action, frame);
            }
        } else if self.menu.is_some() {
            self.route_to_menu(byte, frame);
        } else if let Some(action) = self.parser.advance(byte) {
            self.apply_action(action, frame);
        }

        self.show_overlay(frame);
    }

    /// Convenience: process a whole byte slice.
    pub fn feed(&mut self, bytes: &[u8], frame: &mut FrameBuffer) {
        for &b in bytes {
            self.process_byte(b, frame);
        }
    }

    /// Advance cursor blink by one logic-loop iteration.
    ///
    /// Suspended while a menu is open or the cursor is hidden.
    pub fn tick_blink(&mut self, frame: &mut FrameBuffer) {
        if !self.cursor_visible || self.menu.is_some() {
            return;
        }
        if self.overlay.tick() {
            if self.overlay.drawn() {
                self.overlay.remove(frame, self.bg);
            } else {
                self.overlay
                    .draw(frame, self.cursor_x, self.cursor_y, self.fg, self.bg);
            }
            self.dirty = true;
        }
    }

    // ── Action dispatch ─────────────────────────────────────────────

    fn apply_action(&mut self, action: Action, frame: &mut FrameBuffer) {
        let last_col = frame.cols() - 1;
        let last_row = frame.rows() - 1;
        match action {
            Action::Print(ch) => {
                frame.set_char(self.cursor_x, self.cursor_y, ch);
                frame.set_attrs(self.cursor_x, self.cursor_y, self.attrs);
                frame.set_colour(self.cursor_x, self.cursor_y, self.fg, self.bg);
                self.dirty = true;
                self.cursor_x += 1;
                if self.cursor_x >= frame.cols() {
                    self.new_line(frame);
                }
            }
            Action::CarriageReturn => {
                self.new_line(frame);
                self.skip_next_lf = true;
                if self.cfg.echo == EchoPolicy::SuppressEchoedCr {
                    self.suppress_next_cr = true;
                }
            }
            Action::Newline => {
                self.new_line(frame);
                self.skip_next_cr = true;
            }
            Action::Backspace => {
                if self.cursor_x > 0 {
                    self.cursor_x -= 1;
                    frame.set_char(self.cursor_x, self.cursor_y, b' ');
                    frame.set_attrs(self.cursor_x, self.cursor_y, CellAttrs::empty());
                    frame.set_colour(self.cursor_x, self.cursor_y, self.fg, self.bg);
                    self.dirty = true;
                }
            }
            Action::OpenFgPicker => self.open_menu(MenuKind::FgPicker, frame),
            Action::OpenBgPicker => self.open_menu(MenuKind::BgPicker, frame),
            Action::OpenCursorMenu => self.open_menu(MenuKind::CursorStyle, frame),
            Action::OpenThemeMenu => self.open_menu(MenuKind::ThemePreset, frame),
            Action::CursorUp(n) => self.cursor_y = self.cursor_y.saturating_sub(n),
            Action::CursorDown(n) => self.cursor_y = self.cursor_y.saturating_add(n).min(last_row),
            Action::CursorRight(n) => {
                self.cursor_x = self.cursor_x.saturating_add(n).min(last_col);
            }
            Action::CursorLeft(n) => self.cursor_x = self.cursor_x.saturating_sub(n),
            Action::CursorPosition { row, col } => {
                self.cursor_y = row.min(last_row);
                self.cursor_x = col.min(last_col);
            }
            Action::ClearScreen => {
                frame.clear(self.fg, self.bg);
                self.cursor_x = 0;
                self.cursor_y = 0;
                self.dirty = true;
            }
            Action::EraseLineRight => {
                frame.blank_to_line_end(self.cursor_x, self.cursor_y, self.fg, self.bg);
                self.dirty = true;
            }
            Action::Sgr(params) => {
                for &p in params.as_slice() {
                    self.apply_sgr(p);
                }
            }
            Action::SaveCursor => self.saved_cursor = Some((self.cursor_x, self.cursor_y)),
            Action::RestoreCursor => {
                if let Some((x, y)) = self.saved_cursor {
                    self.cursor_x = x.min(last_col);
                    self.cursor_y = y.min(last_row);
                }
            }
        }
    }

    fn apply_sgr(&mut self, param: u16) {
        match param {
            0 => {
                self.fg = Rgb222::WHITE;
                self.bg = Rgb222::BLACK;
                self.attrs = CellAttrs::empty();
            }
            4 => self.attrs.insert(CellAttrs::UNDERLINE),
            24 => self.attrs.remove(CellAttrs::UNDERLINE),
            5 => self.attrs.insert(CellAttrs::BLINK),
            25 => self.attrs.remove(CellAttrs::BLINK),
            30..=37 => self.fg = ANSI_PALETTE[usize::from(param - 30)],
            40..=47 => self.bg = ANSI_PALETTE[usize::from(param - 40)],
            _ => {} // unsupported rendition parameters are ignored
        }
    }

    /// Column 0, next row; scroll when past the bottom.
    fn new_line(&mut self, frame: &mut FrameBuffer) {
        self.cursor_x = 0;
        self.cursor_y += 1;
        if self.cursor_y >= frame.rows() {
            self.cursor_y = frame.rows() - 1;
            frame.scroll_up(self.fg, self.bg);
        }
        self.dirty = true;
    }

    fn open_menu(&mut self, kind: MenuKind, frame: &mut FrameBuffer) {
        self.menu = Some(MenuSession::open(
            kind,
            frame,
            self.cursor_y,
            self.fg,
            self.bg,
        ));
        self.dirty = true;
    }

    fn route_to_menu(&mut self, byte: u8, frame: &mut FrameBuffer) {
        let Some(menu) = self.menu.as_mut() else {
            return;
        };
        match menu.handle_byte(byte, frame) {
            MenuOutcome::Pending => return,
            MenuOutcome::Cancelled => {}
            MenuOutcome::SelectFg(colour) => self.fg = colour,
            MenuOutcome::SelectBg(colour) => self.bg = colour,
            MenuOutcome::SelectCursor(style) => {
                self.overlay.set_style(style);
                self.cursor_visible = true;
            }
            MenuOutcome::SelectTheme { fg, bg } => {
                self.fg = fg;
                self.bg = bg;
            }
        }
        // Any terminal outcome restored the covered region.
        self.menu = None;
        self.overlay.reset_blink();
        self.dirty = true;
    }

    // ── Cursor overlay plumbing ─────────────────────────────────────

    fn hide_overlay(&mut self, frame: &mut FrameBuffer) {
        if self.overlay.drawn() {
            self.overlay.remove(frame, self.bg);
            self.dirty = true;
        }
    }

    fn show_overlay(&mut self, frame: &mut FrameBuffer) {
        if self.cursor_visible && self.menu.is_none() {
            self.overlay
                .draw(frame, self.cursor_x, self.cursor_y, self.fg, self.bg);
            self.dirty = true;
        }
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new(TermConfig::default())
    }
}
