//! Escape/CSI parser.
//!
//! A deterministic state machine that converts the input byte stream into
//! [`Action`]s for the terminal engine. The supported grammar is a small
//! fixed subset: `ESC [ <param>(;<param>)* <final>` with up to four
//! non-negative decimal parameters and finals in `{A,B,C,D,H,J,K,m,s,u}`,
//! plus the single-byte modal-menu controls outside of escape sequences.
//!
//! Anything else is discarded without error, and the parse state is
//! unconditionally reset after every dispatch attempt so a malformed
//! sequence cannot wedge the machine. The parser holds no heap state: the
//! parameter list is a fixed four-slot array (extra parameters are dropped)
//! and digit accumulation saturates.

/// Maximum CSI parameters kept; extras are dropped, not an error.
pub const MAX_PARAMS: usize = 4;

/// Single-byte modal controls (outside the CSI grammar).
pub const CTRL_FG_PICKER: u8 = 0x06; // Ctrl+F
pub const CTRL_BG_PICKER: u8 = 0x02; // Ctrl+B
pub const CTRL_CURSOR_MENU: u8 = 0x0E; // Ctrl+N
pub const CTRL_THEME_MENU: u8 = 0x14; // Ctrl+T

/// Fixed-capacity CSI parameter list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CsiParams {
    values: [u16; MAX_PARAMS],
    len: u8,
}

impl CsiParams {
    /// Append a parameter; silently dropped once four are held.
    pub fn push(&mut self, value: u16) {
        if (self.len as usize) < MAX_PARAMS {
            self.values[self.len as usize] = value;
            self.len += 1;
        }
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u16] {
        &self.values[..self.len as usize]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn first(&self) -> Option<u16> {
        self.as_slice().first().copied()
    }

    fn clear(&mut self) {
        self.len = 0;
    }
}

/// Parser output actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Write the byte as a glyph at the cursor (any byte with no other role;
    /// the font covers all 256 codes).
    Print(u8),
    /// Line feed (`\n`).
    Newline,
    /// Carriage return (`\r`).
    CarriageReturn,
    /// Backspace (`\x08`).
    Backspace,
    /// Open the foreground colour picker (Ctrl+F).
    OpenFgPicker,
    /// Open the background colour picker (Ctrl+B).
    OpenBgPicker,
    /// Open the cursor style menu (Ctrl+N).
    OpenCursorMenu,
    /// Enter theme-preset selection (Ctrl+T).
    OpenThemeMenu,
    /// CUU (`CSI Ps A`): cursor up by count (default 1), floored at row 0.
    CursorUp(u16),
    /// CUD (`CSI Ps B`): cursor down by count, ceiled at the last row.
    CursorDown(u16),
    /// CUF (`CSI Ps C`): cursor right by count, ceiled at the last column.
    CursorRight(u16),
    /// CUB (`CSI Ps D`): cursor left by count, floored at column 0.
    CursorLeft(u16),
    /// CUP (`CSI Pr ; Pc H`): absolute position, decoded to 0-indexed.
    CursorPosition { row: u16, col: u16 },
    /// ED 2 (`CSI 2 J`): clear the screen and home the cursor. Other ED
    /// modes are not supported and never reach the terminal.
    ClearScreen,
    /// EL (`CSI K`): blank from the cursor column to end of row.
    EraseLineRight,
    /// SGR (`CSI ... m`): colour/attribute parameters.
    Sgr(CsiParams),
    /// `CSI s`: save the cursor position.
    SaveCursor,
    /// `CSI u`: restore the saved cursor position (no-op if none).
    RestoreCursor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Ground,
    Esc,
    Csi,
}

/// Escape-sequence parser state.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    state: State,
    params: CsiParams,
    /// Digit accumulator for the parameter currently being read.
    /// `None` while no digit has arrived since the last separator.
    current: Option<u16>,
}

impl Default for State {
    fn default() -> Self {
        State::Ground
    }
}

impl Parser {
    /// Create a parser in ground state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the parser is mid-sequence (escape or CSI mode).
    ///
    /// While true, bytes must keep flowing here rather than to a modal
    /// overlay — an escape sequence cannot be interrupted by menu routing.
    #[must_use]
    pub fn in_sequence(&self) -> bool {
        self.state != State::Ground
    }

    /// Advance by one byte; returns an action when one completes.
    pub fn advance(&mut self, byte: u8) -> Option<Action> {
        match self.state {
            State::Ground => self.advance_ground(byte),
            State::Esc => self.advance_esc(byte),
            State::Csi => self.advance_csi(byte),
        }
    }

    fn advance_ground(&mut self, byte: u8) -> Option<Action> {
        match byte {
            0x1B => {
                self.state = State::Esc;
                None
            }
            b'\r' => Some(Action::CarriageReturn),
            b'\n' => Some(Action::Newline),
            0x08 => Some(Action::Backspace),
            CTRL_FG_PICKER => Some(Action::OpenFgPicker),
            CTRL_BG_PICKER => Some(Action::OpenBgPicker),
            CTRL_CURSOR_MENU => Some(Action::OpenCursorMenu),
            CTRL_THEME_MENU => Some(Action::OpenThemeMenu),
            // Everything else, including the high half of the code page,
            // is a font glyph.
            _ => Some(Action::Print(byte)),
        }
    }

    fn advance_esc(&mut self, byte: u8) -> Option<Action> {
        if byte == b'[' {
            self.state = State::Csi;
            self.params.clear();
            self.current = None;
        } else {
            // Unsupported single-character escape: silently discarded.
            self.state = State::Ground;
        }
        None
    }

    fn advance_csi(&mut self, byte: u8) -> Option<Action> {
        match byte {
            b'0'..=b'9' => {
                let digit = u16::from(byte - b'0');
                let acc = self.current.unwrap_or(0);
                self.current = Some(acc.saturating_mul(10).saturating_add(digit));
                None
            }
            b';' => {
                // Empty parameter defaults to 0.
                self.params.push(self.current.take().unwrap_or(0));
                None
            }
            _ => {
                if let Some(value) = self.current.take() {
                    self.params.push(value);
                }
                let action = Self::dispatch(&self.params, byte);
                // Reset unconditionally: a bad sequence must not wedge us.
                self.params.clear();
                self.state = State::Ground;
                action
            }
        }
    }

    /// Decode a finished CSI sequence. Unknown finals yield `None`.
    fn dispatch(params: &CsiParams, final_byte: u8) -> Option<Action> {
        match final_byte {
            b'A' => Some(Action::CursorUp(count_or_one(params.first()))),
            b'B' => Some(Action::CursorDown(count_or_one(params.first()))),
            b'C' => Some(Action::CursorRight(count_or_one(params.first()))),
            b'D' => Some(Action::CursorLeft(count_or_one(params.first()))),
            b'H' => {
                // 1-indexed input; 0 and missing both mean 1.
                let row = count_or_one(params.first()) - 1;
                let col = count_or_one(params.as_slice().get(1).copied()) - 1;
                Some(Action::CursorPosition { row, col })
            }
            b'J' => {
                // Only the full-clear form is supported.
                if params.len() == 1 && params.first() == Some(2) {
                    Some(Action::ClearScreen)
                } else {
                    None
                }
            }
            b'K' => Some(Action::EraseLineRight),
            b'm' => Some(Action::Sgr(*params)),
            b's' => Some(Action::SaveCursor),
            b'u' => Some(Action::RestoreCursor),
            _ => None,
        }
    }
}

fn count_or_one(value: Option<u16>) -> u16 {
    value.unwrap_or(1).max(1)
}
