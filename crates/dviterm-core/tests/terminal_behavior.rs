//! End-to-end byte-stream behaviour of the terminal engine.

use dviterm_core::{
    ANSI_PALETTE, CellAttrs, EchoPolicy, FrameBuffer, Geometry, Rgb222, TermConfig, Terminal,
};

fn fixture() -> (Terminal, FrameBuffer) {
    (
        Terminal::default(),
        FrameBuffer::new(Geometry::vga_640x480()),
    )
}

/// Row contents as a trimmed string, with the cursor overlay lifted.
fn row_text(term: &Terminal, frame: &FrameBuffer, y: u16) -> String {
    // Cursor glyph lives at the cursor cell; mask it out of comparisons.
    let (cx, cy) = term.cursor();
    let mut s = String::new();
    for x in 0..frame.cols() {
        let ch = if (x, y) == (cx, cy) && term.overlay().drawn() {
            b' '
        } else {
            frame.char_at(x, y).unwrap_or(b' ')
        };
        s.push(char::from(ch));
    }
    s.trim_end().to_string()
}

#[test]
fn line_break_counting_across_ending_conventions() {
    // Every convention produces exactly one break per logical line.
    for input in [&b"a\r\nb\r\nc"[..], b"a\nb\nc", b"a\n\rb\n\rc"] {
        let (mut term, mut frame) = fixture();
        term.feed(input, &mut frame);
        assert_eq!(row_text(&term, &frame, 0), "a", "{input:?}");
        assert_eq!(row_text(&term, &frame, 1), "b", "{input:?}");
        assert_eq!(row_text(&term, &frame, 2), "c", "{input:?}");
        assert_eq!(term.cursor().1, 2, "{input:?}");
    }
}

#[test]
fn cr_only_senders_work_under_both_echo_policies() {
    for echo in [EchoPolicy::SuppressEchoedCr, EchoPolicy::PassThrough] {
        let mut term = Terminal::new(TermConfig {
            echo,
            ..TermConfig::default()
        });
        let mut frame = FrameBuffer::new(Geometry::vga_640x480());
        term.feed(b"a\rb\rc", &mut frame);
        assert_eq!(row_text(&term, &frame, 1), "b", "{echo:?}");
        assert_eq!(row_text(&term, &frame, 2), "c", "{echo:?}");
    }
}

#[test]
fn clear_screen_then_write_uses_current_colours() {
    let (mut term, mut frame) = fixture();
    term.feed(b"\x1b[32;40m\x1b[2JG", &mut frame);
    let (fg, bg) = frame.colour_at(0, 0).unwrap();
    assert_eq!(fg, ANSI_PALETTE[2]);
    assert_eq!(bg, ANSI_PALETTE[0]);
    // The cleared remainder carries the same colours.
    let (fg, bg) = frame.colour_at(40, 15).unwrap();
    assert_eq!(fg, ANSI_PALETTE[2]);
    assert_eq!(bg, ANSI_PALETTE[0]);
}

#[test]
fn scrolling_is_destructive_at_the_top() {
    let (mut term, mut frame) = fixture();
    for i in 0..35 {
        term.feed(format!("line{i}\n").as_bytes(), &mut frame);
    }
    // 35 lines on a 30-row grid: the first five scrolled away.
    assert_eq!(row_text(&term, &frame, 0), "line6");
    assert_eq!(row_text(&term, &frame, 28), "line34");
}

#[test]
fn wrap_at_the_right_edge_continues_on_the_next_row() {
    let (mut term, mut frame) = fixture();
    let long: Vec<u8> = (0..85).map(|i| b'a' + (i % 26)).collect();
    term.feed(&long, &mut frame);
    assert_eq!(frame.char_at(79, 0), Some(b'a' + (79 % 26)));
    assert_eq!(frame.char_at(0, 1), Some(b'a' + (80 % 26)));
    assert_eq!(term.cursor(), (5, 1));
}

#[test]
fn interleaved_escape_and_text_stream() {
    let (mut term, mut frame) = fixture();
    term.feed(b"plain \x1b[31mred\x1b[0m done", &mut frame);
    assert_eq!(row_text(&term, &frame, 0), "plain red done");
    let (fg, _) = frame.colour_at(6, 0).unwrap();
    assert_eq!(fg, ANSI_PALETTE[1]);
    let (fg, _) = frame.colour_at(10, 0).unwrap();
    assert_eq!(fg, Rgb222::WHITE);
}

#[test]
fn underline_and_blink_attributes_land_in_cells() {
    let (mut term, mut frame) = fixture();
    term.feed(b"\x1b[4mU\x1b[24m\x1b[5mB\x1b[25mN", &mut frame);
    assert_eq!(frame.cell_at(0, 0).unwrap().attrs, CellAttrs::UNDERLINE);
    assert_eq!(frame.cell_at(1, 0).unwrap().attrs, CellAttrs::BLINK);
    assert!(frame.cell_at(2, 0).unwrap().attrs.is_empty());
}

#[test]
fn malformed_sequences_do_not_derail_the_stream() {
    let (mut term, mut frame) = fixture();
    // Unknown final, overlong parameter list, bare ESC, lone '['.
    term.feed(b"\x1b[99Z", &mut frame);
    term.feed(b"\x1b[1;2;3;4;5;6;7;8m", &mut frame);
    term.feed(b"\x1bQ", &mut frame);
    term.feed(b"ok[", &mut frame);
    assert_eq!(row_text(&term, &frame, 0), "ok[");
}

#[test]
fn picker_menu_restores_the_screen_under_it() {
    let (mut term, mut frame) = fixture();
    for _ in 0..5 {
        term.feed(b"0123456789012345678901234567890123456789\n", &mut frame);
    }
    let before: Vec<String> = (0..10).map(|y| row_text(&term, &frame, y)).collect();
    term.feed(&[0x02], &mut frame); // background picker
    term.feed(b"07", &mut frame);
    assert_eq!(term.colours().1, Rgb222::new(7));
    let after: Vec<String> = (0..10).map(|y| row_text(&term, &frame, y)).collect();
    assert_eq!(before, after);
}

#[test]
fn invalid_picker_code_keeps_the_menu_open() {
    let (mut term, mut frame) = fixture();
    term.feed(&[0x06], &mut frame);
    term.feed(b"99", &mut frame); // out of range, digits reset
    assert!(term.menu_active());
    term.feed(b"63", &mut frame);
    assert!(!term.menu_active());
    assert_eq!(term.colours().0, Rgb222::new(63));
}

#[test]
fn escape_cancels_any_menu_without_changing_state() {
    let colours_before = Terminal::default().colours();
    for opener in [0x06u8, 0x02, 0x0E, 0x14] {
        let (mut term, mut frame) = fixture();
        term.feed(b"keep me", &mut frame);
        term.feed(&[opener], &mut frame);
        assert!(term.menu_active(), "opener {opener:#04x}");
        term.feed(&[0x1B], &mut frame);
        assert!(!term.menu_active(), "opener {opener:#04x}");
        assert_eq!(term.colours(), colours_before, "opener {opener:#04x}");
        assert_eq!(row_text(&term, &frame, 0), "keep me", "opener {opener:#04x}");
    }
}
