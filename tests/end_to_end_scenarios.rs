// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! End-to-end scenario tests: literal byte strings driven through the full
//! parser -> interpreter -> screen pipeline, asserting on observable screen state
//! rather than on internal dispatch calls. Mirrors the conformance-test style used
//! for this codebase's own VT100 parser tests.

use pretty_assertions::assert_eq;
use terminator_core::interpreter::Interpreter;
use terminator_core::screen::Screen;

fn drive(cols: u16, rows: u16, input: &[u8]) -> (Interpreter, Screen) {
    let mut interpreter = Interpreter::new();
    let mut screen = Screen::new(cols, rows);
    let actions = interpreter.feed(input);
    screen.process_actions(&actions);
    (interpreter, screen)
}

#[test]
fn plain_text_with_crlf_wraps_to_next_row() {
    let (_interpreter, screen) = drive(80, 24, b"hello\r\nworld");
    assert_eq!(screen.display_row(0), "hello");
    assert_eq!(screen.display_row(1), "world");
    assert_eq!(screen.cursor(), (5, 1));
}

#[test]
fn cursor_back_then_overwrite() {
    let (_interpreter, screen) = drive(80, 24, b"abc\x1b[2Ddef");
    assert_eq!(screen.display_row(0), "adef");
    assert_eq!(screen.cursor(), (4, 0));
}

#[test]
fn sgr_red_then_reset_colors_only_the_styled_run() {
    let (_interpreter, screen) = drive(80, 24, b"\x1b[31mRED\x1b[0m!");
    let line = screen.line(0).expect("row 0 exists");
    for i in 0..3 {
        let style = line.style_at(i).expect("styled cell");
        assert!(style.has_foreground());
        assert_eq!(style.foreground_index(), 1);
    }
    let reset_style = line.style_at(3).expect("reset cell");
    assert!(!reset_style.has_foreground());
}

#[test]
fn scroll_region_confines_newline_scroll() {
    let (_interpreter, screen) = drive(5, 3, b"\x1b[1;2rline1\nline2\n");
    assert_eq!(screen.display_row(0), "line2");
    assert_eq!(screen.display_row(1), "");
    assert_eq!(screen.display_row(2), "");
}

#[test]
fn save_restore_cursor_discards_overwritten_text() {
    let (_interpreter, screen) = drive(80, 24, b"A\x1b[sB\x1b[uC");
    assert_eq!(screen.display_row(0), "AC");
}

#[test]
fn dec_line_drawing_charset_renders_box_glyphs() {
    let (_interpreter, screen) = drive(80, 24, b"\x1b(0lqk\x1b(B");
    assert_eq!(screen.display_row(0), "\u{250C}\u{2500}\u{2510}");
}

#[test]
fn byte_chunking_does_not_change_final_state() {
    let whole = b"\x1b[31mhello\x1b[0m\r\nworld\x1b[2D!!";

    let mut interpreter_whole = Interpreter::new();
    let mut screen_whole = Screen::new(80, 24);
    let actions = interpreter_whole.feed(whole);
    screen_whole.process_actions(&actions);

    let mut interpreter_chunked = Interpreter::new();
    let mut screen_chunked = Screen::new(80, 24);
    for chunk in whole.chunks(3) {
        let actions = interpreter_chunked.feed(chunk);
        screen_chunked.process_actions(&actions);
    }

    assert_eq!(screen_whole.display_row(0), screen_chunked.display_row(0));
    assert_eq!(screen_whole.display_row(1), screen_chunked.display_row(1));
    assert_eq!(screen_whole.cursor(), screen_chunked.cursor());
}
