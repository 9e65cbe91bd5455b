// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! [`TerminalAction`]: the closed set of screen-mutation actions emitted by the escape
//! parser and terminal interpreter, and applied to the screen model as a batch.
//!
//! This is the "tagged variant" realization of the parser/screen boundary: rather than
//! an inheritance-plus-visitor class family, every recognised byte sequence lowers to
//! one of these variants, and [`crate::screen::Screen::process_actions`] dispatches on
//! them through a single `match`.

use crate::style::Style;

/// One of the four special characters that bypass both the escape parser's CSI/OSC
/// states and the plain-text accumulator, carrying their own movement semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialChar {
    /// Line feed (`\n`, `0x0A`). Also produced for vertical tab.
    LineFeed,
    /// Carriage return (`\r`, `0x0D`).
    CarriageReturn,
    /// Backspace (`0x08`).
    Backspace,
    /// Horizontal tab (`\t`, `0x09`).
    Tab,
}

/// Absolute vs. relative cursor positioning, matching CSI `H`/`f` (absolute) against
/// CSI `A`/`B`/`C`/`D` (relative, single-axis).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMove {
    /// Move to an absolute `(col, row)`, both 0-based internally.
    Absolute { col: u16, row: u16 },
    /// Move the column by a signed delta, clamped to `[0, cols)`.
    RelativeCol(i32),
    /// Move the row by a signed delta, clamped to `[0, rows)`.
    RelativeRow(i32),
}

/// Which of G0-G3 a `DesignateCharset`/`InvokeCharset` action refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharsetSlot {
    G0,
    G1,
    G2,
    G3,
}

/// The character set a charset slot can be designated to, per the subset this core
/// recognises (ASCII passthrough, DEC special graphics, and the UK variant).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    Ascii,
    DecSpecialGraphics,
    Uk,
}

/// A DEC private or ANSI mode toggled by CSI `h`/`l`. Only the modes this core acts on
/// are named; unrecognised private modes are parsed but never produce a `SetMode`
/// action (see the escape parser's CSI dispatch).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// DECAWM, autowrap.
    AutoWrap,
    /// DECOM, origin mode.
    OriginMode,
    /// IRM, insert/replace.
    InsertMode,
    /// LNM, linefeed/new-line.
    LineFeedNewLine,
    /// DECSCNM-adjacent: use the alternate screen buffer.
    AlternateScreen,
}

/// Which cells a `TabClear` action removes stops from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabClearMode {
    /// Clear the stop at the current column only.
    Current,
    /// Clear every stop on the line.
    All,
}

/// The closed set of screen-mutation actions emitted by [`crate::parser`] and
/// [`crate::interpreter`]. See module docs.
#[derive(Debug, Clone, PartialEq)]
pub enum TerminalAction {
    /// A run of printable text, already UTF-8 decoded and charset-translated.
    PlainText(String),
    SpecialChar(SpecialChar),
    SetStyle(Style),
    CursorMove(CursorMove),
    /// CSI `J`: erase in display, mode 0/1/2.
    EraseInDisplay(u8),
    /// CSI `K`: erase in line, mode 0/1/2.
    EraseInLine(u8),
    /// CSI `L`: insert `n` blank lines at the cursor row.
    InsertLines(u16),
    /// CSI `M`: delete `n` lines at the cursor row.
    DeleteLines(u16),
    /// CSI `@`: insert `n` blank cells at the cursor column.
    InsertChars(u16),
    /// CSI `P`: delete `n` cells at the cursor column.
    DeleteChars(u16),
    /// CSI `r`: DECSTBM, set the scroll region to `[top, bottom]` (0-based, inclusive).
    SetScrollRegion { top: u16, bottom: u16 },
    /// DECSC / CSI `s`.
    SaveCursor,
    /// DECRC / CSI `u`.
    RestoreCursor,
    SetMode { mode: Mode, enabled: bool },
    /// HTS: set a tab stop at the cursor column.
    TabSet,
    TabClear(TabClearMode),
    DesignateCharset { slot: CharsetSlot, charset: Charset },
    InvokeCharset(CharsetSlot),
    /// The UI resized the screen to `(cols, rows)`.
    Resize { cols: u16, rows: u16 },
    /// BEL (`0x07`).
    Bell,
    /// OSC 0/2: set the window title.
    WindowTitle(String),
}
