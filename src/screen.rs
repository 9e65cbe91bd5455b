// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The screen model (component C2): primary/alternate grids, cursor, scroll regions,
//! tab stops, and scrollback. Every method here is callable only from a single owning
//! task; this crate enforces that by giving [`Screen`] no internal synchronization at
//! all — [`crate::session`] is the one place that serializes access to it, via the
//! synchronous action-boundary dispatch (C7).

use std::collections::{BTreeSet, VecDeque};
use std::sync::Arc;

use tracing::warn;

use crate::action::{
    Charset, CharsetSlot, CursorMove, Mode, SpecialChar, TabClearMode, TerminalAction,
};
use crate::line::Line;
use crate::observer::{null_observer, TerminalObserver};
use crate::style::Style;

const DEFAULT_TAB_WIDTH: u16 = 8;
const DEFAULT_SCROLLBACK_CAP: usize = 10_000;

/// Saved cursor state for DECSC/DECRC (`ESC 7`/`ESC 8`, CSI `s`/`u`).
#[derive(Debug, Clone, Copy, PartialEq)]
struct SavedCursor {
    cx: u16,
    cy: u16,
    style: Style,
    charset_designations: [Charset; 4],
    origin_mode: bool,
    autowrap: bool,
}

/// One of the two screens a terminal multiplexes between. The alternate screen never
/// accumulates scrollback and is always exactly `cols x rows`.
#[derive(Debug, Clone)]
struct Buffer {
    lines: VecDeque<Line>,
    scrollback: VecDeque<Line>,
    has_scrollback: bool,
}

impl Buffer {
    fn new(cols: u16, rows: u16, has_scrollback: bool) -> Self {
        Self {
            lines: (0..rows).map(|_| Line::blank(cols as usize)).collect(),
            scrollback: VecDeque::new(),
            has_scrollback,
        }
    }
}

/// Which screen is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Active {
    Primary,
    Alternate,
}

/// The screen model. See the module docs for the full contract.
pub struct Screen {
    cols: u16,
    rows: u16,
    cx: u16,
    cy: u16,
    pending_wrap: bool,
    scroll_top: u16,
    scroll_bottom: u16,
    tab_stops: BTreeSet<u16>,
    primary: Buffer,
    alternate: Buffer,
    active: Active,
    current_style: Style,
    charset_designations: [Charset; 4],
    active_charset: CharsetSlot,
    origin_mode: bool,
    autowrap: bool,
    insert_mode: bool,
    line_feed_new_line: bool,
    saved_cursor: Option<SavedCursor>,
    scrollback_cap: usize,
    observer: Arc<dyn TerminalObserver>,
}

impl std::fmt::Debug for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Screen")
            .field("cols", &self.cols)
            .field("rows", &self.rows)
            .field("cursor", &(self.cx, self.cy))
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

impl Screen {
    #[must_use]
    pub fn new(cols: u16, rows: u16) -> Self { Self::with_observer(cols, rows, null_observer()) }

    #[must_use]
    pub fn with_observer(cols: u16, rows: u16, observer: Arc<dyn TerminalObserver>) -> Self {
        Self {
            cols,
            rows,
            cx: 0,
            cy: 0,
            pending_wrap: false,
            scroll_top: 0,
            scroll_bottom: rows.saturating_sub(1),
            tab_stops: default_tab_stops(cols),
            primary: Buffer::new(cols, rows, true),
            alternate: Buffer::new(cols, rows, false),
            active: Active::Primary,
            current_style: Style::DEFAULT,
            charset_designations: [Charset::Ascii; 4],
            active_charset: CharsetSlot::G0,
            origin_mode: false,
            autowrap: true,
            insert_mode: false,
            line_feed_new_line: false,
            saved_cursor: None,
            scrollback_cap: DEFAULT_SCROLLBACK_CAP,
            observer,
        }
    }

    #[must_use]
    pub fn cursor(&self) -> (u16, u16) { (self.cx, self.cy) }

    #[must_use]
    pub fn cols(&self) -> u16 { self.cols }

    #[must_use]
    pub fn rows(&self) -> u16 { self.rows }

    #[must_use]
    pub fn set_scrollback_cap(&mut self, cap: usize) { self.scrollback_cap = cap; }

    #[must_use]
    pub fn scrollback_len(&self) -> usize { self.primary.scrollback.len() }

    fn buffer(&self) -> &Buffer {
        match self.active {
            Active::Primary => &self.primary,
            Active::Alternate => &self.alternate,
        }
    }

    fn buffer_mut(&mut self) -> &mut Buffer {
        match self.active {
            Active::Primary => &mut self.primary,
            Active::Alternate => &mut self.alternate,
        }
    }

    #[must_use]
    pub fn line(&self, row: u16) -> Option<&Line> { self.buffer().lines.get(row as usize) }

    #[must_use]
    pub fn display_row(&self, row: u16) -> String {
        self.line(row).map_or_else(String::new, Line::display_string)
    }

    /// Apply a batch of [`TerminalAction`]s atomically, then signal redraw. This is
    /// component C7's action boundary made concrete: the caller (the reader thread, by
    /// spec) is expected to hand over exactly one read chunk's worth of actions and
    /// wait for this call to return before submitting the next batch.
    pub fn process_actions(&mut self, batch: &[TerminalAction]) {
        for action in batch {
            self.apply_action(action);
        }
        self.observer.request_redraw();
    }

    fn apply_action(&mut self, action: &TerminalAction) {
        match action {
            TerminalAction::PlainText(s) => self.write(s),
            TerminalAction::SpecialChar(c) => self.special(*c),
            TerminalAction::SetStyle(style) => self.current_style = *style,
            TerminalAction::CursorMove(m) => self.cursor_move(*m),
            TerminalAction::EraseInDisplay(mode) => self.erase_display(*mode),
            TerminalAction::EraseInLine(mode) => self.erase_line(*mode),
            TerminalAction::InsertLines(n) => self.insert_lines(*n),
            TerminalAction::DeleteLines(n) => self.delete_lines(*n),
            TerminalAction::InsertChars(n) => self.insert_chars(*n),
            TerminalAction::DeleteChars(n) => self.delete_chars(*n),
            TerminalAction::SetScrollRegion { top, bottom } => {
                self.set_scroll_region(*top, *bottom);
            }
            TerminalAction::SaveCursor => self.save_cursor(),
            TerminalAction::RestoreCursor => self.restore_cursor(),
            TerminalAction::SetMode { mode, enabled } => self.set_mode(*mode, *enabled),
            TerminalAction::TabSet => {
                self.tab_stops.insert(self.cx);
            }
            TerminalAction::TabClear(mode) => self.tab_clear(*mode),
            TerminalAction::DesignateCharset { slot, charset } => {
                self.charset_designations[slot_index(*slot)] = *charset;
            }
            TerminalAction::InvokeCharset(slot) => self.active_charset = *slot,
            TerminalAction::Resize { cols, rows } => self.size_changed(*cols, *rows),
            TerminalAction::Bell => self.observer.bell(),
            TerminalAction::WindowTitle(title) => self.observer.set_title(title),
        }
    }

    /// Resize; reflow policy is *no reflow* — lines retain their stored length.
    /// Cursor is clamped to the new bounds, the scroll region resets to full screen,
    /// the alternate screen is resized to the new dims, and the primary scrollback is
    /// preserved untouched.
    pub fn size_changed(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        self.scroll_top = 0;
        self.scroll_bottom = rows.saturating_sub(1);
        self.cx = self.cx.min(cols);
        self.cy = self.cy.min(rows.saturating_sub(1));
        self.pending_wrap = false;

        for buf in [&mut self.primary, &mut self.alternate] {
            resize_buffer(buf, cols, rows);
        }
    }

    /// Write plain text at the cursor, honoring insert vs. overwrite, deferred
    /// autowrap, and scroll-on-output.
    pub fn write(&mut self, text: &str) {
        for ch in text.chars() {
            self.write_char(ch);
        }
    }

    fn write_char(&mut self, ch: char) {
        if self.pending_wrap {
            self.pending_wrap = false;
            self.carriage_return();
            self.line_feed();
        }

        let cols = self.cols as usize;
        let style = self.current_style;
        let row = self.cy;

        if self.insert_mode {
            self.buffer_mut()
                .lines
                .get_mut(row as usize)
                .map(|l| l.insert_text(self.cx as usize, &ch.to_string(), style));
            if let Some(line) = self.buffer_mut().lines.get_mut(row as usize) {
                if line.length() > cols {
                    line.kill_text(cols, line.length());
                }
            }
        } else if let Some(line) = self.buffer_mut().lines.get_mut(row as usize) {
            line.write_text(self.cx as usize, &ch.to_string(), style);
        }

        if self.cx + 1 >= self.cols {
            if self.autowrap {
                self.pending_wrap = true;
            }
            self.cx = self.cols.saturating_sub(1);
        } else {
            self.cx += 1;
        }
    }

    /// LF/CR/BS/HT/VT. VT is treated identically to LF.
    pub fn special(&mut self, c: SpecialChar) {
        match c {
            SpecialChar::LineFeed => self.line_feed(),
            SpecialChar::CarriageReturn => self.carriage_return(),
            SpecialChar::Backspace => self.cx = self.cx.saturating_sub(1),
            SpecialChar::Tab => self.horizontal_tab(),
        }
        self.pending_wrap = false;
    }

    fn carriage_return(&mut self) { self.cx = 0; }

    fn line_feed(&mut self) {
        if self.cy == self.scroll_bottom {
            self.scroll_up_region(1);
        } else if self.cy + 1 < self.rows {
            self.cy += 1;
        }
    }

    fn horizontal_tab(&mut self) {
        let next = self
            .tab_stops
            .range(self.cx + 1..)
            .next()
            .copied()
            .unwrap_or(self.cols.saturating_sub(1));
        let width = (next - self.cx).max(1) as usize;
        let style = self.current_style;
        let row = self.cy as usize;
        if let Some(line) = self.buffer_mut().lines.get_mut(row) {
            line.write_tab(self.cx as usize, width, style);
        }
        self.cx = next.min(self.cols.saturating_sub(1));
    }

    /// Scroll the active scroll region up by `n` lines: drop `n` lines from the top of
    /// the region and append `n` blank lines at the bottom. If the region is the full
    /// screen and the primary buffer is active, evicted lines migrate to scrollback,
    /// dropping the oldest once the cap is exceeded (FIFO eviction).
    fn scroll_up_region(&mut self, n: u16) {
        let full_screen = self.scroll_top == 0 && self.scroll_bottom == self.rows.saturating_sub(1);
        let cols = self.cols as usize;
        let active = self.active;
        let cap = self.scrollback_cap;
        let buf = self.buffer_mut();
        for _ in 0..n {
            if (self.scroll_bottom as usize) < buf.lines.len() {
                let evicted = buf.lines.remove(self.scroll_top as usize);
                if let Some(evicted) = evicted {
                    if full_screen && active == Active::Primary && buf.has_scrollback {
                        buf.scrollback.push_back(evicted);
                        while buf.scrollback.len() > cap {
                            buf.scrollback.pop_front();
                        }
                    }
                }
                buf.lines.insert(self.scroll_bottom as usize, Line::blank(cols));
            }
        }
    }

    /// CSI `H`/`f` (absolute) or `A`/`B`/`C`/`D` (relative, single axis). Absolute
    /// moves honor origin mode by clamping to the scroll region.
    pub fn cursor_move(&mut self, m: CursorMove) {
        self.pending_wrap = false;
        match m {
            CursorMove::Absolute { col, row } => {
                let (min_row, max_row) = if self.origin_mode {
                    (self.scroll_top, self.scroll_bottom)
                } else {
                    (0, self.rows.saturating_sub(1))
                };
                self.cy = row.clamp(min_row, max_row);
                self.cx = col.min(self.cols.saturating_sub(1));
            }
            CursorMove::RelativeCol(delta) => {
                self.cx = clamp_i32(i32::from(self.cx) + delta, 0, i32::from(self.cols.saturating_sub(1))) as u16;
            }
            CursorMove::RelativeRow(delta) => {
                let (min_row, max_row) = if self.origin_mode {
                    (self.scroll_top, self.scroll_bottom)
                } else {
                    (0, self.rows.saturating_sub(1))
                };
                self.cy = clamp_i32(i32::from(self.cy) + delta, i32::from(min_row), i32::from(max_row)) as u16;
            }
        }
    }

    /// CSI `J`. Mode 2 never touches scrollback: this core preserves the "erase never
    /// clears history" behaviour, full stop, and does not offer an option to change it
    /// (see `DESIGN.md` for why).
    pub fn erase_display(&mut self, mode: u8) {
        let cols = self.cols as usize;
        let (cx, cy) = (self.cx as usize, self.cy as usize);
        let rows = self.rows as usize;
        let buf = self.buffer_mut();
        match mode {
            0 => {
                if let Some(line) = buf.lines.get_mut(cy) {
                    line.kill_text(cx, line.length());
                    line.write_text(cx, &" ".repeat(cols.saturating_sub(cx)), Style::DEFAULT);
                    line.kill_text(cols, line.length());
                }
                for row in (cy + 1)..rows {
                    if let Some(line) = buf.lines.get_mut(row) {
                        *line = Line::blank(cols);
                    }
                }
            }
            1 => {
                if let Some(line) = buf.lines.get_mut(cy) {
                    line.write_text(0, &" ".repeat((cx + 1).min(cols)), Style::DEFAULT);
                }
                for row in 0..cy {
                    if let Some(line) = buf.lines.get_mut(row) {
                        *line = Line::blank(cols);
                    }
                }
            }
            2 => {
                for row in 0..rows {
                    if let Some(line) = buf.lines.get_mut(row) {
                        *line = Line::blank(cols);
                    }
                }
            }
            other => warn!(mode = other, "EraseInDisplay: out-of-range mode clamped to no-op"),
        }
    }

    /// CSI `K`.
    pub fn erase_line(&mut self, mode: u8) {
        let cols = self.cols as usize;
        let (cx, cy) = (self.cx as usize, self.cy as usize);
        let Some(line) = self.buffer_mut().lines.get_mut(cy) else { return };
        match mode {
            0 => {
                line.kill_text(cx, line.length());
                line.write_text(cx, &" ".repeat(cols.saturating_sub(cx)), Style::DEFAULT);
                line.kill_text(cols, line.length());
            }
            1 => line.write_text(0, &" ".repeat((cx + 1).min(cols)), Style::DEFAULT),
            2 => *line = Line::blank(cols),
            other => warn!(mode = other, "EraseInLine: out-of-range mode clamped to no-op"),
        }
    }

    /// CSI `L`: insert `n` blank lines at the cursor row, within the scroll region.
    pub fn insert_lines(&mut self, n: u16) {
        if self.cy < self.scroll_top || self.cy > self.scroll_bottom {
            return;
        }
        let cols = self.cols as usize;
        let bottom = self.scroll_bottom as usize;
        let row = self.cy as usize;
        let buf = self.buffer_mut();
        for _ in 0..n {
            if bottom < buf.lines.len() {
                buf.lines.remove(bottom);
                buf.lines.insert(row, Line::blank(cols));
            }
        }
    }

    /// CSI `M`: delete `n` lines at the cursor row, within the scroll region.
    pub fn delete_lines(&mut self, n: u16) {
        if self.cy < self.scroll_top || self.cy > self.scroll_bottom {
            return;
        }
        let cols = self.cols as usize;
        let bottom = self.scroll_bottom as usize;
        let row = self.cy as usize;
        let buf = self.buffer_mut();
        for _ in 0..n {
            if row < buf.lines.len() {
                buf.lines.remove(row);
                buf.lines.insert(bottom.min(buf.lines.len()), Line::blank(cols));
            }
        }
    }

    /// CSI `@`: insert `n` blank cells at the cursor, dropping overflow past `cols`.
    pub fn insert_chars(&mut self, n: u16) {
        let cols = self.cols as usize;
        let (cx, cy) = (self.cx as usize, self.cy as usize);
        if let Some(line) = self.buffer_mut().lines.get_mut(cy) {
            line.insert_text(cx, &" ".repeat(n as usize), Style::DEFAULT);
            if line.length() > cols {
                line.kill_text(cols, line.length());
            }
        }
    }

    /// CSI `P`: delete `n` cells at the cursor.
    pub fn delete_chars(&mut self, n: u16) {
        let (cx, cy) = (self.cx as usize, self.cy as usize);
        if let Some(line) = self.buffer_mut().lines.get_mut(cy) {
            line.kill_text(cx, cx + n as usize);
        }
    }

    /// CSI `r`, DECSTBM. Out-of-range parameters are clamped rather than rejected.
    pub fn set_scroll_region(&mut self, top: u16, bottom: u16) {
        let max_row = self.rows.saturating_sub(1);
        let top = top.min(max_row);
        let bottom = bottom.min(max_row);
        if top < bottom {
            self.scroll_top = top;
            self.scroll_bottom = bottom;
        } else {
            self.scroll_top = 0;
            self.scroll_bottom = max_row;
        }
        self.cx = 0;
        self.cy = self.scroll_top;
    }

    /// DECSC / CSI `s`.
    pub fn save_cursor(&mut self) {
        self.saved_cursor = Some(SavedCursor {
            cx: self.cx,
            cy: self.cy,
            style: self.current_style,
            charset_designations: self.charset_designations,
            origin_mode: self.origin_mode,
            autowrap: self.autowrap,
        });
    }

    /// DECRC / CSI `u`. A no-op if nothing was ever saved.
    pub fn restore_cursor(&mut self) {
        if let Some(saved) = self.saved_cursor {
            self.cx = saved.cx.min(self.cols.saturating_sub(1));
            self.cy = saved.cy.min(self.rows.saturating_sub(1));
            self.current_style = saved.style;
            self.charset_designations = saved.charset_designations;
            self.origin_mode = saved.origin_mode;
            self.autowrap = saved.autowrap;
            self.pending_wrap = false;
        }
    }

    /// CSI `h`/`l`.
    pub fn set_mode(&mut self, mode: Mode, enabled: bool) {
        match mode {
            Mode::AutoWrap => self.autowrap = enabled,
            Mode::OriginMode => self.origin_mode = enabled,
            Mode::InsertMode => self.insert_mode = enabled,
            Mode::LineFeedNewLine => self.line_feed_new_line = enabled,
            Mode::AlternateScreen => self.switch_alternate(enabled),
        }
    }

    fn switch_alternate(&mut self, enabled: bool) {
        let target = if enabled { Active::Alternate } else { Active::Primary };
        if target != self.active {
            self.active = target;
            self.cx = self.cx.min(self.cols.saturating_sub(1));
            self.cy = self.cy.min(self.rows.saturating_sub(1));
        }
    }

    fn tab_clear(&mut self, mode: TabClearMode) {
        match mode {
            TabClearMode::Current => {
                self.tab_stops.remove(&self.cx);
            }
            TabClearMode::All => self.tab_stops.clear(),
        }
    }
}

fn default_tab_stops(cols: u16) -> BTreeSet<u16> {
    (0..cols).step_by(DEFAULT_TAB_WIDTH as usize).collect()
}

fn slot_index(slot: CharsetSlot) -> usize {
    match slot {
        CharsetSlot::G0 => 0,
        CharsetSlot::G1 => 1,
        CharsetSlot::G2 => 2,
        CharsetSlot::G3 => 3,
    }
}

fn clamp_i32(value: i32, min: i32, max: i32) -> i32 { value.max(min).min(max) }

fn resize_buffer(buf: &mut Buffer, cols: u16, rows: u16) {
    buf.lines.truncate(rows as usize);
    while buf.lines.len() < rows as usize {
        buf.lines.push_back(Line::blank(cols as usize));
    }
    let _ = cols; // no reflow: existing lines keep their stored length.
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::SpecialChar;

    #[test]
    fn hello_world_two_lines() {
        let mut s = Screen::new(80, 24);
        s.write("hello");
        s.special(SpecialChar::CarriageReturn);
        s.special(SpecialChar::LineFeed);
        s.write("world");
        assert_eq!(s.display_row(0).trim_end(), "hello");
        assert_eq!(s.display_row(1).trim_end(), "world");
        assert_eq!(s.cursor(), (5, 1));
    }

    #[test]
    fn cursor_relative_move() {
        let mut s = Screen::new(80, 24);
        s.write("abc");
        s.cursor_move(CursorMove::RelativeCol(-2));
        s.write("def");
        assert_eq!(s.display_row(0).trim_end(), "adef");
        assert_eq!(s.cursor(), (4, 0));
    }

    #[test]
    fn sgr_style_applies_to_written_cells() {
        let mut s = Screen::new(80, 24);
        s.apply_action(&TerminalAction::SetStyle(Style::with_foreground(1)));
        s.write("RED");
        s.apply_action(&TerminalAction::SetStyle(Style::DEFAULT));
        s.write("!");
        assert_eq!(s.line(0).unwrap().style_at(0).unwrap().foreground_index(), 1);
        assert_eq!(s.line(0).unwrap().style_at(2).unwrap().foreground_index(), 1);
        assert_eq!(s.line(0).unwrap().style_at(3).unwrap(), Style::DEFAULT);
    }

    #[test]
    fn scroll_region_confines_newlines() {
        let mut s = Screen::new(80, 3);
        s.set_scroll_region(0, 1);
        s.write("line1");
        s.special(SpecialChar::LineFeed);
        s.special(SpecialChar::CarriageReturn);
        s.write("line2");
        s.special(SpecialChar::LineFeed);
        assert_eq!(s.display_row(0).trim_end(), "line2");
        assert_eq!(s.display_row(1).trim_end(), "");
        assert_eq!(s.display_row(2).trim_end(), "");
    }

    #[test]
    fn save_restore_cursor() {
        let mut s = Screen::new(80, 24);
        s.write("A");
        s.save_cursor();
        s.write("B");
        s.restore_cursor();
        s.write("C");
        assert_eq!(s.display_row(0).trim_end(), "AC");
    }

    #[test]
    fn erase_display_mode_two_preserves_scrollback() {
        let mut s = Screen::new(80, 3);
        for _ in 0..10 {
            s.write("x");
            s.special(SpecialChar::CarriageReturn);
            s.special(SpecialChar::LineFeed);
        }
        let before = s.scrollback_len();
        s.erase_display(2);
        assert_eq!(s.scrollback_len(), before, "EraseInDisplay must never touch scrollback");
        assert_eq!(s.display_row(0), " ".repeat(80));
    }

    #[test]
    fn erase_display_is_idempotent() {
        let mut s = Screen::new(80, 24);
        s.write("hello");
        s.erase_display(2);
        let first = (0..24).map(|r| s.display_row(r)).collect::<Vec<_>>();
        s.erase_display(2);
        let second = (0..24).map(|r| s.display_row(r)).collect::<Vec<_>>();
        assert_eq!(first, second);
    }

    #[test]
    fn resize_has_no_reflow_and_clamps_cursor() {
        let mut s = Screen::new(10, 5);
        s.cursor_move(CursorMove::Absolute { col: 9, row: 4 });
        s.size_changed(5, 5);
        assert_eq!(s.cursor(), (4, 4));
    }

    #[test]
    fn tab_advances_to_next_stop() {
        let mut s = Screen::new(80, 24);
        s.special(SpecialChar::Tab);
        assert_eq!(s.cursor(), (8, 0));
    }

    #[test]
    fn dec_line_drawing_scenario() {
        // ESC ( 0 l q k ESC ( B -- interpreted at the screen level as already-translated
        // glyphs, since charset translation happens in the interpreter (C4).
        let mut s = Screen::new(80, 24);
        s.write("\u{250C}\u{2500}\u{2510}");
        assert_eq!(s.line(0).unwrap().char_at(0), Some('\u{250C}'));
        assert_eq!(s.line(0).unwrap().char_at(1), Some('\u{2500}'));
        assert_eq!(s.line(0).unwrap().char_at(2), Some('\u{2510}'));
    }
}
