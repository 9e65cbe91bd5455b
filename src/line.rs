// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The styled line store (component C1): one screen row's characters and their
//! parallel per-character styles, with tab runs encoded as sentinel characters so a
//! later change to tab stops never corrupts already-drawn content.
//!
//! # Tab-run sentinel encoding
//!
//! A tab does not occupy a single cell. It occupies a *run* of cells: the first cell
//! holds [`TAB_START`], and every further column the tab spans holds [`TAB_CONTINUE`].
//! Both are private-use-area code points, never emitted by a real terminal program, so
//! they can share the same `char` storage as ordinary text without a variant wrapper.
//!
//! Two views project the sentinels back out:
//! - [`Line::display_string`]: sentinels become spaces (what the user sees on screen).
//! - [`Line::clipboard_string`]: `TAB_START` becomes `\t`, `TAB_CONTINUE` is dropped
//!   (what a copy/paste operation should yield).

use smallvec::SmallVec;

use crate::style::Style;

/// Marks the first cell of a tab run.
pub const TAB_START: char = '\u{E000}';
/// Marks a continuation cell of a tab run.
pub const TAB_CONTINUE: char = '\u{E001}';

const INLINE_CAPACITY: usize = 128;

/// One row of a [`crate::screen::Screen`]: a code-point sequence with a parallel,
/// equal-length style array.
#[derive(Debug, Clone, Default)]
pub struct Line {
    chars: SmallVec<[char; INLINE_CAPACITY]>,
    styles: SmallVec<[Style; INLINE_CAPACITY]>,
}

impl Line {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// A blank line of `cols` default-styled space cells, as produced when the cursor
    /// scrolls a fresh row into view.
    #[must_use]
    pub fn blank(cols: usize) -> Self {
        Self {
            chars: smallvec::smallvec![' '; cols],
            styles: smallvec::smallvec![Style::DEFAULT; cols],
        }
    }

    pub fn clear(&mut self) {
        self.chars.clear();
        self.styles.clear();
    }

    #[must_use]
    pub fn length(&self) -> usize { self.chars.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.chars.is_empty() }

    #[must_use]
    pub fn style_at(&self, i: usize) -> Option<Style> { self.styles.get(i).copied() }

    #[must_use]
    pub fn char_at(&self, i: usize) -> Option<char> { self.chars.get(i).copied() }

    /// The greatest `j <= i` whose char is not [`TAB_CONTINUE`].
    #[must_use]
    pub fn effective_char_start(&self, i: usize) -> usize {
        let mut j = i.min(self.chars.len().saturating_sub(1));
        while j > 0 && self.chars.get(j) == Some(&TAB_CONTINUE) {
            j -= 1;
        }
        j
    }

    /// The least `j >= i` whose char is not [`TAB_CONTINUE`].
    #[must_use]
    pub fn effective_char_end(&self, i: usize) -> usize {
        let mut j = i;
        while j < self.chars.len() && self.chars[j] == TAB_CONTINUE {
            j += 1;
        }
        j
    }

    /// A lazy sequence of `(text, style)` runs, merging neighbouring cells that share
    /// an identical style. Tab sentinels are projected to spaces, matching
    /// [`Line::display_string`].
    pub fn styled_segments(&self) -> impl Iterator<Item = (String, Style)> + '_ {
        StyledSegments { line: self, pos: 0 }
    }

    /// The line as displayed on screen: tab sentinels become spaces.
    #[must_use]
    pub fn display_string(&self) -> String {
        self.chars
            .iter()
            .map(|&c| if c == TAB_START || c == TAB_CONTINUE { ' ' } else { c })
            .collect()
    }

    /// The `[a, b)` slice of this line as it should be copied to the clipboard:
    /// `TAB_START` becomes `\t`, `TAB_CONTINUE` cells are dropped entirely.
    #[must_use]
    pub fn clipboard_string(&self, a: usize, b: usize) -> String {
        let b = b.min(self.chars.len());
        let a = a.min(b);
        self.chars[a..b]
            .iter()
            .filter_map(|&c| match c {
                TAB_CONTINUE => None,
                TAB_START => Some('\t'),
                other => Some(other),
            })
            .collect()
    }

    fn ensure_len(&mut self, len: usize) {
        while self.chars.len() < len {
            self.chars.push(' ');
            self.styles.push(Style::DEFAULT);
        }
    }

    /// Overwrite starting at `offset`, extending the line with default-styled spaces
    /// first if `offset` lies beyond the current length. Rejects a negative offset at
    /// the type level by taking `usize`.
    pub fn write_text(&mut self, offset: usize, s: &str, style: Style) {
        self.ensure_len(offset);
        let mut count = 0;
        for (i, ch) in s.chars().enumerate() {
            let pos = offset + i;
            if pos < self.chars.len() {
                self.chars[pos] = ch;
                self.styles[pos] = style;
            } else {
                self.chars.push(ch);
                self.styles.push(style);
            }
            count += 1;
        }
        self.promote_dangling_continue(offset + count);
    }

    /// Insert `s` at `offset`, shifting everything at and after `offset` right.
    pub fn insert_text(&mut self, offset: usize, s: &str, style: Style) {
        self.ensure_len(offset);
        let tail_chars: SmallVec<[char; INLINE_CAPACITY]> =
            self.chars.drain(offset..).collect();
        let tail_styles: SmallVec<[Style; INLINE_CAPACITY]> =
            self.styles.drain(offset..).collect();
        for ch in s.chars() {
            self.chars.push(ch);
            self.styles.push(style);
        }
        self.chars.extend(tail_chars);
        self.styles.extend(tail_styles);
    }

    /// Remove the `[a, b)` range, shifting the tail left.
    pub fn kill_text(&mut self, a: usize, b: usize) {
        let b = b.min(self.chars.len());
        let a = a.min(b);
        self.chars.drain(a..b);
        self.styles.drain(a..b);
    }

    /// Write a tab run of `width` cells starting at `offset`: a `TAB_START` followed
    /// by `width - 1` `TAB_CONTINUE`s, overwriting any existing content there. If the
    /// cell immediately after the new run was itself a `TAB_CONTINUE`, promote it to
    /// `TAB_START` so the remnant of the tab it belonged to stays well-formed.
    pub fn write_tab(&mut self, offset: usize, width: usize, style: Style) {
        debug_assert!(width >= 1);
        self.ensure_len(offset + width);
        for i in 0..width {
            let pos = offset + i;
            let ch = if i == 0 { TAB_START } else { TAB_CONTINUE };
            if pos < self.chars.len() {
                self.chars[pos] = ch;
                self.styles[pos] = style;
            } else {
                self.chars.push(ch);
                self.styles.push(style);
            }
        }
        self.promote_dangling_continue(offset + width);
    }

    /// Insert a tab run of `width` cells at `offset`, shifting the tail right.
    pub fn insert_tab(&mut self, offset: usize, width: usize, style: Style) {
        let mut run = String::new();
        run.push(TAB_START);
        for _ in 1..width {
            run.push(TAB_CONTINUE);
        }
        self.insert_text(offset, &run, style);
    }

    /// If `pos` holds a `TAB_CONTINUE`, rewrite it (and leave the rest of its run
    /// alone) as a `TAB_START`, since whatever preceded it was just overwritten and the
    /// run is no longer whole.
    fn promote_dangling_continue(&mut self, pos: usize) {
        if self.chars.get(pos) == Some(&TAB_CONTINUE) {
            self.chars[pos] = TAB_START;
        }
    }

    /// `|chars| == |styles|`, the parity invariant this line store must never violate.
    #[must_use]
    pub fn check_parity(&self) -> bool { self.chars.len() == self.styles.len() }

    /// Every `TAB_CONTINUE` is immediately preceded by `TAB_START` or `TAB_CONTINUE`.
    #[must_use]
    pub fn check_tab_well_formed(&self) -> bool {
        self.chars.iter().enumerate().all(|(i, &c)| {
            c != TAB_CONTINUE
                || i > 0 && matches!(self.chars[i - 1], TAB_START | TAB_CONTINUE)
        })
    }
}

struct StyledSegments<'a> {
    line: &'a Line,
    pos: usize,
}

impl Iterator for StyledSegments<'_> {
    type Item = (String, Style);

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.line.chars.len() {
            return None;
        }
        let start = self.pos;
        let style = self.line.styles[start];
        let mut end = start;
        while end < self.line.chars.len() && self.line.styles[end] == style {
            end += 1;
        }
        self.pos = end;
        let text = self.line.chars[start..end]
            .iter()
            .map(|&c| if c == TAB_START || c == TAB_CONTINUE { ' ' } else { c })
            .collect();
        Some((text, style))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_text_extends_with_spaces() {
        let mut line = Line::new();
        line.write_text(3, "hi", Style::DEFAULT);
        assert_eq!(line.display_string(), "   hi");
        assert!(line.check_parity());
    }

    #[test]
    fn insert_text_shifts_tail() {
        let mut line = Line::new();
        line.write_text(0, "ac", Style::DEFAULT);
        line.insert_text(1, "b", Style::DEFAULT);
        assert_eq!(line.display_string(), "abc");
    }

    #[test]
    fn kill_text_removes_range() {
        let mut line = Line::new();
        line.write_text(0, "abcdef", Style::DEFAULT);
        line.kill_text(2, 4);
        assert_eq!(line.display_string(), "abef");
    }

    #[test]
    fn tab_run_well_formed_and_displays_as_spaces() {
        let mut line = Line::new();
        line.write_tab(0, 8, Style::DEFAULT);
        assert_eq!(line.display_string(), " ".repeat(8));
        assert!(line.check_tab_well_formed());
        assert_eq!(line.char_at(0), Some(TAB_START));
        assert_eq!(line.char_at(7), Some(TAB_CONTINUE));
    }

    #[test]
    fn clipboard_string_keeps_tab_start_drops_continue() {
        let mut line = Line::new();
        line.write_tab(0, 4, Style::DEFAULT);
        line.write_text(4, "x", Style::DEFAULT);
        assert_eq!(line.clipboard_string(0, 5), "\tx");
    }

    #[test]
    fn overwriting_tab_start_promotes_following_continue() {
        let mut line = Line::new();
        line.write_tab(0, 4, Style::DEFAULT);
        line.write_text(0, "Q", Style::DEFAULT);
        // The run's head is gone; the next cell was a TAB_CONTINUE and must become a
        // TAB_START so it remains a well-formed (shorter) run on its own.
        assert_eq!(line.char_at(1), Some(TAB_START));
        assert!(line.check_tab_well_formed());
    }

    #[test]
    fn effective_start_end_skip_continuations() {
        let mut line = Line::new();
        line.write_tab(2, 5, Style::DEFAULT);
        assert_eq!(line.effective_char_start(4), 2);
        assert_eq!(line.effective_char_end(4), 7);
    }

    #[test]
    fn styled_segments_merge_equal_neighbours() {
        let mut line = Line::new();
        let red = Style::with_foreground(1);
        line.write_text(0, "ab", red);
        line.write_text(2, "cd", Style::DEFAULT);
        let segs: Vec<_> = line.styled_segments().collect();
        assert_eq!(segs, vec![("ab".to_string(), red), ("cd".to_string(), Style::DEFAULT)]);
    }
}
