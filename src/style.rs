// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The packed 16-bit style word attached to every cell in a [`crate::line::Line`].
//!
//! Bit layout (LSB first):
//!
//! ```text
//!  0..=3   foreground index (0-15)
//!  4       has_foreground
//!  5..=8   background index (0-15)
//!  9       has_background
//!  10      bold
//!  11      underline
//!  12      reverse
//!  13..=15 reserved
//! ```
//!
//! Packing the whole style into one `u16` (rather than a struct of `Option<u8>`
//! fields) keeps a [`crate::line::Line`]'s style array the same size as a flat `Copy`
//! array of code points, which matters since every cell on every visible row and every
//! scrollback row carries one of these.

/// Define a getter/setter pair over a bitfield of `Style`'s backing `u16`.
///
/// The single-bit form toggles one flag bit; the ranged form reads/writes a `$bits`-wide
/// field shifted into place at `$shift`.
macro_rules! bitfield {
    ($getter:ident, $setter:ident, $bit:expr) => {
        #[inline]
        #[must_use]
        pub fn $getter(self) -> bool { (self.0 & (1 << $bit)) != 0 }

        #[inline]
        pub fn $setter(&mut self, value: bool) {
            if value {
                self.0 |= 1 << $bit;
            } else {
                self.0 &= !(1 << $bit);
            }
        }
    };

    ($getter:ident, $setter:ident, $mask:expr, $shift:expr) => {
        #[inline]
        #[must_use]
        pub fn $getter(self) -> u8 { ((self.0 >> $shift) & $mask) as u8 }

        #[inline]
        pub fn $setter(&mut self, value: u8) {
            let clear = !(($mask) << $shift);
            self.0 = (self.0 & clear) | (u16::from(value) & $mask) << $shift;
        }
    };
}

/// One cell's visual style, packed into a single `u16`. `Copy` so it can sit inline in
/// a [`crate::line::Line`]'s style array without any indirection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style(u16);

const FG_MASK: u16 = 0b1111;
const FG_SHIFT: u16 = 0;
const HAS_FG_BIT: u16 = 4;
const BG_MASK: u16 = 0b1111;
const BG_SHIFT: u16 = 5;
const HAS_BG_BIT: u16 = 9;
const BOLD_BIT: u16 = 10;
const UNDERLINE_BIT: u16 = 11;
const REVERSE_BIT: u16 = 12;

impl Style {
    /// The well-known default style: no colors set, no attributes.
    pub const DEFAULT: Style = Style(0);

    bitfield!(foreground_index, set_foreground_index, FG_MASK, FG_SHIFT);
    bitfield!(has_foreground, set_has_foreground, HAS_FG_BIT);
    bitfield!(background_index, set_background_index, BG_MASK, BG_SHIFT);
    bitfield!(has_background, set_has_background, HAS_BG_BIT);
    bitfield!(bold, set_bold, BOLD_BIT);
    bitfield!(underline, set_underline, UNDERLINE_BIT);
    bitfield!(reverse, set_reverse, REVERSE_BIT);

    /// The SGR `0` reset: identical to [`Style::DEFAULT`], spelled out for call sites
    /// that are specifically implementing the reset parameter rather than just
    /// wanting a blank style.
    #[must_use]
    pub fn reset() -> Self { Self::DEFAULT }

    #[must_use]
    pub fn with_foreground(index: u8) -> Self {
        let mut s = Self::DEFAULT;
        s.set_foreground_index(index & 0xF);
        s.set_has_foreground(true);
        s
    }

    #[must_use]
    pub fn with_background(index: u8) -> Self {
        let mut s = Self::DEFAULT;
        s.set_background_index(index & 0xF);
        s.set_has_background(true);
        s
    }

    /// Clear the foreground color, falling back to the terminal's default (SGR `39`).
    pub fn clear_foreground(&mut self) { self.set_has_foreground(false); }

    /// Clear the background color, falling back to the terminal's default (SGR `49`).
    pub fn clear_background(&mut self) { self.set_has_background(false); }

    #[must_use]
    pub fn raw_bits(self) -> u16 { self.0 }
}

impl From<u16> for Style {
    fn from(bits: u16) -> Self { Style(bits) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_zero() {
        assert_eq!(Style::DEFAULT.raw_bits(), 0);
        assert!(!Style::DEFAULT.has_foreground());
        assert!(!Style::DEFAULT.has_background());
    }

    #[test]
    fn foreground_roundtrip() {
        let s = Style::with_foreground(3);
        assert!(s.has_foreground());
        assert_eq!(s.foreground_index(), 3);
        assert!(!s.has_background());
    }

    #[test]
    fn background_roundtrip() {
        let s = Style::with_background(7);
        assert!(s.has_background());
        assert_eq!(s.background_index(), 7);
        assert!(!s.has_foreground());
    }

    #[test]
    fn fg_and_bg_independent() {
        let mut s = Style::with_foreground(1);
        s.set_background_index(2);
        s.set_has_background(true);
        assert_eq!(s.foreground_index(), 1);
        assert_eq!(s.background_index(), 2);
    }

    #[test]
    fn bold_underline_reverse_flags() {
        let mut s = Style::DEFAULT;
        s.set_bold(true);
        s.set_underline(true);
        assert!(s.bold());
        assert!(s.underline());
        assert!(!s.reverse());
        s.set_reverse(true);
        assert!(s.reverse());
        s.set_bold(false);
        assert!(!s.bold());
        assert!(s.underline());
    }

    #[test]
    fn clear_foreground_keeps_index_but_disables_flag() {
        let mut s = Style::with_foreground(5);
        s.clear_foreground();
        assert!(!s.has_foreground());
    }
}
