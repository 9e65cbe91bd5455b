// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Character set designation (G0-G3), shift-in/shift-out, and the DEC special
//! graphics translation table, owned by the terminal interpreter (C4).

use crate::action::Charset;

/// Translate one ASCII byte through the DEC Special Graphics character set, per the
/// bit-exact mapping this core requires.
///
/// Bytes outside the mapped range pass through unchanged.
#[must_use]
pub fn dec_special_graphics(byte: u8) -> char {
    match byte {
        b'`' => '\u{25C6}', // ◆
        b'a' => '\u{2591}', // ░
        b'b' => '\u{2409}', // HT symbol
        b'c' => '\u{240C}', // FF symbol
        b'd' => '\u{240D}', // CR symbol
        b'e' => '\u{240A}', // LF symbol
        b'f' => '\u{00B0}', // °
        b'g' => '\u{00B1}', // ±
        b'h' => '\u{2424}', // NL symbol
        b'i' => '\u{240B}', // VT symbol
        b'j' => '\u{2518}', // ┘
        b'k' => '\u{2510}', // ┐
        b'l' => '\u{250C}', // ┌
        b'm' => '\u{2514}', // └
        b'n' => '\u{253C}', // ┼
        b'o'..=b's' => '\u{2500}', // ─ (scan-line variants collapse to a single bar)
        b't' => '\u{251C}', // ├
        b'u' => '\u{2524}', // ┤
        b'v' => '\u{2534}', // ┴
        b'w' => '\u{252C}', // ┬
        b'x' => '\u{2502}', // │
        b'y' => '\u{2264}', // ≤
        b'z' => '\u{2265}', // ≥
        b'{' => '\u{03C0}', // π
        b'|' => '\u{2260}', // ≠
        b'}' => '\u{00A3}', // £
        b'~' => '\u{00B7}', // ·
        other => other as char,
    }
}

/// Translate one byte through the UK variant: identical to ASCII except `#` becomes
/// the pound sign.
#[must_use]
pub fn uk_charset(byte: u8) -> char {
    if byte == b'#' { '\u{00A3}' } else { byte as char }
}

/// Translate a decoded code point through the active G-set. Only the ASCII-range
/// bytes feeding the DEC/UK tables are translated; wider code points from the
/// decoded UTF-8 stream always pass through unchanged, since those tables are only
/// meaningful for the 7-bit range a real VT100 host would have sent.
#[must_use]
pub fn translate(ch: char, charset: Charset) -> char {
    match (charset, u8::try_from(ch)) {
        (Charset::DecSpecialGraphics, Ok(b)) => dec_special_graphics(b),
        (Charset::Uk, Ok(b)) => uk_charset(b),
        _ => ch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_drawing_box_chars() {
        assert_eq!(translate('l', Charset::DecSpecialGraphics), '\u{250C}');
        assert_eq!(translate('q', Charset::DecSpecialGraphics), '\u{2500}');
        assert_eq!(translate('k', Charset::DecSpecialGraphics), '\u{2510}');
    }

    #[test]
    fn ascii_passthrough_untouched() {
        assert_eq!(translate('l', Charset::Ascii), 'l');
    }

    #[test]
    fn uk_pound_sign() {
        assert_eq!(translate('#', Charset::Uk), '\u{00A3}');
        assert_eq!(translate('x', Charset::Uk), 'x');
    }

    #[test]
    fn non_ascii_code_points_pass_through_line_drawing() {
        assert_eq!(translate('\u{1F600}', Charset::DecSpecialGraphics), '\u{1F600}');
    }
}
