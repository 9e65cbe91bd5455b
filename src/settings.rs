// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The resource-string settings model (component C8/C11): parses `-xrm` arguments and
//! the `~/.terminator-settings` file into a typed [`Settings`], and serializes back to
//! the same `Terminator*key: value` syntax for persistence.
//!
//! Uses the layering idiom common elsewhere in this codebase — typed struct +
//! fallible per-field parse + `serde` only at the diagnostic edge, not as the primary
//! format — since no off-the-shelf crate implements this exact X-resource grammar.

use std::collections::HashMap;

use tracing::warn;

use crate::error::TerminalCoreError;

/// One color, either `#rrggbb` or an X11 `rgb.txt` name (matched lower-cased).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// All recognised resource keys, with their documented defaults.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Settings {
    pub anti_alias: bool,
    pub block_cursor: bool,
    pub cursor_blink: bool,
    pub fancy_bell: bool,
    pub visual_bell: bool,
    pub font_name: Option<String>,
    pub font_size: Option<u32>,
    pub initial_column_count: u32,
    pub initial_row_count: u32,
    pub internal_border: u32,
    pub login_shell: bool,
    pub scroll_key: bool,
    pub scroll_tty_output: bool,
    pub use_menu_bar: bool,
    pub colors: [Option<Rgb>; 8],
    pub bright_colors: [Option<Rgb>; 8],
    pub background: Option<Rgb>,
    pub foreground: Option<Rgb>,
    pub color_bd: Option<Rgb>,
    pub cursor_color: Option<Rgb>,
    pub selection_color: Option<Rgb>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            anti_alias: false,
            block_cursor: false,
            cursor_blink: false,
            fancy_bell: false,
            visual_bell: false,
            font_name: None,
            font_size: None,
            initial_column_count: 80,
            initial_row_count: 24,
            internal_border: 2,
            login_shell: true,
            scroll_key: true,
            scroll_tty_output: false,
            use_menu_bar: false,
            colors: [None; 8],
            bright_colors: [None; 8],
            background: None,
            foreground: None,
            color_bd: None,
            cursor_color: None,
            selection_color: None,
        }
    }
}

impl Settings {
    /// Apply every `key: value` resource line in order, last write wins, then fill in
    /// the `colorBD` heuristic if it was never set explicitly.
    ///
    /// A malformed value or an unrecognised key never aborts the rest of the file: each
    /// offending line is recorded as a [`TerminalCoreError::ConfigParseError`], logged,
    /// and skipped, exactly as a misconfigured X-resources client would shrug off a
    /// line it doesn't understand rather than refusing to start.
    pub fn apply_resource_lines(&mut self, source_desc: &str, text: &str) -> Vec<TerminalCoreError> {
        let mut errors = Vec::new();
        for (lineno, raw_line) in text.lines().enumerate() {
            let Some((key, value)) = parse_resource_line(raw_line) else { continue };
            if let Err(reason) = self.apply_one(&key, &value) {
                let error = TerminalCoreError::ConfigParseError {
                    source_desc: format!("{source_desc}:{}", lineno + 1),
                    reason,
                };
                warn!(%error, "ignoring malformed settings line");
                errors.push(error);
            }
        }
        self.apply_color_bd_heuristic();
        errors
    }

    fn apply_one(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        match key {
            "antiAlias" => self.anti_alias = parse_bool(value)?,
            "blockCursor" => self.block_cursor = parse_bool(value)?,
            "cursorBlink" => self.cursor_blink = parse_bool(value)?,
            "fancyBell" => self.fancy_bell = parse_bool(value)?,
            "visualBell" => self.visual_bell = parse_bool(value)?,
            "fontName" => self.font_name = Some(value.to_string()),
            "fontSize" => self.font_size = Some(parse_int(value)?),
            "initialColumnCount" => self.initial_column_count = parse_int(value)?,
            "initialRowCount" => self.initial_row_count = parse_int(value)?,
            "internalBorder" => self.internal_border = parse_int(value)?,
            "loginShell" => self.login_shell = parse_bool(value)?,
            "scrollKey" => self.scroll_key = parse_bool(value)?,
            "scrollTtyOutput" => self.scroll_tty_output = parse_bool(value)?,
            "useMenuBar" => self.use_menu_bar = parse_bool(value)?,
            "background" => self.background = Some(parse_color(value)?),
            "foreground" => self.foreground = Some(parse_color(value)?),
            "colorBD" => self.color_bd = Some(parse_color(value)?),
            "cursorColor" => self.cursor_color = Some(parse_color(value)?),
            "selectionColor" => self.selection_color = Some(parse_color(value)?),
            _ => {
                if let Some(index) = parse_color_slot_index(key) {
                    self.colors[index] = Some(parse_color(value)?);
                } else if let Some(index) = parse_bright_color_slot_index(key) {
                    self.bright_colors[index] = Some(parse_color(value)?);
                } else {
                    return Err(format!("unrecognised key: {key}"));
                }
            }
        }
        Ok(())
    }

    /// `colorBD` defaults to the matching `color8..15` slot when `foreground` is set
    /// to one of `color0..7`, and that bright slot was itself given a value.
    fn apply_color_bd_heuristic(&mut self) {
        if self.color_bd.is_some() {
            return;
        }
        let Some(fg) = self.foreground else { return };
        if let Some(index) = self.colors.iter().position(|c| *c == Some(fg)) {
            self.color_bd = self.bright_colors[index];
        }
    }
}

fn parse_color_slot_index(key: &str) -> Option<usize> {
    let digits = key.strip_prefix("color")?;
    let n: usize = digits.parse().ok()?;
    (n < 8).then_some(n)
}

fn parse_bright_color_slot_index(key: &str) -> Option<usize> {
    let digits = key.strip_prefix("color")?;
    let n: usize = digits.parse().ok()?;
    (8..16).contains(&n).then_some(n - 8)
}

/// Parse one `Terminator*key: value` / `Terminator.key:` / bare `key:` line, skipping
/// blanks and `#`/`!` comments.
fn parse_resource_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
        return None;
    }
    let (lhs, value) = line.split_once(':')?;
    let key = lhs.trim().trim_start_matches("Terminator").trim_start_matches(['*', '.']);
    Some((key.trim().to_string(), value.trim().to_string()))
}

fn parse_bool(value: &str) -> std::result::Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(format!("not a boolean: {other}")),
    }
}

fn parse_int(value: &str) -> std::result::Result<u32, String> {
    value.parse().map_err(|_| format!("not an integer: {value}"))
}

fn parse_color(value: &str) -> std::result::Result<Rgb, String> {
    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex_rgb(hex);
    }
    x11_color_by_name(&value.to_ascii_lowercase())
        .ok_or_else(|| format!("unknown color name: {value}"))
}

fn parse_hex_rgb(hex: &str) -> std::result::Result<Rgb, String> {
    if hex.len() != 6 {
        return Err(format!("expected #rrggbb, got #{hex}"));
    }
    let byte = |slice: &str| u8::from_str_radix(slice, 16).map_err(|_| format!("bad hex in #{hex}"));
    Ok(Rgb { r: byte(&hex[0..2])?, g: byte(&hex[2..4])?, b: byte(&hex[4..6])? })
}

/// A minimal slice of the X11 `rgb.txt` name table; enough for the common color names
/// this format's examples use. Anything else falls through to the hex path.
fn x11_color_by_name(name: &str) -> Option<Rgb> {
    let table: &[(&str, Rgb)] = &[
        ("black", Rgb { r: 0, g: 0, b: 0 }),
        ("white", Rgb { r: 255, g: 255, b: 255 }),
        ("red", Rgb { r: 255, g: 0, b: 0 }),
        ("green", Rgb { r: 0, g: 255, b: 0 }),
        ("blue", Rgb { r: 0, g: 0, b: 255 }),
        ("yellow", Rgb { r: 255, g: 255, b: 0 }),
        ("cyan", Rgb { r: 0, g: 255, b: 255 }),
        ("magenta", Rgb { r: 255, g: 0, b: 255 }),
        ("gray", Rgb { r: 190, g: 190, b: 190 }),
        ("grey", Rgb { r: 190, g: 190, b: 190 }),
    ];
    table.iter().find(|(n, _)| *n == name).map(|(_, rgb)| *rgb)
}

/// Render a settings map back into `Terminator*key: value` lines, for persistence to
/// `~/.terminator-settings`. Only fields that differ from [`Settings::default`] are
/// written, keeping the file minimal like a typical X-resources override file.
#[must_use]
pub fn to_resource_text(settings: &Settings) -> String {
    let defaults = Settings::default();
    let mut lines = Vec::new();
    macro_rules! line {
        ($key:expr, $cond:expr, $value:expr) => {
            if $cond {
                lines.push(format!("Terminator*{}: {}", $key, $value));
            }
        };
    }
    line!("antiAlias", settings.anti_alias != defaults.anti_alias, settings.anti_alias);
    line!("blockCursor", settings.block_cursor != defaults.block_cursor, settings.block_cursor);
    line!("cursorBlink", settings.cursor_blink != defaults.cursor_blink, settings.cursor_blink);
    line!("fancyBell", settings.fancy_bell != defaults.fancy_bell, settings.fancy_bell);
    line!("visualBell", settings.visual_bell != defaults.visual_bell, settings.visual_bell);
    line!(
        "initialColumnCount",
        settings.initial_column_count != defaults.initial_column_count,
        settings.initial_column_count
    );
    line!(
        "initialRowCount",
        settings.initial_row_count != defaults.initial_row_count,
        settings.initial_row_count
    );
    line!("loginShell", settings.login_shell != defaults.login_shell, settings.login_shell);
    if let Some(name) = &settings.font_name {
        lines.push(format!("Terminator*fontName: {name}"));
    }
    lines.join("\n")
}

/// A non-primary-format escape hatch for diagnostics: dump a [`Settings`] as JSON for
/// `--help`-adjacent debug output, not for round-tripping (the resource-line text is
/// the real persistence format).
#[must_use]
pub fn to_diagnostic_json(settings: &Settings) -> HashMap<&'static str, serde_json::Value> {
    let mut map = HashMap::new();
    map.insert("settings", serde_json::to_value(settings).unwrap_or(serde_json::Value::Null));
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_star_and_dot_and_bare_forms() {
        let mut s = Settings::default();
        let errors = s.apply_resource_lines(
            "test",
            "Terminator*loginShell: false\nTerminator.scrollKey: false\nfontSize: 12\n",
        );
        assert!(errors.is_empty());
        assert!(!s.login_shell);
        assert!(!s.scroll_key);
        assert_eq!(s.font_size, Some(12));
    }

    #[test]
    fn comments_and_blanks_are_skipped() {
        let mut s = Settings::default();
        let errors = s.apply_resource_lines(
            "test",
            "# comment\n! also a comment\n\nTerminator*antiAlias: true\n",
        );
        assert!(errors.is_empty());
        assert!(s.anti_alias);
    }

    #[test]
    fn hex_and_named_colors_parse() {
        let mut s = Settings::default();
        let errors = s.apply_resource_lines(
            "test",
            "Terminator*background: #112233\nTerminator*foreground: white\n",
        );
        assert!(errors.is_empty());
        assert_eq!(s.background, Some(Rgb { r: 0x11, g: 0x22, b: 0x33 }));
        assert_eq!(s.foreground, Some(Rgb { r: 255, g: 255, b: 255 }));
    }

    #[test]
    fn color_slot_keys_populate_array() {
        let mut s = Settings::default();
        let errors = s.apply_resource_lines("test", "Terminator*color3: #ff00ff\n");
        assert!(errors.is_empty());
        assert_eq!(s.colors[3], Some(Rgb { r: 255, g: 0, b: 255 }));
    }

    #[test]
    fn unparseable_value_is_a_config_parse_error_but_rest_of_file_still_applies() {
        let mut s = Settings::default();
        let errors = s.apply_resource_lines(
            "test",
            "Terminator*loginShell: maybe\nTerminator*antiAlias: true\n",
        );
        assert_eq!(errors.len(), 1);
        assert!(matches!(&errors[0], TerminalCoreError::ConfigParseError { .. }));
        // The bad line didn't abort the rest of the file, and startup never sees a
        // hard failure from a single malformed value.
        assert!(s.anti_alias);
    }

    #[test]
    fn color_bd_heuristic_picks_matching_bright_slot() {
        let mut s = Settings::default();
        let errors = s.apply_resource_lines(
            "test",
            "Terminator*color2: #008000\nTerminator*color10: #00ff00\nTerminator*foreground: #008000\n",
        );
        assert!(errors.is_empty());
        assert_eq!(s.color_bd, Some(Rgb { r: 0, g: 255, b: 0 }));
    }

    #[test]
    fn explicit_color_bd_is_not_overridden_by_heuristic() {
        let mut s = Settings::default();
        let errors = s.apply_resource_lines(
            "test",
            "Terminator*color2: #008000\nTerminator*color10: #00ff00\nTerminator*foreground: #008000\nTerminator*colorBD: #abcdef\n",
        );
        assert!(errors.is_empty());
        assert_eq!(s.color_bd, Some(Rgb { r: 0xab, g: 0xcd, b: 0xef }));
    }

    #[test]
    fn unrecognised_key_is_reported_and_otherwise_ignored() {
        let mut s = Settings::default();
        let errors = s.apply_resource_lines("test", "Terminator*notARealOption: 42\n");
        assert_eq!(errors.len(), 1);
        assert!(matches!(&errors[0], TerminalCoreError::ConfigParseError { .. }));
        assert_eq!(s, Settings::default());
    }
}
