// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! PTY session sizing and lifecycle configuration.

use portable_pty::PtySize;

/// Configuration for one PTY-hosted child session.
///
/// Unlike a combinable-option builder that toggles output/OSC capture flags, every
/// session here always captures raw output, since that output is what feeds the
/// escape parser — there's no mode where it wouldn't.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PtySessionConfig {
    pub size: PtySize,
    /// Keep the session open after the child exits normally with status 0, so the
    /// connection-loss notice stays visible.
    pub hold_on_exit: bool,
}

impl Default for PtySessionConfig {
    fn default() -> Self {
        Self {
            size: PtySize { rows: 24, cols: 80, pixel_width: 0, pixel_height: 0 },
            hold_on_exit: false,
        }
    }
}

impl PtySessionConfig {
    #[must_use]
    pub fn with_dims(cols: u16, rows: u16) -> Self {
        Self {
            size: PtySize { rows, cols, pixel_width: 0, pixel_height: 0 },
            ..Self::default()
        }
    }

    #[must_use]
    pub fn hold_on_exit(mut self, hold: bool) -> Self {
        self.hold_on_exit = hold;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_80x24_and_does_not_hold() {
        let config = PtySessionConfig::default();
        assert_eq!(config.size.cols, 80);
        assert_eq!(config.size.rows, 24);
        assert!(!config.hold_on_exit);
    }

    #[test]
    fn with_dims_overrides_size_only() {
        let config = PtySessionConfig::with_dims(132, 43).hold_on_exit(true);
        assert_eq!(config.size.cols, 132);
        assert_eq!(config.size.rows, 43);
        assert!(config.hold_on_exit);
    }
}
