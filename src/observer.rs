// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The narrow observer capability the screen model uses to talk back to whatever owns
//! the visible pane, without holding a reference to that owner.
//!
//! This breaks the natural UI-owns-core / core-needs-to-reach-the-UI cycle: the owner
//! holds the [`crate::screen::Screen`], and the [`crate::screen::Screen`] holds only an
//! `Arc<dyn TerminalObserver>` with no further knowledge of what's on the other end.
//! The capability set is deliberately small — bell, cursor visibility, title, and
//! redraw — mirroring exactly what C3/C4 can produce that isn't itself a screen-grid
//! mutation.

use std::sync::Arc;

/// Side-channel notifications a [`crate::screen::Screen`] raises on its owner.
pub trait TerminalObserver: Send + Sync {
    /// BEL (`0x07`) was received.
    fn bell(&self) {}

    /// `OSC 0`/`OSC 2` set the window/tab title.
    fn set_title(&self, _title: &str) {}

    /// The connection-loss protocol (§4.4) wants the cursor hidden.
    fn set_cursor_visible(&self, _visible: bool) {}

    /// A batch of actions was applied; the owner should schedule a repaint.
    fn request_redraw(&self) {}
}

/// The observer used when nothing else is wired up (tests, headless use).
#[derive(Debug, Default)]
pub struct NullObserver;

impl TerminalObserver for NullObserver {}

#[must_use]
pub fn null_observer() -> Arc<dyn TerminalObserver> { Arc::new(NullObserver) }
