// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! A cross-platform terminal emulator core: a PTY host, a streaming VT100/xterm
//! escape-sequence interpreter, and the screen model (scrollback, per-cell styling,
//! cursor, tab stops, alternate screen, scroll regions) they feed.
//!
//! # Layout
//! - [`action`]: the closed [`action::TerminalAction`] set the parser/interpreter emit
//!   and the screen model applies.
//! - [`parser`]: the escape parser, over `vte::Perform`.
//! - [`interpreter`]: batches parser output per read chunk; the connection-loss
//!   protocol.
//! - [`charset`]: G0-G3 charset translation tables.
//! - [`screen`]: the screen model.
//! - [`line`]: the per-row cell/style store.
//! - [`style`]: the packed per-cell style word.
//! - [`observer`]: the capability a [`screen::Screen`] uses to notify its owner.
//! - [`pty`]: the PTY host.
//! - [`log`]: per-session transcript logging.
//! - [`settings`]: the `-xrm` resource-string settings model.
//! - [`cli`]: the command-line surface.
//! - [`session`]: wires all of the above into one running terminal.
//! - [`diagnostics`]: this crate's own `tracing` setup.
//! - [`error`]: the error type surface.

pub mod action;
pub mod charset;
pub mod cli;
pub mod codes;
pub mod diagnostics;
pub mod error;
pub mod interpreter;
pub mod line;
pub mod log;
pub mod observer;
pub mod parser;
pub mod pty;
pub mod screen;
pub mod session;
pub mod settings;
pub mod style;

pub use action::TerminalAction;
pub use error::{Result, TerminalCoreError};
pub use observer::TerminalObserver;
pub use screen::Screen;
pub use session::Session;
pub use settings::Settings;
