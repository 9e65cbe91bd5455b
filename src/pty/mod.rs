// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The PTY host (component C5): opens a pseudo-terminal, spawns a child process
//! inside it, and plumbs its I/O, resize, and reaping across three dedicated threads.
//! See [`session`] for the orchestration and [`reap`] for why the reap step goes
//! around `portable_pty` on Unix.

pub mod command;
pub mod config;
pub mod events;
pub mod reap;
pub mod session;

pub use config::PtySessionConfig;
pub use events::{PtyInputEvent, PtyOutputEvent};
pub use session::{spawn, PtySession};
