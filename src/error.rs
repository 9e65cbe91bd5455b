// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The error type surface for this crate.
//!
//! Public fallible entry points return [`miette::Result`] so CLI-facing callers get
//! fancy diagnostic rendering; the underlying [`TerminalCoreError`] enum is what
//! actually carries structured context (signal numbers, paths, parse positions).
//!
//! Background failures that the session's own design says must never interrupt a
//! running child (malformed escape sequences, writes after the child has died) are
//! never constructed as an `Err` returned to a caller — they are logged via `tracing`
//! and swallowed at the point they occur. See the variants below for which kinds are
//! reported and which are background-only.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// The structured error kinds this crate distinguishes.
///
/// `EnvironmentFailure` and `ChildStartFailure` surface through the call that
/// triggered them. `ProtocolParseError` and `WriteAfterDeath` are never returned to a
/// caller; they exist as variants here so logging call sites can format them
/// consistently, but they are constructed and immediately logged, not propagated.
#[derive(Debug, Error, Diagnostic)]
pub enum TerminalCoreError {
    /// The PTY could not be opened, the child could not be forked, or a required
    /// directory (e.g. the log directory) is missing.
    #[error("environment failure: {reason}")]
    #[diagnostic(code(terminator_core::environment_failure))]
    EnvironmentFailure { reason: String },

    /// The child process wrote a diagnostic to the post-fork error pipe before
    /// calling `execvp`.
    #[error("child process failed to start: {reason}")]
    #[diagnostic(code(terminator_core::child_start_failure))]
    ChildStartFailure { reason: String },

    /// A malformed or truncated escape sequence was encountered. Background-only:
    /// never returned from a public API, logged and discarded at the parser.
    #[error("protocol parse error at byte offset {offset}: {reason}")]
    #[diagnostic(code(terminator_core::protocol_parse_error))]
    ProtocolParseError { offset: usize, reason: String },

    /// EOF or a transient read error on the PTY master. Drives the connection-loss
    /// protocol rather than being treated as a crash.
    #[error("I/O loss on PTY master: {0}")]
    #[diagnostic(code(terminator_core::io_loss))]
    IoLoss(#[source] std::io::Error),

    /// A write was attempted after the child had already exited. Background-only:
    /// dropped silently after being logged once.
    #[error("write attempted after child process death")]
    #[diagnostic(code(terminator_core::write_after_death))]
    WriteAfterDeath,

    /// An unrecognised key or malformed line in a settings/resource source.
    #[error("config parse error in {source_desc}: {reason}")]
    #[diagnostic(code(terminator_core::config_parse_error))]
    ConfigParseError { source_desc: String, reason: String },

    /// Wraps an I/O failure not otherwise covered above (e.g. opening the log file).
    #[error("I/O error at {path}: {source}")]
    #[diagnostic(code(terminator_core::io_error))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias for layering `miette` over a `thiserror` enum at public API
/// boundaries.
pub type Result<T> = miette::Result<T>;
