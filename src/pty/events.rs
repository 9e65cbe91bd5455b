// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Input/output event types carried across the channels a [`super::session::PtySession`]
//! exposes, keeping the reader/writer/forker-reaper thread boundaries visible in the
//! types themselves.

use portable_pty::PtySize;

use crate::interpreter::ExitOutcome;

/// Commands accepted by the single-threaded PTY writer ("Writer" thread).
#[derive(Debug, Clone)]
pub enum PtyInputEvent {
    /// Raw bytes written to the child's stdin, exactly as given (already UTF-8 encoded
    /// by the caller).
    Write(Vec<u8>),
    /// Resize the PTY; handled directly by the writer task, which alone owns the
    /// controller side.
    Resize(PtySize),
    /// Close stdin and tear the session down.
    Close,
}

/// Events raised by the reader/forker-reaper threads and delivered to whatever drives
/// the interpreter ("Reader" and "Child forker/reaper" threads).
#[derive(Debug)]
pub enum PtyOutputEvent {
    /// A chunk of raw bytes read from the PTY master, destined for the interpreter.
    Output(Vec<u8>),
    /// The child has exited; carries the reaped outcome.
    Exit(ExitOutcome),
    /// A write to the PTY failed; the session is terminating.
    WriteError(std::io::Error),
}
