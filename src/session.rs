// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The session harness (component C12): wires the PTY host, interpreter, screen
//! model, and log writer into one running terminal, and implements the
//! connection-loss protocol and the action-boundary dispatch (C7).
//!
//! This stands in for the "UI thread" in a core with no actual UI: a single task owns
//! the [`crate::screen::Screen`] and applies each action batch as soon as the reader
//! produces it, which is what "synchronous dispatch, blocks until application
//! completes" collapses to when reader and UI-thread-equivalent are the same task.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use crate::error::Result;
use crate::interpreter::{connection_loss_notice, should_auto_close, ExitOutcome, Interpreter};
use crate::log::SessionLog;
use crate::observer::{null_observer, TerminalObserver};
use crate::pty::{self, PtyInputEvent, PtyOutputEvent, PtySession, PtySessionConfig};
use crate::screen::Screen;

/// One running terminal: a child process behind a PTY, decoded through the escape
/// parser, rendered into a [`Screen`].
pub struct Session {
    pty: PtySession,
    interpreter: Interpreter,
    screen: Screen,
    log: SessionLog,
    observer: Arc<dyn TerminalObserver>,
    hold_on_exit: bool,
    child_alive: bool,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").field("child_alive", &self.child_alive).finish_non_exhaustive()
    }
}

/// What a single processed PTY event did, so a caller driving the event loop
/// (typically [`Session::run_until_exit`], but exposed for callers who need to
/// interleave their own work between events) knows whether to keep polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    SessionClosed,
}

impl Session {
    /// Start a child under a fresh PTY and wire up the full pipeline. `command` is
    /// `None` for a login/non-login shell per `login_shell`.
    pub fn spawn(
        command: Option<&str>,
        args: &[String],
        cwd: Option<PathBuf>,
        login_shell: bool,
        cols: u16,
        rows: u16,
        hold_on_exit: bool,
        log: SessionLog,
        observer: Arc<dyn TerminalObserver>,
    ) -> Result<Self> {
        let program = command.map_or_else(|| default_shell(login_shell), ToString::to_string);
        let config = PtySessionConfig::with_dims(cols, rows).hold_on_exit(hold_on_exit);
        let pty = pty::spawn(&program, args, cwd, config)?;

        Ok(Self {
            pty,
            interpreter: Interpreter::new(),
            screen: Screen::with_observer(cols, rows, observer.clone()),
            log,
            observer,
            hold_on_exit,
            child_alive: true,
        })
    }

    #[must_use]
    pub fn screen(&self) -> &Screen { &self.screen }

    /// Encode and write one chunk of user input (keystrokes or a paste) to the child.
    /// Writes while the child is known dead are dropped and logged, never queued.
    pub fn write_input(&mut self, text: &str) {
        if !self.child_alive {
            warn!("dropping input write: child process is no longer running");
            return;
        }
        if self.pty.input.send(PtyInputEvent::Write(text.as_bytes().to_vec())).is_err() {
            self.child_alive = false;
        }
    }

    /// Cancel the session: close the PTY master and send `SIGHUP` to the child. The
    /// child's exit still arrives through the normal event stream, so callers should
    /// keep driving [`Session::step`] (or [`Session::run_until_exit`]) until it reports
    /// [`StepOutcome::SessionClosed`].
    pub fn cancel(&mut self) {
        self.pty.cancel();
        self.child_alive = false;
    }

    /// Resize the PTY and the screen model together; the screen's own resize has no
    /// reflow (see [`Screen::size_changed`]).
    pub fn resize(&mut self, cols: u16, rows: u16) {
        let size = portable_pty::PtySize { rows, cols, pixel_width: 0, pixel_height: 0 };
        if self.child_alive {
            let _ = self.pty.input.send(PtyInputEvent::Resize(size));
        }
        self.screen.size_changed(cols, rows);
    }

    /// Process exactly one event from the child (one read chunk, or its exit). This
    /// is the action boundary: one call either applies one batch or runs the
    /// connection-loss protocol to completion.
    pub async fn step(&mut self) -> StepOutcome {
        let Some(event) = self.pty.output.recv().await else {
            return StepOutcome::SessionClosed;
        };
        match event {
            PtyOutputEvent::Output(bytes) => {
                self.log.write_chunk(&bytes);
                let actions = self.interpreter.feed(&bytes);
                self.screen.process_actions(&actions);
                StepOutcome::Continue
            }
            PtyOutputEvent::Exit(outcome) => self.handle_exit(outcome),
            PtyOutputEvent::WriteError(e) => {
                warn!(error = %e, "PTY write failed; child is presumed dead");
                self.child_alive = false;
                StepOutcome::Continue
            }
        }
    }

    fn handle_exit(&mut self, outcome: ExitOutcome) -> StepOutcome {
        self.child_alive = false;
        let notice = connection_loss_notice(&outcome);
        info!(notice, "child process exited");

        let actions = self.interpreter.feed(b"\r\n");
        self.screen.process_actions(&actions);
        let actions = self.interpreter.feed(notice.as_bytes());
        self.screen.process_actions(&actions);
        self.observer.set_cursor_visible(false);

        if should_auto_close(&outcome, self.hold_on_exit) {
            StepOutcome::SessionClosed
        } else {
            StepOutcome::Continue
        }
    }

    /// Drive [`Session::step`] until the session closes.
    pub async fn run_until_exit(&mut self) {
        loop {
            if self.step().await == StepOutcome::SessionClosed {
                break;
            }
        }
    }
}

#[cfg(unix)]
fn default_shell(login_shell: bool) -> String {
    // Login vs. non-login only affects how the shell is invoked (argv[0] prefixed
    // with `-`), which `portable_pty::CommandBuilder` has no hook for; both resolve
    // to the same binary.
    let _ = login_shell;
    std::env::var("SHELL").unwrap_or_else(|_| "/bin/sh".to_string())
}

#[cfg(not(unix))]
fn default_shell(_login_shell: bool) -> String {
    std::env::var("COMSPEC").unwrap_or_else(|_| "cmd.exe".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn session_runs_echo_to_completion() {
        let mut session = Session::spawn(
            Some("echo"),
            &["hi".into()],
            None,
            true,
            80,
            24,
            false,
            SessionLog::disabled(),
            null_observer(),
        )
        .unwrap();

        session.run_until_exit().await;
        assert!(session.screen().display_row(0).contains("hi"));
    }

    #[tokio::test]
    async fn write_after_death_is_dropped_not_queued() {
        let mut session = Session::spawn(
            Some("true"),
            &[],
            None,
            true,
            80,
            24,
            false,
            SessionLog::disabled(),
            null_observer(),
        )
        .unwrap();
        session.run_until_exit().await;
        session.write_input("should be dropped");
        assert!(!session.child_alive);
    }
}
