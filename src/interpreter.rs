// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The terminal interpreter (component C4): drives the byte-oriented escape parser
//! over a read chunk, reducing it to one [`TerminalAction`] batch, and synthesizes the
//! connection-loss notices a dead child produces.
//!
//! UTF-8 decoding and charset translation are realized inside [`crate::parser`]'s
//! `vte::Perform` implementation rather than as a separate pass here, since `vte`
//! decodes UTF-8 internally before ever calling `print` — see that module's docs for
//! why a second, standalone decoding stage here would be redundant rather than more
//! faithful to the source design.

use crate::action::TerminalAction;
use crate::parser::ActionPerformer;

/// Reduces raw PTY output bytes to [`TerminalAction`] batches, one batch per read
/// chunk, so the screen model always applies a whole batch atomically.
pub struct Interpreter {
    parser: vte::Parser,
    performer: ActionPerformer,
}

impl Default for Interpreter {
    fn default() -> Self { Self::new() }
}

impl Interpreter {
    #[must_use]
    pub fn new() -> Self {
        Self { parser: vte::Parser::new(), performer: ActionPerformer::new() }
    }

    /// Feed one read chunk through the escape parser and return the actions it
    /// produced. The caller is expected to hand this batch to
    /// [`crate::screen::Screen::process_actions`] synchronously before submitting the
    /// next chunk, so action batches never interleave.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<TerminalAction> {
        for &byte in bytes {
            self.parser.advance(&mut self.performer, byte);
        }
        self.performer.take_actions()
    }
}

impl std::fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interpreter").finish_non_exhaustive()
    }
}

/// How a child process exited, as reaped by the PTY host (component C5).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitOutcome {
    Normal { status: i32 },
    Signaled { signal: i32, name: String, core_dumped: bool },
}

impl ExitOutcome {
    #[must_use]
    pub fn is_normal_zero(&self) -> bool { matches!(self, ExitOutcome::Normal { status: 0 }) }
}

/// Synthesize the inline plain-text notice the connection-loss protocol feeds back
/// through the screen model.
#[must_use]
pub fn connection_loss_notice(outcome: &ExitOutcome) -> String {
    match outcome {
        ExitOutcome::Normal { status } => format!("[Process exited with status {status}.]"),
        ExitOutcome::Signaled { signal, name, core_dumped } => {
            let core = if *core_dumped { " --- core dumped" } else { "" };
            format!("[Process killed by signal {signal} ({name}){core}]")
        }
    }
}

/// Whether the session should close automatically after this exit, given the
/// "hold on exit" setting. Only a zero-status normal exit ever closes on its own.
#[must_use]
pub fn should_auto_close(outcome: &ExitOutcome, hold_on_exit: bool) -> bool {
    outcome.is_normal_zero() && !hold_on_exit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{CursorMove, SpecialChar};

    #[test]
    fn feed_splits_text_and_csi_into_one_batch() {
        let mut interp = Interpreter::new();
        let actions = interp.feed(b"hi\x1b[2D");
        assert_eq!(
            actions,
            vec![
                TerminalAction::PlainText("hi".into()),
                TerminalAction::CursorMove(CursorMove::RelativeCol(-2)),
            ]
        );
    }

    #[test]
    fn feed_across_two_chunks_preserves_order() {
        let mut interp = Interpreter::new();
        let first = interp.feed(b"ab");
        let second = interp.feed(b"\rcd");
        assert_eq!(first, vec![TerminalAction::PlainText("ab".into())]);
        assert_eq!(
            second,
            vec![
                TerminalAction::SpecialChar(SpecialChar::CarriageReturn),
                TerminalAction::PlainText("cd".into()),
            ]
        );
    }

    #[test]
    fn normal_zero_exit_notice() {
        let notice = connection_loss_notice(&ExitOutcome::Normal { status: 0 });
        assert_eq!(notice, "[Process exited with status 0.]");
        assert!(should_auto_close(&ExitOutcome::Normal { status: 0 }, false));
        assert!(!should_auto_close(&ExitOutcome::Normal { status: 0 }, true));
    }

    #[test]
    fn nonzero_exit_never_auto_closes() {
        assert!(!should_auto_close(&ExitOutcome::Normal { status: 1 }, false));
    }

    #[test]
    fn signaled_exit_notice_with_core_dump() {
        let notice = connection_loss_notice(&ExitOutcome::Signaled {
            signal: 11,
            name: "SIGSEGV".into(),
            core_dumped: true,
        });
        assert_eq!(notice, "[Process killed by signal 11 (SIGSEGV) --- core dumped]");
    }
}
