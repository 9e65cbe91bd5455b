// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Spawns and drives one PTY-hosted child, realizing a three-dedicated-thread model:
//! a blocking reader, a single-threaded writer, and a dedicated forker/reaper thread
//! that performs both spawn and `waitpid` so wait-constrained kernels stay correct.
//! The forker+reaper coupling onto one thread, and the Unix-specific signal-aware
//! reap, are this core's own addition over the reader/writer/input-handler task split
//! it's grounded on (see [`super::reap`]).

use std::path::PathBuf;

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::error::{Result, TerminalCoreError};
use crate::pty::command::build_child_command;
use crate::pty::config::PtySessionConfig;
use crate::pty::events::{PtyInputEvent, PtyOutputEvent};
use crate::pty::reap;

const READ_BUFFER_SIZE: usize = 4096;

/// A running PTY-hosted child. Dropping this (or sending [`PtyInputEvent::Close`])
/// closes the master, which is this core's cancellation mechanism.
pub struct PtySession {
    pub input: UnboundedSender<PtyInputEvent>,
    pub output: UnboundedReceiver<PtyOutputEvent>,
    handle: JoinHandle<()>,
    child_pid: Option<u32>,
}

impl PtySession {
    /// Abort every task backing this session without waiting for the child to exit.
    /// Used when the owner is tearing down and doesn't care about a clean reap.
    pub fn abort(&self) { self.handle.abort(); }

    /// Cancel the session: close stdin (which drops this session's master handle once
    /// `input` is dropped along with it) and send `SIGHUP` to the child. The reader
    /// observes EOF and the exit event follows through the normal connection-loss
    /// path; this method does not itself wait for that.
    pub fn cancel(&self) {
        let _ = self.input.send(PtyInputEvent::Close);
        self.hangup();
    }

    #[cfg(unix)]
    fn hangup(&self) {
        use rustix::process::{kill_process, Pid, Signal};
        if let Some(pid) = self.child_pid.and_then(|p| Pid::from_raw(p as i32)) {
            let _ = kill_process(pid, Signal::Hangup);
        }
    }

    #[cfg(not(unix))]
    fn hangup(&self) {}
}

impl std::fmt::Debug for PtySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PtySession").finish_non_exhaustive()
    }
}

/// Spawn `program` with `args` under a fresh PTY sized per `config`.
///
/// # Errors
/// Returns [`TerminalCoreError::EnvironmentFailure`] if the PTY cannot be opened, or
/// [`TerminalCoreError::ChildStartFailure`] if the command cannot be spawned in it.
pub fn spawn(
    program: &str,
    args: &[String],
    cwd: Option<PathBuf>,
    config: PtySessionConfig,
) -> Result<PtySession> {
    let command = build_child_command(program, args, cwd.as_ref())?;

    let pty_system = portable_pty::native_pty_system();
    let pair = pty_system.openpty(config.size).map_err(|e| TerminalCoreError::EnvironmentFailure {
        reason: format!("failed to open PTY: {e}"),
    })?;

    let reader = pair
        .master
        .try_clone_reader()
        .map_err(|e| TerminalCoreError::EnvironmentFailure {
            reason: format!("failed to clone PTY reader: {e}"),
        })?;

    let (input_tx, input_rx) = unbounded_channel::<PtyInputEvent>();
    let (output_tx, output_rx) = unbounded_channel::<PtyOutputEvent>();

    let (sync_input_tx, sync_input_rx) = std::sync::mpsc::channel::<PtyInputEvent>();

    let reader_event_tx = output_tx.clone();
    let reader_handle =
        tokio::task::spawn_blocking(move || reader_task(reader, &reader_event_tx));

    let writer_event_tx = output_tx.clone();
    let controller = pair.master;
    let writer_handle = tokio::task::spawn_blocking(move || {
        writer_task(controller, &sync_input_rx, &writer_event_tx);
    });

    // Bridges the async input channel onto the sync channel the blocking writer task
    // needs, keeping the async and blocking worlds separated.
    let bridge_handle = tokio::spawn(async move {
        let mut rx = input_rx;
        while let Some(input) = rx.recv().await {
            if sync_input_tx.send(input).is_err() {
                break;
            }
        }
        let _ = sync_input_tx.send(PtyInputEvent::Close);
    });

    // The forker/reaper thread: fork+exec (`spawn_command`) and the later `waitpid`
    // (`reap::reap`) both run inside this one `spawn_blocking` closure, so they land
    // on the same dedicated OS thread throughout the child's life, as platforms that
    // restrict reaping to the forking thread require. `pid_tx` reports the child's
    // pid (or a spawn failure) back to this function before the closure moves on to
    // waiting, so `spawn` can still fail synchronously the way it always has.
    let slave = pair.slave;
    let (pid_tx, pid_rx) = std::sync::mpsc::channel::<std::result::Result<Option<u32>, String>>();
    let reap_output_tx = output_tx.clone();
    let reap_handle = tokio::spawn(async move {
        tokio::task::spawn_blocking(move || {
            let mut child = match slave.spawn_command(command) {
                Ok(child) => child,
                Err(e) => {
                    let _ = pid_tx.send(Err(e.to_string()));
                    return;
                }
            };
            let child_pid = child.process_id();
            let _ = pid_tx.send(Ok(child_pid));

            // The controlled (slave) side is only needed by the child; dropping it
            // here means the reader observes EOF as soon as the child's last fd onto
            // it closes.
            drop(slave);

            let outcome = match child_pid {
                Some(pid) => reap::reap(pid)
                    .unwrap_or(crate::interpreter::ExitOutcome::Normal { status: 0 }),
                None => {
                    let _ = child.wait();
                    crate::interpreter::ExitOutcome::Normal { status: 0 }
                }
            };
            let _ = reap_output_tx.send(PtyOutputEvent::Exit(outcome));
        })
        .await;
    });

    let child_pid = match pid_rx.recv() {
        Ok(Ok(pid)) => pid,
        Ok(Err(reason)) => {
            reap_handle.abort();
            reader_handle.abort();
            writer_handle.abort();
            bridge_handle.abort();
            return Err(TerminalCoreError::ChildStartFailure { reason }.into());
        }
        Err(_) => {
            return Err(TerminalCoreError::EnvironmentFailure {
                reason: "forker thread exited before reporting a child pid".to_string(),
            }
            .into());
        }
    };

    let handle = tokio::spawn(async move {
        let _ = bridge_handle.await;
        let _ = reader_handle.await;
        let _ = writer_handle.await;
        let _ = reap_handle.await;
    });

    Ok(PtySession { input: input_tx, output: output_rx, handle, child_pid })
}

fn reader_task(
    mut reader: Box<dyn std::io::Read + Send>,
    events: &UnboundedSender<PtyOutputEvent>,
) {
    use std::io::Read as _;
    let mut buf = [0u8; READ_BUFFER_SIZE];
    loop {
        match reader.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                if events.send(PtyOutputEvent::Output(buf[..n].to_vec())).is_err() {
                    break;
                }
            }
        }
    }
}

fn writer_task(
    controller: Box<dyn portable_pty::MasterPty + Send>,
    input: &std::sync::mpsc::Receiver<PtyInputEvent>,
    events: &UnboundedSender<PtyOutputEvent>,
) {
    use std::io::Write as _;
    let Ok(mut writer) = controller.take_writer() else { return };

    loop {
        match input.recv() {
            Ok(PtyInputEvent::Write(bytes)) => {
                if let Err(e) = writer.write_all(&bytes).and_then(|()| writer.flush()) {
                    let _ = events.send(PtyOutputEvent::WriteError(e));
                    break;
                }
            }
            Ok(PtyInputEvent::Resize(size)) => {
                if let Err(e) = controller.resize(size) {
                    let _ = events
                        .send(PtyOutputEvent::WriteError(std::io::Error::other(e.to_string())));
                    break;
                }
            }
            Ok(PtyInputEvent::Close) | Err(_) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn echo_command_produces_output_then_exit() {
        let mut session =
            spawn("echo", &["hello".into()], None, PtySessionConfig::default()).unwrap();

        let mut collected = Vec::new();
        while let Some(event) = session.output.recv().await {
            match event {
                PtyOutputEvent::Output(bytes) => collected.extend(bytes),
                PtyOutputEvent::Exit(outcome) => {
                    assert!(outcome.is_normal_zero());
                    break;
                }
                PtyOutputEvent::WriteError(e) => panic!("unexpected write error: {e}"),
            }
        }
        assert!(String::from_utf8_lossy(&collected).contains("hello"));
    }
}
