// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Unix process reaping with full signal detail.
//!
//! `portable_pty::ExitStatus` only exposes `success()`/`exit_code()` — enough for the
//! cross-platform abstraction it provides, but not the `{wasSignaled, signalNumber,
//! didDumpCore}` triple the connection-loss notice needs. On Unix this core calls
//! `waitpid` itself via `rustix` on the child's raw pid rather than going through
//! `portable_pty::Child::wait`, to get at that detail directly.

use crate::interpreter::ExitOutcome;

#[cfg(unix)]
pub fn reap(pid: u32) -> std::io::Result<ExitOutcome> {
    use rustix::process::{waitpid, Pid, WaitOptions};

    let Some(pid) = Pid::from_raw(pid as i32) else {
        return Ok(ExitOutcome::Normal { status: 0 });
    };
    let status = waitpid(Some(pid), WaitOptions::empty())?
        .expect("waitpid with no WNOHANG always yields a status once the child is reaped");

    if let Some(code) = status.exit_status() {
        return Ok(ExitOutcome::Normal { status: code as i32 });
    }
    if let Some(signal) = status.terminating_signal() {
        let signal = signal as i32;
        return Ok(ExitOutcome::Signaled {
            signal,
            name: signal_name(signal),
            core_dumped: status.core_dumped(),
        });
    }
    Ok(ExitOutcome::Normal { status: 0 })
}

#[cfg(not(unix))]
pub fn reap(_pid: u32) -> std::io::Result<ExitOutcome> { Ok(ExitOutcome::Normal { status: 0 }) }

/// Signal number -> name, for the connection-loss notice text. Intentionally a flat
/// table rather than a libc lookup, so platforms without a shared signal numbering
/// (or without `strsignal` at all) still get a name for every signal this core cares
/// about; unrecognised numbers fall back to `SIG<n>`.
#[must_use]
pub fn signal_name(signal: i32) -> String {
    let name = match signal {
        1 => "SIGHUP",
        2 => "SIGINT",
        3 => "SIGQUIT",
        4 => "SIGILL",
        5 => "SIGTRAP",
        6 => "SIGABRT",
        7 => "SIGBUS",
        8 => "SIGFPE",
        9 => "SIGKILL",
        10 => "SIGUSR1",
        11 => "SIGSEGV",
        12 => "SIGUSR2",
        13 => "SIGPIPE",
        14 => "SIGALRM",
        15 => "SIGTERM",
        16 => "SIGSTKFLT",
        17 => "SIGCHLD",
        18 => "SIGCONT",
        19 => "SIGSTOP",
        20 => "SIGTSTP",
        21 => "SIGTTIN",
        22 => "SIGTTOU",
        23 => "SIGURG",
        24 => "SIGXCPU",
        25 => "SIGXFSZ",
        26 => "SIGVTALRM",
        27 => "SIGPROF",
        28 => "SIGWINCH",
        29 => "SIGIO",
        30 => "SIGPWR",
        31 => "SIGSYS",
        _ => return format!("SIG{signal}"),
    };
    name.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_signal_names() {
        assert_eq!(signal_name(9), "SIGKILL");
        assert_eq!(signal_name(11), "SIGSEGV");
    }

    #[test]
    fn unknown_signal_falls_back_to_number() {
        assert_eq!(signal_name(63), "SIG63");
    }
}
