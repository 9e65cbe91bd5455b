// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The per-session log writer (component C6): an append-only, byte-exact copy of
//! everything the child wrote, named `<urlencoded-command>-<timestamp>.txt`.
//!
//! This writes raw child bytes verbatim rather than structured `tracing` events, so it
//! doesn't reuse the `tracing_appender::rolling` writer directly (that's reserved for
//! this core's own diagnostic logging, see [`crate::diagnostics`]) — but it keeps the
//! same shape: buffered writes, flush on a clear boundary, and the same "open failure
//! disables the feature rather than erroring the session" posture.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

/// Why logging is unavailable, surfaced to the UI as an `info` string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogUnavailable(pub String);

impl std::fmt::Display for LogUnavailable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}

/// A session's transcript log. Once construction fails, logging is permanently
/// suspended for the life of the session — there is no retry.
pub struct SessionLog {
    writer: Option<BufWriter<File>>,
    suspended: AtomicBool,
    unavailable_reason: Option<LogUnavailable>,
}

impl std::fmt::Debug for SessionLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionLog")
            .field("active", &self.writer.is_some())
            .field("suspended", &self.suspended.load(Ordering::Relaxed))
            .finish()
    }
}

impl SessionLog {
    /// Open `<log_dir>/<urlencoded command>-<yyyy-MM-dd-HHmmssZ>.txt` for append.
    /// `timestamp` is injected by the caller (this core never reads the clock itself,
    /// see [`crate::session`]'s doc note on why).
    #[must_use]
    pub fn open(log_dir: &Path, command: &str, timestamp: &str) -> Self {
        match try_open(log_dir, command, timestamp) {
            Ok(file) => Self {
                writer: Some(BufWriter::new(file)),
                suspended: AtomicBool::new(false),
                unavailable_reason: None,
            },
            Err(reason) => Self {
                writer: None,
                suspended: AtomicBool::new(true),
                unavailable_reason: Some(LogUnavailable(reason)),
            },
        }
    }

    /// A log that never writes anywhere; used when logging wasn't requested.
    #[must_use]
    pub fn disabled() -> Self {
        Self { writer: None, suspended: AtomicBool::new(true), unavailable_reason: None }
    }

    #[must_use]
    pub fn is_suspended(&self) -> bool { self.suspended.load(Ordering::Relaxed) }

    pub fn set_suspended(&self, suspended: bool) { self.suspended.store(suspended, Ordering::Relaxed); }

    #[must_use]
    pub fn unavailable_reason(&self) -> Option<&LogUnavailable> { self.unavailable_reason.as_ref() }

    /// Append raw bytes exactly as the child produced them; no escape-sequence
    /// stripping. Flushes whenever the chunk ends on a newline, so a `tail -f` reader
    /// sees output promptly without flushing on every single byte.
    pub fn write_chunk(&mut self, bytes: &[u8]) {
        if self.is_suspended() {
            return;
        }
        let Some(writer) = self.writer.as_mut() else { return };
        if writer.write_all(bytes).is_err() {
            self.suspended.store(true, Ordering::Relaxed);
            return;
        }
        if bytes.ends_with(b"\n") {
            let _ = writer.flush();
        }
    }
}

fn try_open(log_dir: &Path, command: &str, timestamp: &str) -> Result<File, String> {
    if !log_dir.is_dir() {
        return Err(format!("log directory {} does not exist", log_dir.display()));
    }
    let encoded = utf8_percent_encode(command, NON_ALPHANUMERIC).to_string();
    let file_name = format!("{encoded}-{timestamp}.txt");
    let path: PathBuf = log_dir.join(file_name);
    File::options().create(true).append(true).open(&path).map_err(|e| {
        format!("cannot open log file {}: {e}", path.display())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_in_missing_directory_permanently_suspends() {
        let log = SessionLog::open(Path::new("/does/not/exist"), "bash", "2026-01-01-000000Z");
        assert!(log.is_suspended());
        assert!(log.unavailable_reason().is_some());
    }

    #[test]
    fn open_in_tempdir_succeeds_and_writes() {
        let dir = std::env::temp_dir();
        let mut log = SessionLog::open(&dir, "bash --login", "2026-01-01-000000Z");
        assert!(!log.is_suspended());
        log.write_chunk(b"hello\n");
    }

    #[test]
    fn suspend_toggle_pauses_without_closing() {
        let dir = std::env::temp_dir();
        let log = SessionLog::open(&dir, "echo hi", "2026-01-01-000000Z");
        assert!(!log.is_suspended());
        log.set_suspended(true);
        assert!(log.is_suspended());
        log.set_suspended(false);
        assert!(!log.is_suspended());
    }

    #[test]
    fn percent_encoding_is_applied_to_command_in_filename() {
        let dir = std::env::temp_dir();
        let _log = SessionLog::open(&dir, "bash --login", "2026-01-01-000000Z");
        let expected_fragment = utf8_percent_encode("bash --login", NON_ALPHANUMERIC).to_string();
        assert!(dir.join(format!("{expected_fragment}-2026-01-01-000000Z.txt")).exists());
    }
}
