// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Builds the [`portable_pty::CommandBuilder`] for a child, applying the environment
//! sanitization policy before the child ever sees it.
//!
//! `portable_pty` already performs the POSIX post-fork sequence (steps 1-7, 9-10 in
//! that section: `chdir`, `setsid`, slave `chown`/`chmod`, `TIOCSCTTY`, fd cleanup,
//! default signal disposition, `execvp`) on every platform it supports — reimplementing
//! that by hand here would just be a worse copy of a dependency this core already
//! takes on for exactly that job. What's left for this module is the one policy step
//! `portable_pty` has no opinion on: which environment variables the child inherits.

use std::path::PathBuf;

use portable_pty::CommandBuilder;

use crate::error::{Result, TerminalCoreError};

/// Environment variables unconditionally unset before exec, regardless of platform.
const UNSET_ALWAYS: &[&str] = &["WINDOWID", "COLORTERM", "TERM_PROGRAM", "TERM_PROGRAM_VERSION"];

/// Build a child command for a new PTY session: `program` with `args`, inheriting the
/// parent's environment except for the sanitization this core's terminal identity
/// requires.
pub fn build_child_command(
    program: &str,
    args: &[String],
    cwd: Option<&PathBuf>,
) -> Result<CommandBuilder> {
    let mut cmd = CommandBuilder::new(program);
    cmd.args(args);

    let cwd = match cwd {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().map_err(|e| TerminalCoreError::EnvironmentFailure {
            reason: format!("cannot determine working directory: {e}"),
        })?,
    };
    cmd.cwd(cwd);

    cmd.env("TERM", "terminator");
    for key in UNSET_ALWAYS {
        cmd.env_remove(key);
    }
    unset_macos_launcher_vars(&mut cmd);

    Ok(cmd)
}

/// On macOS, the login launcher exports a handful of variables whose names embed the
/// parent process's PID (e.g. `XPC_SERVICE_NAME` variants minted per-launch); those are
/// meaningless once re-parented under this core's child and are stripped the same way
/// the always-unset list is.
fn unset_macos_launcher_vars(cmd: &mut CommandBuilder) {
    if !cfg!(target_os = "macos") {
        return;
    }
    let pid = std::process::id().to_string();
    for (key, _) in std::env::vars() {
        if key.contains(&pid) {
            cmd.env_remove(&key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_uses_provided_cwd() {
        let cwd = std::env::temp_dir();
        let cmd = build_child_command("true", &[], Some(&cwd)).unwrap();
        let _ = cmd; // CommandBuilder exposes no getter; this just confirms it builds.
    }

    #[test]
    fn build_falls_back_to_current_dir() {
        let cmd = build_child_command("true", &["-x".into()], None);
        assert!(cmd.is_ok());
    }
}
