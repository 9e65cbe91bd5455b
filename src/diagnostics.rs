// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! This crate's own diagnostic logging (not to be confused with [`crate::log`], which
//! copies a *child's* terminal output verbatim). Initializes a `tracing` subscriber:
//! an `EnvFilter`-driven stderr layer always, plus an optional rolling file layer when
//! a log directory is configured — the same two-layer shape other `tracing_init`
//! helpers in this codebase's lineage build, simplified down to the writers this core
//! actually needs.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{Result, TerminalCoreError};

/// Install the global `tracing` subscriber. Call once, at process start.
///
/// `RUST_LOG` overrides the default filter (`info` for this crate, `warn` elsewhere).
/// If `file_dir` is given, diagnostics are additionally written to a daily-rolling
/// file there, named `terminator-core.log`.
///
/// # Errors
/// Returns [`TerminalCoreError::EnvironmentFailure`] if `file_dir` is given but isn't
/// a writable directory.
pub fn init(file_dir: Option<&std::path::Path>) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("terminator_core=info,warn"));

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_ansi(true));

    match file_dir {
        Some(dir) => {
            if !dir.is_dir() {
                return Err(TerminalCoreError::EnvironmentFailure {
                    reason: format!("log directory {} does not exist", dir.display()),
                }
                .into());
            }
            let appender = tracing_appender::rolling::daily(dir, "terminator-core.log");
            registry.with(fmt::layer().with_writer(appender).with_ansi(false)).init();
        }
        None => registry.init(),
    }

    Ok(())
}
