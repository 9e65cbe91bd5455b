// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Binary entry point: parses the command line, loads settings, and spawns one
//! session per requested tab. This binary is a thin driver over
//! `terminator_core`'s session harness — it owns no escape-sequence or screen logic
//! of its own.

use std::path::PathBuf;

use clap::Parser;
use terminator_core::cli::{self, Cli};
use terminator_core::log::SessionLog;
use terminator_core::observer::null_observer;
use terminator_core::session::Session;
use terminator_core::settings::Settings;

const SETTINGS_FILE_NAME: &str = ".terminator-settings";

#[tokio::main]
async fn main() -> std::process::ExitCode {
    if let Err(report) = run().await {
        eprintln!("{report:?}");
        return std::process::ExitCode::FAILURE;
    }
    std::process::ExitCode::SUCCESS
}

async fn run() -> terminator_core::Result<()> {
    terminator_core::diagnostics::init(None)?;

    let args = Cli::parse();
    let mut settings = Settings::default();

    // A malformed settings file is never fatal to startup: bad lines are recorded and
    // skipped, and the rest of the file still takes effect.
    if let Some(path) = settings_file_path() {
        if let Ok(text) = std::fs::read_to_string(&path) {
            for error in settings.apply_resource_lines(&path.display().to_string(), &text) {
                tracing::warn!(%error, "settings file entry ignored");
            }
        }
    }
    for resource in &args.xrm {
        for error in settings.apply_resource_lines("-xrm", resource) {
            tracing::warn!(%error, "-xrm entry ignored");
        }
    }

    let tabs = cli::parse_tab_specs(&args.rest)?;
    let cols = u16::try_from(settings.initial_column_count).unwrap_or(80);
    let rows = u16::try_from(settings.initial_row_count).unwrap_or(24);

    let mut sessions = Vec::new();
    for tab in tabs {
        let session = Session::spawn(
            tab.command.as_deref(),
            &[],
            tab.working_directory,
            settings.login_shell,
            cols,
            rows,
            false,
            SessionLog::disabled(),
            null_observer(),
        )?;
        sessions.push(session);
    }

    // Each tab is an independent terminal; run them concurrently so one tab's child
    // exiting doesn't hold up the others.
    let mut tasks = tokio::task::JoinSet::new();
    for mut session in sessions {
        tasks.spawn(async move {
            session.run_until_exit().await;
        });
    }
    while tasks.join_next().await.is_some() {}

    Ok(())
}

fn settings_file_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(SETTINGS_FILE_NAME))
}
